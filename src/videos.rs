//! Video search collaborator and the title list it leaves on disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::types::VideoListing;

/// Returns ranked search hits for a query.
pub trait VideoSource {
    fn search(&self, query: &str, max_results: u32) -> Result<Vec<VideoListing>>;
}

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

/// YouTube Data API v3 search over a blocking HTTP client.
pub struct YouTubeSource {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl YouTubeSource {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        ensure!(!api_key.trim().is_empty(), "YouTube API key must not be empty");
        let client = reqwest::blocking::Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, api_key })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId", default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
}

impl VideoSource for YouTubeSource {
    fn search(&self, query: &str, max_results: u32) -> Result<Vec<VideoListing>> {
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(YOUTUBE_SEARCH_URL)
            .query(&[
                ("q", query),
                ("part", "id,snippet"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .with_context(|| format!("YouTube search request for '{}' failed", query))?
            .error_for_status()
            .context("YouTube search returned an error status")?;
        let body: SearchResponse = response
            .json()
            .context("Failed to decode YouTube search response")?;
        Ok(listings_from_response(body))
    }
}

fn listings_from_response(body: SearchResponse) -> Vec<VideoListing> {
    body.items
        .into_iter()
        .filter_map(|item| {
            item.id.video_id.map(|video_id| VideoListing {
                title: item.snippet.title,
                video_id,
            })
        })
        .collect()
}

/// Write one title per line to `<dir>/<query>.txt`, replacing earlier runs.
pub fn save_titles(listings: &[VideoListing], dir: &Path, query: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create video directory {:?}", dir))?;
    let path = dir.join(format!("{}.txt", query));
    let mut contents = String::new();
    for listing in listings {
        contents.push_str(&listing.title);
        contents.push('\n');
    }
    fs::write(&path, contents).with_context(|| format!("Failed to write titles {:?}", path))?;
    info!(path = %path.display(), count = listings.len(), "video titles saved");
    Ok(path)
}
