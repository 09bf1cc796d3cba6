use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::types::Transcript;

/// Paths of the two artifacts written for one transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptPaths {
    pub json: PathBuf,
    pub text: PathBuf,
}

/// Persists transcripts as `<base>_<timestamp>.json` and `.txt` pairs.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save `transcript` under a name derived from the audio file and the
    /// current local time.
    pub fn save(&self, transcript: &Transcript, audio_path: &Path) -> Result<TranscriptPaths> {
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        self.save_with_stamp(transcript, audio_path, &stamp)
    }

    pub fn save_with_stamp(
        &self,
        transcript: &Transcript,
        audio_path: &Path,
        stamp: &str,
    ) -> Result<TranscriptPaths> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create transcripts directory {:?}", self.dir))?;

        let base = audio_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("transcript");
        let base_name = format!("{}_{}", base, stamp);

        let json_path = self.dir.join(format!("{}.json", base_name));
        let json = serde_json::to_string_pretty(transcript)
            .context("Failed to serialize transcript")?;
        fs::write(&json_path, json)
            .with_context(|| format!("Failed to write transcript JSON {:?}", json_path))?;

        let text_path = self.dir.join(format!("{}.txt", base_name));
        fs::write(&text_path, render_readable(transcript))
            .with_context(|| format!("Failed to write transcript text {:?}", text_path))?;

        Ok(TranscriptPaths {
            json: json_path,
            text: text_path,
        })
    }
}

/// Human-readable layout: full text first, then timestamped segments.
pub fn render_readable(transcript: &Transcript) -> String {
    let mut out = String::new();
    out.push_str("Video Transcript\n");
    out.push_str(&"=".repeat(50));
    out.push_str("\n\n");

    out.push_str("Complete Transcript:\n");
    out.push_str(&"-".repeat(20));
    out.push('\n');
    out.push_str(&transcript.text);
    out.push_str("\n\n");

    out.push_str("Timestamped Segments:\n");
    out.push_str(&"-".repeat(20));
    out.push('\n');
    for segment in &transcript.chunks {
        out.push_str(&format!(
            "[{:.2}s - {:.2}s]: {}\n",
            segment.start(),
            segment.end(),
            segment.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{render_readable, TranscriptStore};
    use crate::types::{Transcript, TranscriptSegment};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn sample() -> Transcript {
        Transcript {
            text: " Welcome back. Today we rank dogs.".to_string(),
            chunks: vec![
                TranscriptSegment::new(0.0, 1.8, " Welcome back."),
                TranscriptSegment::new(1.8, 4.25, " Today we rank dogs."),
            ],
        }
    }

    #[test]
    fn readable_transcript_lists_segments() {
        let rendered = render_readable(&sample());
        assert!(rendered.starts_with("Video Transcript\n=================================================="));
        assert!(rendered.contains("Complete Transcript:\n--------------------\n Welcome back."));
        assert!(rendered.contains("[0.00s - 1.80s]:  Welcome back.\n"));
        assert!(rendered.contains("[1.80s - 4.25s]:  Today we rank dogs.\n"));
    }

    #[test]
    fn saves_json_and_text_pair() {
        let dir = tempdir().unwrap();
        let store = TranscriptStore::new(dir.path().join("transcripts"));
        let paths = store
            .save_with_stamp(&sample(), Path::new("data/scraped_videos/dogs.mp3"), "20240101_120000")
            .unwrap();

        assert_eq!(
            paths.json.file_name().unwrap().to_str().unwrap(),
            "dogs_20240101_120000.json"
        );
        assert_eq!(
            paths.text.file_name().unwrap().to_str().unwrap(),
            "dogs_20240101_120000.txt"
        );

        let saved: Transcript =
            serde_json::from_str(&fs::read_to_string(&paths.json).unwrap()).unwrap();
        assert_eq!(saved, sample());
        assert!(fs::read_to_string(&paths.text)
            .unwrap()
            .contains("Timestamped Segments:"));
    }
}
