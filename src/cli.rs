use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::{DataLayout, PipelineConfig};
use crate::transcription::{WhisperSettings, DEFAULT_WHISPER_MODEL};

/// trendscribe - video transcript sentiment trends
///
/// Fetches video titles, transcribes audio, and scores transcript segments
/// for sentiment.
#[derive(Parser, Debug)]
#[command(name = "trendscribe", version)]
#[command(about = "Transcribe videos and score transcript segments for sentiment trends", long_about = None)]
pub struct Cli {
    /// Root directory holding scraped_videos/, transcripts/ and trends/
    #[arg(long = "data-dir", global = true, default_value = "data")]
    pub data_dir: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn layout(&self) -> DataLayout {
        DataLayout::new(self.data_dir.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search videos and save their titles.
    Scrape(ScrapeArgs),
    /// Transcribe an audio file into the transcripts directory.
    Transcribe(TranscribeArgs),
    /// Score an existing transcript and write the trend reports.
    Analyze(AnalyzeArgs),
    /// Transcribe an audio file, then analyze the new transcript.
    Run(RunArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScrapeArgs {
    /// Search query; also names the output file.
    #[arg(long, default_value = "dog")]
    pub query: String,
    /// Number of results to request.
    #[arg(long = "max-results", default_value_t = 10)]
    pub max_results: u32,
    /// YouTube Data API key.
    #[arg(long = "api-key", env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

impl ScrapeArgs {
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("Provide a YouTube API key via --api-key or YOUTUBE_API_KEY")
    }
}

#[derive(Args, Debug, Clone)]
pub struct WhisperArgs {
    /// Path to a ggml whisper model.
    #[arg(long = "whisper-model", default_value = DEFAULT_WHISPER_MODEL)]
    pub model: PathBuf,
    /// Spoken language of the audio.
    #[arg(long, default_value = "en")]
    pub language: String,
}

impl WhisperArgs {
    pub fn settings(&self) -> WhisperSettings {
        WhisperSettings {
            model_path: self.model.clone(),
            language: self.language.clone(),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AnalysisArgs {
    /// Path to a JSON pipeline config.
    #[arg(long = "config-file", value_name = "PATH", conflicts_with = "config_json")]
    pub config_file: Option<PathBuf>,
    /// Inline JSON pipeline config.
    #[arg(long = "config-json", value_name = "JSON", conflicts_with = "config_file")]
    pub config_json: Option<String>,
    /// Tokenizer: `auto` (the scorer's own), `heuristic`, or a tokenizer.json path.
    #[arg(long)]
    pub tokenizer: Option<String>,
    /// Scorer: `lexicon`, a lexicon JSON path, or a model directory / hub id.
    #[arg(long)]
    pub scorer: Option<String>,
    /// Maximum tokens per scoring call.
    #[arg(long = "max-length")]
    pub max_length: Option<usize>,
    /// Tokens reserved for model special tokens.
    #[arg(long = "safety-margin")]
    pub safety_margin: Option<usize>,
    /// Directory for detailed_analysis.json and analysis_summary.txt.
    #[arg(long = "output-dir")]
    pub output_dir: Option<PathBuf>,
}

impl AnalysisArgs {
    /// Config source first, then flag overrides. Without a config source the
    /// reports land in the data directory's trends/ folder.
    pub fn pipeline_config(&self, layout: &DataLayout) -> Result<PipelineConfig> {
        let has_source = self.config_file.is_some() || self.config_json.is_some();
        let mut config =
            PipelineConfig::load(self.config_file.as_deref(), self.config_json.as_deref())
                .context("Failed to load pipeline config")?;
        if !has_source {
            config.output_dir = layout.trends();
        }
        if let Some(tokenizer) = &self.tokenizer {
            config.tokenizer_model = tokenizer.clone();
        }
        if let Some(scorer) = &self.scorer {
            config.scorer_model = scorer.clone();
        }
        if let Some(max_length) = self.max_length {
            config.max_length = max_length;
        }
        if let Some(margin) = self.safety_margin {
            config.safety_margin = margin;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        config.validate().context("Pipeline config validation failed")?;
        Ok(config)
    }
}

#[derive(Args, Debug, Clone)]
pub struct TranscribeArgs {
    /// Audio file to transcribe (MP3, OGG, FLAC, WAV, ...).
    #[arg(value_name = "AUDIO")]
    pub audio: PathBuf,
    #[command(flatten)]
    pub whisper: WhisperArgs,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Transcript to analyze (.txt or .json).
    #[arg(value_name = "TRANSCRIPT")]
    pub transcript: PathBuf,
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Audio file to transcribe and analyze.
    #[arg(value_name = "AUDIO")]
    pub audio: PathBuf,
    #[command(flatten)]
    pub whisper: WhisperArgs,
    #[command(flatten)]
    pub analysis: AnalysisArgs,
}
