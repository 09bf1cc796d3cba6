use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

/// Count with the scorer's own tokenizer, or the heuristic when it has none.
pub const AUTO_TOKENIZER: &str = "auto";
pub const HEURISTIC_TOKENIZER: &str = "heuristic";
pub const DEFAULT_TOKENIZER_MODEL: &str = AUTO_TOKENIZER;
pub const LEXICON_SCORER: &str = "lexicon";
/// Hub id of the DistilBERT SST-2 sentiment classifier.
pub const SST2_MODEL_ID: &str = "distilbert-base-uncased-finetuned-sst-2-english";
#[cfg(feature = "sentiment-model")]
pub const DEFAULT_SCORER_MODEL: &str = SST2_MODEL_ID;
#[cfg(not(feature = "sentiment-model"))]
pub const DEFAULT_SCORER_MODEL: &str = LEXICON_SCORER;
pub const DEFAULT_MAX_LENGTH: usize = 512;
pub const DEFAULT_SAFETY_MARGIN: usize = 10;

/// Settings handed to each trend-analysis component at construction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tokenizer used for budget enforcement (`auto`, `heuristic` or a tokenizer.json path)
    #[serde(alias = "tokenizer")]
    pub tokenizer_model: String,
    /// Sentiment scorer (`lexicon`, a lexicon JSON path, or a model directory / hub id)
    #[serde(alias = "scorer", alias = "model")]
    pub scorer_model: String,
    /// Maximum tokens the scorer accepts per call
    #[serde(alias = "maxLength")]
    pub max_length: usize,
    /// Tokens reserved for special tokens added by the scorer
    #[serde(alias = "safetyMargin")]
    pub safety_margin: usize,
    /// Directory receiving the detailed and summary artifacts
    #[serde(alias = "outputDir")]
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tokenizer_model: DEFAULT_TOKENIZER_MODEL.to_string(),
            scorer_model: DEFAULT_SCORER_MODEL.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
            safety_margin: DEFAULT_SAFETY_MARGIN,
            output_dir: DataLayout::default().trends(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.max_length > self.safety_margin,
            "max_length ({}) must be greater than safety_margin ({})",
            self.max_length,
            self.safety_margin
        );
        ensure!(
            !self.tokenizer_model.trim().is_empty(),
            "tokenizer_model must not be empty"
        );
        ensure!(
            !self.scorer_model.trim().is_empty(),
            "scorer_model must not be empty"
        );
        Ok(())
    }

    /// Load a config from a JSON file or inline JSON, falling back to defaults.
    pub fn load(path: Option<&Path>, json: Option<&str>) -> Result<Self> {
        if let Some(p) = path {
            let data = fs::read_to_string(p)
                .with_context(|| format!("Failed to read config file {:?}", p))?;
            return parse_config(&data);
        }

        if let Some(raw) = json {
            return parse_config(raw);
        }

        Ok(Self::default())
    }
}

fn parse_config(raw: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig =
        serde_json::from_str(raw).context("Failed to parse pipeline config JSON")?;
    Ok(config)
}

/// Fixed directory conventions under a data root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    pub root: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new("data")
    }
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn scraped_videos(&self) -> PathBuf {
        self.root.join("scraped_videos")
    }

    pub fn transcripts(&self) -> PathBuf {
        self.root.join("transcripts")
    }

    pub fn trends(&self) -> PathBuf {
        self.root.join("trends")
    }
}
