use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Convenient alias for results returned by the trend-analysis core.
pub type Result<T> = std::result::Result<T, TrendError>;

/// Failures surfaced by the trend-analysis core.
///
/// Everything except [`TrendError::Scoring`] aborts a pipeline run. Scoring
/// failures are absorbed per chunk by the classifier.
#[derive(Debug)]
pub enum TrendError {
    /// Input artifact does not exist.
    NotFound { path: PathBuf },
    /// Input artifact exists but could not be read.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Input artifact is not valid JSON.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// An output artifact could not be written.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Scorer or tokenizer could not be acquired.
    Model { name: String, message: String },
    /// Token counting failed for a piece of text.
    Tokenizer { message: String },
    /// Sentiment scoring failed for a single input.
    Scoring { message: String },
}

impl TrendError {
    pub fn model(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Model {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn tokenizer(message: impl Into<String>) -> Self {
        Self::Tokenizer {
            message: message.into(),
        }
    }

    pub fn scoring(message: impl Into<String>) -> Self {
        Self::Scoring {
            message: message.into(),
        }
    }
}

impl Display for TrendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "transcript file not found at: {}", path.display())
            }
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {}", path.display(), source)
            }
            Self::Write { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::Model { name, message } => {
                write!(f, "failed to load model '{}': {}", name, message)
            }
            Self::Tokenizer { message } => write!(f, "tokenizer error: {}", message),
            Self::Scoring { message } => write!(f, "scoring error: {}", message),
        }
    }
}

impl Error for TrendError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}
