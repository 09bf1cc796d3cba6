//! Three-stage content pipeline: fetch videos, transcribe their audio, and
//! score transcript segments for sentiment trends.

#[cfg(feature = "whisper")]
pub mod audio;
pub mod chunking;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod tokenizer;
pub mod transcript;
pub mod transcription;
pub mod types;
pub mod videos;

pub use error::{Result, TrendError};
pub use pipeline::TrendAnalysisPipeline;
