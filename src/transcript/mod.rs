//! Transcript artifacts: reading them for analysis and persisting new ones.

pub mod reader;
pub mod store;

pub use reader::read_transcript;
pub use store::{TranscriptPaths, TranscriptStore};
