//! Sentiment scorers consulted once per transcript chunk.

pub mod lexicon;
#[cfg(feature = "sentiment-model")]
pub mod model;

use std::path::Path;

use tracing::info;

use crate::config::LEXICON_SCORER;
use crate::error::Result;
use crate::tokenizer::Tokenizer;
use crate::types::SentimentScore;

pub use lexicon::LexiconScorer;
#[cfg(feature = "sentiment-model")]
pub use model::SequenceClassifier;

/// Maps a piece of text to a polarity label and a confidence in [0, 1].
pub trait SentimentScorer {
    fn score(&self, text: &str) -> Result<SentimentScore>;

    fn name(&self) -> &str;

    /// The tokenizer the scorer itself consumes, used for chunk budgets.
    fn tokenizer(&self) -> Option<&dyn Tokenizer> {
        None
    }
}

/// Resolve a configured scorer: `lexicon` for the built-in word lists, a
/// lexicon JSON file, or a sequence-classification checkpoint (local
/// directory or hub id).
pub fn load_scorer(model: &str) -> Result<Box<dyn SentimentScorer>> {
    if model == LEXICON_SCORER {
        return Ok(Box::new(LexiconScorer::default()));
    }
    let path = Path::new(model);
    if path.is_file() {
        let scorer = LexiconScorer::from_file(path)?;
        info!(model, "loaded custom sentiment lexicon");
        return Ok(Box::new(scorer));
    }
    load_model_scorer(model)
}

#[cfg(feature = "sentiment-model")]
fn load_model_scorer(model: &str) -> Result<Box<dyn SentimentScorer>> {
    Ok(Box::new(SequenceClassifier::load(model)?))
}

#[cfg(not(feature = "sentiment-model"))]
fn load_model_scorer(model: &str) -> Result<Box<dyn SentimentScorer>> {
    Err(crate::error::TrendError::model(
        model,
        "expected 'lexicon' or a lexicon JSON file; model checkpoints require the 'sentiment-model' feature",
    ))
}
