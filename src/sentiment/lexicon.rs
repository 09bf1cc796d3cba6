use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, TrendError};
use crate::sentiment::SentimentScorer;
use crate::types::{SentimentLabel, SentimentScore};

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "beautiful", "best", "better", "brilliant", "cool", "cute", "enjoy",
    "enjoyed", "excellent", "excited", "exciting", "fantastic", "favorite", "fun", "funny",
    "glad", "good", "great", "happy", "helpful", "incredible", "love", "loved", "lovely",
    "nice", "okay", "perfect", "recommend", "smart", "success", "super", "thank", "thanks",
    "win", "wonderful", "wow",
];

const NEGATIVE_WORDS: &[&str] = &[
    "angry", "annoying", "awful", "bad", "boring", "broken", "confusing", "disappointed",
    "disappointing", "fail", "failed", "hate", "hated", "horrible", "lose", "lost", "mess",
    "pain", "poor", "problem", "sad", "scary", "stupid", "terrible", "ugly", "useless",
    "waste", "worse", "worst", "wrong",
];

/// Word lists as stored in a lexicon JSON file.
#[derive(Debug, Deserialize)]
struct LexiconFile {
    positive: Vec<String>,
    negative: Vec<String>,
}

/// Counts polarity words and turns the margin into a binary label.
///
/// Ties (including text with no known words) are labelled positive at 0.5,
/// mirroring a binary classifier that has to pick a side.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    positive: HashSet<String>,
    negative: HashSet<String>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(
            POSITIVE_WORDS.iter().map(|word| word.to_string()),
            NEGATIVE_WORDS.iter().map(|word| word.to_string()),
        )
    }
}

impl LexiconScorer {
    pub fn new(
        positive: impl IntoIterator<Item = String>,
        negative: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            positive: positive.into_iter().map(|w| w.to_lowercase()).collect(),
            negative: negative.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| TrendError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: LexiconFile = serde_json::from_str(&raw).map_err(|source| TrendError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if file.positive.is_empty() && file.negative.is_empty() {
            return Err(TrendError::model(
                path.display().to_string(),
                "lexicon has no words",
            ));
        }
        Ok(Self::new(file.positive, file.negative))
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<SentimentScore> {
        if text.trim().is_empty() {
            return Err(TrendError::scoring("cannot score empty text"));
        }
        let mut positive = 0usize;
        let mut negative = 0usize;
        for word in text
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|word| !word.is_empty())
        {
            let word = word.to_lowercase();
            if self.positive.contains(&word) {
                positive += 1;
            } else if self.negative.contains(&word) {
                negative += 1;
            }
        }

        let label = if negative > positive {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Positive
        };
        let margin = positive.abs_diff(negative) as f64;
        Ok(SentimentScore {
            label,
            score: 0.5 + 0.5 * margin / (margin + 1.0),
        })
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::LexiconScorer;
    use crate::sentiment::{load_scorer, SentimentScorer};
    use crate::types::SentimentLabel;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn scores_polarity_by_margin() {
        let scorer = LexiconScorer::default();
        let positive = scorer.score("Dogs are great. I love them.").unwrap();
        assert_eq!(positive.label, SentimentLabel::Positive);
        assert_relative_eq!(positive.score, 0.5 + 0.5 * 2.0 / 3.0);

        let negative = scorer.score("Fish are boring.").unwrap();
        assert_eq!(negative.label, SentimentLabel::Negative);
        assert_relative_eq!(negative.score, 0.75);
    }

    #[test]
    fn neutral_text_is_an_even_positive() {
        let score = LexiconScorer::default().score("The cat sat.").unwrap();
        assert_eq!(score.label, SentimentLabel::Positive);
        assert_relative_eq!(score.score, 0.5);
    }

    #[test]
    fn empty_text_fails() {
        assert!(LexiconScorer::default().score("   ").is_err());
    }

    #[test]
    fn loads_lexicon_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lexicon.json");
        fs::write(&path, r#"{"positive": ["Pog"], "negative": ["cringe"]}"#).unwrap();

        let scorer = load_scorer(path.to_str().unwrap()).unwrap();
        assert_eq!(scorer.score("pog pog cringe").unwrap().label, SentimentLabel::Positive);
        assert_eq!(scorer.score("so cringe").unwrap().label, SentimentLabel::Negative);
    }

    #[cfg(not(feature = "sentiment-model"))]
    #[test]
    fn model_checkpoints_need_model_support() {
        let err = load_scorer("distilbert-base-uncased-finetuned-sst-2-english")
            .err()
            .unwrap();
        assert!(err.to_string().contains("sentiment-model"));
    }

    #[test]
    fn lexicon_brings_no_tokenizer() {
        assert!(LexiconScorer::default().tokenizer().is_none());
    }
}
