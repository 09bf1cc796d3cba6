//! Per-chunk sentiment classification with failure isolation.

use chrono::Local;
use tracing::{info, warn};

use crate::sentiment::SentimentScorer;
use crate::types::{round_to, AnalysisRecord, ChunkFailure, TextChunk};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Successes and failures of one classification batch, each in chunk order.
#[derive(Debug, Clone, Default)]
pub struct ClassificationOutcome {
    pub records: Vec<AnalysisRecord>,
    pub failures: Vec<ChunkFailure>,
}

pub struct SegmentClassifier<'a> {
    scorer: &'a dyn SentimentScorer,
}

impl<'a> SegmentClassifier<'a> {
    pub fn new(scorer: &'a dyn SentimentScorer) -> Self {
        Self { scorer }
    }

    /// Score a single chunk.
    pub fn classify_chunk(&self, chunk: &TextChunk) -> Result<AnalysisRecord, ChunkFailure> {
        let failure = |reason: String| ChunkFailure {
            segment: chunk.index,
            chunk_chars: chunk.text.chars().count(),
            reason,
        };
        let result = self
            .scorer
            .score(&chunk.text)
            .map_err(|err| failure(err.to_string()))?;
        if !(0.0..=1.0).contains(&result.score) {
            return Err(failure(format!(
                "confidence {} outside [0, 1]",
                result.score
            )));
        }
        Ok(AnalysisRecord {
            segment: chunk.index,
            text: chunk.text.clone(),
            sentiment: result.label,
            confidence: round_to(result.score * 100.0, 2),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        })
    }

    /// Score every chunk in order. A failing chunk is logged and skipped, so
    /// the returned records may have ordinal gaps.
    pub fn classify(&self, chunks: &[TextChunk]) -> ClassificationOutcome {
        let mut outcome = ClassificationOutcome::default();
        for chunk in chunks {
            info!(
                segment = chunk.index,
                total = chunks.len(),
                scorer = self.scorer.name(),
                "analyzing segment"
            );
            match self.classify_chunk(chunk) {
                Ok(record) => outcome.records.push(record),
                Err(failure) => {
                    warn!(
                        segment = failure.segment,
                        chunk_chars = failure.chunk_chars,
                        reason = %failure.reason,
                        "error processing segment; skipping"
                    );
                    outcome.failures.push(failure);
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::SegmentClassifier;
    use crate::error::{Result, TrendError};
    use crate::sentiment::SentimentScorer;
    use crate::types::{SentimentLabel, SentimentScore, TextChunk};

    /// Returns a fixed score, failing for chunks containing "FAIL".
    struct Scripted {
        score: f64,
    }

    impl SentimentScorer for Scripted {
        fn score(&self, text: &str) -> Result<SentimentScore> {
            if text.contains("FAIL") {
                return Err(TrendError::scoring("model rejected input"));
            }
            Ok(SentimentScore {
                label: SentimentLabel::Positive,
                score: self.score,
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn chunks(texts: &[&str]) -> Vec<TextChunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| TextChunk {
                index: i + 1,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn scales_confidence_to_percent() {
        let scorer = Scripted { score: 0.87 };
        let record = SegmentClassifier::new(&scorer)
            .classify_chunk(&chunks(&["Dogs are great."])[0])
            .unwrap();
        assert_eq!(record.segment, 1);
        assert_eq!(record.text, "Dogs are great.");
        assert_eq!(record.sentiment, SentimentLabel::Positive);
        assert_eq!(record.confidence, 87.0);
        assert_eq!(record.timestamp.len(), "2024-01-01 00:00:00".len());
    }

    #[test]
    fn rounds_confidence_to_two_places() {
        let scorer = Scripted { score: 0.998_765 };
        let record = SegmentClassifier::new(&scorer)
            .classify_chunk(&chunks(&["Fine."])[0])
            .unwrap();
        assert_eq!(record.confidence, 99.88);
    }

    #[test]
    fn skips_failed_chunk_and_keeps_order() {
        let scorer = Scripted { score: 0.9 };
        let outcome = SegmentClassifier::new(&scorer).classify(&chunks(&[
            "Dogs are great.",
            "FAIL here.",
            "Fish are boring.",
        ]));

        let segments: Vec<usize> = outcome.records.iter().map(|r| r.segment).collect();
        assert_eq!(segments, vec![1, 3]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].segment, 2);
        assert_eq!(outcome.failures[0].chunk_chars, "FAIL here.".len());
    }

    #[test]
    fn out_of_range_confidence_is_a_failure() {
        let scorer = Scripted { score: 1.5 };
        let outcome = SegmentClassifier::new(&scorer).classify(&chunks(&["Too sure."]));
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn ordinals_are_strictly_increasing_subsequence() {
        let scorer = Scripted { score: 0.6 };
        let input = chunks(&["a.", "FAIL.", "b.", "FAIL.", "FAIL.", "c."]);
        let outcome = SegmentClassifier::new(&scorer).classify(&input);

        assert!(outcome.records.len() <= input.len());
        assert!(outcome
            .records
            .windows(2)
            .all(|pair| pair[0].segment < pair[1].segment));
        assert!(outcome
            .records
            .iter()
            .all(|r| (1..=input.len()).contains(&r.segment)));
        assert_eq!(outcome.records.len() + outcome.failures.len(), input.len());
    }
}
