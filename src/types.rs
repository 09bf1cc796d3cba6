//! Core types for the trendscribe transcript analysis pipeline

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a transcript's text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// Whole file content is the text
    Plain,
    /// JSON document carrying a `text` field
    Structured,
}

/// Source text loaded from one transcript artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDocument {
    pub text: String,
    pub format: TranscriptFormat,
}

/// Sentence-aligned slice of a transcript sized for one scoring call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// 1-based position in emission order
    pub index: usize,
    pub text: String,
}

/// Closed set of labels a sentiment scorer may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" | "POS" | "LABEL_1" => Ok(Self::Positive),
            "NEGATIVE" | "NEG" | "LABEL_0" => Ok(Self::Negative),
            other => Err(format!("unknown sentiment label '{}'", other)),
        }
    }
}

/// Raw scorer output: a label and a confidence in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    pub score: f64,
}

/// Per-chunk sentiment result as persisted in `detailed_analysis.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Mirrors the source chunk's index
    pub segment: usize,
    pub text: String,
    pub sentiment: SentimentLabel,
    /// Percentage in [0, 100], rounded to 2 decimals
    pub confidence: f64,
    /// Local time the chunk was scored (`%Y-%m-%d %H:%M:%S`)
    pub timestamp: String,
}

/// A chunk that could not be scored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    pub segment: usize,
    /// Length of the chunk in characters
    pub chunk_chars: usize,
    pub reason: String,
}

/// Aggregate polarity counts over successfully scored segments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrendSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
}

impl TrendSummary {
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        let positive = records
            .iter()
            .filter(|record| record.sentiment == SentimentLabel::Positive)
            .count();
        Self {
            total: records.len(),
            positive,
            negative: records.len() - positive,
        }
    }

    /// Share of positive segments in percent, `None` when nothing was analyzed.
    pub fn positive_percent(&self) -> Option<f64> {
        percent(self.positive, self.total)
    }

    /// Share of negative segments in percent, `None` when nothing was analyzed.
    pub fn negative_percent(&self) -> Option<f64> {
        percent(self.negative, self.total)
    }
}

fn percent(count: usize, total: usize) -> Option<f64> {
    (total > 0).then(|| round_to(count as f64 / total as f64 * 100.0, 1))
}

/// Round to `places` decimal places, exact halves going to the even digit.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Structured transcript produced by a transcription engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    #[serde(default)]
    pub chunks: Vec<TranscriptSegment>,
}

/// A timestamped piece of a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// (start, end) in seconds
    pub timestamp: (f64, f64),
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp: (start, end),
            text: text.into(),
        }
    }

    pub fn start(&self) -> f64 {
        self.timestamp.0
    }

    pub fn end(&self) -> f64 {
        self.timestamp.1
    }
}

/// One search hit from a video source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoListing {
    pub title: String,
    pub video_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(segment: usize, sentiment: SentimentLabel) -> AnalysisRecord {
        AnalysisRecord {
            segment,
            text: "Sample.".to_string(),
            sentiment,
            confidence: 90.0,
            timestamp: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn summary_counts_and_percentages() {
        let records = vec![
            record(1, SentimentLabel::Positive),
            record(2, SentimentLabel::Negative),
            record(4, SentimentLabel::Positive),
        ];
        let summary = TrendSummary::from_records(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.positive, 2);
        assert_eq!(summary.negative, 1);
        assert_eq!(summary.positive_percent(), Some(66.7));
        assert_eq!(summary.negative_percent(), Some(33.3));
    }

    #[test]
    fn empty_summary_has_no_percentages() {
        let summary = TrendSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.positive_percent(), None);
        assert_eq!(summary.negative_percent(), None);
    }

    #[test]
    fn halves_round_to_even() {
        assert_eq!(round_to(6.25, 1), 6.2);
        assert_eq!(round_to(93.75, 1), 93.8);
        assert_eq!(round_to(87.5, 0), 88.0);
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("positive".parse::<SentimentLabel>(), Ok(SentimentLabel::Positive));
        assert_eq!(" NEGATIVE ".parse::<SentimentLabel>(), Ok(SentimentLabel::Negative));
        assert!("NEUTRAL".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn record_serializes_with_uppercase_label() {
        let json = serde_json::to_value(record(1, SentimentLabel::Negative)).unwrap();
        assert_eq!(json["sentiment"], "NEGATIVE");
        assert_eq!(json["segment"], 1);
    }

    #[test]
    fn transcript_segment_timestamp_is_a_pair() {
        let segment = TranscriptSegment::new(0.5, 2.25, " hello");
        let json = serde_json::to_value(&segment).unwrap();
        assert_eq!(json["timestamp"], serde_json::json!([0.5, 2.25]));
    }
}
