//! Reader → chunker → classifier → writer, run once per transcript.

use std::path::Path;

use tracing::{info, warn};

use crate::chunking::TextChunker;
use crate::classifier::SegmentClassifier;
use crate::config::{PipelineConfig, AUTO_TOKENIZER};
use crate::error::Result;
use crate::report::TrendReportWriter;
use crate::sentiment::{load_scorer, SentimentScorer};
use crate::tokenizer::{load_tokenizer, Tokenizer};
use crate::transcript::read_transcript;
use crate::types::AnalysisRecord;

pub struct TrendAnalysisPipeline {
    config: PipelineConfig,
}

impl TrendAnalysisPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Analyze one transcript with the configured tokenizer and scorer.
    ///
    /// Reading the transcript or loading either model aborts the run; chunks
    /// that fail to score are skipped.
    pub fn run(&self, transcript_path: &Path) -> Result<Vec<AnalysisRecord>> {
        let text = load_text(transcript_path)?;
        info!(model = %self.config.scorer_model, "loading sentiment scorer");
        let scorer = load_scorer(&self.config.scorer_model)?;
        self.analyze_with_scorer(&text, scorer.as_ref())
    }

    /// Same as [`Self::run`] with a caller-supplied scorer. Under the `auto`
    /// tokenizer setting chunks are budgeted with the scorer's own tokenizer.
    pub fn run_with_scorer(
        &self,
        transcript_path: &Path,
        scorer: &dyn SentimentScorer,
    ) -> Result<Vec<AnalysisRecord>> {
        let text = load_text(transcript_path)?;
        self.analyze_with_scorer(&text, scorer)
    }

    /// Same as [`Self::run`] with caller-supplied models.
    pub fn run_with(
        &self,
        transcript_path: &Path,
        tokenizer: &dyn Tokenizer,
        scorer: &dyn SentimentScorer,
    ) -> Result<Vec<AnalysisRecord>> {
        let text = load_text(transcript_path)?;
        self.analyze(&text, tokenizer, scorer)
    }

    fn analyze_with_scorer(
        &self,
        text: &str,
        scorer: &dyn SentimentScorer,
    ) -> Result<Vec<AnalysisRecord>> {
        let loaded;
        let tokenizer: &dyn Tokenizer = match scorer.tokenizer() {
            Some(own) if self.config.tokenizer_model == AUTO_TOKENIZER => own,
            _ => {
                loaded = load_tokenizer(&self.config.tokenizer_model)?;
                loaded.as_ref()
            }
        };
        self.analyze(text, tokenizer, scorer)
    }

    fn analyze(
        &self,
        text: &str,
        tokenizer: &dyn Tokenizer,
        scorer: &dyn SentimentScorer,
    ) -> Result<Vec<AnalysisRecord>> {
        let chunker =
            TextChunker::new(tokenizer, self.config.max_length, self.config.safety_margin);
        let chunks = chunker.chunk(text)?;
        info!(segments = chunks.len(), budget = chunker.budget(), "analyzing segments of text");

        let outcome = SegmentClassifier::new(scorer).classify(&chunks);
        if !outcome.failures.is_empty() {
            warn!(
                failed = outcome.failures.len(),
                succeeded = outcome.records.len(),
                "some segments could not be analyzed"
            );
        }

        TrendReportWriter::new(&self.config.output_dir).write(outcome.records)
    }
}

fn load_text(path: &Path) -> Result<String> {
    let document = read_transcript(path)?;
    info!(path = %path.display(), format = ?document.format, "transcript loaded");
    Ok(document.text)
}
