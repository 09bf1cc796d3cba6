//! Sentence-aligned chunking under a token budget

mod accumulator;
mod sentences;


use tracing::debug;

use crate::error::Result;
use crate::tokenizer::Tokenizer;
use crate::types::TextChunk;

use self::accumulator::ChunkAccumulator;
use self::sentences::split_sentences;

/// Splits transcript text into chunks a scorer can accept in one call.
pub struct TextChunker<'a> {
    tokenizer: &'a dyn Tokenizer,
    max_length: usize,
    safety_margin: usize,
}

impl<'a> TextChunker<'a> {
    pub fn new(tokenizer: &'a dyn Tokenizer, max_length: usize, safety_margin: usize) -> Self {
        Self {
            tokenizer,
            max_length,
            safety_margin,
        }
    }

    /// Token budget per chunk once the safety margin is reserved.
    pub fn budget(&self) -> usize {
        self.max_length.saturating_sub(self.safety_margin)
    }

    /// Greedily pack whole sentences into chunks whose summed sentence token
    /// counts stay within [`Self::budget`]. Sentences are never split, so a
    /// sentence larger than the budget becomes a chunk of its own.
    pub fn chunk(&self, text: &str) -> Result<Vec<TextChunk>> {
        let mut accumulator = ChunkAccumulator::new(self.budget());
        for sentence in split_sentences(text) {
            let tokens = self.tokenizer.count_tokens(&sentence)?;
            if tokens > self.budget() {
                debug!(tokens, budget = self.budget(), "sentence exceeds token budget");
            }
            accumulator.handle_sentence(sentence, tokens);
        }
        accumulator.finish_chunk();
        Ok(accumulator.into_chunks())
    }
}
