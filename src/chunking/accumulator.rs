use crate::types::TextChunk;

pub(super) struct ChunkAccumulator {
    budget: usize,
    chunks: Vec<TextChunk>,
    current_sentences: Vec<String>,
    current_tokens: usize,
}

impl ChunkAccumulator {
    pub(super) fn new(budget: usize) -> Self {
        Self {
            budget,
            chunks: Vec::new(),
            current_sentences: Vec::new(),
            current_tokens: 0,
        }
    }

    pub(super) fn handle_sentence(&mut self, sentence: String, tokens: usize) {
        // An oversized sentence still lands alone in its own chunk
        if self.current_tokens + tokens > self.budget {
            self.finish_chunk();
        }
        self.current_sentences.push(sentence);
        self.current_tokens += tokens;
    }

    pub(super) fn finish_chunk(&mut self) {
        if self.current_sentences.is_empty() {
            return;
        }
        self.chunks.push(TextChunk {
            index: self.chunks.len() + 1,
            text: self.current_sentences.join(" "),
        });
        self.current_sentences.clear();
        self.current_tokens = 0;
    }

    pub(super) fn into_chunks(self) -> Vec<TextChunk> {
        self.chunks
    }
}
