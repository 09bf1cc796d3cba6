//! Token counting used to keep chunks under a scorer's input limit.

use std::path::Path;

use crate::config::{AUTO_TOKENIZER, HEURISTIC_TOKENIZER};
use crate::error::{Result, TrendError};

/// Counts tokens for a target model. Implementations must be deterministic.
pub trait Tokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize>;
}

/// Longest alphanumeric run counted as a single word piece.
const MAX_PIECE_CHARS: usize = 8;

/// WordPiece-style estimate that needs no vocabulary file.
///
/// Every alphanumeric run costs one token per started block of eight
/// characters, every other non-whitespace character costs one token, and
/// `special_tokens` are added once per call (`[CLS]`/`[SEP]` by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicTokenizer {
    special_tokens: usize,
}

impl Default for HeuristicTokenizer {
    fn default() -> Self {
        Self { special_tokens: 2 }
    }
}

impl HeuristicTokenizer {
    pub fn new(special_tokens: usize) -> Self {
        Self { special_tokens }
    }
}

impl Tokenizer for HeuristicTokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        let mut tokens = self.special_tokens;
        let mut run = 0usize;
        for ch in text.chars() {
            if ch.is_alphanumeric() {
                run += 1;
                continue;
            }
            tokens += run.div_ceil(MAX_PIECE_CHARS);
            run = 0;
            if !ch.is_whitespace() {
                tokens += 1;
            }
        }
        tokens += run.div_ceil(MAX_PIECE_CHARS);
        Ok(tokens)
    }
}

/// Adapter over a HuggingFace `tokenizer.json`.
#[cfg(feature = "hf-tokenizer")]
pub struct HfTokenizer {
    inner: tokenizers::Tokenizer,
}

#[cfg(feature = "hf-tokenizer")]
impl HfTokenizer {
    pub fn from_file(path: &Path) -> Result<Self> {
        let inner = tokenizers::Tokenizer::from_file(path)
            .map_err(|err| TrendError::model(path.display().to_string(), err.to_string()))?;
        Ok(Self { inner })
    }

    /// Uncased BERT WordPiece tokenizer built from a bare `vocab.txt`, for
    /// checkpoints that ship no `tokenizer.json`.
    pub fn from_bert_vocab(path: &Path) -> Result<Self> {
        use tokenizers::models::wordpiece::WordPiece;
        use tokenizers::normalizers::{BertNormalizer, NormalizerWrapper};
        use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
        use tokenizers::pre_tokenizers::PreTokenizerWrapper;
        use tokenizers::processors::bert::BertProcessing;
        use tokenizers::processors::PostProcessorWrapper;
        use tokenizers::Model;

        let model_err = |message: String| TrendError::model(path.display().to_string(), message);
        let wordpiece = WordPiece::from_file(&path.to_string_lossy())
            .unk_token("[UNK]".to_string())
            .build()
            .map_err(|err| model_err(err.to_string()))?;
        let special = |token: &str| {
            wordpiece
                .token_to_id(token)
                .map(|id| (token.to_string(), id))
                .ok_or_else(|| model_err(format!("vocabulary has no {} token", token)))
        };
        let sep = special("[SEP]")?;
        let cls = special("[CLS]")?;

        let mut inner = tokenizers::Tokenizer::new(wordpiece);
        inner
            .with_normalizer(NormalizerWrapper::from(BertNormalizer::new(
                true, true, None, true,
            )))
            .with_pre_tokenizer(PreTokenizerWrapper::from(BertPreTokenizer))
            .with_post_processor(PostProcessorWrapper::from(BertProcessing::new(sep, cls)));
        Ok(Self { inner })
    }

    /// Token ids including the model's special tokens.
    pub fn encode_ids(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|err| TrendError::tokenizer(err.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }
}

#[cfg(feature = "hf-tokenizer")]
impl Tokenizer for HfTokenizer {
    fn count_tokens(&self, text: &str) -> Result<usize> {
        Ok(self.encode_ids(text)?.len())
    }
}

/// Resolve a configured tokenizer name into an implementation.
///
/// `auto` lands here only when the scorer brings no tokenizer of its own.
pub fn load_tokenizer(model: &str) -> Result<Box<dyn Tokenizer>> {
    if model == AUTO_TOKENIZER || model == HEURISTIC_TOKENIZER {
        return Ok(Box::new(HeuristicTokenizer::default()));
    }
    let path = Path::new(model);
    if !path.is_file() {
        return Err(TrendError::model(
            model,
            "expected 'auto', 'heuristic' or a path to a tokenizer.json file",
        ));
    }
    load_tokenizer_file(path)
}

#[cfg(feature = "hf-tokenizer")]
fn load_tokenizer_file(path: &Path) -> Result<Box<dyn Tokenizer>> {
    Ok(Box::new(HfTokenizer::from_file(path)?))
}

#[cfg(not(feature = "hf-tokenizer"))]
fn load_tokenizer_file(path: &Path) -> Result<Box<dyn Tokenizer>> {
    Err(TrendError::model(
        path.display().to_string(),
        "tokenizer files require the 'hf-tokenizer' feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::{load_tokenizer, HeuristicTokenizer, Tokenizer};

    #[test]
    fn counts_words_punctuation_and_specials() {
        let tokenizer = HeuristicTokenizer::default();
        assert_eq!(tokenizer.count_tokens("Dogs are great.").unwrap(), 6);
        assert_eq!(tokenizer.count_tokens("").unwrap(), 2);
    }

    #[test]
    fn long_words_cost_extra_pieces() {
        let tokenizer = HeuristicTokenizer::new(0);
        assert_eq!(tokenizer.count_tokens("internationalization").unwrap(), 3);
        assert_eq!(tokenizer.count_tokens("don't").unwrap(), 3);
    }

    #[test]
    fn unknown_model_name_fails_to_load() {
        assert!(load_tokenizer("no-such-tokenizer.json").is_err());
        assert!(load_tokenizer("heuristic").is_ok());
        assert!(load_tokenizer("auto").is_ok());
    }

    #[cfg(feature = "hf-tokenizer")]
    #[test]
    fn bert_vocab_counts_specials_and_lowercases() {
        use super::HfTokenizer;

        let dir = tempfile::tempdir().unwrap();
        let vocab = dir.path().join("vocab.txt");
        std::fs::write(&vocab, "[PAD]\n[UNK]\n[CLS]\n[SEP]\ndogs\nare\ngreat\n.\n").unwrap();

        let tokenizer = HfTokenizer::from_bert_vocab(&vocab).unwrap();
        assert_eq!(tokenizer.encode_ids("Dogs are great.").unwrap(), vec![2, 4, 5, 6, 7, 3]);
        assert_eq!(tokenizer.count_tokens("Cats are great.").unwrap(), 6);
    }
}
