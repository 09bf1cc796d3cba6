//! DistilBERT sequence classification (SST-2 style) on candle.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::distilbert::{Config, DistilBertModel};
use hf_hub::api::sync::Api;
use serde::Deserialize;
use tracing::info;

use crate::error::{Result, TrendError};
use crate::sentiment::SentimentScorer;
use crate::tokenizer::{HfTokenizer, Tokenizer};
use crate::types::{SentimentLabel, SentimentScore};

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const VOCAB_FILE: &str = "vocab.txt";
const WEIGHTS_FILE: &str = "model.safetensors";

/// Classification head settings read next to the encoder config.
#[derive(Debug, Deserialize)]
struct HeadConfig {
    dim: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

impl HeadConfig {
    /// Labels in logit order. Checkpoints without `id2label` use the binary
    /// `LABEL_0`/`LABEL_1` convention.
    fn labels(&self) -> std::result::Result<Vec<SentimentLabel>, String> {
        if self.id2label.is_empty() {
            return Ok(vec![SentimentLabel::Negative, SentimentLabel::Positive]);
        }
        (0..self.id2label.len())
            .map(|index| {
                self.id2label
                    .get(&index.to_string())
                    .ok_or_else(|| format!("id2label has no entry for {}", index))?
                    .parse::<SentimentLabel>()
            })
            .collect()
    }
}

enum TokenizerSource {
    Json(PathBuf),
    Vocab(PathBuf),
}

struct ModelFiles {
    config: PathBuf,
    tokenizer: TokenizerSource,
    weights: PathBuf,
}

impl ModelFiles {
    /// A local checkpoint directory, otherwise a HuggingFace hub id.
    fn resolve(model: &str) -> Result<Self> {
        let dir = Path::new(model);
        if dir.is_dir() {
            return Self::from_dir(model, dir);
        }
        Self::from_hub(model)
    }

    fn from_dir(model: &str, dir: &Path) -> Result<Self> {
        let required = |name: &str| {
            let path = dir.join(name);
            if path.is_file() {
                Ok(path)
            } else {
                Err(TrendError::model(model, format!("missing {}", name)))
            }
        };
        let tokenizer = match required(TOKENIZER_FILE) {
            Ok(path) => TokenizerSource::Json(path),
            Err(_) => TokenizerSource::Vocab(required(VOCAB_FILE)?),
        };
        Ok(Self {
            config: required(CONFIG_FILE)?,
            tokenizer,
            weights: required(WEIGHTS_FILE)?,
        })
    }

    fn from_hub(model: &str) -> Result<Self> {
        let hub_err = |err: hf_hub::api::sync::ApiError| TrendError::model(model, err.to_string());
        let repo = Api::new().map_err(hub_err)?.model(model.to_string());
        info!(model, "fetching sentiment model from the hub");
        let tokenizer = match repo.get(TOKENIZER_FILE) {
            Ok(path) => TokenizerSource::Json(path),
            Err(_) => TokenizerSource::Vocab(repo.get(VOCAB_FILE).map_err(hub_err)?),
        };
        Ok(Self {
            config: repo.get(CONFIG_FILE).map_err(hub_err)?,
            tokenizer,
            weights: repo.get(WEIGHTS_FILE).map_err(hub_err)?,
        })
    }
}

/// Encoder plus the `pre_classifier -> relu -> classifier` head, scored on the
/// `[CLS]` position.
pub struct SequenceClassifier {
    name: String,
    tokenizer: HfTokenizer,
    encoder: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    labels: Vec<SentimentLabel>,
    device: Device,
}

impl SequenceClassifier {
    pub fn load(model: &str) -> Result<Self> {
        let files = ModelFiles::resolve(model)?;
        let model_err = |err: candle_core::Error| TrendError::model(model, err.to_string());

        let raw = fs::read_to_string(&files.config).map_err(|source| TrendError::Read {
            path: files.config.clone(),
            source,
        })?;
        let parse_err = |source: serde_json::Error| TrendError::Parse {
            path: files.config.clone(),
            source,
        };
        let config: Config = serde_json::from_str(&raw).map_err(parse_err)?;
        let head: HeadConfig = serde_json::from_str(&raw).map_err(parse_err)?;
        let labels = head
            .labels()
            .map_err(|message| TrendError::model(model, message))?;

        let tokenizer = match &files.tokenizer {
            TokenizerSource::Json(path) => HfTokenizer::from_file(path)?,
            TokenizerSource::Vocab(path) => HfTokenizer::from_bert_vocab(path)?,
        };

        let device = Device::Cpu;
        // The weights file stays untouched while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device)
        }
        .map_err(model_err)?;
        let encoder = DistilBertModel::load(vb.pp("distilbert"), &config).map_err(model_err)?;
        let pre_classifier =
            candle_nn::linear(head.dim, head.dim, vb.pp("pre_classifier")).map_err(model_err)?;
        let classifier =
            candle_nn::linear(head.dim, labels.len(), vb.pp("classifier")).map_err(model_err)?;

        info!(model, labels = labels.len(), "sentiment model loaded");
        Ok(Self {
            name: model.to_string(),
            tokenizer,
            encoder,
            pre_classifier,
            classifier,
            labels,
            device,
        })
    }

    /// Class probabilities for one encoded input.
    fn probabilities(&self, ids: &[u32]) -> candle_core::Result<Vec<f32>> {
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        // Single unpadded sequence: nothing is masked.
        let mask = Tensor::zeros((ids.len(), ids.len()), DType::U8, &self.device)?;
        let hidden = self.encoder.forward(&input_ids, &mask)?;
        let cls = hidden.i((.., 0))?;
        let cls = self.pre_classifier.forward(&cls)?.relu()?;
        let logits = self.classifier.forward(&cls)?;
        candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_vec1::<f32>()
    }
}

impl SentimentScorer for SequenceClassifier {
    fn score(&self, text: &str) -> Result<SentimentScore> {
        let ids = self.tokenizer.encode_ids(text)?;
        let probs = self
            .probabilities(&ids)
            .map_err(|err| TrendError::scoring(err.to_string()))?;
        let (index, score) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| TrendError::scoring("model produced no logits"))?;
        let label = *self
            .labels
            .get(index)
            .ok_or_else(|| TrendError::scoring(format!("no label for class {}", index)))?;
        Ok(SentimentScore {
            label,
            score: f64::from(score),
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tokenizer(&self) -> Option<&dyn Tokenizer> {
        Some(&self.tokenizer)
    }
}

#[cfg(test)]
mod tests {
    use super::{HeadConfig, ModelFiles};
    use crate::types::SentimentLabel;
    use tempfile::tempdir;

    #[test]
    fn sst2_labels_follow_id_order() {
        let head: HeadConfig = serde_json::from_str(
            r#"{"dim": 768, "id2label": {"1": "POSITIVE", "0": "NEGATIVE"}}"#,
        )
        .unwrap();
        assert_eq!(
            head.labels().unwrap(),
            vec![SentimentLabel::Negative, SentimentLabel::Positive]
        );
    }

    #[test]
    fn generic_binary_labels_map_to_polarity() {
        let head: HeadConfig =
            serde_json::from_str(r#"{"dim": 8, "id2label": {"0": "LABEL_0", "1": "LABEL_1"}}"#)
                .unwrap();
        assert_eq!(
            head.labels().unwrap(),
            vec![SentimentLabel::Negative, SentimentLabel::Positive]
        );

        let bare: HeadConfig = serde_json::from_str(r#"{"dim": 8}"#).unwrap();
        assert_eq!(bare.labels().unwrap().len(), 2);
    }

    #[test]
    fn neutral_class_is_rejected() {
        let head: HeadConfig = serde_json::from_str(
            r#"{"dim": 8, "id2label": {"0": "NEGATIVE", "1": "NEUTRAL", "2": "POSITIVE"}}"#,
        )
        .unwrap();
        assert!(head.labels().is_err());
    }

    #[test]
    fn local_checkpoint_requires_weights() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        std::fs::write(dir.path().join("vocab.txt"), "[UNK]\n").unwrap();
        let err = ModelFiles::from_dir("local", dir.path()).err().unwrap();
        assert!(err.to_string().contains("model.safetensors"));
    }
}
