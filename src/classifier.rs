// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Vulnerability Classifier
 * Tokenizer, label map, and dense model inference over encoded feature text
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::TriageError;
use crate::types::{ClassificationResult, TOP_K};

/// Fixed input sequence length. Shorter sequences are post-padded with 0,
/// longer sequences are truncated.
const MAX_SEQUENCE_LEN: usize = 300;

/// Characters the tokenizer strips before splitting, matching the training
/// pipeline's filter set.
const TOKEN_FILTERS: &str = "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n";

#[derive(Debug, Deserialize)]
struct TokenizerFile {
    word_index: HashMap<String, u32>,
    #[serde(default)]
    oov_token: Option<String>,
}

/// Word-level tokenizer: lowercase, strip filter characters, split on
/// whitespace, map words through the trained index.
#[derive(Debug)]
pub struct Tokenizer {
    word_index: HashMap<String, u32>,
    oov_id: Option<u32>,
}

impl Tokenizer {
    fn from_file(path: &Path) -> Result<Self, TriageError> {
        let raw = read_artifact(path)?;
        let parsed: TokenizerFile =
            serde_json::from_str(&raw).map_err(|e| TriageError::ClassifierLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        let oov_id = parsed
            .oov_token
            .as_ref()
            .and_then(|token| parsed.word_index.get(token))
            .copied();
        Ok(Tokenizer {
            word_index: parsed.word_index,
            oov_id,
        })
    }

    /// Encode text into a fixed-length id sequence.
    ///
    /// Out-of-vocabulary words map to the OOV id when the tokenizer defines
    /// one and are dropped otherwise, so two unknown words never collide
    /// into a spurious match against the padding id.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        let lowered = text.to_lowercase();
        let cleaned: String = lowered
            .chars()
            .map(|c| if TOKEN_FILTERS.contains(c) { ' ' } else { c })
            .collect();

        let mut ids: Vec<u32> = Vec::with_capacity(MAX_SEQUENCE_LEN);
        for word in cleaned.split_whitespace() {
            if ids.len() == MAX_SEQUENCE_LEN {
                break;
            }
            match self.word_index.get(word) {
                Some(&id) => ids.push(id),
                None => {
                    if let Some(oov) = self.oov_id {
                        ids.push(oov);
                    }
                }
            }
        }
        ids.resize(MAX_SEQUENCE_LEN, 0);
        ids
    }
}

/// Bidirectional label <-> index mapping loaded from the label map file.
///
/// File format is one `label:index` entry per line; labels may themselves
/// contain colons, so the split is taken from the right.
#[derive(Debug)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    fn from_file(path: &Path) -> Result<Self, TriageError> {
        let raw = read_artifact(path)?;
        let mut entries: Vec<(usize, String)> = Vec::new();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (label, index) = line
                .rsplit_once(':')
                .ok_or_else(|| TriageError::LabelMapping {
                    line: line.to_string(),
                })?;
            let index: usize =
                index
                    .trim()
                    .parse()
                    .map_err(|_| TriageError::LabelMapping {
                        line: line.to_string(),
                    })?;
            entries.push((index, label.trim().to_string()));
        }
        entries.sort_by_key(|(index, _)| *index);

        // Indices must form a dense 0..n range or lookups would be ambiguous.
        for (position, (index, _)) in entries.iter().enumerate() {
            if *index != position {
                return Err(TriageError::ClassifierLoad {
                    path: path.display().to_string(),
                    reason: format!("label indices are not dense at index {}", index),
                });
            }
        }

        Ok(LabelMap {
            labels: entries.into_iter().map(|(_, label)| label).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }
}

/// Inference backend: maps an encoded id sequence to one raw score per label.
pub trait Model: Send + Sync {
    fn predict(&self, ids: &[u32]) -> Vec<f32>;
    fn num_labels(&self) -> usize;
}

#[derive(Debug, Deserialize)]
struct ModelFile {
    /// One weight row per label, indexed by token id.
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

/// Dense bag-of-tokens model: each label's raw score is its bias plus the sum
/// of its weight row over the sequence's token ids. Padding (id 0) carries no
/// weight.
#[derive(Debug)]
pub struct DenseModel {
    weights: Vec<Vec<f32>>,
    bias: Vec<f32>,
}

impl DenseModel {
    fn from_file(path: &Path) -> Result<Self, TriageError> {
        let raw = read_artifact(path)?;
        let parsed: ModelFile =
            serde_json::from_str(&raw).map_err(|e| TriageError::ClassifierLoad {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        if parsed.weights.len() != parsed.bias.len() {
            return Err(TriageError::ClassifierLoad {
                path: path.display().to_string(),
                reason: format!(
                    "{} weight rows but {} bias terms",
                    parsed.weights.len(),
                    parsed.bias.len()
                ),
            });
        }
        Ok(DenseModel {
            weights: parsed.weights,
            bias: parsed.bias,
        })
    }
}

impl Model for DenseModel {
    fn predict(&self, ids: &[u32]) -> Vec<f32> {
        let mut scores = self.bias.clone();
        for (label, row) in self.weights.iter().enumerate() {
            for &id in ids {
                if id == 0 {
                    continue;
                }
                if let Some(weight) = row.get(id as usize) {
                    scores[label] += weight;
                }
            }
        }
        softmax(&scores)
    }

    fn num_labels(&self) -> usize {
        self.bias.len()
    }
}

/// Classifier facade: tokenizer + label map + model, loaded together and
/// validated for shape agreement before any probing starts.
pub struct VulnClassifier {
    tokenizer: Tokenizer,
    labels: LabelMap,
    model: Box<dyn Model>,
}

impl std::fmt::Debug for VulnClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VulnClassifier")
            .field("tokenizer", &self.tokenizer)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

impl VulnClassifier {
    /// Load all classifier artifacts. Any missing or malformed artifact is
    /// fatal; the caller must surface the error before opening any network
    /// connection.
    pub fn load(
        model_path: &Path,
        tokenizer_path: &Path,
        labels_path: &Path,
    ) -> Result<Self, TriageError> {
        let model = DenseModel::from_file(model_path)?;
        let tokenizer = Tokenizer::from_file(tokenizer_path)?;
        let labels = LabelMap::from_file(labels_path)?;

        if labels.is_empty() {
            return Err(TriageError::ClassifierLoad {
                path: labels_path.display().to_string(),
                reason: "label map defines no labels".to_string(),
            });
        }
        if model.num_labels() != labels.len() {
            return Err(TriageError::ModelShape {
                model_labels: model.num_labels(),
                map_labels: labels.len(),
            });
        }

        info!(
            labels = labels.len(),
            vocabulary = tokenizer.word_index.len(),
            "classifier loaded"
        );
        Ok(VulnClassifier {
            tokenizer,
            labels,
            model: Box::new(model),
        })
    }

    /// Classify one encoded feature text.
    pub fn classify(&self, text: &str) -> ClassificationResult {
        let ids = self.tokenizer.encode(text);
        let probabilities = self.model.predict(&ids);
        debug!(tokens = ids.iter().filter(|&&id| id != 0).count(), "classifier input encoded");

        let ranked = top_k(&probabilities, TOP_K);
        let (top_index, confidence) = ranked[0];
        ClassificationResult {
            predicted_label: self.labels.label(top_index).to_string(),
            confidence,
            top_predictions: ranked
                .into_iter()
                .map(|(index, p)| (self.labels.label(index).to_string(), p))
                .collect(),
        }
    }
}

fn read_artifact(path: &Path) -> Result<String, TriageError> {
    if !path.exists() {
        return Err(TriageError::ClassifierMissing {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| TriageError::ClassifierLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Numerically stable softmax.
fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

/// Top-k (index, probability) pairs in descending probability order, ties
/// broken by ascending index.
fn top_k(probabilities: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer(words: &[(&str, u32)], oov: Option<u32>) -> Tokenizer {
        Tokenizer {
            word_index: words
                .iter()
                .map(|(w, id)| (w.to_string(), *id))
                .collect(),
            oov_id: oov,
        }
    }

    #[test]
    fn encode_lowercases_filters_and_pads() {
        let t = tokenizer(&[("hello", 4), ("world", 7)], None);
        let ids = t.encode("Hello, WORLD!");
        assert_eq!(ids.len(), MAX_SEQUENCE_LEN);
        assert_eq!(&ids[..2], &[4, 7]);
        assert!(ids[2..].iter().all(|&id| id == 0));
    }

    #[test]
    fn encode_maps_unknown_words_to_oov() {
        let t = tokenizer(&[("<OOV>", 1), ("known", 2)], Some(1));
        let ids = t.encode("known mystery");
        assert_eq!(&ids[..2], &[2, 1]);
    }

    #[test]
    fn encode_drops_unknown_words_without_oov() {
        let t = tokenizer(&[("known", 2)], None);
        let ids = t.encode("mystery known mystery");
        assert_eq!(ids[0], 2);
        assert_eq!(ids[1], 0);
    }

    #[test]
    fn encode_truncates_long_sequences() {
        let t = tokenizer(&[("a", 3)], None);
        let text = vec!["a"; MAX_SEQUENCE_LEN + 50].join(" ");
        let ids = t.encode(&text);
        assert_eq!(ids.len(), MAX_SEQUENCE_LEN);
        assert!(ids.iter().all(|&id| id == 3));
    }

    #[test]
    fn top_k_orders_and_breaks_ties_by_index() {
        let ranked = top_k(&[0.10, 0.05, 0.70, 0.15], 3);
        assert_eq!(ranked[0].0, 2);
        assert_eq!(ranked[1].0, 3);
        assert_eq!(ranked[2].0, 0);

        let tied = top_k(&[0.4, 0.4, 0.2], 2);
        assert_eq!(tied[0].0, 0);
        assert_eq!(tied[1].0, 1);
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    struct FixedModel(Vec<f32>);
    impl Model for FixedModel {
        fn predict(&self, _ids: &[u32]) -> Vec<f32> {
            self.0.clone()
        }
        fn num_labels(&self) -> usize {
            self.0.len()
        }
    }

    #[test]
    fn classify_reports_top_label_and_predictions() {
        let classifier = VulnClassifier {
            tokenizer: tokenizer(&[], None),
            labels: LabelMap {
                labels: vec![
                    "SQL Injection".to_string(),
                    "XSS".to_string(),
                    "CSRF".to_string(),
                    "Path Traversal".to_string(),
                ],
            },
            model: Box::new(FixedModel(vec![0.10, 0.05, 0.70, 0.15])),
        };

        let result = classifier.classify("anything");
        assert_eq!(result.predicted_label, "CSRF");
        assert!((result.confidence - 0.70).abs() < 1e-6);
        assert_eq!(result.top_predictions.len(), 3);
        assert_eq!(result.top_predictions[0].0, "CSRF");
        assert_eq!(result.top_predictions[1].0, "Path Traversal");
        assert_eq!(result.top_predictions[2].0, "SQL Injection");
    }

    #[test]
    fn label_map_rejects_malformed_lines() {
        let dir = std::env::temp_dir().join("louhi_label_map_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad_labels.txt");
        std::fs::write(&path, "SQL Injection:0\nnot a mapping\n").unwrap();

        let err = LabelMap::from_file(&path).unwrap_err();
        assert!(matches!(err, TriageError::LabelMapping { .. }));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn label_map_splits_from_the_right() {
        let dir = std::env::temp_dir().join("louhi_label_map_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("colon_labels.txt");
        std::fs::write(&path, "Injection: SQL:0\nXSS:1\n").unwrap();

        let map = LabelMap::from_file(&path).unwrap();
        assert_eq!(map.label(0), "Injection: SQL");
        assert_eq!(map.label(1), "XSS");
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_label_map_is_rejected_at_load() {
        let dir = std::env::temp_dir().join("louhi_empty_labels_test");
        std::fs::create_dir_all(&dir).unwrap();
        let model = dir.join("model_weights.json");
        std::fs::write(&model, r#"{"weights": [], "bias": []}"#).unwrap();
        let tokenizer = dir.join("tokenizer.json");
        std::fs::write(&tokenizer, r#"{"word_index": {}, "oov_token": null}"#).unwrap();
        let labels = dir.join("label_to_int.txt");
        std::fs::write(&labels, "").unwrap();

        // An empty label set must fail loudly here, never at classify time.
        let err = VulnClassifier::load(&model, &tokenizer, &labels).unwrap_err();
        assert!(err.to_string().contains("no labels"), "{}", err);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_artifact_is_a_distinct_error() {
        let err = read_artifact(Path::new("/nonexistent/model_weights.json")).unwrap_err();
        assert!(matches!(err, TriageError::ClassifierMissing { .. }));
    }
}
