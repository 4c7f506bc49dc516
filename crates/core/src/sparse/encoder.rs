//! BM25 sparse encoder.
//!
//! Each call fits a fresh [`Bm25Model`] over the batch it is given and scores every
//! token of every text against that model. Scores are mapped to `(raw + 1) / 2`,
//! clamped to `[0, 1]`, and tokens at or below the threshold are dropped. A text
//! whose tokens are all dropped falls back to positional weights `1 / (i + 1)`.
//!
//! The [`Vocabulary`] is the only state that outlives a call: token indices stay
//! stable for the lifetime of the encoder.

use crate::bm25::{preprocess, Bm25Model, Bm25Params, Tokens};
use crate::config;
use crate::sparse::{SparseVector, Vocabulary};
use std::collections::BTreeMap;

/// Encoder tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderConfig {
    /// Parameters of the per-batch BM25 model.
    pub bm25: Bm25Params,
    /// Tokens are kept only when their normalized score is strictly above this.
    pub score_threshold: f32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            bm25: Bm25Params::default(),
            score_threshold: config::SCORE_THRESHOLD,
        }
    }
}

/// Maps a raw BM25 score into `[0, 1]`.
pub fn normalize_score(raw: f64) -> f32 {
    (((raw + 1.0) / 2.0) as f32).clamp(0.0, 1.0)
}

/// Converts texts into sparse vectors, growing its vocabulary as needed.
///
/// Not internally synchronized: share an encoder behind a mutex.
#[derive(Debug, Default)]
pub struct SparseEncoder {
    vocabulary: Vocabulary,
    config: EncoderConfig,
}

impl SparseEncoder {
    /// Creates an encoder with default configuration and an empty vocabulary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an encoder with the given configuration.
    pub fn with_config(config: EncoderConfig) -> Self {
        Self {
            vocabulary: Vocabulary::new(),
            config,
        }
    }

    /// The token → index table built so far.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encodes a batch, keeping one slot per input text.
    ///
    /// Slot `i` is `None` when text `i` has no tokens after preprocessing.
    pub fn encode_each<S: AsRef<str>>(&mut self, texts: &[S]) -> Vec<Option<SparseVector>> {
        if texts.is_empty() {
            return Vec::new();
        }

        let corpus: Vec<Tokens> = texts.iter().map(|t| preprocess(t.as_ref())).collect();
        let model = Bm25Model::fit(&corpus, self.config.bm25);
        tracing::debug!(
            texts = texts.len(),
            terms = model.term_count(),
            avg_doc_len = model.average_doc_length(),
            "Fitted BM25 over batch"
        );

        let encoded: Vec<Option<SparseVector>> = corpus
            .iter()
            .map(|tokens| {
                if tokens.is_empty() {
                    tracing::warn!("Text has no tokens after preprocessing, skipping");
                    return None;
                }
                let vector = self.encode_tokens(&model, tokens);
                if vector.is_empty() {
                    tracing::warn!("Text produced no sparse indices, skipping");
                    return None;
                }
                Some(vector)
            })
            .collect();

        tracing::debug!(vocabulary = self.vocabulary.len(), "Encoded batch");
        encoded
    }

    /// Encodes a batch into sparse vectors.
    ///
    /// Texts with no tokens after preprocessing contribute no vector, so the output
    /// can be shorter than the input. A non-empty batch that yields nothing at all
    /// returns the single [`SparseVector::placeholder`].
    pub fn encode_batch<S: AsRef<str>>(&mut self, texts: &[S]) -> Vec<SparseVector> {
        if texts.is_empty() {
            return Vec::new();
        }
        let vectors: Vec<SparseVector> = self.encode_each(texts).into_iter().flatten().collect();
        if vectors.is_empty() {
            tracing::warn!("No valid sparse vectors generated, using placeholder");
            return vec![SparseVector::placeholder()];
        }
        vectors
    }

    fn encode_tokens(&mut self, model: &Bm25Model, tokens: &Tokens) -> SparseVector {
        let mut weights: BTreeMap<u32, f32> = BTreeMap::new();
        for token in tokens.iter() {
            let normalized = normalize_score(model.max_term_score(token));
            if normalized > self.config.score_threshold {
                let index = self.vocabulary.get_or_insert(token);
                weights.insert(index, normalized);
            }
        }

        if weights.is_empty() {
            for (i, token) in tokens.iter().enumerate() {
                let index = self.vocabulary.get_or_insert(token);
                weights.insert(index, 1.0 / (i + 1) as f32);
            }
        }

        SparseVector::from_weights(&weights)
    }
}
