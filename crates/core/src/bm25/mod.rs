//! BM25 lexical scoring: text preprocessing and per-batch Okapi BM25 models.

/// Okapi BM25 model fit over a corpus snapshot.
pub mod model;
/// Lowercasing, ASCII cleanup, word splitting and stop word removal.
pub mod tokenizer;

pub use model::{rank_texts, Bm25Model, Bm25Params};
pub use tokenizer::{preprocess, Tokens};
