//! Okapi BM25 model fit over an in-memory corpus snapshot.
//!
//! A [`Bm25Model`] is built from the token sequences of one batch of texts and
//! discarded afterwards. Terms map to postings lists (document position + term
//! frequency); document lengths are tracked for length normalization.
//!
//! IDF follows the Okapi form `ln(N - df + 0.5) - ln(df + 0.5)`. Terms present in
//! more than half of the corpus get a negative IDF, which is replaced by
//! `epsilon * average_idf` (see [`crate::config::BM25_EPSILON`]).

use crate::bm25::tokenizer::{preprocess, Tokens};
use crate::config;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// BM25 tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Length normalization.
    pub b: f64,
    /// Negative-IDF floor, as a fraction of the average IDF.
    pub epsilon: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: config::BM25_K1,
            b: config::BM25_B,
            epsilon: config::BM25_EPSILON,
        }
    }
}

/// A single entry in a term's postings list.
#[derive(Debug, Clone, Copy)]
struct Posting {
    /// Position of the document in the corpus snapshot.
    doc: u32,
    /// Number of times the term appears in this document.
    term_frequency: u32,
}

/// BM25 scoring model over a fixed corpus snapshot.
#[derive(Debug)]
pub struct Bm25Model {
    params: Bm25Params,
    /// term → list of postings, in document order
    postings: HashMap<String, Vec<Posting>>,
    /// term → idf (after the negative-IDF floor)
    idf: HashMap<String, f64>,
    /// document position → number of tokens
    doc_lengths: Vec<u32>,
    avg_doc_len: f64,
}

impl Bm25Model {
    /// Fits a model over `corpus`; each element is one document's token sequence.
    pub fn fit<'a, I>(corpus: I, params: Bm25Params) -> Self
    where
        I: IntoIterator<Item = &'a Tokens>,
    {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lengths = Vec::new();
        let mut total_len: u64 = 0;

        for (doc, tokens) in corpus.into_iter().enumerate() {
            doc_lengths.push(tokens.len() as u32);
            total_len += tokens.len() as u64;

            // Count term frequencies for this doc
            let mut tf_map: HashMap<&str, u32> = HashMap::new();
            for token in tokens.iter() {
                *tf_map.entry(token).or_insert(0) += 1;
            }
            for (term, tf) in tf_map {
                postings.entry(term.to_string()).or_default().push(Posting {
                    doc: doc as u32,
                    term_frequency: tf,
                });
            }
        }

        let doc_count = doc_lengths.len();
        let avg_doc_len = if doc_count == 0 {
            0.0
        } else {
            total_len as f64 / doc_count as f64
        };
        let idf = compute_idf(&postings, doc_count as f64, params.epsilon);

        Self {
            params,
            postings,
            idf,
            doc_lengths,
            avg_doc_len,
        }
    }

    /// Number of documents in the snapshot.
    pub fn doc_count(&self) -> usize {
        self.doc_lengths.len()
    }

    /// Number of distinct terms in the snapshot.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Average document length in tokens.
    pub fn average_doc_length(&self) -> f64 {
        self.avg_doc_len
    }

    /// IDF of `term`, or `None` if the term does not occur in the snapshot.
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }

    /// Per-document BM25 scores of the single-term query `term`.
    ///
    /// Documents that do not contain the term score `0.0`. The returned vector
    /// has one entry per document, in snapshot order.
    pub fn term_scores(&self, term: &str) -> Vec<f64> {
        let mut scores = vec![0.0; self.doc_count()];
        if let (Some(postings), Some(&idf)) = (self.postings.get(term), self.idf.get(term)) {
            for posting in postings {
                scores[posting.doc as usize] = self.term_doc_score(idf, posting);
            }
        }
        scores
    }

    /// Highest per-document score of the single-term query `term`.
    ///
    /// Equivalent to `term_scores(term)` followed by a max, without materializing
    /// the per-document vector. Returns `0.0` on an empty snapshot.
    pub fn max_term_score(&self, term: &str) -> f64 {
        let (Some(postings), Some(&idf)) = (self.postings.get(term), self.idf.get(term)) else {
            return 0.0;
        };
        let best = postings
            .iter()
            .map(|p| self.term_doc_score(idf, p))
            .fold(f64::NEG_INFINITY, f64::max);
        // documents lacking the term contribute a zero score
        if postings.len() < self.doc_count() {
            best.max(0.0)
        } else {
            best
        }
    }

    /// Per-document BM25 scores of a multi-term query (sum over query terms).
    pub fn scores(&self, query: &Tokens) -> Vec<f64> {
        let mut scores = vec![0.0; self.doc_count()];
        for term in query.iter() {
            if let (Some(postings), Some(&idf)) = (self.postings.get(term), self.idf.get(term)) {
                for posting in postings {
                    scores[posting.doc as usize] += self.term_doc_score(idf, posting);
                }
            }
        }
        scores
    }

    /// Top-k documents for `query`, keeping only strictly positive scores.
    /// Returns `(doc position, score)` sorted by descending score, ties by position.
    pub fn top_k(&self, query: &Tokens, k: usize) -> Vec<(usize, f64)> {
        if query.is_empty() || k == 0 {
            return Vec::new();
        }

        // Partial sort: O(n log k) via min-heap of size k
        let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, Reverse<usize>)>> =
            BinaryHeap::with_capacity(k + 1);
        for (doc, score) in self.scores(query).into_iter().enumerate() {
            if !score.is_finite() || score <= 0.0 {
                continue;
            }
            heap.push(Reverse((OrderedFloat(score), Reverse(doc))));
            if heap.len() > k {
                heap.pop();
            }
        }
        let mut results: Vec<(usize, f64)> = heap
            .into_iter()
            .map(|Reverse((s, Reverse(doc)))| (doc, s.0))
            .collect();
        results.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        results
    }

    fn term_doc_score(&self, idf: f64, posting: &Posting) -> f64 {
        let Bm25Params { k1, b, .. } = self.params;
        let tf = posting.term_frequency as f64;
        let dl = self.doc_lengths[posting.doc as usize] as f64;
        let tf_norm = (tf * (k1 + 1.0)) / (tf + k1 * (1.0 - b + b * dl / self.avg_doc_len));
        idf * tf_norm
    }
}

fn compute_idf(
    postings: &HashMap<String, Vec<Posting>>,
    n: f64,
    epsilon: f64,
) -> HashMap<String, f64> {
    let mut idf = HashMap::with_capacity(postings.len());
    let mut idf_sum = 0.0;
    let mut negative = Vec::new();
    for (term, list) in postings {
        let df = list.len() as f64;
        let value = (n - df + 0.5).ln() - (df + 0.5).ln();
        idf_sum += value;
        if value < 0.0 {
            negative.push(term.as_str());
        }
        idf.insert(term.clone(), value);
    }
    if postings.is_empty() {
        return idf;
    }
    let floor = epsilon * idf_sum / postings.len() as f64;
    for term in negative {
        idf.insert(term.to_string(), floor);
    }
    idf
}

/// Ranks `texts` against `query` with a BM25 model fit over `texts` alone.
///
/// Returns `(position in texts, score)` for at most `k` texts with a strictly
/// positive score, best first.
pub fn rank_texts<S: AsRef<str>>(query: &str, texts: &[S], k: usize) -> Vec<(usize, f64)> {
    let corpus: Vec<Tokens> = texts.iter().map(|t| preprocess(t.as_ref())).collect();
    let model = Bm25Model::fit(&corpus, Bm25Params::default());
    model.top_k(&preprocess(query), k)
}
