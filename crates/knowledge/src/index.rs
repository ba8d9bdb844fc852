//! TF-IDF relevance index over the documentation corpus.
//!
//! Built once from the full corpus at startup and queried per request. The
//! index holds one weight vector per chunk, in corpus order, and ranks
//! chunks by cosine similarity against a query projected into the same
//! vector space. All weights are non-negative, so scores land in [0, 1].

use crate::types::{Corpus, DocChunk};
use std::collections::{BTreeMap, BTreeSet};

/// Default number of chunks to retrieve per query.
pub const DEFAULT_TOP_N: usize = 5;

/// Minimum cosine similarity score for a chunk to be considered relevant.
/// Results at or below this score are discarded.
pub const MIN_RELEVANCE_SCORE: f32 = 0.1;

/// English stop words removed before vectorization, for both corpus chunks
/// and queries. The same list on both sides keeps queries in the fitted
/// vector space.
const STOP_WORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "between", "both", "but", "by", "can",
    "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "he", "her", "here", "hers", "him", "his",
    "how", "if", "in", "into", "is", "it", "its", "just", "me", "more", "most", "my",
    "no", "nor", "not", "now", "of", "on", "only", "or", "other", "our", "ours", "out",
    "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours",
];

/// Lowercase, split into alphanumeric runs, drop short tokens and stop words.
fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();

    lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= 2 && !STOP_WORDS.contains(token))
        .map(|token| token.to_string())
        .collect()
}

/// Fitted term-weighting model: vocabulary plus per-term inverse document
/// frequency.
#[derive(Debug)]
struct TfIdfModel {
    /// Term → vector dimension, lexicographically ordered for determinism
    vocabulary: BTreeMap<String, usize>,

    /// Smoothed inverse document frequency per dimension
    idf: Vec<f32>,
}

impl TfIdfModel {
    /// Fit the model over tokenized documents.
    ///
    /// Uses smoothed idf, `ln((1 + n) / (1 + df)) + 1`, so terms present in
    /// every document are down-weighted but never vanish.
    fn fit(documents: &[Vec<String>]) -> Self {
        let mut terms = BTreeSet::new();
        for tokens in documents {
            for token in tokens {
                terms.insert(token.clone());
            }
        }

        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(dim, term)| (term, dim))
            .collect();

        let mut document_frequency = vec![0usize; vocabulary.len()];
        for tokens in documents {
            let unique: BTreeSet<&String> = tokens.iter().collect();
            for token in unique {
                if let Some(&dim) = vocabulary.get(token) {
                    document_frequency[dim] += 1;
                }
            }
        }

        let n_docs = documents.len() as f32;
        let idf = document_frequency
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// Project tokenized text into the fitted space.
    ///
    /// Terms unseen during fitting are ignored. The result is L2-normalized;
    /// text made entirely of stop words or unseen terms yields a zero vector.
    fn project(&self, tokens: &[String]) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.vocabulary.len()];

        for token in tokens {
            if let Some(&dim) = self.vocabulary.get(token) {
                vector[dim] += 1.0;
            }
        }

        for (dim, weight) in vector.iter_mut().enumerate() {
            *weight *= self.idf[dim];
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for weight in &mut vector {
                *weight /= norm;
            }
        }

        vector
    }
}

/// Read-only retrieval index: fitted model, chunk vectors, and the chunks
/// themselves in stable corpus order.
///
/// Invariant: `vectors.len() == chunks.len()`, and the i-th vector was built
/// from the i-th chunk's combined text.
#[derive(Debug)]
pub struct RelevanceIndex {
    model: TfIdfModel,
    vectors: Vec<Vec<f32>>,
    chunks: Vec<DocChunk>,
}

impl RelevanceIndex {
    /// Build the index from the full corpus.
    ///
    /// One-time, blocking startup step; queries must not be served until it
    /// completes.
    pub fn build(corpus: &Corpus) -> Self {
        let chunks = corpus.chunks();
        let token_lists: Vec<Vec<String>> = chunks
            .iter()
            .map(|chunk| tokenize(&chunk.combined_text()))
            .collect();

        let model = TfIdfModel::fit(&token_lists);
        let vectors: Vec<Vec<f32>> = token_lists
            .iter()
            .map(|tokens| model.project(tokens))
            .collect();

        tracing::info!(
            "Indexed {} documentation chunks over {} terms",
            chunks.len(),
            model.vocabulary.len()
        );

        Self {
            model,
            vectors,
            chunks,
        }
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Retrieve the most relevant chunks for a query.
    ///
    /// Ranks every chunk by cosine similarity, keeps the `top_n` best
    /// (ties broken by corpus order), and discards results scoring at or
    /// below `min_score`. An empty result is a normal outcome, not an
    /// error; callers render a "no documentation found" fallback.
    pub fn retrieve(&self, query: &str, top_n: usize, min_score: f32) -> Vec<(DocChunk, f32)> {
        if self.chunks.is_empty() {
            return Vec::new();
        }

        let query_vector = self.model.project(&tokenize(query));

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, vector)| (i, cosine_similarity(&query_vector, vector)))
            .collect();

        // Stable sort keeps corpus order on ties
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_n);

        let results: Vec<(DocChunk, f32)> = scored
            .into_iter()
            .filter(|(_, score)| *score > min_score)
            .map(|(i, score)| (self.chunks[i].clone(), score))
            .collect();

        tracing::debug!(
            "Retrieved {} relevant chunks (requested top-{}, threshold {:.2})",
            results.len(),
            top_n,
            min_score
        );

        results
    }
}

/// Calculate cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
