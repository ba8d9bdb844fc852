//! Documentation knowledge base for the CDP support chatbot.
//!
//! Provides the read-only documentation corpus for the four supported
//! Customer Data Platforms, the domain classifier that gates incoming
//! queries, and the TF-IDF relevance index used for retrieval.
//!
//! Corpus and index are built once at process start and never mutated;
//! concurrent queries share them without coordination.

pub mod corpus;
pub mod domain;
pub mod index;
pub mod types;

// Re-export commonly used types
pub use corpus::load_corpus;
pub use domain::DomainClassifier;
pub use index::{RelevanceIndex, DEFAULT_TOP_N, MIN_RELEVANCE_SCORE};
pub use types::{Corpus, DocChunk, Platform};
