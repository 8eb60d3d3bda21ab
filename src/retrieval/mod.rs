//! Relevance ranking for stored documents
//!
//! Ranking is keyword based: no embeddings, no external index. The
//! [`Ranker`] trait is the seam for other strategies.

mod ranker;
mod tokenize;

pub use ranker::{KeywordRanker, Ranker, ScoredDocument};
pub use tokenize::{term_frequencies, tokenize};
