use crate::retrieval::tokenize::{term_frequencies, tokenize};
use crate::storage::Document;
use std::collections::HashSet;

/// A document paired with its relevance to a query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f64,
}

/// Orders documents by relevance to a query
///
/// Implementations must return at most `top_k` documents with strictly
/// positive scores, best first, and break ties by position in `documents`
/// so results are identical across runs.
pub trait Ranker: Send + Sync {
    fn rank<'a>(&self, documents: &'a [Document], query: &str, top_k: usize)
        -> Vec<ScoredDocument<'a>>;
}

/// Keyword-overlap ranker
///
/// Query and content are tokenized the same way. Each distinct query token
/// found in a document contributes `1 + ln(tf)`, where `tf` is the number of
/// times it occurs in the document. One occurrence is enough to make a
/// document eligible; repeats raise the score with diminishing returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRanker;

impl KeywordRanker {
    /// Scores one document's content against pre-tokenized query terms
    pub fn score(content: &str, query_terms: &HashSet<String>) -> f64 {
        let frequencies = term_frequencies(content);
        query_terms
            .iter()
            .filter_map(|term| frequencies.get(term))
            .map(|&tf| 1.0 + (tf as f64).ln())
            .sum()
    }
}

impl Ranker for KeywordRanker {
    fn rank<'a>(
        &self,
        documents: &'a [Document],
        query: &str,
        top_k: usize,
    ) -> Vec<ScoredDocument<'a>> {
        let query_terms: HashSet<String> = tokenize(query).into_iter().collect();
        if query_terms.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<ScoredDocument<'a>> = documents
            .iter()
            .map(|document| ScoredDocument {
                document,
                score: Self::score(&document.content, &query_terms),
            })
            .filter(|scored| scored.score > 0.0)
            .collect();

        // sort_by is stable, so equal scores keep insertion order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);

        tracing::debug!(
            "Ranked {} documents for {:?}: {} relevant",
            documents.len(),
            query,
            scored.len()
        );
        scored
    }
}
