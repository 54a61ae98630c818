//! Ranking and selection
//!
//! Both passes use a stable sort, so suggestions with equal priority keep
//! the order in which they were produced.

use std::cmp::Ordering;

use crate::models::ScoredSuggestion;

fn by_priority_desc(a: &ScoredSuggestion, b: &ScoredSuggestion) -> Ordering {
    b.priority_score().total_cmp(&a.priority_score())
}

/// Best `keep` suggestions for a single outgoing player
pub fn top_for_slot(mut suggestions: Vec<ScoredSuggestion>, keep: usize) -> Vec<ScoredSuggestion> {
    suggestions.sort_by(by_priority_desc);
    suggestions.truncate(keep);
    suggestions
}

/// Pool-wide ranking truncated to `limit`
pub fn select(mut pool: Vec<ScoredSuggestion>, limit: usize) -> Vec<ScoredSuggestion> {
    pool.sort_by(by_priority_desc);
    pool.truncate(limit);
    pool
}
