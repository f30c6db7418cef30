//! Match-confidence scoring between a query and scraped candidate names.

use crate::parse::SearchCandidate;

/// Candidates scoring below this are treated as no match.
pub const MIN_MATCH_CONFIDENCE: f64 = 0.3;

/// Scores how confident we are that `candidate` is the restaurant the user
/// asked for. Returns a value in [0.3, 1.0]:
///
/// - 1.0 — exact match after trim + lowercase;
/// - 0.9 — the query is contained in the candidate name;
/// - 0.85 — the candidate name is contained in the query;
/// - otherwise 0.5 + 0.4 × word-overlap ratio (Jaccard), floor 0.3.
#[must_use]
pub fn match_confidence(query: &str, candidate: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let candidate = candidate.trim().to_lowercase();

    if query == candidate {
        return 1.0;
    }
    if candidate.contains(&query) {
        return 0.9;
    }
    if query.contains(&candidate) {
        return 0.85;
    }

    let query_words: std::collections::HashSet<&str> = query.split_whitespace().collect();
    let candidate_words: std::collections::HashSet<&str> = candidate.split_whitespace().collect();
    let overlap = query_words.intersection(&candidate_words).count();
    let total = query_words.union(&candidate_words).count();

    if total > 0 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = overlap as f64 / total as f64;
        return 0.5 + 0.4 * ratio;
    }

    0.3
}

/// Picks the maximum-confidence candidate for `query`.
///
/// Returns `None` only for an empty candidate list. Ties keep the earlier
/// candidate (search-result order).
#[must_use]
pub fn best_match<'a>(
    query: &str,
    candidates: &'a [SearchCandidate],
) -> Option<(&'a SearchCandidate, f64)> {
    let mut best: Option<(&SearchCandidate, f64)> = None;
    for candidate in candidates {
        let confidence = match_confidence(query, &candidate.name);
        match best {
            Some((_, current)) if confidence <= current => {}
            _ => best = Some((candidate, confidence)),
        }
    }
    best
}

#[cfg(test)]
#[path = "matching_test.rs"]
mod tests;
