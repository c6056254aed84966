//! Ranking policy: match weights and null-safe orderings.
//!
//! The weights are fixed policy values; changing them changes result order.

use std::cmp::Ordering;
use nt_core::Article;

/// Contribution of a title hit to the text match score.
pub const TITLE_MATCH_WEIGHT: f64 = 0.7;
/// Contribution of a description hit to the text match score.
pub const DESCRIPTION_MATCH_WEIGHT: f64 = 0.3;
/// Share of the combined score taken by the text match.
pub const TEXT_WEIGHT: f64 = 0.6;
/// Share of the combined score taken by the stored relevance.
pub const RELEVANCE_WEIGHT: f64 = 0.4;

fn contains_text(field: Option<&str>, needle: &str) -> bool {
    field.is_some_and(|text| !text.trim().is_empty() && text.to_lowercase().contains(needle))
}

/// Text match score for a lowercased query, or `None` when neither title nor
/// description contains it.
pub fn text_match(article: &Article, needle: &str) -> Option<f64> {
    let in_title = contains_text(article.title.as_deref(), needle);
    let in_description = contains_text(article.description.as_deref(), needle);
    if !in_title && !in_description {
        return None;
    }

    let mut score = 0.0;
    if in_title {
        score += TITLE_MATCH_WEIGHT;
    }
    if in_description {
        score += DESCRIPTION_MATCH_WEIGHT;
    }
    Some(score)
}

/// Blend a text match score with the stored relevance (missing counts as 0).
pub fn combined_score(text_match: f64, stored_relevance: Option<f64>) -> f64 {
    TEXT_WEIGHT * text_match + RELEVANCE_WEIGHT * stored_relevance.unwrap_or(0.0)
}

/// Largest first, missing values after every present one.
pub fn descending_nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Smallest first, missing values after every present one.
pub fn ascending_nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
