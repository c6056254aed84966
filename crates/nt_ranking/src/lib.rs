//! Query, ranking and enrichment over an unindexed article corpus.
//!
//! [`RankingEngine`] implements the retrieval modes (category, source,
//! minimum score, text search, proximity). Each one ranks a fresh snapshot of
//! the [`ArticleStore`](nt_core::ArticleStore) and passes the top results to
//! the [`Enricher`], which fills and persists missing summaries.

pub mod engine;
pub mod enrichment;
pub mod scoring;

#[cfg(test)]
pub(crate) mod test_utils;

pub use engine::RankingEngine;
pub use enrichment::Enricher;

/// Result count used when the caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 5;
/// Search radius for proximity queries when the caller does not give one.
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

pub mod prelude {
    pub use super::{Enricher, RankingEngine, DEFAULT_LIMIT, DEFAULT_RADIUS_KM};
    pub use nt_core::{Article, RankedArticle, Result, Error};
}
