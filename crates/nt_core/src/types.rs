use serde::{Deserialize, Serialize};

/// A stored news article.
///
/// Only `id` is required; every other field may be missing depending on what
/// the ingested record carried. Queries that need a field (coordinates for
/// proximity, a score for the score threshold) skip articles without it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_epoch: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    #[serde(default)]
    pub category: Vec<String>,
    /// Relevance assigned at ingestion. Queries never overwrite it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_summary: Option<String>,
}

impl Article {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Both coordinates, if the article is geo-tagged.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    pub fn needs_summary(&self) -> bool {
        self.llm_summary.as_deref().map_or(true, str::is_empty)
    }
}

/// An article as returned by a query, together with the value it was ordered by.
///
/// `rank_key` is computed per query and is never written back to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedArticle {
    #[serde(flatten)]
    pub article: Article,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_key: Option<f64>,
}

impl RankedArticle {
    pub fn new(article: Article, rank_key: Option<f64>) -> Self {
        Self { article, rank_key }
    }

    pub fn unranked(article: Article) -> Self {
        Self::new(article, None)
    }
}
