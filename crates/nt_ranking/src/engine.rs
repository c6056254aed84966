use std::fmt;
use std::sync::Arc;
use nt_core::{distance_km, Article, ArticleStore, RankedArticle, Result, Summarizer};
use tracing::debug;
use crate::enrichment::Enricher;
use crate::scoring::{ascending_nulls_last, combined_score, descending_nulls_last, text_match};

/// The five retrieval modes over a full snapshot of the corpus.
///
/// Every query scans the store, filters, sorts (stably, so exact ties keep
/// scan order), truncates to `limit` and hands the survivors to the
/// [`Enricher`]. `limit` is not validated here.
pub struct RankingEngine {
    store: Arc<dyn ArticleStore>,
    enricher: Enricher,
}

impl fmt::Debug for RankingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RankingEngine")
            .field("store", &"<dyn ArticleStore>")
            .field("enricher", &self.enricher)
            .finish()
    }
}

impl RankingEngine {
    pub fn new(store: Arc<dyn ArticleStore>, enricher: Enricher) -> Self {
        Self { store, enricher }
    }

    /// Engine with a serial enricher persisting into the same store.
    pub fn with_summarizer(store: Arc<dyn ArticleStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        let enricher = Enricher::new(store.clone(), summarizer);
        Self::new(store, enricher)
    }

    /// Articles tagged with `category` (case-insensitive), newest first.
    pub async fn by_category(&self, category: &str, limit: usize) -> Result<Vec<RankedArticle>> {
        let wanted = category.to_lowercase();
        let mut ranked: Vec<RankedArticle> = self.snapshot().await?
            .into_iter()
            .filter(|article| article.category.iter().any(|tag| tag.to_lowercase() == wanted))
            .map(RankedArticle::unranked)
            .collect();
        ranked.sort_by(|a, b| {
            descending_nulls_last(a.article.publication_epoch, b.article.publication_epoch)
        });
        self.finish("category", ranked, limit).await
    }

    /// Articles from `source` (case-insensitive), newest first.
    pub async fn by_source(&self, source: &str, limit: usize) -> Result<Vec<RankedArticle>> {
        let wanted = source.to_lowercase();
        let mut ranked: Vec<RankedArticle> = self.snapshot().await?
            .into_iter()
            .filter(|article| {
                article.source_name.as_deref().is_some_and(|name| {
                    !name.trim().is_empty() && name.to_lowercase() == wanted
                })
            })
            .map(RankedArticle::unranked)
            .collect();
        ranked.sort_by(|a, b| {
            descending_nulls_last(a.article.publication_epoch, b.article.publication_epoch)
        });
        self.finish("source", ranked, limit).await
    }

    /// Articles whose stored relevance is at least `min_score`, highest first.
    /// Articles without a score are excluded.
    pub async fn by_score(&self, min_score: f64, limit: usize) -> Result<Vec<RankedArticle>> {
        let mut ranked: Vec<RankedArticle> = self.snapshot().await?
            .into_iter()
            .filter_map(|article| {
                let score = article.relevance_score.filter(|score| *score >= min_score)?;
                Some(RankedArticle::new(article, Some(score)))
            })
            .collect();
        ranked.sort_by(|a, b| descending_nulls_last(a.rank_key, b.rank_key));
        self.finish("score", ranked, limit).await
    }

    /// Substring search over title and description, ordered by combined score.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<RankedArticle>> {
        let needle = query.to_lowercase();
        let mut ranked: Vec<RankedArticle> = self.snapshot().await?
            .into_iter()
            .filter_map(|article| {
                let text_score = text_match(&article, &needle)?;
                let score = combined_score(text_score, article.relevance_score);
                Some(RankedArticle::new(article, Some(score)))
            })
            .collect();
        ranked.sort_by(|a, b| descending_nulls_last(a.rank_key, b.rank_key));
        self.finish("search", ranked, limit).await
    }

    /// Geo-tagged articles within `radius_km` of (`lat`, `lon`), closest first.
    /// The rank key is the distance in kilometres.
    pub async fn nearby(&self, lat: f64, lon: f64, radius_km: f64, limit: usize) -> Result<Vec<RankedArticle>> {
        let mut ranked: Vec<RankedArticle> = self.snapshot().await?
            .into_iter()
            .filter_map(|article| {
                let (article_lat, article_lon) = article.coordinates()?;
                let distance = distance_km(lat, lon, article_lat, article_lon);
                (distance <= radius_km).then(|| RankedArticle::new(article, Some(distance)))
            })
            .collect();
        ranked.sort_by(|a, b| ascending_nulls_last(a.rank_key, b.rank_key));
        self.finish("nearby", ranked, limit).await
    }

    async fn snapshot(&self) -> Result<Vec<Article>> {
        let articles = self.store.scan_all().await?;
        debug!("Scanned {} articles", articles.len());
        Ok(articles)
    }

    async fn finish(&self, mode: &str, ranked: Vec<RankedArticle>, limit: usize) -> Result<Vec<RankedArticle>> {
        debug!("🔍 {} query matched {} articles (limit {})", mode, ranked.len(), limit);
        self.enricher.enrich_and_limit(ranked, limit).await
    }
}
