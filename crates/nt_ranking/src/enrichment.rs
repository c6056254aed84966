use std::fmt;
use std::sync::Arc;
use futures::future::join_all;
use nt_core::{Article, ArticleStore, Error, RankedArticle, Result, Summarizer};
use tokio::sync::Semaphore;
use tracing::debug;

/// Fills missing summaries on ranked results and writes them back to the store.
///
/// Only articles that survived ranking and truncation are touched. A summary,
/// once stored non-empty, is never recomputed.
pub struct Enricher {
    store: Arc<dyn ArticleStore>,
    summarizer: Arc<dyn Summarizer>,
    concurrency: usize,
}

impl fmt::Debug for Enricher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enricher")
            .field("store", &"<dyn ArticleStore>")
            .field("summarizer", &self.summarizer.name())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

impl Enricher {
    /// Serial enricher: one summarizer call at a time.
    pub fn new(store: Arc<dyn ArticleStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            store,
            summarizer,
            concurrency: 1,
        }
    }

    /// Allow up to `concurrency` summarizer calls in flight. Result order is unaffected.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Truncate `ranked` to `limit` and enrich what remains.
    pub async fn enrich_and_limit(
        &self,
        mut ranked: Vec<RankedArticle>,
        limit: usize,
    ) -> Result<Vec<RankedArticle>> {
        ranked.truncate(limit);

        let enriched = if self.concurrency == 1 {
            let mut enriched = 0;
            for item in ranked.iter_mut() {
                if self.enrich(&mut item.article).await? {
                    enriched += 1;
                }
            }
            enriched
        } else {
            let semaphore = Arc::new(Semaphore::new(self.concurrency));
            let futures = ranked.iter_mut().map(|item| {
                let semaphore = semaphore.clone();
                async move {
                    let _permit = semaphore.acquire().await.map_err(|e| Error::External(e.into()))?;
                    self.enrich(&mut item.article).await
                }
            });
            join_all(futures)
                .await
                .into_iter()
                .collect::<Result<Vec<bool>>>()?
                .into_iter()
                .filter(|enriched| *enriched)
                .count()
        };

        debug!("Enriched {} of {} results", enriched, ranked.len());
        Ok(ranked)
    }

    /// Summarize and persist one article if it has no summary yet.
    async fn enrich(&self, article: &mut Article) -> Result<bool> {
        if !article.needs_summary() {
            return Ok(false);
        }

        let summary = self.summarizer
            .summarize(article.title.as_deref(), article.description.as_deref())
            .await;
        if summary.is_empty() {
            debug!("No summary available for article {}", article.id);
        }
        article.llm_summary = Some(summary);
        self.store.save(article).await?;
        Ok(true)
    }
}
