use async_trait::async_trait;
use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Return every stored article. No filtering is pushed down to the backend.
    async fn scan_all(&self) -> Result<Vec<Article>>;

    /// Insert or replace the article with the same id, overwriting all fields.
    async fn save(&self, article: &Article) -> Result<()>;
}
