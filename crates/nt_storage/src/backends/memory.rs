use async_trait::async_trait;
use nt_core::{Article, ArticleStore, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::StorageBackend;

/// Articles kept in insertion order so scans are deterministic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    articles: Vec<Article>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, article: &Article) {
        if let Some(existing) = self.articles.iter_mut().find(|a| a.id == article.id) {
            *existing = article.clone();
        } else {
            self.articles.push(article.clone());
        }
    }

    pub fn scan_all(&self) -> Vec<Article> {
        self.articles.clone()
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(articles: impl IntoIterator<Item = Article>) -> Self {
        let mut store = MemoryStore::new();
        for article in articles {
            store.save(&article);
        }
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn connect(_backend_url: Option<&str>) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStore for InMemoryStorage {
    async fn scan_all(&self) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.scan_all())
    }

    async fn save(&self, article: &Article) -> Result<()> {
        let mut store = self.store.write().await;
        store.save(article);
        Ok(())
    }
}
