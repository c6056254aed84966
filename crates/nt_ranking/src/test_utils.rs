use async_trait::async_trait;
use nt_core::{Article, ArticleStore, Error, Result, Summarizer};
use nt_storage::InMemoryStorage;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory store that counts saves and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemoryStorage,
    saves: Mutex<Vec<Article>>,
    fail_scan: AtomicBool,
    fail_save: AtomicBool,
}

impl RecordingStore {
    pub fn with_articles(articles: impl IntoIterator<Item = Article>) -> Self {
        Self {
            inner: InMemoryStorage::with_articles(articles),
            ..Self::default()
        }
    }

    pub fn saved(&self) -> Vec<Article> {
        self.saves.lock().unwrap().clone()
    }

    pub fn fail_scans(&self) {
        self.fail_scan.store(true, Ordering::SeqCst);
    }

    pub fn fail_saves(&self) {
        self.fail_save.store(true, Ordering::SeqCst);
    }

    pub async fn stored(&self, id: &str) -> Option<Article> {
        self.inner.scan_all().await.unwrap().into_iter().find(|a| a.id == id)
    }
}

#[async_trait]
impl ArticleStore for RecordingStore {
    async fn scan_all(&self) -> Result<Vec<Article>> {
        if self.fail_scan.load(Ordering::SeqCst) {
            return Err(Error::Storage("scan failed".to_string()));
        }
        self.inner.scan_all().await
    }

    async fn save(&self, article: &Article) -> Result<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Error::Storage("save failed".to_string()));
        }
        self.saves.lock().unwrap().push(article.clone());
        self.inner.save(article).await
    }
}

/// Summarizer that records every call and answers `Summary of <title>`.
#[derive(Default)]
pub struct RecordingSummarizer {
    calls: Mutex<Vec<Option<String>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Option<Duration>,
    empty: bool,
}

impl RecordingSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always returns an empty summary, as a failing backend would.
    pub fn empty() -> Self {
        Self {
            empty: true,
            ..Self::default()
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn called_titles(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Summarizer for RecordingSummarizer {
    fn name(&self) -> &str {
        "recording"
    }

    async fn summarize(&self, title: Option<&str>, _description: Option<&str>) -> String {
        self.calls.lock().unwrap().push(title.map(str::to_string));
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.empty {
            String::new()
        } else {
            format!("Summary of {}", title.unwrap_or("untitled"))
        }
    }
}

pub fn article(id: &str) -> Article {
    Article {
        title: Some(format!("Article {}", id)),
        ..Article::new(id)
    }
}
