//! Bulk ingestion of JSON article dumps into an [`ArticleStore`].
//!
//! Each `*.json` file in the data directory is expected to hold an array of
//! raw records with snake_case keys (`source_name`, `publication_date`,
//! `relevance_score`, ...). Records are normalized into [`Article`]s and saved
//! one by one; files whose root is not an array are skipped. Reloading keeps
//! any summary already cached for an article id.

use chrono::{DateTime, Utc};
use nt_core::{Article, ArticleStore, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Load every JSON file in `dir` into `store`. Returns the number of articles saved.
///
/// A missing directory is not an error: nothing is loaded.
pub async fn load_directory(store: &dyn ArticleStore, dir: &Path) -> Result<usize> {
    if !tokio::fs::metadata(dir).await.is_ok_and(|meta| meta.is_dir()) {
        warn!("No data dir found at {} - skipping loader", dir.display());
        return Ok(0);
    }

    let mut files: Vec<PathBuf> = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();

    let cached = cached_summaries(store).await?;
    let mut loaded = 0;
    for file in files {
        let count = load_file(store, &file, &cached).await?;
        debug!("Loaded {} articles from {}", count, file.display());
        loaded += count;
    }

    info!("📥 Data loader finished: {} articles from {}", loaded, dir.display());
    Ok(loaded)
}

/// Non-empty summaries already in the store, keyed by article id.
async fn cached_summaries(store: &dyn ArticleStore) -> Result<HashMap<String, String>> {
    let cached: HashMap<String, String> = store
        .scan_all()
        .await?
        .into_iter()
        .filter_map(|article| {
            let summary = article.llm_summary.filter(|s| !s.trim().is_empty())?;
            Some((article.id, summary))
        })
        .collect();
    debug!("{} cached summaries survive the reload", cached.len());
    Ok(cached)
}

async fn load_file(store: &dyn ArticleStore, path: &Path, cached: &HashMap<String, String>) -> Result<usize> {
    let contents = tokio::fs::read_to_string(path).await?;
    let root: Value = serde_json::from_str(&contents)?;
    let Value::Array(records) = root else {
        warn!("Skipping {}: root is not an array", path.display());
        return Ok(0);
    };

    let now = Utc::now().timestamp_millis();
    for record in &records {
        let mut article = parse_record(record, now);
        article.llm_summary = cached.get(&article.id).cloned();
        store.save(&article).await?;
    }
    Ok(records.len())
}

/// Normalize one raw record. `now_millis` stands in for unusable publication dates.
pub fn parse_record(record: &Value, now_millis: i64) -> Article {
    let id = text_field(record, "id")
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let category = record
        .get("category")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().map(value_text).collect())
        .unwrap_or_default();

    Article {
        id,
        title: text_field(record, "title"),
        description: text_field(record, "description"),
        url: text_field(record, "url"),
        publication_epoch: Some(
            record
                .get("publication_date")
                .and_then(parse_publication_date)
                .unwrap_or(now_millis),
        ),
        source_name: text_field(record, "source_name"),
        category,
        relevance_score: number_field(record, "relevance_score"),
        latitude: number_field(record, "latitude"),
        longitude: number_field(record, "longitude"),
        llm_summary: None,
    }
}

/// Interpret a publication date as epoch milliseconds.
///
/// RFC 3339 strings are parsed as instants. Otherwise the value is read as an
/// integer: exactly ten digits means seconds, anything else is already millis.
/// Returns `None` for null, blank or unparseable values.
pub fn parse_publication_date(value: &Value) -> Option<i64> {
    let raw = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }

    if let Ok(instant) = DateTime::parse_from_rfc3339(&raw) {
        return Some(instant.timestamp_millis());
    }

    let epoch: i64 = raw.parse().ok()?;
    if epoch.to_string().len() == 10 {
        Some(epoch * 1000)
    } else {
        Some(epoch)
    }
}

fn text_field(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::Null => None,
        value => Some(value_text(value)),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number_field(record: &Value, key: &str) -> Option<f64> {
    record.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStorage;
    use serde_json::json;
    use tempfile::tempdir;

    const NOW: i64 = 1_750_000_000_000;

    #[test]
    fn test_parse_publication_date_formats() {
        assert_eq!(
            parse_publication_date(&json!("2024-03-01T12:00:00Z")),
            Some(1_709_294_400_000)
        );
        assert_eq!(parse_publication_date(&json!("1709294400")), Some(1_709_294_400_000));
        assert_eq!(parse_publication_date(&json!(1709294400)), Some(1_709_294_400_000));
        assert_eq!(parse_publication_date(&json!("1709294400123")), Some(1_709_294_400_123));
        assert_eq!(parse_publication_date(&json!("yesterday")), None);
        assert_eq!(parse_publication_date(&json!("  ")), None);
        assert_eq!(parse_publication_date(&Value::Null), None);
    }

    #[test]
    fn test_parse_record_full() {
        let record = json!({
            "id": "a1",
            "title": "Rust 2.0 announced",
            "description": "The language gets a new edition",
            "url": "https://example.com/rust",
            "publication_date": "2024-03-01T12:00:00Z",
            "source_name": "Example News",
            "category": ["Tech", "Programming"],
            "relevance_score": 0.82,
            "latitude": 52.52,
            "longitude": 13.405
        });

        let article = parse_record(&record, NOW);
        assert_eq!(article.id, "a1");
        assert_eq!(article.title.as_deref(), Some("Rust 2.0 announced"));
        assert_eq!(article.source_name.as_deref(), Some("Example News"));
        assert_eq!(article.publication_epoch, Some(1_709_294_400_000));
        assert_eq!(article.category, vec!["Tech", "Programming"]);
        assert_eq!(article.relevance_score, Some(0.82));
        assert_eq!(article.coordinates(), Some((52.52, 13.405)));
        assert_eq!(article.llm_summary, None);
    }

    #[test]
    fn test_parse_record_defaults() {
        let record = json!({
            "id": "  ",
            "publication_date": "not a date",
            "relevance_score": "0.9",
            "latitude": null
        });

        let article = parse_record(&record, NOW);
        assert!(uuid::Uuid::parse_str(&article.id).is_ok());
        assert_eq!(article.publication_epoch, Some(NOW));
        assert_eq!(article.relevance_score, None);
        assert_eq!(article.latitude, None);
        assert!(article.category.is_empty());

        let article = parse_record(&json!({ "title": "No date" }), NOW);
        assert_eq!(article.publication_epoch, Some(NOW));
    }

    #[tokio::test]
    async fn test_load_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            json!([
                { "id": "a1", "title": "First" },
                { "id": "a2", "title": "Second" }
            ])
            .to_string(),
        )
        .unwrap();
        std::fs::write(dir.path().join("b.json"), json!([{ "id": "b1" }]).to_string()).unwrap();
        std::fs::write(dir.path().join("c.json"), json!({ "id": "ignored" }).to_string()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not json").unwrap();

        let store = InMemoryStorage::new();
        let loaded = load_directory(&store, dir.path()).await.unwrap();
        assert_eq!(loaded, 3);

        let ids: Vec<String> = store.scan_all().await.unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
    }

    #[tokio::test]
    async fn test_load_missing_directory() {
        let dir = tempdir().unwrap();
        let store = InMemoryStorage::new();
        let loaded = load_directory(&store, &dir.path().join("missing")).await.unwrap();
        assert_eq!(loaded, 0);
    }

    #[tokio::test]
    async fn test_load_malformed_json_fails() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("broken.json"), "[{").unwrap();

        let store = InMemoryStorage::new();
        let result = load_directory(&store, dir.path()).await;
        assert!(matches!(result, Err(nt_core::Error::Serialization(_))));
    }

    #[tokio::test]
    async fn test_reload_keeps_cached_summary() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            json!([{ "id": "a1", "title": "First" }, { "id": "a2", "title": "Second" }]).to_string(),
        )
        .unwrap();

        let store = InMemoryStorage::new();
        load_directory(&store, dir.path()).await.unwrap();

        let mut summarized = store.scan_all().await.unwrap().remove(0);
        summarized.llm_summary = Some("Cached summary.".to_string());
        store.save(&summarized).await.unwrap();

        std::fs::write(
            dir.path().join("a.json"),
            json!([{ "id": "a1", "title": "First, updated" }, { "id": "a2", "title": "Second" }]).to_string(),
        )
        .unwrap();
        assert_eq!(load_directory(&store, dir.path()).await.unwrap(), 2);

        let articles = store.scan_all().await.unwrap();
        assert_eq!(articles[0].title.as_deref(), Some("First, updated"));
        assert_eq!(articles[0].llm_summary.as_deref(), Some("Cached summary."));
        assert_eq!(articles[1].llm_summary, None);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_reload_keeps_cached_summary_in_sqlite() {
        use crate::SQLiteStorage;

        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        std::fs::create_dir_all(&data_dir).unwrap();
        std::fs::write(data_dir.join("a.json"), json!([{ "id": "a1", "title": "First" }]).to_string()).unwrap();
        let db_path = dir.path().join("articles.db");

        {
            let store = SQLiteStorage::new_with_path(&db_path).await.unwrap();
            load_directory(&store, &data_dir).await.unwrap();
            let mut article = store.scan_all().await.unwrap().remove(0);
            article.llm_summary = Some("Cached summary.".to_string());
            store.save(&article).await.unwrap();
        }

        let store = SQLiteStorage::new_with_path(&db_path).await.unwrap();
        load_directory(&store, &data_dir).await.unwrap();
        let articles = store.scan_all().await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].llm_summary.as_deref(), Some("Cached summary."));
    }
}
