use async_trait::async_trait;
use nt_core::{Article, ArticleStore, Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use crate::StorageBackend;

const DEFAULT_DB_PATH: &str = "articles.db";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id TEXT PRIMARY KEY,
        title TEXT,
        description TEXT,
        url TEXT,
        publication_epoch INTEGER,
        source_name TEXT,
        category TEXT NOT NULL DEFAULT '[]',
        relevance_score REAL,
        latitude REAL,
        longitude REAL,
        llm_summary TEXT
    )
    "#,
    // Add future migrations here
];

pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    fn get_error_message() -> &'static str {
        "SQLite database should be available at the configured path (default ./articles.db)"
    }

    async fn connect(backend_url: Option<&str>) -> Result<Self> {
        let db_path = PathBuf::from(backend_url.unwrap_or(DEFAULT_DB_PATH));
        Self::new_with_path(&db_path).await
    }
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))
            .map_err(|e| Error::Database(format!("Invalid database path: {}", e)))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        tracing::debug!("Opened SQLite article store at {}", db_path.display());
        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    fn row_to_article(row: &SqliteRow) -> Result<Article> {
        let category: String = row.get("category");
        let category: Vec<String> = serde_json::from_str(&category)?;

        Ok(Article {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            url: row.get("url"),
            publication_epoch: row.get("publication_epoch"),
            source_name: row.get("source_name"),
            category,
            relevance_score: row.get("relevance_score"),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            llm_summary: row.get("llm_summary"),
        })
    }
}

#[async_trait]
impl ArticleStore for SQLiteStorage {
    async fn scan_all(&self) -> Result<Vec<Article>> {
        let rows = sqlx::query("SELECT * FROM articles ORDER BY rowid")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to scan articles: {}", e)))?;

        rows.iter().map(Self::row_to_article).collect()
    }

    async fn save(&self, article: &Article) -> Result<()> {
        let category = serde_json::to_string(&article.category)?;

        // Upsert rather than INSERT OR REPLACE so the rowid (scan order) survives updates.
        sqlx::query(
            r#"
            INSERT INTO articles
            (id, title, description, url, publication_epoch, source_name, category,
             relevance_score, latitude, longitude, llm_summary)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                url = excluded.url,
                publication_epoch = excluded.publication_epoch,
                source_name = excluded.source_name,
                category = excluded.category,
                relevance_score = excluded.relevance_score,
                latitude = excluded.latitude,
                longitude = excluded.longitude,
                llm_summary = excluded.llm_summary
            "#,
        )
        .bind(&article.id)
        .bind(article.title.as_deref())
        .bind(article.description.as_deref())
        .bind(article.url.as_deref())
        .bind(article.publication_epoch)
        .bind(article.source_name.as_deref())
        .bind(category)
        .bind(article.relevance_score)
        .bind(article.latitude)
        .bind(article.longitude)
        .bind(article.llm_summary.as_deref())
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to store article {}: {}", article.id, e)))?;

        Ok(())
    }
}
