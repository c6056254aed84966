use async_trait::async_trait;
use nt_core::{ArticleStore, Error, Result};
use std::sync::Arc;

pub mod backends;
pub mod loader;

pub use backends::*;
pub use loader::load_directory;

#[async_trait]
pub trait StorageBackend: ArticleStore + Sized {
    fn get_error_message() -> &'static str;

    /// Open the backend. `backend_url` overrides the backend's default location.
    async fn connect(backend_url: Option<&str>) -> Result<Self>;
}

async fn connect_backend<T: StorageBackend + 'static>(
    backend_url: Option<&str>,
) -> Result<Arc<dyn ArticleStore>> {
    let storage = T::connect(backend_url)
        .await
        .map_err(|e| Error::Storage(format!("{} ({})", T::get_error_message(), e)))?;
    Ok(Arc::new(storage))
}

/// Build the store named by `kind` (`memory`, or `sqlite` with the feature enabled).
pub async fn create_storage(kind: &str, backend_url: Option<&str>) -> Result<Arc<dyn ArticleStore>> {
    match kind {
        "memory" => connect_backend::<InMemoryStorage>(backend_url).await,
        #[cfg(feature = "sqlite")]
        "sqlite" => connect_backend::<SQLiteStorage>(backend_url).await,
        other => Err(Error::Storage(format!("Unknown storage backend: {}", other))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_storage() {
        let storage = create_storage("memory", None).await.unwrap();
        assert!(storage.scan_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_storage_fails() {
        let result = create_storage("qdrant", None).await;
        assert!(matches!(result, Err(Error::Storage(_))));
    }
}
