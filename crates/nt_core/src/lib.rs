pub mod error;
pub mod geo;
pub mod models;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
pub use geo::distance_km;
pub use models::Summarizer;
pub use storage::ArticleStore;
pub use types::{Article, RankedArticle};
