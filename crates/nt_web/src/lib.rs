use axum::{routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod errors;
pub mod handlers;
pub mod state;

pub use errors::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/news/v1/category", get(handlers::by_category))
        .route("/api/news/v1/source", get(handlers::by_source))
        .route("/api/news/v1/score", get(handlers::by_score))
        .route("/api/news/v1/search", get(handlers::search))
        .route("/api/news/v1/nearby", get(handlers::nearby))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(Arc::new(state))
}

/// Serve the API on `listener` until the server stops.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("🌐 Listening on http://{}", addr);
    }
    axum::serve(listener, create_app(state)).await
}

pub mod prelude {
    pub use nt_core::{Article, RankedArticle, Result, Error};
    pub use crate::{create_app, serve, AppState};
}
