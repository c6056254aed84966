use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use nt_core::RankedArticle;
use nt_ranking::{DEFAULT_LIMIT, DEFAULT_RADIUS_KM};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::errors::ApiError;
use crate::AppState;

type ApiResult = Result<Json<ArticlesResponse>, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticlesResponse {
    pub articles: Vec<RankedArticle>,
    pub count: usize,
}

impl From<Vec<RankedArticle>> for ArticlesResponse {
    fn from(articles: Vec<RankedArticle>) -> Self {
        let count = articles.len();
        Self { articles, count }
    }
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT as i64
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_KM
}

#[derive(Debug, Deserialize)]
pub struct CategoryParams {
    category: String,
    #[serde(default = "default_limit")]
    limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct SourceParams {
    source: String,
    #[serde(default = "default_limit")]
    limit: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreParams {
    min_score: f64,
    #[serde(default = "default_limit")]
    limit: i64,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: String,
    #[serde(default = "default_limit")]
    limit: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParams {
    lat: f64,
    lon: f64,
    #[serde(default = "default_radius")]
    radius_km: f64,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn validate_limit(limit: i64) -> Result<usize, ApiError> {
    if limit < 1 {
        return Err(ApiError::BadRequest(format!("limit must be at least 1, got {}", limit)));
    }
    usize::try_from(limit).map_err(|_| ApiError::BadRequest(format!("limit out of range: {}", limit)))
}

fn validate_location(lat: f64, lon: f64, radius_km: f64) -> Result<(), ApiError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ApiError::BadRequest(format!("lat must be within [-90, 90], got {}", lat)));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(ApiError::BadRequest(format!("lon must be within [-180, 180], got {}", lon)));
    }
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(ApiError::BadRequest(format!("radiusKm must be a non-negative number, got {}", radius_km)));
    }
    Ok(())
}

pub async fn by_category(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CategoryParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = params?;
    let limit = validate_limit(params.limit)?;
    let articles = state.engine.by_category(&params.category, limit).await?;
    Ok(Json(articles.into()))
}

pub async fn by_source(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SourceParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = params?;
    let limit = validate_limit(params.limit)?;
    let articles = state.engine.by_source(&params.source, limit).await?;
    Ok(Json(articles.into()))
}

pub async fn by_score(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ScoreParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = params?;
    let limit = validate_limit(params.limit)?;
    if !params.min_score.is_finite() {
        return Err(ApiError::BadRequest("minScore must be a finite number".to_string()));
    }
    let articles = state.engine.by_score(params.min_score, limit).await?;
    Ok(Json(articles.into()))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = params?;
    let limit = validate_limit(params.limit)?;
    let articles = state.engine.search(&params.query, limit).await?;
    Ok(Json(articles.into()))
}

pub async fn nearby(
    State(state): State<Arc<AppState>>,
    params: Result<Query<NearbyParams>, QueryRejection>,
) -> ApiResult {
    let Query(params) = params?;
    let limit = validate_limit(params.limit)?;
    validate_location(params.lat, params.lon, params.radius_km)?;
    let articles = state.engine
        .nearby(params.lat, params.lon, params.radius_km, limit)
        .await?;
    Ok(Json(articles.into()))
}
