//! Catalog browsing endpoints
//!
//! Every handler goes through [`CatalogCache::load`](crate::cache::CatalogCache::load),
//! so the first request after startup (or after a base URL change) pays for
//! the fetch and later ones are served from memory.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::credential::UpstreamCredential;
use super::error::{ApiError, ApiResult};
use crate::cache::{CacheState, CatalogSnapshot};
use crate::join::SourceCounts;
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::views::CourseDetailView;
use crate::AppState;

/// Query parameters for catalog listing
#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// One page of the joined catalog
#[derive(Debug, Serialize)]
pub struct CatalogPageResponse {
    pub base_url: String,
    pub loaded_at: DateTime<Utc>,
    pub total_courses: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub courses: Vec<CourseDetailView>,
}

/// Outcome of a forced refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub state: CacheState,
    pub base_url: String,
    pub loaded_at: DateTime<Utc>,
    pub total_courses: usize,
    pub counts: SourceCounts,
}

impl RefreshResponse {
    fn new(state: CacheState, snapshot: &CatalogSnapshot) -> Self {
        Self {
            state,
            base_url: snapshot.base_url.clone(),
            loaded_at: snapshot.loaded_at,
            total_courses: snapshot.len(),
            counts: snapshot.counts,
        }
    }
}

/// GET /api/catalog?page=N
pub async fn list_catalog(
    State(state): State<AppState>,
    credential: UpstreamCredential,
    Query(query): Query<CatalogQuery>,
) -> ApiResult<Json<CatalogPageResponse>> {
    let snapshot = state.cache.load(&state.base_url, credential.as_deref()).await?;
    let pagination = calculate_pagination(snapshot.len(), query.page);

    Ok(Json(CatalogPageResponse {
        base_url: snapshot.base_url.clone(),
        loaded_at: snapshot.loaded_at,
        total_courses: snapshot.len(),
        page: pagination.page,
        page_size: PAGE_SIZE,
        total_pages: pagination.total_pages,
        courses: pagination.slice(&snapshot.courses).to_vec(),
    }))
}

/// GET /api/catalog/search?q=
///
/// First course whose code or title contains the query.
pub async fn search_catalog(
    State(state): State<AppState>,
    credential: UpstreamCredential,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<CourseDetailView>> {
    let needle = query
        .q
        .ok_or_else(|| ApiError::BadRequest("Missing query parameter 'q'".to_string()))?;

    let snapshot = state.cache.load(&state.base_url, credential.as_deref()).await?;
    snapshot
        .find_course(&needle)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No course matches '{}'", needle)))
}

/// GET /api/catalog/:code
pub async fn get_course(
    State(state): State<AppState>,
    credential: UpstreamCredential,
    Path(code): Path<String>,
) -> ApiResult<Json<CourseDetailView>> {
    let snapshot = state.cache.load(&state.base_url, credential.as_deref()).await?;
    snapshot
        .get(&code)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Course {}", code)))
}

/// POST /api/catalog/refresh
pub async fn refresh_catalog(
    State(state): State<AppState>,
    credential: UpstreamCredential,
) -> ApiResult<Json<RefreshResponse>> {
    let snapshot = state
        .cache
        .refresh(&state.base_url, credential.as_deref())
        .await?;

    info!(courses = snapshot.len(), "Catalog refreshed on request");
    Ok(Json(RefreshResponse::new(state.cache.state(), &snapshot)))
}
