//! companion-catalog library - course catalog aggregation
//!
//! Fetches the seven catalog resources from the REST back end, joins them
//! into one [`views::CourseDetailView`] per course and serves the result
//! read-only over HTTP. The joined catalog is held by a single-flight
//! [`cache::CatalogCache`].

use std::sync::Arc;

use axum::Router;

pub mod api;
pub mod cache;
pub mod calendar;
pub mod fetch;
pub mod join;
pub mod names;
pub mod pagination;
pub mod records;
pub mod views;

use cache::CatalogCache;
use fetch::RecordFetcher;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CatalogCache>,
    /// Also used directly for the uncached calendar resources
    pub fetcher: Arc<dyn RecordFetcher>,
    /// Normalized back-end base address
    pub base_url: String,
    /// Configured credential, used when a request carries none
    pub credential: Option<String>,
}

impl AppState {
    /// Create new application state with a fresh cache over `fetcher`
    pub fn new(fetcher: Arc<dyn RecordFetcher>, base_url: String, credential: Option<String>) -> Self {
        Self {
            cache: Arc::new(CatalogCache::new(Arc::clone(&fetcher))),
            fetcher,
            base_url,
            credential,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let catalog = Router::new()
        .route("/api/catalog", get(api::list_catalog))
        .route("/api/catalog/search", get(api::search_catalog))
        .route("/api/catalog/refresh", post(api::refresh_catalog))
        .route("/api/catalog/:code", get(api::get_course))
        .route("/api/calendar", get(api::get_calendar))
        .route("/api/schedule", get(api::get_schedule));

    let public = Router::new()
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes());

    Router::new()
        .merge(catalog)
        .merge(public)
        .with_state(state)
}
