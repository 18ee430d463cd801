//! HTTP API handlers for companion-catalog

pub mod buildinfo;
pub mod calendar;
pub mod catalog;
pub mod credential;
pub mod error;
pub mod health;

pub use buildinfo::get_build_info;
pub use calendar::{get_calendar, get_schedule};
pub use catalog::{get_course, list_catalog, refresh_catalog, search_catalog};
pub use credential::UpstreamCredential;
pub use error::{ApiError, ApiResult};
pub use health::health_routes;
