//! # Companion Common Library
//!
//! Shared code for the student-companion catalog services including:
//! - Error types
//! - Configuration loading (TOML bootstrap file, environment, defaults)
//! - Identifier list parsing for string-encoded relations
//! - Flexible date normalization for calendar and schedule records
//! - Display formatting helpers (weights, hours, French list joining)

pub mod config;
pub mod dates;
pub mod display;
pub mod error;
pub mod ids;

pub use dates::{parse_date, DateFormatError};
pub use error::{Error, Result};
pub use ids::IdList;
