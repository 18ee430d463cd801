//! Record fetching from the REST back end
//!
//! [`RecordFetcher`] is the seam between the catalog and the network: the
//! cache only ever asks for "the JSON array behind resource X at base URL Y".
//! [`HttpRecordFetcher`] is the production implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Per-request timeout for back end calls
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest slice of an error body kept in [`FetchError::Status`]
const ERROR_BODY_PREVIEW: usize = 200;

const USER_AGENT: &str = concat!("companion-catalog/", env!("CARGO_PKG_VERSION"));

/// Back end resources, each served at `{base}/api/{path}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Courses,
    CourseDetails,
    SubCourses,
    Evaluations,
    Professors,
    Blocks,
    Formations,
    Calendar,
    CourseSchedule,
}

impl Resource {
    /// The seven resources a catalog snapshot is joined from
    pub const CATALOG: [Resource; 7] = [
        Resource::Courses,
        Resource::CourseDetails,
        Resource::SubCourses,
        Resource::Evaluations,
        Resource::Professors,
        Resource::Blocks,
        Resource::Formations,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Resource::Courses => "courses",
            Resource::CourseDetails => "course-details",
            Resource::SubCourses => "sous-courses",
            Resource::Evaluations => "course-evaluations",
            Resource::Professors => "professors",
            Resource::Blocks => "blocs",
            Resource::Formations => "formations",
            Resource::Calendar => "calendar",
            Resource::CourseSchedule => "course-schedule",
        }
    }

    pub fn url(self, base_url: &str) -> String {
        format!("{}/api/{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Failure to obtain one resource
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Network error fetching {resource}: {message}")]
    Network { resource: Resource, message: String },

    #[error("Back end returned {status} for {resource}: {body}")]
    Status {
        resource: Resource,
        status: u16,
        body: String,
    },

    #[error("Invalid payload for {resource}: {message}")]
    Decode { resource: Resource, message: String },
}

impl FetchError {
    pub fn resource(&self) -> Resource {
        match self {
            FetchError::Network { resource, .. }
            | FetchError::Status { resource, .. }
            | FetchError::Decode { resource, .. } => *resource,
        }
    }
}

/// Source of raw resource arrays
#[async_trait]
pub trait RecordFetcher: Send + Sync {
    /// Fetch the JSON array behind `resource`
    ///
    /// `credential`, when present, is sent as a bearer token and otherwise
    /// treated as opaque.
    async fn fetch(
        &self,
        base_url: &str,
        resource: Resource,
        credential: Option<&str>,
    ) -> Result<Vec<Value>, FetchError>;
}

/// [`RecordFetcher`] backed by `reqwest`
pub struct HttpRecordFetcher {
    http_client: reqwest::Client,
}

impl HttpRecordFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    /// Construction errors come from `reqwest` itself and name no resource
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl RecordFetcher for HttpRecordFetcher {
    async fn fetch(
        &self,
        base_url: &str,
        resource: Resource,
        credential: Option<&str>,
    ) -> Result<Vec<Value>, FetchError> {
        let url = resource.url(base_url);
        debug!(resource = %resource, url = %url, "Fetching resource");

        let mut request = self.http_client.get(&url);
        if let Some(token) = credential {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| FetchError::Network {
            resource,
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                resource,
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
            });
        }

        let payload: Value = response.json().await.map_err(|e| FetchError::Decode {
            resource,
            message: e.to_string(),
        })?;

        match payload {
            Value::Array(items) => {
                debug!(resource = %resource, records = items.len(), "Fetched resource");
                Ok(items)
            }
            other => Err(FetchError::Decode {
                resource,
                message: format!("expected a JSON array, got {}", json_kind(&other)),
            }),
        }
    }
}

/// Decode each array element into `T`
///
/// Unknown fields are ignored, but an element that is not an object or
/// lacks a required field fails the whole resource.
pub fn decode_records<T: DeserializeOwned>(
    resource: Resource,
    items: Vec<Value>,
) -> Result<Vec<T>, FetchError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                warn!(resource = %resource, index, error = %e, "Undecodable record");
                FetchError::Decode {
                    resource,
                    message: format!("record {}: {}", index, e),
                }
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::BlockRecord;
    use serde_json::json;

    #[test]
    fn test_resource_urls() {
        assert_eq!(
            Resource::SubCourses.url("http://localhost:28088"),
            "http://localhost:28088/api/sous-courses"
        );
        assert_eq!(
            Resource::Blocks.url("http://host/"),
            "http://host/api/blocs"
        );
    }

    #[test]
    fn test_catalog_resources_are_distinct() {
        let mut paths: Vec<&str> = Resource::CATALOG.iter().map(|r| r.path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 7);
        assert!(!paths.contains(&"calendar"));
    }

    #[test]
    fn test_decode_records() {
        let blocks: Vec<BlockRecord> = decode_records(
            Resource::Blocks,
            vec![
                json!({"blocId": "B1", "name": "Bloc 1", "extra": 3}),
                json!({"blocId": "B2"}),
            ],
        )
        .unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].bloc_id, "B1");
        assert_eq!(blocks[1].name, "");
    }

    #[test]
    fn test_decode_rejects_malformed_element() {
        let result: Result<Vec<BlockRecord>, _> = decode_records(
            Resource::Blocks,
            vec![json!({"blocId": "B1"}), json!("not an object")],
        );

        match result {
            Err(FetchError::Decode { resource, message }) => {
                assert_eq!(resource, Resource::Blocks);
                assert!(message.starts_with("record 1"));
            }
            other => panic!("expected decode error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_error_reports_resource() {
        let error = FetchError::Status {
            resource: Resource::Professors,
            status: 503,
            body: "down".to_string(),
        };
        assert_eq!(error.resource(), Resource::Professors);
        assert_eq!(error.to_string(), "Back end returned 503 for professors: down");
    }

    #[test]
    fn test_client_creation() {
        assert!(HttpRecordFetcher::new().is_ok());
    }

    #[test]
    fn test_client_creation_error_is_not_a_fetch_error() {
        let built: Result<HttpRecordFetcher, reqwest::Error> =
            HttpRecordFetcher::with_timeout(Duration::from_millis(250));
        assert!(built.is_ok());
    }
}
