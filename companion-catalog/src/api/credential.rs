//! Per-request upstream credential
//!
//! A caller may send its own `Authorization: Bearer` header; it then replaces
//! the configured credential for the back end fetches made on its behalf.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use companion_common::config::normalize_credential;
use std::convert::Infallible;

use crate::AppState;

/// Credential to forward upstream for this request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamCredential(pub Option<String>);

impl UpstreamCredential {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Token of an `Authorization: Bearer <token>` header, if any
pub fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        normalize_credential(token)
    } else {
        None
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UpstreamCredential
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        Ok(UpstreamCredential(
            bearer_token(parts).or_else(|| state.credential.clone()),
        ))
    }
}
