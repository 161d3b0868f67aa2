//! Shared handler state and server-side authorisation.

use crate::error::{ApiError, ApiResult};
use api_shared::auth::bearer_token;
use axum::http::{header, HeaderMap};
use hms_core::{SessionTable, Subject};
use std::sync::Arc;

/// Application state for the REST API server
///
/// Holds the token-keyed session table. Every guarded handler re-checks capabilities against it,
/// so the UI hiding an action is never the only thing standing in the way.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionTable>,
}

impl AppState {
    pub fn new(sessions: Arc<SessionTable>) -> Self {
        Self { sessions }
    }

    /// Bearer token from the `Authorization` header, if present and well formed.
    pub fn token<'h>(&self, headers: &'h HeaderMap) -> Option<&'h str> {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
    }

    /// Subject for the request's session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` when the token is missing or not open.
    pub fn subject(&self, headers: &HeaderMap) -> ApiResult<Subject> {
        let token = self
            .token(headers)
            .ok_or(ApiError::Unauthorized("Missing bearer token"))?;
        self.sessions
            .subject(token)
            .ok_or(ApiError::Unauthorized("Unknown or expired session"))
    }

    /// Subject for the request's session, provided it holds `capability`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` without a session and `ApiError::Forbidden` when the
    /// capability is not granted.
    pub fn authorise(&self, headers: &HeaderMap, capability: &str) -> ApiResult<Subject> {
        let subject = self.subject(headers)?;
        if !hms_core::has_capability(Some(&subject), capability) {
            tracing::warn!(subject = %subject.id, %capability, "request denied");
            return Err(ApiError::Forbidden(capability.to_string()));
        }
        Ok(subject)
    }
}
