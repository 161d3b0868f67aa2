use api_shared::ErrorRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Errors returned by REST handlers, rendered as `{"error": "..."}` bodies.
#[derive(Debug)]
pub enum ApiError {
    /// No usable session: missing token, unknown token, or rejected credentials.
    Unauthorized(&'static str),
    /// A session exists but lacks the required capability.
    Forbidden(String),
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::Unauthorized(message) => message.to_string(),
            ApiError::Forbidden(capability) => format!("Missing capability: {capability}"),
            ApiError::Internal => "Internal error".to_string(),
        };
        (status, Json(ErrorRes { error })).into_response()
    }
}
