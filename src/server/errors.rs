//! HTTP error responses

use crate::server::dto::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Errors a handler can answer with
///
/// Every variant renders as `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request was malformed or failed validation
    BadRequest(String),

    /// The body was not declared as `application/json`
    UnsupportedMediaType(String),

    /// The client used up its request quota
    TooManyRequests,

    /// The crawl itself could not complete
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            Self::BadRequest(message)
            | Self::UnsupportedMediaType(message)
            | Self::Internal(message) => message,
            Self::TooManyRequests => "too many requests".to_string(),
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}
