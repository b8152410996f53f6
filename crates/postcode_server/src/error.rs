//! Server error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use postcode_api::response as res;
use std::fmt::Display;

pub type ApiResult<T> = Result<T, ApiError>;

pub enum ApiError {
    /// The request was malformed, 400.
    Validation(String),
    /// Nothing matched the request, 404.
    NotFound(String),
    /// The store failed, 500. The details are logged and not shown to the client.
    Upstream(eyre::Report),
}

impl ApiError {
    pub fn validation(message: impl Display) -> Self {
        Self::Validation(message.to_string())
    }

    pub fn not_found(message: impl Display) -> Self {
        Self::NotFound(message.to_string())
    }
}

impl<E> From<E> for ApiError
where
    E: Into<eyre::Error>,
{
    fn from(value: E) -> Self {
        Self::Upstream(value.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Upstream(err) => {
                tracing::error!("Store error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(res::Error { error })).into_response()
    }
}
