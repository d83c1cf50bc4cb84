use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::{AppError, ErrorResponse};
use thiserror::Error;

/// Failures of quote operations.
///
/// Every variant is reported to HTTP callers as a 500 with the error in the
/// body; callers only ever see a full payload or a failure.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Quote index is empty")]
    EmptyIndex,

    #[error("{0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Quote store unavailable: {0}")]
    StoreUnavailable(anyhow::Error),
}

impl QuoteError {
    pub fn quote_not_found() -> Self {
        QuoteError::NotFound("Quote doesn't exist.".to_string())
    }

    pub fn index_not_found() -> Self {
        QuoteError::NotFound("Quote IDs don't exist.".to_string())
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            QuoteError::EmptyIndex => "empty_index",
            QuoteError::NotFound(_) => "not_found",
            QuoteError::InvalidRequest(_) => "invalid_request",
            QuoteError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

impl From<mongodb::error::Error> for QuoteError {
    fn from(err: mongodb::error::Error) -> Self {
        QuoteError::StoreUnavailable(anyhow::Error::new(err))
    }
}

impl From<validator::ValidationErrors> for QuoteError {
    fn from(err: validator::ValidationErrors) -> Self {
        QuoteError::InvalidRequest(err.to_string())
    }
}

impl From<QuoteError> for AppError {
    fn from(err: QuoteError) -> Self {
        match err {
            QuoteError::NotFound(msg) => AppError::NotFound(anyhow::anyhow!(msg)),
            QuoteError::InvalidRequest(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            QuoteError::StoreUnavailable(e) => AppError::DatabaseError(e),
            QuoteError::EmptyIndex => AppError::InternalError(anyhow::anyhow!("Quote index is empty")),
        }
    }
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        let details = match &self {
            QuoteError::StoreUnavailable(e) => Some(format!("{:#}", e)),
            _ => Some(self.kind().to_string()),
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(self.to_string(), details)),
        )
            .into_response()
    }
}
