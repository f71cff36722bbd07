use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::response::ErrorResponse;

/// Failure taxonomy shared by services and handlers.
///
/// The sandbox adapter absorbs its own transport failures (fail-open);
/// everything else propagates one of these variants to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No customer, account, loan, or graph matched the query.
    #[error("{0}")]
    NotFound(String),

    /// The request itself was malformed (bad index, missing field).
    #[error("{0}")]
    InvalidInput(String),

    /// Transport-level failure talking to an external service.
    #[error("upstream service unavailable: {0}")]
    Upstream(String),

    /// A payload parsed but did not match the expected shape.
    #[error("schema mismatch: {0}")]
    Schema(String),

    /// No parsing tier recovered a usable analysis. Carries a bounded
    /// preview of the raw model text for diagnostics.
    #[error("failed to extract analysis from response: {0}")]
    Extraction(String),

    /// The graph store is not configured or unreachable.
    #[error("graph store unavailable")]
    StoreUnavailable,

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::Upstream(_) | ServiceError::StoreUnavailable => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServiceError::Schema(_) | ServiceError::Extraction(_) | ServiceError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
