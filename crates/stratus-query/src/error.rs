//! Error types for the read path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use stratus_storage::StoreError;
use thiserror::Error;

/// Read path error
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("no datatype provided")]
    MissingType,

    #[error("missing area_id")]
    MissingArea,

    #[error("incomplete date")]
    IncompleteDate,

    #[error("{0}")]
    InvalidFilter(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Read path result type
pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    /// Whether the error was raised before touching the store
    pub fn is_validation(&self) -> bool {
        !matches!(self, QueryError::Store(_))
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        // Store failures are reported to the client the same way as bad input.
        let status = StatusCode::BAD_REQUEST;

        let body = Json(json!({
            "status": "failed",
            "result": [],
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
