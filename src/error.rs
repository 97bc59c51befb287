use crate::services::inbox_service::QueryError;
use crate::services::stats_service::StatsError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    StatsUnavailable(#[from] StatsError),
    #[error(transparent)]
    QueryUnavailable(QueryError),
    #[error("Reset failed: {0}")]
    ResetFailed(QueryError),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        Self::QueryUnavailable(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => {
                tracing::debug!(message = %msg, "Bad request");
                (StatusCode::BAD_REQUEST, msg)
            }
            Self::StatsUnavailable(e) => {
                tracing::error!(error = %e, "Error fetching SES statistics");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch SES statistics".to_string())
            }
            Self::QueryUnavailable(e) => {
                tracing::error!(error = %e, "Error fetching SES messages");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch SES messages".to_string())
            }
            Self::ResetFailed(e) => {
                tracing::error!(error = %e, "Error resetting statistics");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to reset statistics".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
