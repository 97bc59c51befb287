use crate::api::AppState;
use crate::api::dto::messages::MessagesQuery;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;

/// Relays the capture service's message listing, optionally filtered by address.
///
/// # Errors
/// Returns `AppError::QueryUnavailable` if the capture service cannot be reached.
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse> {
    let relayed = state.inbox_service.list_messages(query.email.as_deref()).await?;
    Ok((relayed.status, Json(relayed.body)))
}

/// Clears the messages recorded by the capture service.
///
/// # Errors
/// Returns `AppError::ResetFailed` if the capture service refuses.
pub async fn reset_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    state.inbox_service.reset().await.map_err(AppError::ResetFailed)?;
    Ok(Json(json!({ "status": "ok" })))
}
