use crate::api::AppState;
use crate::domain::stats::StatisticsSnapshot;
use crate::error::Result;
use axum::{Json, extract::State};

/// Returns the current quota and send statistics as one snapshot.
///
/// # Errors
/// Returns `AppError::StatsUnavailable` if either provider query fails.
pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatisticsSnapshot>> {
    let snapshot = state.stats_service.fetch_snapshot().await?;
    Ok(Json(snapshot))
}
