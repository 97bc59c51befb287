use crate::api::AppState;
use crate::api::dto::send::SendEmailRequest;
use crate::domain::outcome::SimulationOutcome;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

/// Sends a test email and reports the outcome selected by `simulationType`.
///
/// # Errors
/// Returns `AppError::BadRequest` if the body is not a valid send request.
/// Provider failures are not errors here; they are reported as the
/// `TransmissionFailed` outcome.
pub async fn send_email(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<SimulationOutcome> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    if request.to.trim().is_empty() {
        return Err(AppError::BadRequest("Recipient address is required".into()));
    }

    Ok(state.dispatch_service.send(request.into()).await)
}
