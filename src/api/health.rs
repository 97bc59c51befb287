use crate::api::MgmtState;
use crate::api::dto::health::HealthResponse;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

const OK: &str = "ok";
const ERROR: &str = "error";

/// Liveness probe: returns 200 OK as long as the server is running.
pub async fn livez() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe: the provider must answer a quota query and the capture
/// service a listing. Either failing makes the whole probe 503.
pub async fn readyz(State(state): State<MgmtState>) -> impl IntoResponse {
    let (provider, capture) =
        tokio::join!(state.health_service.check_provider(), state.health_service.check_capture());

    let provider = component_status("provider", provider);
    let capture = component_status("capture", capture);
    let ready = provider == OK && capture == OK;

    let response = HealthResponse {
        status: if ready { OK } else { ERROR }.to_string(),
        provider: provider.to_string(),
        capture: capture.to_string(),
    };
    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (status_code, Json(response))
}

fn component_status(component: &'static str, result: Result<(), String>) -> &'static str {
    match result {
        Ok(()) => OK,
        Err(e) => {
            tracing::warn!(error = %e, component, "Readiness probe failed");
            ERROR
        }
    }
}
