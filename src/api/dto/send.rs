use crate::domain::message::{OutgoingMessage, SimulationDirective};
use crate::domain::outcome::SimulationOutcome;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub simulation_type: Option<String>,
}

impl From<SendEmailRequest> for OutgoingMessage {
    fn from(req: SendEmailRequest) -> Self {
        Self {
            directive: SimulationDirective::from(req.simulation_type.as_deref()),
            recipient: req.to,
            subject: req.subject,
            body: req.message,
        }
    }
}

impl IntoResponse for SimulationOutcome {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body())).into_response()
    }
}
