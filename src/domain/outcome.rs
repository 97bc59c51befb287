use crate::domain::message::SimulationDirective;
use serde::Serialize;

pub const SIMULATED_BOUNCE: &str = "Simulated bounce";
pub const SIMULATED_COMPLAINT: &str = "Email sent, but simulated complaint received";
pub const SIMULATED_REJECT: &str = "Simulated reject";
pub const SEND_FAILED: &str = "Failed to send email";

/// The client-visible result of one send request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationOutcome {
    Delivered { message_id: String },
    SimulatedBounce { message_id: String },
    SimulatedComplaint { message_id: String },
    SimulatedReject { message_id: String },
    TransmissionFailed,
}

/// JSON body returned for an outcome. Absent fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// Maps a directive and the provider's answer onto the reported outcome.
///
/// A failed dispatch always yields `TransmissionFailed`; the directive is
/// only consulted once the provider has accepted the message.
#[must_use]
pub fn classify<E>(directive: SimulationDirective, dispatch: &Result<String, E>) -> SimulationOutcome {
    let Ok(message_id) = dispatch else {
        return SimulationOutcome::TransmissionFailed;
    };
    let message_id = message_id.clone();

    match directive {
        SimulationDirective::None => SimulationOutcome::Delivered { message_id },
        SimulationDirective::Bounce => SimulationOutcome::SimulatedBounce { message_id },
        SimulationDirective::Complaint => SimulationOutcome::SimulatedComplaint { message_id },
        SimulationDirective::Reject => SimulationOutcome::SimulatedReject { message_id },
    }
}

impl SimulationOutcome {
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Delivered { .. } | Self::SimulatedComplaint { .. } => 200,
            Self::SimulatedBounce { .. } => 400,
            Self::SimulatedReject { .. } => 403,
            Self::TransmissionFailed => 500,
        }
    }

    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        match self {
            Self::Delivered { message_id }
            | Self::SimulatedBounce { message_id }
            | Self::SimulatedComplaint { message_id }
            | Self::SimulatedReject { message_id } => Some(message_id),
            Self::TransmissionFailed => None,
        }
    }

    /// Short label used for logs and metric attributes.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Delivered { .. } => "delivered",
            Self::SimulatedBounce { .. } => "simulated_bounce",
            Self::SimulatedComplaint { .. } => "simulated_complaint",
            Self::SimulatedReject { .. } => "simulated_reject",
            Self::TransmissionFailed => "transmission_failed",
        }
    }

    #[must_use]
    pub fn body(&self) -> OutcomeBody {
        let (error, message) = match self {
            Self::Delivered { .. } => (None, None),
            Self::SimulatedBounce { .. } => (Some(SIMULATED_BOUNCE), None),
            Self::SimulatedComplaint { .. } => (None, Some(SIMULATED_COMPLAINT)),
            Self::SimulatedReject { .. } => (Some(SIMULATED_REJECT), None),
            Self::TransmissionFailed => (Some(SEND_FAILED), None),
        };
        OutcomeBody { error, message, message_id: self.message_id().map(str::to_owned) }
    }
}
