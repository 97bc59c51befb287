use serde::{Deserialize, Serialize};
use std::fmt;

/// Which delivery outcome the caller wants reported for a send.
///
/// The directive never changes what is transmitted; it only relabels the
/// response once the provider has accepted the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationDirective {
    #[default]
    None,
    Bounce,
    Complaint,
    Reject,
}

impl SimulationDirective {
    /// Parses a client-supplied label. Unknown labels fall back to `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "bounce" => Self::Bounce,
            "complaint" => Self::Complaint,
            "reject" => Self::Reject,
            _ => Self::None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bounce => "bounce",
            Self::Complaint => "complaint",
            Self::Reject => "reject",
        }
    }
}

impl From<Option<&str>> for SimulationDirective {
    fn from(label: Option<&str>) -> Self {
        label.map_or(Self::None, Self::from_label)
    }
}

impl fmt::Display for SimulationDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub directive: SimulationDirective,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(SimulationDirective::from_label("bounce"), SimulationDirective::Bounce);
        assert_eq!(SimulationDirective::from_label("complaint"), SimulationDirective::Complaint);
        assert_eq!(SimulationDirective::from_label("reject"), SimulationDirective::Reject);
        assert_eq!(SimulationDirective::from_label("none"), SimulationDirective::None);
    }

    #[test]
    fn test_labels_are_case_insensitive() {
        assert_eq!(SimulationDirective::from_label("Bounce"), SimulationDirective::Bounce);
        assert_eq!(SimulationDirective::from_label(" REJECT "), SimulationDirective::Reject);
    }

    #[test]
    fn test_unknown_label_falls_back_to_none() {
        assert_eq!(SimulationDirective::from_label("delivery"), SimulationDirective::None);
        assert_eq!(SimulationDirective::from_label(""), SimulationDirective::None);
        assert_eq!(SimulationDirective::from(None), SimulationDirective::None);
    }
}
