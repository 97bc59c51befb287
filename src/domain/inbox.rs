use crate::domain::mime::{MimeError, MimeMessage};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const NOT_AVAILABLE: &str = "N/A";
pub const BODY_DECODE_ERROR: &str = "Error decoding body";

/// A message as recorded by the capture service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InboxMessage {
    pub id: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<MessageBody>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<String>,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Destination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_addresses: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub text_part: Option<String>,
    #[serde(default)]
    pub html_part: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::NewestFirst => Self::OldestFirst,
            Self::OldestFirst => Self::NewestFirst,
        }
    }
}

impl InboxMessage {
    #[must_use]
    pub fn sent_at(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.timestamp, &Rfc3339).ok()
    }

    fn raw(&self) -> Option<Result<MimeMessage<'_>, MimeError>> {
        self.raw_data.as_deref().map(MimeMessage::parse)
    }

    /// Structured recipients if present, otherwise the raw `To` header.
    #[must_use]
    pub fn display_recipients(&self) -> String {
        let structured = self.destination.as_ref().and_then(|d| d.to_addresses.as_ref());
        if let Some(to) = structured.filter(|to| !to.is_empty()) {
            return to.join(", ");
        }
        match self.raw() {
            Some(Ok(mime)) => mime.recipients().unwrap_or_else(|e| self.not_available("recipients", &e)),
            Some(Err(e)) => self.not_available("recipients", &e),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    #[must_use]
    pub fn display_subject(&self) -> String {
        if let Some(subject) = self.subject.as_ref().filter(|s| !s.is_empty()) {
            return subject.clone();
        }
        match self.raw() {
            Some(Ok(mime)) => mime.subject().unwrap_or_else(|e| self.not_available("subject", &e)),
            Some(Err(e)) => self.not_available("subject", &e),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    #[must_use]
    pub fn display_body(&self) -> String {
        if let Some(body) = &self.body {
            let present = |part: &Option<String>| part.as_ref().filter(|p| !p.is_empty()).cloned();
            if let Some(text) = present(&body.text_part).or_else(|| present(&body.html_part)) {
                return text;
            }
        }
        match self.raw() {
            Some(Ok(mime)) => match mime.text_body() {
                Ok(text) => text,
                Err(e @ MimeError::Undecodable(_)) => {
                    tracing::warn!(message_id = %self.id, error = %e, "Failed to decode message body");
                    BODY_DECODE_ERROR.to_string()
                }
                Err(e) => self.not_available("body", &e),
            },
            Some(Err(e)) => self.not_available("body", &e),
            None => NOT_AVAILABLE.to_string(),
        }
    }

    fn not_available(&self, field: &'static str, error: &MimeError) -> String {
        tracing::debug!(message_id = %self.id, field, error = %error, "Raw message fallback found nothing");
        NOT_AVAILABLE.to_string()
    }
}

/// Display fields derived from an `InboxMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxView {
    pub id: String,
    pub short_id: String,
    pub recipients: String,
    pub source: String,
    pub subject: String,
    pub body: String,
    pub timestamp: String,
    #[serde(skip)]
    pub sent_at: Option<OffsetDateTime>,
}

impl From<&InboxMessage> for InboxView {
    fn from(message: &InboxMessage) -> Self {
        Self {
            id: message.id.clone(),
            short_id: message.id.chars().take(8).collect(),
            recipients: message.display_recipients(),
            source: message.source.clone(),
            subject: message.display_subject(),
            body: message.display_body(),
            timestamp: message.timestamp.clone(),
            sent_at: message.sent_at(),
        }
    }
}

/// Sorts by send time. Messages with an unparseable timestamp go last.
pub fn sort_views(views: &mut [InboxView], order: SortOrder) {
    views.sort_by(|a, b| match (a.sent_at, b.sent_at) {
        (Some(x), Some(y)) => match order {
            SortOrder::NewestFirst => y.cmp(&x),
            SortOrder::OldestFirst => x.cmp(&y),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
