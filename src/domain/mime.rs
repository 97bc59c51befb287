//! Extraction of display fields from raw MIME messages.
//!
//! The capture service only sometimes fills in structured fields. When it
//! doesn't, the recipients, subject and text body are recovered from the raw
//! message instead. Every failure is reported explicitly so callers can tell
//! an absent field from a broken one.

use mailparse::{MailHeaderMap, MailParseError, ParsedMail};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MimeError {
    #[error("Malformed MIME message: {0}")]
    Malformed(#[source] MailParseError),
    #[error("Header {0} not present")]
    MissingHeader(&'static str),
    #[error("No text body part found")]
    NoBody,
    #[error("Body part could not be decoded: {0}")]
    Undecodable(#[source] MailParseError),
}

#[derive(Debug)]
pub struct MimeMessage<'a> {
    mail: ParsedMail<'a>,
}

impl<'a> MimeMessage<'a> {
    /// Parses a raw RFC 5322 message.
    ///
    /// # Errors
    /// Returns `MimeError::Malformed` if the header block cannot be parsed.
    pub fn parse(raw: &'a str) -> Result<Self, MimeError> {
        let mail = mailparse::parse_mail(raw.as_bytes()).map_err(MimeError::Malformed)?;
        Ok(Self { mail })
    }

    /// The `To` header, with encoded words decoded.
    ///
    /// # Errors
    /// Returns `MimeError::MissingHeader` if there is no usable `To` header.
    pub fn recipients(&self) -> Result<String, MimeError> {
        self.header("To")
    }

    /// The `Subject` header, with RFC 2047 encoded words decoded.
    ///
    /// # Errors
    /// Returns `MimeError::MissingHeader` if there is no usable `Subject` header.
    pub fn subject(&self) -> Result<String, MimeError> {
        self.header("Subject")
    }

    /// The first `text/plain` part, or the first `text/html` part if there is
    /// no plain alternative. Transfer encoding and charset are decoded.
    ///
    /// # Errors
    /// Returns `MimeError::NoBody` if the message has no text part and
    /// `MimeError::Undecodable` if the part's content cannot be decoded.
    pub fn text_body(&self) -> Result<String, MimeError> {
        let part = find_part(&self.mail, "text/plain")
            .or_else(|| find_part(&self.mail, "text/html"))
            .ok_or(MimeError::NoBody)?;

        let body = part.get_body().map_err(MimeError::Undecodable)?;
        let body = body.trim_end();
        if body.is_empty() {
            return Err(MimeError::NoBody);
        }
        Ok(body.to_string())
    }

    fn header(&self, name: &'static str) -> Result<String, MimeError> {
        self.mail
            .headers
            .get_first_value(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(MimeError::MissingHeader(name))
    }
}

fn find_part<'m, 'a>(mail: &'m ParsedMail<'a>, mimetype: &str) -> Option<&'m ParsedMail<'a>> {
    if mail.subparts.is_empty() {
        return mail.ctype.mimetype.eq_ignore_ascii_case(mimetype).then_some(mail);
    }
    mail.subparts.iter().find_map(|part| find_part(part, mimetype))
}
