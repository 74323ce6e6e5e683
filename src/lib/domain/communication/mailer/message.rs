//! Email message

use thiserror::Error;

use crate::domain::communication::email_addresses::EmailAddress;

/// Errors that can occur when building a draft
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    /// The subject is blank
    #[error("Subject is required.")]
    EmptySubject,

    /// The body is blank
    #[error("Body is required.")]
    EmptyBody,
}

/// The content of an email. At least one of plain text or HTML is always present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailBody {
    /// Plain text only
    Text(String),

    /// HTML only
    Html(String),

    /// Both, sent as `multipart/alternative`
    Alternative {
        /// The plain text version
        text: String,
        /// The HTML version
        html: String,
    },
}

impl EmailBody {
    /// Build a body from optional parts, treating blank parts as absent
    pub fn from_parts(text: Option<String>, html: Option<String>) -> Option<Self> {
        let text = text.filter(|text| !text.trim().is_empty());
        let html = html.filter(|html| !html.trim().is_empty());

        match (text, html) {
            (Some(text), Some(html)) => Some(Self::Alternative { text, html }),
            (Some(text), None) => Some(Self::Text(text)),
            (None, Some(html)) => Some(Self::Html(html)),
            (None, None) => None,
        }
    }

    /// The plain text part, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Alternative { text, .. } => Some(text),
            Self::Html(_) => None,
        }
    }

    /// The HTML part, if any
    pub fn html(&self) -> Option<&str> {
        match self {
            Self::Html(html) | Self::Alternative { html, .. } => Some(html),
            Self::Text(_) => None,
        }
    }

    fn is_blank(&self) -> bool {
        self.text().map_or(true, |text| text.trim().is_empty())
            && self.html().map_or(true, |html| html.trim().is_empty())
    }
}

/// A subject and body ready to be dispatched
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailDraft {
    subject: String,
    body: EmailBody,
}

impl EmailDraft {
    /// Create a new draft, rejecting a blank subject or body
    pub fn new(subject: &str, body: EmailBody) -> Result<Self, DraftError> {
        if subject.trim().is_empty() {
            return Err(DraftError::EmptySubject);
        }

        if body.is_blank() {
            return Err(DraftError::EmptyBody);
        }

        Ok(Self {
            subject: subject.to_string(),
            body,
        })
    }

    /// Create a new draft from optional text and HTML parts
    pub fn from_parts(
        subject: &str,
        text: Option<String>,
        html: Option<String>,
    ) -> Result<Self, DraftError> {
        if subject.trim().is_empty() {
            return Err(DraftError::EmptySubject);
        }

        let body = EmailBody::from_parts(text, html).ok_or(DraftError::EmptyBody)?;

        Self::new(subject, body)
    }

    /// The subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The body
    pub fn body(&self) -> &EmailBody {
        &self.body
    }
}

/// A single email addressed to exactly one recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// The recipient of the email
    pub to: EmailAddress,

    /// The subject of the email
    pub subject: String,

    /// The body of the email
    pub body: EmailBody,
}

impl OutgoingEmail {
    /// Address a draft to one recipient
    pub fn new(to: EmailAddress, draft: &EmailDraft) -> Self {
        Self {
            to,
            subject: draft.subject.clone(),
            body: draft.body.clone(),
        }
    }
}
