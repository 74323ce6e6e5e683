//! Mailer errors

use lettre::{address::AddressError, error::Error};
use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// The transport has no usable configuration, nothing was sent
    #[error("Email service is not configured: {0}")]
    NotConfigured(String),

    /// Invalid email address
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    /// The SMTP server rejected the message or the connection failed
    #[error("Failed to send email: {0}")]
    SendError(String),

    /// Unknown error
    #[error(transparent)]
    UnknownError(anyhow::Error),
}

impl From<anyhow::Error> for MailerError {
    fn from(err: anyhow::Error) -> Self {
        MailerError::UnknownError(err)
    }
}

impl From<AddressError> for MailerError {
    fn from(err: AddressError) -> Self {
        MailerError::InvalidEmail(err.to_string())
    }
}

impl From<Error> for MailerError {
    fn from(err: Error) -> Self {
        MailerError::UnknownError(err.into())
    }
}
