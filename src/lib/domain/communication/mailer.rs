//! Mailer port

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

mod errors;
mod message;

pub use errors::MailerError;
pub use message::{DraftError, EmailBody, EmailDraft, OutgoingEmail};

/// Sends one email to one recipient
#[async_trait]
pub trait Mailer: Clone + Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `email` - The [`OutgoingEmail`] to send, addressed to a single recipient.
    ///
    /// # Returns
    /// The `Message-ID` of the accepted message, or a [`MailerError`]. An unconfigured
    /// mailer always returns [`MailerError::NotConfigured`].
    async fn send_email(&self, email: &OutgoingEmail) -> Result<String, MailerError>;
}

#[cfg(test)]
mock! {
    /// A mailer with scripted results
    pub Mailer {}

    impl Clone for Mailer {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl Mailer for Mailer {
        async fn send_email(&self, email: &OutgoingEmail) -> Result<String, MailerError>;
    }
}
