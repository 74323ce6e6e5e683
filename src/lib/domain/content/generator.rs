//! Email content generator port

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use super::GenerationError;

/// Subject, title and body produced from a prompt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedContent {
    /// The email subject
    pub subject: String,

    /// A headline for the email, informational only
    pub title: String,

    /// The plain text body
    pub body: String,
}

/// Generates email content from a short prompt
#[async_trait]
pub trait EmailContentGenerator: Clone + Send + Sync + 'static {
    /// Generates a subject, title and body.
    ///
    /// # Arguments
    /// * `prompt` - A non-empty description of the email to write.
    ///
    /// # Returns
    /// The [`GeneratedContent`], or a [`GenerationError`] describing the backend failure.
    async fn generate_email_content(&self, prompt: &str)
        -> Result<GeneratedContent, GenerationError>;
}

#[cfg(test)]
mock! {
    /// A generator with scripted results
    pub EmailContentGenerator {}

    impl Clone for EmailContentGenerator {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl EmailContentGenerator for EmailContentGenerator {
        async fn generate_email_content(&self, prompt: &str) -> Result<GeneratedContent, GenerationError>;
    }
}
