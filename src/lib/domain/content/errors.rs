//! Errors raised by the content backends

use thiserror::Error;

/// Errors that can occur when generating email content
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The backend has no credentials
    #[error("Content generation is not configured: {0}")]
    NotConfigured(String),

    /// The backend failed or could not be reached
    #[error("Failed to generate email content: {0}")]
    Backend(String),

    /// The backend answered with something that is not the expected content
    #[error("Generated content was malformed: {0}")]
    MalformedResponse(String),
}

/// Errors that can occur when optimizing HTML
#[derive(Debug, Error)]
pub enum OptimizationError {
    /// The backend has no credentials
    #[error("HTML optimization is not configured: {0}")]
    NotConfigured(String),

    /// The backend failed or could not be reached
    #[error("Failed to optimize HTML: {0}")]
    Backend(String),

    /// The backend answered with something that is not optimized HTML
    #[error("Optimized HTML was malformed: {0}")]
    MalformedResponse(String),
}
