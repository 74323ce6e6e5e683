//! Pipeline errors

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::domain::{
    communication::{email_addresses::RecipientsError, mailer::DraftError},
    content::{GenerationError, OptimizationError, UploadError},
};

/// A user-triggered pipeline action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Generate content from the prompt
    Generate,

    /// Optimize the working HTML
    Optimize,

    /// Send the draft
    Send,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Generate => write!(f, "content generation"),
            Action::Optimize => write!(f, "HTML optimization"),
            Action::Send => write!(f, "sending"),
        }
    }
}

/// Input problems caught before any collaborator is called
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Generation was requested without a prompt
    #[error("Please enter a prompt to generate content from.")]
    EmptyPrompt,

    /// The recipient field is empty or invalid
    #[error(transparent)]
    Recipients(#[from] RecipientsError),

    /// The subject or body is missing
    #[error(transparent)]
    Draft(#[from] DraftError),

    /// There is no HTML to optimize or send
    #[error("Please upload an HTML file first.")]
    NoHtmlContent,

    /// The selected file was rejected
    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl ValidationError {
    /// The form field the error belongs to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyPrompt => "prompt",
            ValidationError::Recipients(_) => "recipient",
            ValidationError::Draft(DraftError::EmptySubject) => "subject",
            ValidationError::Draft(DraftError::EmptyBody) => "body",
            ValidationError::NoHtmlContent | ValidationError::Upload(_) => "html_file",
        }
    }
}

/// Errors returned by pipeline actions
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Invalid input, nothing was attempted
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The action, or one that conflicts with it, is already running
    #[error("{0} is already in progress")]
    ActionInProgress(Action),

    /// A result was delivered for an action that was never started
    #[error("{0} was not started")]
    NotStarted(Action),

    /// The generator failed
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The optimizer failed
    #[error(transparent)]
    Optimization(#[from] OptimizationError),
}

impl From<RecipientsError> for PipelineError {
    fn from(err: RecipientsError) -> Self {
        debug!("RecipientsError -> PipelineError");

        PipelineError::Validation(err.into())
    }
}

impl From<DraftError> for PipelineError {
    fn from(err: DraftError) -> Self {
        debug!("DraftError -> PipelineError");

        PipelineError::Validation(err.into())
    }
}

impl From<UploadError> for PipelineError {
    fn from(err: UploadError) -> Self {
        debug!("UploadError -> PipelineError");

        PipelineError::Validation(err.into())
    }
}
