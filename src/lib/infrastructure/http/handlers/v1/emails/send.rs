//! Send email handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        communication::{
            dispatch::{DispatchOutcome, DispatchService, RecipientOutcome, SendStatus},
            email_addresses::Recipients,
            mailer::EmailDraft,
        },
        content::{EmailContentGenerator, HtmlOptimizer},
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Send email request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailBody {
    /// One or more comma separated email addresses
    #[schema(example = "a@example.com, b@example.com")]
    pub recipient: String,

    /// The subject line
    #[schema(example = "Big News")]
    pub subject: String,

    /// The plain text body
    #[schema(example = "We launched.")]
    #[serde(default)]
    pub text_body: Option<String>,

    /// The HTML body
    #[schema(example = "<h1>We launched.</h1>")]
    #[serde(default)]
    pub html_body: Option<String>,
}

/// Per-recipient result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecipientResult {
    /// The recipient address
    #[schema(example = "a@example.com")]
    pub recipient: String,

    /// Whether the message was accepted for this recipient
    pub sent: bool,

    /// The `Message-ID` of the accepted message
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message_id: Option<String>,

    /// Why the send failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl From<&RecipientOutcome> for RecipientResult {
    fn from(outcome: &RecipientOutcome) -> Self {
        let (message_id, error) = match &outcome.status {
            SendStatus::Sent { message_id } => (Some(message_id.clone()), None),
            SendStatus::Failed { error } => (None, Some(error.clone())),
        };

        Self {
            recipient: outcome.recipient.to_string(),
            sent: outcome.is_sent(),
            message_id,
            error,
        }
    }
}

/// Send email response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailResponse {
    /// True only when every recipient was sent to
    pub success: bool,

    /// Human readable summary
    #[schema(example = "Email sent successfully to a@example.com, b@example.com.")]
    pub message: String,

    /// Number of recipients the message was accepted for
    pub sent_count: usize,

    /// One entry per recipient, in the order they were given
    pub results: Vec<RecipientResult>,
}

impl From<&DispatchOutcome> for SendEmailResponse {
    fn from(outcome: &DispatchOutcome) -> Self {
        Self {
            success: outcome.is_success(),
            message: outcome.summary(),
            sent_count: outcome.sent_count(),
            results: outcome.results().iter().map(RecipientResult::from).collect(),
        }
    }
}

/// Send an email to one or more recipients, one message each
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Emails",
    path = "/api/v1/emails",
    request_body = SendEmailBody,
    responses(
        (status = StatusCode::OK, description = "Sent to every recipient", body = SendEmailResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Invalid recipients, subject or body", body = ErrorResponse),
        (status = StatusCode::BAD_GATEWAY, description = "One or more sends failed", body = SendEmailResponse),
    )
)]
pub async fn handler<D, G, O>(
    State(state): State<AppState<D, G, O>>,
    request: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<(StatusCode, Json<SendEmailResponse>), ApiError>
where
    D: DispatchService,
    G: EmailContentGenerator,
    O: HtmlOptimizer,
{
    let Json(request) = request?;

    let recipients = Recipients::parse(&request.recipient)?;
    let draft = EmailDraft::from_parts(&request.subject, request.text_body, request.html_body)?;

    let outcome = state.dispatcher.dispatch(&recipients, &draft).await;

    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    Ok((status, Json(SendEmailResponse::from(&outcome))))
}
