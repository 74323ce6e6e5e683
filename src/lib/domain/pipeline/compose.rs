//! Compose pipeline: prompt, generated content, edits, dispatch

use tracing::debug;

use crate::domain::{
    communication::{
        dispatch::{DispatchOutcome, DispatchService},
        email_addresses::Recipients,
        mailer::{EmailBody, EmailDraft},
    },
    content::{EmailContentGenerator, GeneratedContent, GenerationError},
};

use super::{in_flight::InFlight, require_prompt, Action, PipelineError};

/// Where a compose draft is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComposePhase {
    /// Nothing has happened yet
    #[default]
    Empty,

    /// Waiting for the generator
    Generating,

    /// Subject and body were filled in from the generator
    Generated,

    /// The last generation failed, fields were left untouched
    GenerationFailed,

    /// The user changed the subject or body
    Editing,

    /// Waiting for the dispatch to finish
    Sending,

    /// Sent to every recipient, the draft was cleared
    Sent,

    /// At least one recipient failed, the draft was kept for a retry
    SendFailed,
}

/// A plain text email drafted from an optional AI-generated starting point
#[derive(Debug, Default)]
pub struct ComposePipeline {
    prompt: String,
    subject: String,
    body: String,
    recipient: String,
    last_title: Option<String>,
    settled: ComposePhase,
    in_flight: InFlight,
}

impl ComposePipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase. In-flight actions take precedence, sending first.
    pub fn phase(&self) -> ComposePhase {
        if self.in_flight.is_running(Action::Send) {
            ComposePhase::Sending
        } else if self.in_flight.is_running(Action::Generate) {
            ComposePhase::Generating
        } else {
            self.settled
        }
    }

    /// Whether `action` is running; a UI disables its trigger while it is
    pub fn is_busy(&self, action: Action) -> bool {
        self.in_flight.is_running(action)
    }

    /// The generation prompt
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The plain text body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// The raw recipient field
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// The title of the last generated content, for display
    pub fn last_title(&self) -> Option<&str> {
        self.last_title.as_deref()
    }

    /// Replace the prompt
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Replace the recipient field
    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.recipient = recipient.into();
    }

    /// Edit the subject, allowed at any time
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
        self.settled = ComposePhase::Editing;
    }

    /// Edit the body, allowed at any time
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.settled = ComposePhase::Editing;
    }

    /// Start generating. Fails without any state change if the prompt is blank or a
    /// send is running.
    ///
    /// # Returns
    /// The prompt to hand to the generator.
    pub fn begin_generate(&mut self) -> Result<String, PipelineError> {
        self.in_flight.ensure_idle(&[Action::Generate, Action::Send])?;

        let prompt = require_prompt(&self.prompt)?.to_string();

        self.in_flight.start(Action::Generate)?;

        Ok(prompt)
    }

    /// Apply the generator's result. Success overwrites subject and body; failure leaves
    /// every field untouched and is returned to the caller.
    pub fn finish_generate(
        &mut self,
        result: Result<GeneratedContent, GenerationError>,
    ) -> Result<(), PipelineError> {
        self.in_flight.finish(Action::Generate)?;

        match result {
            Ok(content) => {
                debug!(title = %content.title, "generated content applied");

                self.subject = content.subject;
                self.body = content.body;
                self.last_title = Some(content.title);
                self.settled = ComposePhase::Generated;

                Ok(())
            }
            Err(err) => {
                debug!("generation failed: {err}");

                self.settled = ComposePhase::GenerationFailed;

                Err(err.into())
            }
        }
    }

    /// Generate subject and body with `generator`
    pub async fn generate<G: EmailContentGenerator>(
        &mut self,
        generator: &G,
    ) -> Result<(), PipelineError> {
        let prompt = self.begin_generate()?;
        let result = generator.generate_email_content(&prompt).await;

        self.finish_generate(result)
    }

    /// Validate the form and start sending. Refused while a generation is running, since
    /// its result would land on the draft being sent.
    ///
    /// # Returns
    /// The recipients and the text-only draft to dispatch.
    pub fn begin_send(&mut self) -> Result<(Recipients, EmailDraft), PipelineError> {
        self.in_flight.ensure_idle(&[Action::Send, Action::Generate])?;

        let recipients = Recipients::parse(&self.recipient)?;
        let draft = EmailDraft::new(&self.subject, EmailBody::Text(self.body.clone()))?;

        self.in_flight.start(Action::Send)?;

        Ok((recipients, draft))
    }

    /// Apply a dispatch outcome: full success clears the draft, anything else keeps it
    pub fn finish_send(&mut self, outcome: &DispatchOutcome) -> Result<(), PipelineError> {
        self.in_flight.finish(Action::Send)?;

        if outcome.is_success() {
            self.prompt.clear();
            self.subject.clear();
            self.body.clear();
            self.recipient.clear();
            self.last_title = None;
            self.settled = ComposePhase::Sent;
        } else {
            debug!("{}", outcome.summary());

            self.settled = ComposePhase::SendFailed;
        }

        Ok(())
    }

    /// Validate, dispatch and apply the outcome
    pub async fn submit<D: DispatchService>(
        &mut self,
        dispatcher: &D,
    ) -> Result<DispatchOutcome, PipelineError> {
        let (recipients, draft) = self.begin_send()?;
        let outcome = dispatcher.dispatch(&recipients, &draft).await;

        self.finish_send(&outcome)?;

        Ok(outcome)
    }
}
