//! Upload pipeline: HTML file, optional optimization passes, dispatch

use tracing::debug;

use crate::domain::{
    communication::{
        dispatch::{DispatchOutcome, DispatchService},
        email_addresses::Recipients,
        mailer::{DraftError, EmailBody, EmailDraft},
    },
    content::{HtmlDocument, HtmlOptimizer, OptimizationError, OptimizedHtml},
};

use super::{in_flight::InFlight, require_html, Action, PipelineError};

/// Where an upload draft is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadPhase {
    /// No file selected
    #[default]
    NoFile,

    /// An HTML file is the working content
    Loaded,

    /// Waiting for the optimizer
    Optimizing,

    /// The working content is the latest optimizer output
    Optimized,

    /// The last optimization failed, content and summary are unchanged
    OptimizeFailed,

    /// Waiting for the dispatch to finish
    Sending,

    /// Sent to every recipient, the draft was cleared
    Sent,

    /// At least one recipient failed, the draft was kept for a retry
    SendFailed,
}

/// An HTML template email, optionally optimized before sending
#[derive(Debug, Default)]
pub struct UploadPipeline {
    file_name: Option<String>,
    html: Option<String>,
    summary: Option<String>,
    recipient: String,
    subject: String,
    settled: UploadPhase,
    in_flight: InFlight,
}

impl UploadPipeline {
    /// Create a pipeline with no file
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase. In-flight actions take precedence, sending first.
    pub fn phase(&self) -> UploadPhase {
        if self.in_flight.is_running(Action::Send) {
            UploadPhase::Sending
        } else if self.in_flight.is_running(Action::Optimize) {
            UploadPhase::Optimizing
        } else {
            self.settled
        }
    }

    /// Whether `action` is running; a UI disables its trigger while it is
    pub fn is_busy(&self, action: Action) -> bool {
        self.in_flight.is_running(action)
    }

    /// The loaded file's name
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// The working HTML
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// Summary of the last successful optimization
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// The raw recipient field
    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    /// The subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Replace the recipient field
    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.recipient = recipient.into();
    }

    /// Replace the subject
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    /// The first `limit` characters of the working HTML, with `...` when cut
    pub fn preview(&self, limit: usize) -> Option<String> {
        self.html.as_deref().map(|html| {
            let mut chars = html.chars();
            let head: String = chars.by_ref().take(limit).collect();

            if chars.next().is_some() {
                format!("{head}...")
            } else {
                head
            }
        })
    }

    /// Select a file. A non-HTML file clears the pipeline back to [`UploadPhase::NoFile`]
    /// and is reported as a validation error.
    pub fn load_file(
        &mut self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<(), PipelineError> {
        self.in_flight.ensure_idle(&[Action::Optimize, Action::Send])?;

        match HtmlDocument::from_upload(file_name, content_type, bytes) {
            Ok(document) => {
                let (file_name, content) = document.into_parts();

                debug!(?file_name, bytes = content.len(), "HTML file loaded");

                self.file_name = file_name;
                self.html = Some(content);
                self.summary = None;
                self.settled = UploadPhase::Loaded;

                Ok(())
            }
            Err(err) => {
                self.file_name = None;
                self.html = None;
                self.summary = None;
                self.settled = UploadPhase::NoFile;

                Err(err.into())
            }
        }
    }

    /// Start optimizing. Refused while a send is running.
    ///
    /// # Returns
    /// The current working HTML, which may already be a previous optimizer output.
    pub fn begin_optimize(&mut self) -> Result<String, PipelineError> {
        self.in_flight.ensure_idle(&[Action::Optimize, Action::Send])?;

        let html = require_html(self.html.as_deref())?.to_string();

        self.in_flight.start(Action::Optimize)?;

        Ok(html)
    }

    /// Apply the optimizer's result. Success replaces the working HTML and summary;
    /// failure leaves both unchanged and is returned to the caller.
    pub fn finish_optimize(
        &mut self,
        result: Result<OptimizedHtml, OptimizationError>,
    ) -> Result<(), PipelineError> {
        self.in_flight.finish(Action::Optimize)?;

        match result {
            Ok(optimized) => {
                self.html = Some(optimized.optimized_html);
                self.summary = Some(optimized.optimization_summary);
                self.settled = UploadPhase::Optimized;

                Ok(())
            }
            Err(err) => {
                debug!("optimization failed: {err}");

                self.settled = UploadPhase::OptimizeFailed;

                Err(err.into())
            }
        }
    }

    /// Optimize the working HTML with `optimizer`. May be repeated.
    pub async fn optimize<O: HtmlOptimizer>(&mut self, optimizer: &O) -> Result<(), PipelineError> {
        let html = self.begin_optimize()?;
        let result = optimizer.optimize_html(&html).await;

        self.finish_optimize(result)
    }

    /// Validate the form and start sending. Refused while an optimization is running,
    /// since its result would replace the HTML being sent.
    ///
    /// # Returns
    /// The recipients and the HTML-only draft to dispatch.
    pub fn begin_send(&mut self) -> Result<(Recipients, EmailDraft), PipelineError> {
        self.in_flight.ensure_idle(&[Action::Send, Action::Optimize])?;

        let recipients = Recipients::parse(&self.recipient)?;

        if self.subject.trim().is_empty() {
            return Err(DraftError::EmptySubject.into());
        }

        let html = require_html(self.html.as_deref())?.to_string();
        let draft = EmailDraft::new(&self.subject, EmailBody::Html(html))?;

        self.in_flight.start(Action::Send)?;

        Ok((recipients, draft))
    }

    /// Apply a dispatch outcome: full success clears everything, anything else keeps it
    pub fn finish_send(&mut self, outcome: &DispatchOutcome) -> Result<(), PipelineError> {
        self.in_flight.finish(Action::Send)?;

        if outcome.is_success() {
            self.file_name = None;
            self.html = None;
            self.summary = None;
            self.recipient.clear();
            self.subject.clear();
            self.settled = UploadPhase::Sent;
        } else {
            debug!("{}", outcome.summary());

            self.settled = UploadPhase::SendFailed;
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
