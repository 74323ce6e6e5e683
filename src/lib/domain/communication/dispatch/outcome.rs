//! Dispatch outcome

use crate::domain::communication::email_addresses::EmailAddress;

/// The result of a single per-recipient send
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SendStatus {
    /// Accepted by the SMTP server
    Sent {
        /// The `Message-ID` of the accepted message
        message_id: String,
    },

    /// Not sent
    Failed {
        /// Why the send failed
        error: String,
    },
}

/// What happened for one recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientOutcome {
    /// The recipient
    pub recipient: EmailAddress,

    /// The send result
    pub status: SendStatus,
}

impl RecipientOutcome {
    /// Whether the message was accepted for this recipient
    pub fn is_sent(&self) -> bool {
        matches!(self.status, SendStatus::Sent { .. })
    }
}

/// Aggregated result of one dispatch, one entry per recipient in input order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchOutcome {
    results: Vec<RecipientOutcome>,
}

impl DispatchOutcome {
    /// Create a new outcome
    pub fn new(results: Vec<RecipientOutcome>) -> Self {
        Self { results }
    }

    /// Per-recipient results
    pub fn results(&self) -> &[RecipientOutcome] {
        &self.results
    }

    /// True only when every recipient was sent to
    pub fn is_success(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(RecipientOutcome::is_sent)
    }

    /// Number of recipients the message was accepted for
    pub fn sent_count(&self) -> usize {
        self.results.iter().filter(|result| result.is_sent()).count()
    }

    /// The failed recipients with their reasons
    pub fn failures(&self) -> impl Iterator<Item = (&EmailAddress, &str)> {
        self.results.iter().filter_map(|result| match &result.status {
            SendStatus::Failed { error } => Some((&result.recipient, error.as_str())),
            SendStatus::Sent { .. } => None,
        })
    }

    /// A one-line, human readable summary
    pub fn summary(&self) -> String {
        if self.is_success() {
            let recipients = self
                .results
                .iter()
                .map(|result| result.recipient.as_str())
                .collect::<Vec<_>>()
                .join(", ");

            return format!("Email sent successfully to {recipients}.");
        }

        let failed = self
            .failures()
            .map(|(recipient, error)| format!("{recipient} ({error})"))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Sent to {} of {} recipients; failed: {failed}",
            self.sent_count(),
            self.results.len()
        )
    }
}
