//! Dispatch service

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{error, info, warn};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::{
    email_addresses::Recipients,
    mailer::{EmailDraft, Mailer, OutgoingEmail},
};

use super::{DispatchOutcome, RecipientOutcome, SendStatus};

/// Dispatch service
#[async_trait]
pub trait DispatchService: Clone + Send + Sync + 'static {
    /// Sends a draft to every recipient.
    ///
    /// # Arguments
    /// * `recipients` - The validated [`Recipients`].
    /// * `draft` - The [`EmailDraft`] every recipient receives.
    ///
    /// # Returns
    /// A [`DispatchOutcome`] with one entry per recipient. Failures never abort the
    /// other sends and are reported in the outcome rather than as an error.
    async fn dispatch(&self, recipients: &Recipients, draft: &EmailDraft) -> DispatchOutcome;
}

#[cfg(test)]
mock! {
    /// A dispatcher with scripted outcomes
    pub DispatchService {}

    impl Clone for DispatchService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl DispatchService for DispatchService {
        async fn dispatch(&self, recipients: &Recipients, draft: &EmailDraft) -> DispatchOutcome;
    }
}

/// Dispatch service implementation
#[derive(Debug, Clone)]
pub struct DispatchServiceImpl<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
}

impl<M> DispatchServiceImpl<M>
where
    M: Mailer,
{
    /// Create a new dispatch service
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl<M> DispatchService for DispatchServiceImpl<M>
where
    M: Mailer,
{
    async fn dispatch(&self, recipients: &Recipients, draft: &EmailDraft) -> DispatchOutcome {
        // One task per recipient: the sends run concurrently and a panicking transport
        // only takes down its own task.
        let sends = recipients
            .iter()
            .map(|recipient| {
                let mailer = Arc::clone(&self.mailer);
                let email = OutgoingEmail::new(recipient.clone(), draft);

                tokio::spawn(async move { mailer.send_email(&email).await })
            })
            .collect::<Vec<_>>();

        let results = join_all(sends)
            .await
            .into_iter()
            .zip(recipients)
            .map(|(joined, recipient)| {
                let status = match joined {
                    Ok(Ok(message_id)) => {
                        info!(%recipient, %message_id, "email sent");
                        SendStatus::Sent { message_id }
                    }
                    Ok(Err(err)) => {
                        warn!(%recipient, "email not sent: {err}");
                        SendStatus::Failed {
                            error: err.to_string(),
                        }
                    }
                    Err(err) => {
                        error!(%recipient, "email send task failed: {err}");
                        SendStatus::Failed {
                            error: format!("Unexpected transport failure: {err}"),
                        }
                    }
                };

                RecipientOutcome {
                    recipient: recipient.clone(),
                    status,
                }
            })
            .collect();

        let outcome = DispatchOutcome::new(results);

        info!(
            sent = outcome.sent_count(),
            total = recipients.len(),
            "dispatch finished"
        );

        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Barrier;

    use crate::domain::communication::mailer::{tests::MockMailer, EmailBody, MailerError};

    use super::*;

    fn draft() -> EmailDraft {
        EmailDraft::new("Big News", EmailBody::Text("We launched.".to_string()))
            .expect("valid draft")
    }

    #[tokio::test]
    async fn test_dispatch_sends_once_per_distinct_recipient() -> testresult::TestResult {
        let recipients = Recipients::parse("a@x.com, b@y.com, A@x.com")?;

        let mut mailer = MockMailer::new();

        for address in ["a@x.com", "b@y.com"] {
            mailer
                .expect_send_email()
                .times(1)
                .withf(move |email| {
                    email.to.as_str() == address
                        && email.subject == "Big News"
                        && email.body == EmailBody::Text("We launched.".to_string())
                })
                .returning(|email| Ok(format!("<id@{}>", email.to)));
        }

        let service = DispatchServiceImpl::new(Arc::new(mailer));

        let outcome = service.dispatch(&recipients, &draft()).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.results().len(), 2);
        assert_eq!(
            outcome.results()[0].status,
            SendStatus::Sent {
                message_id: "<id@a@x.com>".to_string()
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_dispatch_reports_partial_failure() -> testresult::TestResult {
        let recipients = Recipients::parse("a@x.com, b@y.com, c@z.com")?;

        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(1)
            .withf(|email| email.to.as_str() == "b@y.com")
            .returning(|_| Err(MailerError::SendError("550 mailbox unavailable".to_string())));

        mailer
            .expect_send_email()
            .times(2)
            .withf(|email| email.to.as_str() != "b@y.com")
            .returning(|_| Ok("<id@example.com>".to_string()));

        let service = DispatchServiceImpl::new(Arc::new(mailer));

        let outcome = service.dispatch(&recipients, &draft()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.sent_count(), 2);

        let order = outcome
            .results()
            .iter()
            .map(|result| result.recipient.as_str())
            .collect::<Vec<_>>();
        assert_eq!(order, vec!["a@x.com", "b@y.com", "c@z.com"]);

        let failures = outcome.failures().collect::<Vec<_>>();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0.as_str(), "b@y.com");
        assert_eq!(
            failures[0].1,
            "Failed to send email: 550 mailbox unavailable"
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_dispatch_with_unconfigured_mailer_fails_every_recipient(
    ) -> testresult::TestResult {
        let recipients = Recipients::parse("a@x.com, b@y.com")?;

        let mut mailer = MockMailer::new();

        mailer
            .expect_send_email()
            .times(2)
            .returning(|_| Err(MailerError::NotConfigured("missing credentials".to_string())));

        let service = DispatchServiceImpl::new(Arc::new(mailer));

        let outcome = service.dispatch(&recipients, &draft()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.sent_count(), 0);
        assert_eq!(outcome.failures().count(), 2);

        Ok(())
    }

    /// Panics when sending to `poisoned`, succeeds otherwise.
    #[derive(Clone)]
    struct PanickingMailer {
        poisoned: &'static str,
    }

    #[async_trait]
    impl Mailer for PanickingMailer {
        async fn send_email(&self, email: &OutgoingEmail) -> Result<String, MailerError> {
            if email.to.as_str() == self.poisoned {
                panic!("connection reset mid-flight");
            }

            Ok(format!("<ok@{}>", email.to.domain()))
        }
    }

    #[tokio::test]
    async fn test_dispatch_treats_panicking_send_as_failure() -> testresult::TestResult {
        let recipients = Recipients::parse("a@x.com, b@y.com, c@z.com")?;

        let service = DispatchServiceImpl::new(Arc::new(PanickingMailer {
            poisoned: "b@y.com",
        }));

        let outcome = service.dispatch(&recipients, &draft()).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.sent_count(), 2);
        assert!(outcome.results()[0].is_sent());
        assert!(!outcome.results()[1].is_sent());
        assert!(outcome.results()[2].is_sent());

        Ok(())
    }

    /// Only completes once every recipient's send is in flight at the same time.
    #[derive(Clone)]
    struct RendezvousMailer {
        barrier: Arc<Barrier>,
    }

    #[async_trait]
    impl Mailer for RendezvousMailer {
        async fn send_email(&self, email: &OutgoingEmail) -> Result<String, MailerError> {
            self.barrier.wait().await;

            Ok(format!("<id@{}>", email.to.domain()))
        }
    }

    #[tokio::test]
    async fn test_dispatch_sends_concurrently() -> testresult::TestResult {
        let recipients = Recipients::parse("a@x.com, b@y.com, c@z.com")?;

        let service = DispatchServiceImpl::new(Arc::new(RendezvousMailer {
            barrier: Arc::new(Barrier::new(3)),
        }));

        let draft = draft();
        let outcome =
            tokio::time::timeout(Duration::from_secs(5), service.dispatch(&recipients, &draft))
                .await?;

        assert!(outcome.is_success());

        Ok(())
    }
}
