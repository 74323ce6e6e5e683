//! SMTP mailer implementation

use std::fmt;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use clap::{ArgAction, Parser};
use lettre::{
    message::{Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::communication::mailer::{EmailBody, Mailer, MailerError, OutgoingEmail};

/// SMTP configuration
#[derive(Clone, Debug, Parser)]
pub struct SmtpConfig {
    /// The SMTP host
    #[arg(
        id = "smtp_host",
        long = "smtp-host",
        env = "SMTP_HOST",
        default_value = "smtp.zoho.com"
    )]
    pub host: String,

    /// The SMTP port
    #[arg(
        id = "smtp_port",
        long = "smtp-port",
        env = "SMTP_PORT",
        default_value = "465"
    )]
    pub port: u16,

    /// Connect with implicit TLS; when false the connection is upgraded with STARTTLS
    #[arg(
        id = "smtp_secure",
        long = "smtp-secure",
        env = "SMTP_SECURE",
        default_value = "true",
        action = ArgAction::Set
    )]
    pub secure: bool,

    /// The SMTP username
    #[arg(id = "smtp_user", long = "smtp-user", env = "SMTP_USER")]
    pub username: Option<String>,

    /// The SMTP password
    #[arg(
        id = "smtp_password",
        long = "smtp-password",
        env = "SMTP_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// The sender email address, defaults to the SMTP username
    #[arg(id = "smtp_sender", long = "smtp-sender", env = "SMTP_SENDER")]
    pub sender: Option<String>,

    /// The sender display name
    #[arg(id = "smtp_sender_name", long = "smtp-sender-name", env = "SMTP_SENDER_NAME")]
    pub sender_name: Option<String>,

    /// Verify the TLS certificate
    #[arg(
        id = "smtp_verify_tls",
        long = "smtp-verify-tls",
        env = "SMTP_VERIFY_TLS",
        default_value = "true",
        action = ArgAction::Set
    )]
    pub verify_tls: bool,
}

#[derive(Clone)]
enum Connection {
    Ready {
        transport: AsyncSmtpTransport<Tokio1Executor>,
        sender: Mailbox,
    },
    Unconfigured(String),
}

/// SMTP mailer.
///
/// Built once at start-up. Without credentials every send fails with
/// [`MailerError::NotConfigured`] and no connection is ever attempted.
#[derive(Clone)]
pub struct SmtpMailer {
    connection: Connection,
}

impl SmtpMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SmtpConfig) -> Self {
        let connection = match connect(&config) {
            Ok(connection) => {
                debug!(host = %config.host, port = config.port, "SMTP mailer configured");
                connection
            }
            Err(err) => {
                let reason = format!("{err:#}");
                warn!("{reason}. Email sending will be disabled.");
                Connection::Unconfigured(reason)
            }
        };

        Self { connection }
    }

    /// Whether sends will reach the SMTP server
    pub fn is_configured(&self) -> bool {
        matches!(self.connection, Connection::Ready { .. })
    }
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.connection {
            Connection::Ready { sender, .. } => f
                .debug_struct("SmtpMailer")
                .field("sender", &sender.to_string())
                .finish(),
            Connection::Unconfigured(reason) => f
                .debug_struct("SmtpMailer")
                .field("unconfigured", reason)
                .finish(),
        }
    }
}

fn connect(config: &SmtpConfig) -> Result<Connection> {
    let username = non_blank(&config.username);
    let password = non_blank(&config.password);

    let (Some(username), Some(password)) = (username, password) else {
        return Err(anyhow!(
            "SMTP credentials (SMTP_USER, SMTP_PASSWORD) are not set"
        ));
    };

    let address = non_blank(&config.sender).unwrap_or(username);
    let sender = Mailbox::new(
        non_blank(&config.sender_name).map(str::to_string),
        address
            .parse()
            .with_context(|| format!("invalid sender address \"{address}\""))?,
    );

    let tls_parameters = TlsParameters::builder(config.host.clone())
        .dangerous_accept_invalid_certs(!config.verify_tls)
        .build()
        .context("invalid TLS parameters")?;

    let tls = if config.secure {
        Tls::Wrapper(tls_parameters)
    } else {
        Tls::Required(tls_parameters)
    };

    let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str())
        .port(config.port)
        .tls(tls)
        .credentials(Credentials::new(username.to_string(), password.to_string()))
        .build();

    Ok(Connection::Ready { transport, sender })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn build_message(sender: &Mailbox, email: &OutgoingEmail) -> Result<(String, Message), MailerError> {
    let message_id = format!("<{}@{}>", Uuid::now_v7(), sender.email.domain());

    let builder = Message::builder()
        .from(sender.clone())
        .to(email.to.as_str().parse()?)
        .subject(email.subject.clone())
        .message_id(Some(message_id.clone()));

    let message = match &email.body {
        EmailBody::Text(text) => builder.singlepart(SinglePart::plain(text.clone()))?,
        EmailBody::Html(html) => builder.singlepart(SinglePart::html(html.clone()))?,
        EmailBody::Alternative { text, html } => builder.multipart(
            MultiPart::alternative_plain_html(text.clone(), html.clone()),
        )?,
    };

    Ok((message_id, message))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_email(&self, email: &OutgoingEmail) -> Result<String, MailerError> {
        let (transport, sender) = match &self.connection {
            Connection::Ready { transport, sender } => (transport, sender),
            Connection::Unconfigured(reason) => {
                return Err(MailerError::NotConfigured(reason.clone()))
            }
        };

        let (message_id, message) = build_message(sender, email)?;

        match transport.send(message).await {
            Ok(_) => Ok(message_id),
            Err(e) => Err(MailerError::SendError(e.to_string())),
        }
    }
}
