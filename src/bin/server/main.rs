#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for composing and sending emails

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use email_composer::{
    domain::communication::dispatch::DispatchServiceImpl,
    infrastructure::{
        ai::{
            gemini::{GeminiClient, GeminiConfig},
            ConfiguredOptimizer, OptimizerKind,
        },
        email::smtp::{SmtpConfig, SmtpMailer},
        http::{server::ApiServer, state::AppState, HttpServerConfig},
    },
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// The Gemini configuration
    #[clap(flatten)]
    pub gemini: GeminiConfig,

    /// Which backend optimizes uploaded HTML
    #[arg(long, env = "HTML_OPTIMIZER", value_enum, default_value_t = OptimizerKind::Ai)]
    pub html_optimizer: OptimizerKind,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install the rustls crypto provider"))?;

    let args = Args::parse();

    let mailer = Arc::new(SmtpMailer::new(args.smtp));
    let gemini = GeminiClient::new(args.gemini)?;
    let optimizer = ConfiguredOptimizer::select(args.html_optimizer, &gemini);

    info!(
        smtp = mailer.is_configured(),
        gemini = gemini.is_configured(),
        optimizer = ?args.html_optimizer,
        "starting"
    );

    let state = AppState::new(DispatchServiceImpl::new(mailer), gemini, optimizer);

    ApiServer::new(args.server, state).await?.run().await
}
