//! HTTP API

use std::time::Duration;

use axum::{extract::Request, Router};
use axum_server::Handle;
use clap::Parser;
use handlers::{panic_handler, v1};
use state::AppState;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};
use tracing::{debug, info_span};

use crate::domain::{
    communication::dispatch::DispatchService,
    content::{EmailContentGenerator, HtmlOptimizer},
};

mod errors;
mod handlers;
mod open_api;
pub mod server;
pub mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The port to listen on
    #[arg(
        id = "http_port",
        long = "http-port",
        env = "HTTP_PORT",
        default_value = "3000"
    )]
    pub port: u16,

    /// PEM certificate; serves HTTPS together with `key_path`
    #[arg(long = "tls-cert-path", env = "TLS_CERT_PATH", requires = "key_path")]
    pub cert_path: Option<String>,

    /// PEM private key
    #[arg(long = "tls-key-path", env = "TLS_KEY_PATH", requires = "cert_path")]
    pub key_path: Option<String>,
}

/// Create the application's router
pub fn router<D, G, O>(state: AppState<D, G, O>) -> Router
where
    D: DispatchService,
    G: EmailContentGenerator,
    O: HtmlOptimizer,
{
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Router::new()
        .nest("/api/v1", v1::router())
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(CompressionLayer::new())
        .layer(trace_layer)
        .with_state(state)
}

#[mutants::skip]
pub(crate) async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    debug!("shutting down gracefully");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
