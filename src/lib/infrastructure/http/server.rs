//! The application's API server, over plain HTTP or HTTPS

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use axum::Router;
use axum_server::{tls_rustls::RustlsConfig, Handle};
use tracing::info;

use crate::{
    domain::{
        communication::dispatch::DispatchService,
        content::{EmailContentGenerator, HtmlOptimizer},
    },
    infrastructure::http::{router, shutdown_signal, state::AppState, HttpServerConfig},
};

/// The application's API server
#[derive(Debug)]
pub struct ApiServer {
    router: Router,
    address: SocketAddr,
    tls_config: Option<RustlsConfig>,
}

impl ApiServer {
    /// Returns a new server for `state`, using TLS when a certificate and key are configured
    pub async fn new<D, G, O>(config: HttpServerConfig, state: AppState<D, G, O>) -> Result<Self>
    where
        D: DispatchService,
        G: EmailContentGenerator,
        O: HtmlOptimizer,
    {
        let tls_config = match (&config.cert_path, &config.key_path) {
            (Some(cert_path), Some(key_path)) => Some(
                RustlsConfig::from_pem_file(cert_path, key_path)
                    .await
                    .context("failed to load TLS config")?,
            ),
            _ => None,
        };

        Ok(Self {
            router: router(state),
            address: SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port)),
            tls_config,
        })
    }

    /// Runs the server until a shutdown signal arrives.
    #[mutants::skip]
    pub async fn run(self) -> Result<()> {
        let handle = Handle::new();

        tokio::spawn(shutdown_signal(handle.clone()));

        let service = self.router.into_make_service();

        match self.tls_config {
            Some(tls_config) => {
                info!("HTTPS server listening on {}", self.address);

                axum_server::bind_rustls(self.address, tls_config)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("server error")?;
            }
            None => {
                info!("HTTP server listening on {}", self.address);

                axum_server::bind(self.address)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("server error")?;
            }
        }

        info!("server stopped");

        Ok(())
    }
}
