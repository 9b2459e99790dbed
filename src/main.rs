//! docker-proxy-acl
//!
//! ```text
//!                 ┌──────────────────────────────────────────────────────┐
//!                 │                    docker-proxy-acl                   │
//!   local client  │  ┌──────────┐   ┌──────────┐   ┌──────────────────┐  │
//!   ──────────────┼─▶│ listener │──▶│  http    │──▶│ routing          │  │
//!   (unix socket) │  │ 0666     │   │ server   │   │ allowlist + vX.Y │  │
//!                 │  └──────────┘   └──────────┘   └────────┬─────────┘  │
//!                 │                   404 / 400 ◀───────────┤            │
//!                 │                                          ▼            │
//!   ◀─────────────┼── status, content type, body ◀── upstream client ────┼──▶ engine socket
//!                 └──────────────────────────────────────────────────────┘
//! ```
//!
//! Exit codes: 0 after a termination signal, 1 on a runtime failure (bind,
//! serve), 2 on a configuration error.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;

use docker_proxy_acl::config::{Cli, GatewayConfig};
use docker_proxy_acl::http::HttpServer;
use docker_proxy_acl::lifecycle::{remove_socket_file, Shutdown, TerminationSignals};
use docker_proxy_acl::net::bind_unix_listener;
use docker_proxy_acl::observability::{logging, metrics};
use docker_proxy_acl::routing::AllowedSet;

#[tokio::main]
async fn main() -> ExitCode {
    let (config, allowed) = match Cli::parse().resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("[docker-proxy-acl] {e}");
            return ExitCode::from(2);
        }
    };

    logging::init_logging(&config.observability);

    match run(config, allowed).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: GatewayConfig, allowed: AllowedSet) -> Result<(), Box<dyn Error>> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        categories = %allowed.iter().map(|c| c.name()).collect::<Vec<_>>().join(","),
        "docker-proxy-acl starting"
    );

    let mut signals = TerminationSignals::install()?;

    if let Some(addr) = &config.observability.metrics_address {
        metrics::init_metrics(addr.parse()?)?;
    }

    let server = HttpServer::new(&allowed, &config.upstream);
    let listener = bind_unix_listener(&config.listener)?;
    tracing::info!(
        socket = %config.listener.socket_path.display(),
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let signal = signals.recv().await;
        tracing::info!(signal, "Caught signal, shutting down");
        signal_shutdown.trigger();
    });

    let result = server.run(listener, server_shutdown).await;

    if let Err(e) = remove_socket_file(&config.listener.socket_path) {
        tracing::warn!(
            socket = %config.listener.socket_path.display(),
            error = %e,
            "Failed to remove socket file"
        );
    }
    result?;

    tracing::info!("Shutdown complete");
    Ok(())
}
