//! ethchess - Lichess OAuth web front-end server.
//!
//! Main entry point: parses flags, initializes tracing, and runs the
//! HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ethchess_lichess::{LichessClient, ProviderConfig};
use ethchess_server::{AppState, Server, ServerConfig};

/// ethchess - Lichess OAuth web front-end server
#[derive(Parser)]
#[command(name = "ethchess")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1:3007")]
    pub bind: SocketAddr,

    /// Externally visible base URL used to build the OAuth redirect URI
    #[arg(long, env = "ETHCHESS_BASE_URL", default_value = "http://localhost:3007")]
    pub base_url: String,

    /// Lichess OAuth client id
    #[arg(long, env = "LICHESS_CLIENT_ID", default_value = "ethchess_app")]
    pub client_id: String,

    /// Production mode: mark cookies Secure (requires TLS termination)
    #[arg(long)]
    pub production: bool,

    /// Accept a `verifier` query parameter on the OAuth callback.
    /// Debug affordance; weakens PKCE, never enable in production.
    #[arg(long, conflicts_with = "production")]
    pub allow_verifier_param: bool,

    /// Directory for rotating JSON log files
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "ethchess=debug,ethchess_server=debug,ethchess_lichess=debug,info"
    } else {
        "ethchess=info,ethchess_server=info,ethchess_lichess=info,warn"
    };

    let file_appender = tracing_appender::rolling::daily(&cli.log_dir, "ethchess.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "ethchess=trace,ethchess_server=trace,ethchess_lichess=trace,info",
                )),
        )
        .init();

    let provider = ProviderConfig::lichess(cli.client_id);
    // A missing client id is fatal misconfiguration; fail before binding.
    provider
        .validate()
        .context("Lichess OAuth is misconfigured")?;

    let config = ServerConfig::new(cli.base_url)
        .with_bind_address(cli.bind)
        .with_secure_cookies(cli.production)
        .with_verifier_param_fallback(cli.allow_verifier_param);

    if cli.allow_verifier_param {
        tracing::warn!("Verifier query-parameter fallback is enabled; do not use in production");
    }

    let client = LichessClient::new(provider).context("Failed to build Lichess client")?;
    let server = Server::new(AppState::new(config, client));

    tracing::info!(addr = %server.bind_address(), "Starting ethchess server");
    server.run().await.context("Server exited with an error")?;

    Ok(())
}
