//! HTTP server for the ethchess Lichess front-end.
//!
//! Exposes the OAuth PKCE flow (authorize, callback, logout) and the
//! authenticated action proxies (create-game, create-tournament).
//! Every handler is single-shot and stateless; the browser cookie jar
//! is the only persistent store.
//!
//! # Example
//!
//! ```ignore
//! use ethchess_lichess::{LichessClient, ProviderConfig};
//! use ethchess_server::{AppState, Server, ServerConfig};
//!
//! let provider = ProviderConfig::lichess("ethchess_app");
//! let client = LichessClient::new(provider)?;
//! let config = ServerConfig::new("http://localhost:3007");
//!
//! let server = Server::new(AppState::new(config, client));
//! server.run().await?;
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

pub use config::ServerConfig;
pub use error::{ErrorResponse, Result, ServerError};
pub use session::{Session, SessionUser};
pub use state::AppState;

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The ethchess HTTP server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server from application state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(routes::health_routes())
            .route("/authorize", get(routes::authorize))
            .route("/callback", get(routes::callback))
            .route("/logout", post(routes::logout))
            .nest("/actions", routes::action_routes())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured bind address.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        self.run_on(addr).await
    }

    /// Run the server on a specific address (useful for testing).
    pub async fn run_on(self, addr: SocketAddr) -> Result<()> {
        let router = self.router();

        info!("Starting server on {}", addr);

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }
}
