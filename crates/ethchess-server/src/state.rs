//! Application state shared across handlers.

use std::sync::Arc;

use ethchess_lichess::LichessClient;

use crate::config::ServerConfig;

/// Application state shared across all handlers.
///
/// Everything here is read-only after startup; there is no shared
/// mutable state between requests. The browser cookie jar holds all
/// per-user state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// Provider client (token exchange, account, actions).
    pub lichess: Arc<LichessClient>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(config: ServerConfig, lichess: LichessClient) -> Self {
        Self {
            config: Arc::new(config),
            lichess: Arc::new(lichess),
        }
    }
}
