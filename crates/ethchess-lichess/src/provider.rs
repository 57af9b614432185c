//! Provider endpoint configuration and authorization URL building.

use crate::error::{LichessError, Result};

/// Scopes requested for the ethchess front-end: read preferences,
/// create challenges, play over the board API, create tournaments.
pub const SCOPE: &str = "preference:read challenge:write board:play tournament:write";

/// OAuth and API endpoints for one provider.
///
/// Defaults point at lichess.org; tests override the URLs to aim the
/// client at a fake provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub authorize_url: String,
    pub token_url: String,
    pub account_url: String,
    pub challenge_url: String,
    pub tournament_url: String,
    pub scope: String,
}

impl ProviderConfig {
    /// Endpoints for lichess.org.
    pub fn lichess(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            authorize_url: "https://lichess.org/oauth".to_string(),
            token_url: "https://lichess.org/api/token".to_string(),
            account_url: "https://lichess.org/api/account".to_string(),
            challenge_url: "https://lichess.org/api/challenge/open".to_string(),
            tournament_url: "https://lichess.org/api/tournament".to_string(),
            scope: SCOPE.to_string(),
        }
    }

    /// Point every API endpoint at `base` (keeps the paths). Used to
    /// target a fake provider in tests.
    pub fn with_api_base(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.authorize_url = format!("{}/oauth", base);
        self.token_url = format!("{}/api/token", base);
        self.account_url = format!("{}/api/account", base);
        self.challenge_url = format!("{}/api/challenge/open", base);
        self.tournament_url = format!("{}/api/tournament", base);
        self
    }

    /// An empty client id is a fatal misconfiguration.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(LichessError::Config("client_id is not set".to_string()));
        }
        Ok(())
    }

    /// Build the authorization URL for the PKCE flow.
    ///
    /// `redirect_uri` must match the URL the callback is later reached
    /// at byte-for-byte; the same value is sent again during token
    /// exchange.
    pub fn authorization_url(&self, redirect_uri: &str, challenge: &str) -> String {
        let params = [
            ("response_type", "code"),
            ("client_id", &self.client_id),
            ("redirect_uri", redirect_uri),
            ("scope", &self.scope),
            ("code_challenge_method", "S256"),
            ("code_challenge", challenge),
        ];

        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.authorize_url, query)
    }
}
