//! HTTP client for the Lichess token, account, and action endpoints.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LichessError, Result};
use crate::provider::ProviderConfig;

/// Bounded timeout per outbound call. Expiry is treated as an
/// upstream failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tokens returned from the authorization-code exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// The authenticated user's profile, as returned by the account
/// endpoint. Lichess reports the display name as `username`.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    grant_type: &'a str,
    redirect_uri: &'a str,
    client_id: &'a str,
    code: &'a str,
    code_verifier: &'a str,
}

/// Parameters for an open challenge, already translated to the
/// upstream representation (clock limit in seconds).
#[derive(Debug, Serialize)]
pub struct OpenChallengeRequest {
    pub clock: ChallengeClock,
    pub color: String,
    pub variant: String,
}

#[derive(Debug, Serialize)]
pub struct ChallengeClock {
    /// Initial clock in seconds.
    pub limit: u32,
    /// Increment in seconds.
    pub increment: u32,
}

/// Parameters for tournament creation. The tournament endpoint takes
/// form-urlencoded fields with camelCase names.
#[derive(Debug, Serialize)]
pub struct TournamentRequest {
    pub name: String,
    #[serde(rename = "clockTime")]
    pub clock_time: f64,
    #[serde(rename = "clockIncrement")]
    pub clock_increment: u32,
    pub minutes: u32,
    #[serde(rename = "waitMinutes")]
    pub wait_minutes: u32,
    pub variant: String,
}

/// Client for the provider's token and API endpoints.
#[derive(Debug, Clone)]
pub struct LichessClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

impl LichessClient {
    /// Create a client with a bounded per-request timeout.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LichessError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// The provider configuration this client was built with.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Exchange an authorization code plus verifier for an access token.
    ///
    /// `redirect_uri` must be byte-identical to the one sent in the
    /// authorization request. Replayed codes fail upstream (codes are
    /// single-use) and surface as [`LichessError::Provider`].
    pub async fn exchange_code(
        &self,
        redirect_uri: &str,
        code: &str,
        verifier: &str,
    ) -> Result<TokenResponse> {
        let body = TokenExchangeRequest {
            grant_type: "authorization_code",
            redirect_uri,
            client_id: &self.config.client_id,
            code,
            code_verifier: verifier,
        };

        let response = self
            .http
            .post(&self.config.token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LichessError::Network(format!("Token exchange request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token exchange failed");
            return Err(LichessError::Provider {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| LichessError::InvalidResponse(format!("Bad token response: {}", e)))
    }

    /// Fetch the authenticated user's account with a bearer token.
    pub async fn fetch_account(&self, access_token: &str) -> Result<Account> {
        let response = self
            .http
            .get(&self.config.account_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| LichessError::Network(format!("Account request failed: {}", e)))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(LichessError::Provider {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| LichessError::InvalidResponse(format!("Bad account response: {}", e)))
    }

    /// Create an open challenge on the user's behalf. Returns the raw
    /// upstream payload.
    pub async fn create_open_challenge(
        &self,
        access_token: &str,
        request: &OpenChallengeRequest,
    ) -> Result<serde_json::Value> {
        let response = self
            .http
            .post(&self.config.challenge_url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| LichessError::Network(format!("Challenge request failed: {}", e)))?;

        Self::json_or_provider_error(response).await
    }

    /// Create a tournament on the user's behalf. The upstream endpoint
    /// takes form-urlencoded fields. Returns the raw upstream payload.
    pub async fn create_tournament(
        &self,
        access_token: &str,
        request: &TournamentRequest,
    ) -> Result<serde_json::Value> {
        let response = self
            .http
            .post(&self.config.tournament_url)
            .bearer_auth(access_token)
            .form(request)
            .send()
            .await
            .map_err(|e| LichessError::Network(format!("Tournament request failed: {}", e)))?;

        Self::json_or_provider_error(response).await
    }

    async fn json_or_provider_error(response: reqwest::Response) -> Result<serde_json::Value> {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Upstream action failed");
            return Err(LichessError::Provider {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text)
            .map_err(|e| LichessError::InvalidResponse(format!("Bad upstream response: {}", e)))
    }
}
