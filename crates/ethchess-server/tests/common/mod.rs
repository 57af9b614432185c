//! Common test utilities: a fake Lichess provider and a server harness.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use reqwest::Client;
use tokio::net::TcpListener;
use tokio::time::sleep;

use ethchess_lichess::{LichessClient, ProviderConfig};
use ethchess_server::{AppState, Server, ServerConfig};

/// Access token the fake provider hands out for a good code.
pub const TEST_TOKEN: &str = "lio_test_token";

/// Token whose account lookup fails (provider knows it, profile
/// endpoint rejects it).
pub const BAD_PROFILE_TOKEN: &str = "lio_bad_profile";

/// Token the challenge endpoint rate-limits.
pub const LIMITED_TOKEN: &str = "lio_limited";

/// Per-endpoint request counters, for asserting that unauthenticated
/// proxy calls never reach upstream.
#[derive(Default)]
pub struct MockCounters {
    pub token: AtomicUsize,
    pub account: AtomicUsize,
    pub challenge: AtomicUsize,
    pub tournament: AtomicUsize,
}

#[derive(Default)]
struct MockState {
    counters: Arc<MockCounters>,
    /// Authorization codes already exchanged; codes are single-use.
    used_codes: Mutex<HashSet<String>>,
}

/// A fake Lichess running on an ephemeral local port.
pub struct MockProvider {
    pub addr: SocketAddr,
    pub counters: Arc<MockCounters>,
}

impl MockProvider {
    pub async fn start() -> Result<Self> {
        let counters = Arc::new(MockCounters::default());
        let state = Arc::new(MockState {
            counters: counters.clone(),
            used_codes: Mutex::new(HashSet::new()),
        });

        let router = Router::new()
            .route("/api/token", post(token))
            .route("/api/account", get(account))
            .route("/api/challenge/open", post(challenge))
            .route("/api/tournament", post(tournament))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Ok(Self { addr, counters })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn token(
    State(state): State<Arc<MockState>>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.counters.token.fetch_add(1, Ordering::SeqCst);

    if body.get("grant_type").and_then(|v| v.as_str()) != Some("authorization_code") {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "unsupported_grant_type"})),
        );
    }

    let code = body
        .get("code")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    if code == "bad-code" || !state.used_codes.lock().unwrap().insert(code.clone()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "invalid_grant"})),
        );
    }

    let access_token = if code == "profile-fail" {
        BAD_PROFILE_TOKEN
    } else {
        TEST_TOKEN
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3600,
        })),
    )
}

async fn account(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<serde_json::Value>) {
    state.counters.account.fetch_add(1, Ordering::SeqCst);

    match bearer(&headers) {
        Some(TEST_TOKEN) => (
            StatusCode::OK,
            Json(serde_json::json!({"id": "thibault", "username": "Thibault"})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "No such token"})),
        ),
    }
}

async fn challenge(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(_body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.counters.challenge.fetch_add(1, Ordering::SeqCst);

    match bearer(&headers) {
        Some(LIMITED_TOKEN) => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({"error": "rate limited"})),
        ),
        Some(TEST_TOKEN) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "id": "abcd1234",
                "url": "https://lichess.org/abcd1234",
            })),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "No such token"})),
        ),
    }
}

async fn tournament(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.counters.tournament.fetch_add(1, Ordering::SeqCst);

    if bearer(&headers) != Some(TEST_TOKEN) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({"error": "No such token"})),
        );
    }
    if !form.contains_key("name") || !form.contains_key("clockTime") {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "missing fields"})),
        );
    }

    // Deliberately no "url" field, to exercise the default.
    (StatusCode::OK, Json(serde_json::json!({"id": "tour5678"})))
}

/// The real server under test, pointed at a [`MockProvider`].
pub struct TestServer {
    pub addr: SocketAddr,
    /// Client with redirects disabled so Location and Set-Cookie
    /// headers can be asserted on directly.
    pub client: Client,
}

impl TestServer {
    pub async fn start(provider: &MockProvider) -> Result<Self> {
        Self::start_with(provider, |config| config).await
    }

    pub async fn start_with(
        provider: &MockProvider,
        configure: impl FnOnce(ServerConfig) -> ServerConfig,
    ) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let config = configure(
            ServerConfig::new(format!("http://{}", addr)).with_bind_address(addr),
        );
        let provider_config =
            ProviderConfig::lichess("ethchess_app").with_api_base(&provider.base_url());
        let state = AppState::new(config, LichessClient::new(provider_config)?);
        let router = Server::new(state).router();

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(5))
            .build()?;

        let server = Self { addr, client };
        server.wait_ready().await?;
        Ok(server)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn wait_ready(&self) -> Result<()> {
        for _ in 0..50 {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            sleep(Duration::from_millis(10)).await;
        }
        anyhow::bail!("server did not become ready")
    }
}

/// Pull a named cookie's value out of a response's Set-Cookie headers.
pub fn set_cookie_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| {
            let pair = raw.split(';').next()?;
            let (n, v) = pair.split_once('=')?;
            (n == name).then(|| v.to_string())
        })
}

/// The full Set-Cookie header line for a named cookie, attributes
/// included.
pub fn set_cookie_line(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|raw| raw.starts_with(&format!("{}=", name)))
        .map(str::to_string)
}

/// The Location header of a redirect response.
pub fn location(response: &reqwest::Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}
