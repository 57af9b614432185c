//! Authenticated action proxies: create-game and create-tournament.
//!
//! Both follow the same shape: require a session, translate the
//! caller's parameters to the upstream representation, forward with
//! the bearer token, and surface upstream failures verbatim with no
//! retry.

use axum::{
    Json, Router,
    extract::State,
    routing::post,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use ethchess_lichess::{ChallengeClock, OpenChallengeRequest, TournamentRequest};

use crate::error::{Result, ServerError};
use crate::session::Session;
use crate::state::AppState;

/// Caller-facing parameters for a new casual game.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// Initial clock in minutes.
    pub time: u32,
    /// Increment in seconds.
    pub increment: u32,
    /// "white", "black", or "random".
    pub color: String,
    /// Variant key; defaults to "standard".
    pub variant: Option<String>,
}

/// Normalized payload returned after a successful challenge creation.
#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    #[serde(rename = "gameId")]
    pub game_id: String,
    pub url: String,
    /// Raw upstream challenge payload.
    pub challenge: serde_json::Value,
}

/// `POST /actions/create-game` — create an open challenge on the
/// user's behalf.
pub async fn create_game(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>> {
    let session = require_session(&jar)?;

    let upstream = OpenChallengeRequest {
        clock: ChallengeClock {
            // Caller speaks minutes, the clock API speaks seconds.
            limit: request.time * 60,
            increment: request.increment,
        },
        color: request.color,
        variant: request.variant.unwrap_or_else(|| "standard".to_string()),
    };

    let challenge = state
        .lichess
        .create_open_challenge(&session.access_token, &upstream)
        .await?;

    let game_id = required_id(&challenge, "Challenge")?;
    let url = payload_url(&challenge)
        .unwrap_or_else(|| format!("https://lichess.org/{}", game_id));

    tracing::info!(game_id = %game_id, "Challenge created");

    Ok(Json(CreateGameResponse {
        game_id,
        url,
        challenge,
    }))
}

/// Caller-facing parameters for a new arena tournament.
#[derive(Debug, Deserialize)]
pub struct CreateTournamentRequest {
    pub name: String,
    /// Initial clock in minutes (fractional values allowed, e.g. 0.5).
    #[serde(rename = "clockTime")]
    pub clock_time: f64,
    /// Increment in seconds.
    #[serde(rename = "clockIncrement")]
    pub clock_increment: u32,
    /// Tournament duration in minutes.
    pub minutes: u32,
    /// Delay before the tournament starts, in minutes.
    #[serde(rename = "waitMinutes")]
    pub wait_minutes: u32,
    /// Variant key; defaults to "standard".
    pub variant: Option<String>,
}

/// Normalized payload returned after a successful tournament creation.
#[derive(Debug, Serialize)]
pub struct CreateTournamentResponse {
    pub id: String,
    pub url: String,
    /// Raw upstream tournament payload.
    pub tournament: serde_json::Value,
}

/// `POST /actions/create-tournament` — create an arena tournament on
/// the user's behalf.
pub async fn create_tournament(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CreateTournamentRequest>,
) -> Result<Json<CreateTournamentResponse>> {
    let session = require_session(&jar)?;

    let upstream = TournamentRequest {
        name: request.name,
        clock_time: request.clock_time,
        clock_increment: request.clock_increment,
        minutes: request.minutes,
        wait_minutes: request.wait_minutes,
        variant: request.variant.unwrap_or_else(|| "standard".to_string()),
    };

    let tournament = state
        .lichess
        .create_tournament(&session.access_token, &upstream)
        .await?;

    let id = required_id(&tournament, "Tournament")?;
    let url = payload_url(&tournament)
        .unwrap_or_else(|| format!("https://lichess.org/tournament/{}", id));

    tracing::info!(tournament_id = %id, "Tournament created");

    Ok(Json(CreateTournamentResponse {
        id,
        url,
        tournament,
    }))
}

/// Session gate: no valid session means 401 and no upstream call.
fn require_session(jar: &CookieJar) -> Result<Session> {
    let session = Session::from_jar(jar)
        .ok_or_else(|| ServerError::Unauthorized("Not authenticated".to_string()))?;
    if session.access_token.is_empty() {
        return Err(ServerError::Unauthorized("Invalid session".to_string()));
    }
    Ok(session)
}

fn required_id(payload: &serde_json::Value, what: &str) -> Result<String> {
    payload
        .get("id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| ServerError::Internal(format!("{} response missing id", what)))
}

fn payload_url(payload: &serde_json::Value) -> Option<String> {
    payload
        .get("url")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Routes for the authenticated action proxies.
pub fn action_routes() -> Router<AppState> {
    Router::new()
        .route("/create-game", post(create_game))
        .route("/create-tournament", post(create_tournament))
}
