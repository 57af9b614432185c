//! OAuth authorization, callback, and logout handlers.
//!
//! The callback is a straight-line sequence of enumerable terminal
//! states ([`CallbackError`]) rather than nested branching: every
//! failure becomes a redirect to the error surface with a reason
//! string, never a crash.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use ethchess_lichess::{LichessError, PkcePair};

use crate::config::{HOME_PATH, LANDING_PATH};
use crate::error::{Result, ServerError};
use crate::session::{self, Session, SessionUser};
use crate::state::AppState;

/// `GET /authorize` — generate a fresh PKCE pair, stash the verifier
/// in a short-lived cookie, and redirect to the provider.
pub async fn authorize(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    state
        .lichess
        .config()
        .validate()
        .map_err(|e| ServerError::Config(e.to_string()))?;

    let pair = PkcePair::generate();
    let url = state
        .lichess
        .config()
        .authorization_url(&state.config.callback_url(), &pair.challenge);

    tracing::debug!("Redirecting to authorization endpoint");

    let jar = jar.add(session::verifier_cookie(
        pair.verifier,
        state.config.secure_cookies,
    ));
    Ok((jar, Redirect::to(&url)))
}

/// Query parameters the provider sends to the callback. `verifier` is
/// the debug fallback, honored only when enabled in the config.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
    pub verifier: Option<String>,
}

/// Terminal failure states of the callback. Each redirects to the
/// error surface carrying its reason string.
#[derive(Debug, thiserror::Error)]
enum CallbackError {
    /// The provider returned an `error` parameter.
    #[error("{0}")]
    Denied(String),

    #[error("No_authorization_code")]
    MissingCode,

    #[error("No_PKCE_verifier")]
    MissingVerifier,

    #[error("Token request failed: {0}")]
    ExchangeFailed(String),

    #[error("Userinfo request failed: {0}")]
    ProfileFailed(String),
}

/// `GET /callback` — exchange the authorization code for a token,
/// fetch the profile, and establish the session.
///
/// The verifier cookie is consumed whether the exchange succeeds or
/// not; a pending authorization is single-use.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    let cookie_verifier = session::verifier_from_jar(&jar);
    let jar = jar.remove(session::removed_verifier_cookie());

    match run_callback(&state, &params, cookie_verifier).await {
        Ok(session) => match session.to_cookie(state.config.secure_cookies) {
            Ok(cookie) => {
                tracing::info!(user = %session.user.id, "Session established");
                (jar.add(cookie), Redirect::to(LANDING_PATH))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize session");
                let target = state.config.error_redirect(&e.to_string());
                (jar, Redirect::to(&target))
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "OAuth callback failed");
            let target = state.config.error_redirect(&e.to_string());
            (jar, Redirect::to(&target))
        }
    }
}

/// The exchange itself, separated from cookie plumbing so each
/// terminal state is independently reachable.
async fn run_callback(
    state: &AppState,
    params: &CallbackParams,
    cookie_verifier: Option<String>,
) -> std::result::Result<Session, CallbackError> {
    if let Some(error) = &params.error {
        return Err(CallbackError::Denied(error.clone()));
    }

    let code = params.code.as_deref().ok_or(CallbackError::MissingCode)?;

    let verifier = match cookie_verifier {
        Some(v) => v,
        None if state.config.verifier_param_fallback => {
            let v = params
                .verifier
                .clone()
                .ok_or(CallbackError::MissingVerifier)?;
            tracing::warn!("Using verifier from query parameter (debug fallback)");
            v
        }
        None => return Err(CallbackError::MissingVerifier),
    };

    let tokens = state
        .lichess
        .exchange_code(&state.config.callback_url(), code, &verifier)
        .await
        .map_err(|e| CallbackError::ExchangeFailed(provider_body(e)))?;

    let account = state
        .lichess
        .fetch_account(&tokens.access_token)
        .await
        .map_err(|e| CallbackError::ProfileFailed(provider_body(e)))?;

    Ok(Session {
        user: SessionUser {
            id: account.id,
            name: account.username,
        },
        access_token: tokens.access_token,
    })
}

/// Upstream failures carry the provider's body verbatim; everything
/// else carries the error's own message.
fn provider_body(e: LichessError) -> String {
    match e {
        LichessError::Provider { body, .. } => body,
        other => other.to_string(),
    }
}

/// `POST /logout` — clear the session cookie and go home. Stateless;
/// no upstream call.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.add(session::cleared_session_cookie(state.config.secure_cookies));
    (jar, Redirect::to(HOME_PATH))
}
