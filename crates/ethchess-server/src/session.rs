//! Cookie-backed session store.
//!
//! The browser cookie jar is the only store: the verifier cookie holds
//! the pending authorization, the session cookie holds the
//! authenticated user plus bearer token. The server keeps no session
//! table. This module is the single read/write interface over the
//! cookie boundary; handlers never parse cookies themselves.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "user_session";

/// Session cookie lifetime (7 days).
pub const SESSION_MAX_AGE: time::Duration = time::Duration::days(7);

/// PKCE verifier cookie name.
pub const VERIFIER_COOKIE: &str = "lichess_verifier";

/// Verifier cookie lifetime. The pending authorization is only valid
/// for the few minutes the provider round-trip takes.
pub const VERIFIER_MAX_AGE: time::Duration = time::Duration::seconds(600);

/// The authenticated user's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
}

/// An authenticated session, serialized as the entire content of the
/// session cookie. Written once by the OAuth callback, read by every
/// authenticated request, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: SessionUser,
    pub access_token: String,
}

impl Session {
    /// Read the session from the request's cookie jar.
    ///
    /// An absent cookie or unparseable value is "no session", never an
    /// error: a garbled cookie and a logged-out browser look the same.
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        let cookie = jar.get(SESSION_COOKIE)?;
        serde_json::from_str(cookie.value()).ok()
    }

    /// Serialize into the session cookie.
    pub fn to_cookie(&self, secure: bool) -> serde_json::Result<Cookie<'static>> {
        let value = serde_json::to_string(self)?;
        Ok(Cookie::build((SESSION_COOKIE, value))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure)
            .path("/")
            .max_age(SESSION_MAX_AGE)
            .build())
    }
}

/// Cookie that clears the session: empty value, immediate expiry.
/// Written by logout whether or not a session existed.
pub fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// Cookie holding the PKCE verifier between the authorization redirect
/// and the callback.
pub fn verifier_cookie(verifier: String, secure: bool) -> Cookie<'static> {
    Cookie::build((VERIFIER_COOKIE, verifier))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .path("/")
        .max_age(VERIFIER_MAX_AGE)
        .build()
}

/// Read the pending verifier, if any.
pub fn verifier_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(VERIFIER_COOKIE).map(|c| c.value().to_string())
}

/// Cookie that removes the verifier. The callback consumes the
/// pending authorization exactly once, on success or failure.
pub fn removed_verifier_cookie() -> Cookie<'static> {
    Cookie::build(VERIFIER_COOKIE).path("/").build()
}
