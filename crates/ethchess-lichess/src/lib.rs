//! Lichess OAuth 2.0 PKCE adapter and API client.
//!
//! Everything Lichess-specific lives in this crate: endpoint URLs, the
//! scope string, the token-exchange body format, and the profile field
//! names. The server crate stays provider-agnostic and can be pointed
//! at a fake provider by overriding the endpoint URLs in
//! [`ProviderConfig`].
//!
//! # Components
//!
//! - [`pkce`] — verifier/challenge generation
//! - [`provider`] — endpoint configuration and authorization URL building
//! - [`client`] — token exchange, account fetch, challenge/tournament creation

pub mod client;
pub mod error;
pub mod pkce;
pub mod provider;

pub use client::{
    Account, ChallengeClock, LichessClient, OpenChallengeRequest, TokenResponse, TournamentRequest,
};
pub use error::{LichessError, Result};
pub use pkce::{PkcePair, challenge_for};
pub use provider::ProviderConfig;
