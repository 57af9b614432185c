//! Route handlers.

pub mod actions;
pub mod auth;
pub mod health;

pub use actions::{
    CreateGameRequest, CreateGameResponse, CreateTournamentRequest, CreateTournamentResponse,
    action_routes,
};
pub use auth::{authorize, callback, logout};
pub use health::health_routes;
