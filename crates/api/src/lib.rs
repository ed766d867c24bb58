//! NeoMovies HTTP API.
//!
//! The binary in `main.rs` wires [`config::ServerConfig`] into an
//! [`state::AppState`] and serves [`router::build_app_router`]. Integration
//! tests build the same router against fake upstreams.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
