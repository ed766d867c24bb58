//! Request extractors that gate handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::RequestMeta`] -- Client user agent and IP, recorded on refresh tokens.

pub mod auth;
