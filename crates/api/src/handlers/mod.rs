//! Request handlers, one submodule per resource.
//!
//! Catalog handlers (`movies`, `tv`, `search`, `categories`) answer with the
//! unified envelope; the rest use the legacy `{ success, data, message }`
//! shape. Errors are mapped via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod categories;
pub mod docs;
pub mod favorites;
pub mod images;
pub mod movies;
pub mod players;
pub mod reactions;
pub mod search;
pub mod torrents;
pub mod tv;
pub mod webtorrent;
