//! Request-scoped orchestration shared by several handlers.
//!
//! - [`catalog`] -- Catalog routing, TMDB/Kinopoisk fetches and enrichment.
//! - [`torrents`] -- Indexer queries, IMDb title lookup and the season fallback.

pub mod catalog;
pub mod torrents;
