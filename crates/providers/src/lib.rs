//! HTTP clients for every upstream NeoMovies talks to.
//!
//! Each client owns a `reqwest::Client` with its own timeout and maps
//! upstream failures onto [`ProviderError`]. Clients never decide policy
//! (fallbacks, caching, envelopes); that lives in the API crate.
//!
//! - [`tmdb`] / [`kinopoisk`]: catalog sources.
//! - [`players`]: embeddable players and direct-stream resolvers.
//! - [`redapi`]: the torrent indexer aggregator.
//! - [`cub`]: public reaction counters.
//! - [`images`]: upstream fetcher behind the image proxy.
//! - [`google`]: OAuth sign-in.

pub mod cub;
pub mod error;
pub mod google;
pub mod images;
pub mod kinopoisk;
pub mod players;
pub mod redapi;
pub mod tmdb;

pub use error::{ProviderError, ProviderResult};
