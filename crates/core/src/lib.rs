//! NeoMovies domain core.
//!
//! Pure, I/O-free building blocks shared by the provider clients and the
//! HTTP layer:
//!
//! - [`model`]: the unified content model returned by the API.
//! - [`tmdb`] / [`kinopoisk`]: upstream catalog payloads, decoded
//!   permissively via [`flexible`].
//! - [`mapping`]: deterministic upstream → unified mappers.
//! - [`source`]: language normalization and catalog selection.
//! - [`images`]: image-proxy URL construction and upstream URL resolution.
//! - [`torrent`]: the torrent result pipeline with quality ladder, filters and grouping.

pub mod error;
pub mod flexible;
pub mod images;
pub mod kinopoisk;
pub mod mapping;
pub mod model;
pub mod source;
pub mod tmdb;
pub mod torrent;
pub mod types;
