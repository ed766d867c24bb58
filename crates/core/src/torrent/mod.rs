//! Torrent result pipeline.
//!
//! Stateless stages applied to indexer rows, in order:
//!
//! 1. [`model::parse_results`] coerces heterogeneous `Size`/`quality`
//!    values and derives missing qualities from titles.
//! 2. [`filter::filter_by_content_type`] keeps movie, serial or anime rows.
//! 3. [`filter::filter_torrents`] applies quality, HDR, HEVC and season
//!    options.
//! 4. [`sort::sort_torrents`] orders by seeders, size or publish date.
//! 5. [`group::group_results`] optionally buckets by season and/or quality.
//!
//! The season fallback for series searches lives in [`season`]; the
//! indexer query parameters in [`query`].

pub mod filter;
pub mod group;
pub mod model;
pub mod quality;
pub mod query;
pub mod season;
pub mod sort;

pub use filter::{filter_by_content_type, filter_torrents, ContentType};
pub use group::{group_results, TorrentGroups};
pub use model::{parse_results, RedApiInfo, RedApiResponse, RedApiTorrent, TorrentResult};
pub use quality::extract_quality;
pub use query::{IndexerQuery, TorrentKind};
pub use season::{available_seasons, merge_season_fallback, needs_season_fallback};
pub use sort::{sort_torrents, SortBy, SortOrder};

/// Filtering, sorting and grouping options of one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TorrentSearchOptions {
    pub season: Option<i32>,
    pub quality: Vec<String>,
    pub min_quality: Option<String>,
    pub max_quality: Option<String>,
    pub exclude_qualities: Vec<String>,
    pub hdr: Option<bool>,
    pub hevc: Option<bool>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub group_by_quality: bool,
    pub group_by_season: bool,
    pub content_type: Option<ContentType>,
}

/// Content-type filter, option filter, then sort.
pub fn process(rows: Vec<TorrentResult>, options: &TorrentSearchOptions) -> Vec<TorrentResult> {
    let rows = match options.content_type {
        Some(content_type) => filter_by_content_type(rows, content_type),
        None => rows,
    };
    let mut rows = filter_torrents(rows, options);
    sort_torrents(&mut rows, options.sort_by, options.sort_order);
    rows
}
