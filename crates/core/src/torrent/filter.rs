//! Content-type and option filters.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::model::TorrentResult;
use super::quality::{meets_minimum, within_maximum};
use super::season::matches_season;
use super::TorrentSearchOptions;

static SERIAL_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(сезон|серии|series|season|эпизод)").expect("valid serial regex")
});

static ANIME_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)anime").expect("valid anime regex"));

static HDR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(hdr|dolby.vision|dv)").expect("valid hdr regex"));

static HEVC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(hevc|h\.265|x265)").expect("valid hevc regex"));

const MOVIE_TYPES: [&str; 3] = ["movie", "multfilm", "documovie"];
const SERIAL_TYPES: [&str; 4] = ["serial", "multserial", "docuserial", "tvshow"];
const ANIME_TYPES: [&str; 1] = ["anime"];

/// Indexer category of anime releases.
const ANIME_CATEGORY: &str = "TV/Anime";

/// Kind of release a search is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Movie,
    Serial,
    Anime,
}

impl ContentType {
    fn allowed_types(self) -> &'static [&'static str] {
        match self {
            ContentType::Movie => &MOVIE_TYPES,
            ContentType::Serial => &SERIAL_TYPES,
            ContentType::Anime => &ANIME_TYPES,
        }
    }

    /// Title/category heuristic for rows without type metadata.
    fn matches_title(self, row: &TorrentResult) -> bool {
        match self {
            ContentType::Movie => !SERIAL_TITLE_RE.is_match(&row.title),
            ContentType::Serial => SERIAL_TITLE_RE.is_match(&row.title),
            ContentType::Anime => {
                row.category == ANIME_CATEGORY || ANIME_TITLE_RE.is_match(&row.title)
            }
        }
    }
}

impl FromStr for ContentType {
    type Err = ();

    /// `movie`, `serial` (also `series`/`tv`) or `anime`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(ContentType::Movie),
            "serial" | "series" | "tv" => Ok(ContentType::Serial),
            "anime" => Ok(ContentType::Anime),
            _ => Err(()),
        }
    }
}

/// Keep rows of the requested kind.
///
/// Rows with `types` metadata are checked against a per-kind allow-list;
/// others fall back to title heuristics.
pub fn filter_by_content_type(
    rows: Vec<TorrentResult>,
    content_type: ContentType,
) -> Vec<TorrentResult> {
    let allowed = content_type.allowed_types();
    rows.into_iter()
        .filter(|row| {
            if row.types.is_empty() {
                content_type.matches_title(row)
            } else {
                row.types.iter().any(|t| allowed.contains(&t.as_str()))
            }
        })
        .collect()
}

/// Apply quality, HDR, HEVC and season options.
pub fn filter_torrents(rows: Vec<TorrentResult>, options: &TorrentSearchOptions) -> Vec<TorrentResult> {
    rows.into_iter().filter(|row| keep(row, options)).collect()
}

fn keep(row: &TorrentResult, options: &TorrentSearchOptions) -> bool {
    if !options.quality.is_empty() && !contains_ignore_case(&options.quality, &row.quality) {
        return false;
    }
    if let Some(min) = options.min_quality.as_deref().filter(|m| !m.is_empty()) {
        if !meets_minimum(&row.quality, min) {
            return false;
        }
    }
    if let Some(max) = options.max_quality.as_deref().filter(|m| !m.is_empty()) {
        if !within_maximum(&row.quality, max) {
            return false;
        }
    }
    if contains_ignore_case(&options.exclude_qualities, &row.quality) {
        return false;
    }
    if let Some(hdr) = options.hdr {
        if HDR_RE.is_match(&row.title) != hdr {
            return false;
        }
    }
    if let Some(hevc) = options.hevc {
        if HEVC_RE.is_match(&row.title) != hevc {
            return false;
        }
    }
    if let Some(season) = options.season {
        if !matches_season(row, season) {
            return false;
        }
    }
    true
}

fn contains_ignore_case(set: &[String], value: &str) -> bool {
    let value = value.to_lowercase();
    set.iter().any(|s| s.trim().to_lowercase() == value)
}
