//! Season detection and the series-search fallback.

use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::model::TorrentResult;

/// `S01`, `сезон 2`, `Сезон: 3` or `4 сезон`.
static SEASON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:s|сезон)[\s:]*(\d+)|(\d+)\s*сезон").expect("valid season regex")
});

/// Fewer rows than this after a season-scoped series query trigger the
/// unscoped follow-up query.
pub const SEASON_FALLBACK_THRESHOLD: usize = 5;

/// Season numbers mentioned in a title, in order of appearance.
pub fn seasons_in_title(title: &str) -> Vec<i32> {
    SEASON_RE
        .captures_iter(title)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .collect()
}

/// Whether a row belongs to `season`, by metadata or by title.
pub fn matches_season(row: &TorrentResult, season: i32) -> bool {
    row.seasons.contains(&season) || seasons_in_title(&row.title).contains(&season)
}

/// All positive seasons of a row: metadata first, then title captures.
pub fn row_seasons(row: &TorrentResult) -> BTreeSet<i32> {
    row.seasons
        .iter()
        .copied()
        .chain(seasons_in_title(&row.title))
        .filter(|s| *s > 0)
        .collect()
}

/// Whether a series search for `season` that produced `found` rows should
/// be repeated without the season parameter.
pub fn needs_season_fallback(season: Option<i32>, found: usize) -> bool {
    season.is_some() && found < SEASON_FALLBACK_THRESHOLD
}

/// Union of the season-scoped and unscoped result sets.
///
/// Rows keep first-seen order; duplicates by magnet link are dropped.
/// Rows without a magnet are kept as they come.
pub fn merge_season_fallback(
    initial: Vec<TorrentResult>,
    fallback: Vec<TorrentResult>,
) -> Vec<TorrentResult> {
    let mut seen = HashSet::new();
    initial
        .into_iter()
        .chain(fallback)
        .filter(|row| row.magnet.is_empty() || seen.insert(row.magnet.clone()))
        .collect()
}

/// Sorted unique seasons across every row.
pub fn available_seasons(rows: &[TorrentResult]) -> Vec<i32> {
    rows.iter()
        .flat_map(row_seasons)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torrent::{filter_torrents, TorrentSearchOptions};

    fn row(title: &str, magnet: &str, seasons: &[i32]) -> TorrentResult {
        TorrentResult {
            title: title.to_string(),
            magnet: magnet.to_string(),
            seasons: seasons.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn title_captures_both_forms() {
        assert_eq!(seasons_in_title("Show.S02E05.1080p"), [2]);
        assert_eq!(seasons_in_title("Сериал / Сезон: 3 / Серии 1-8"), [3]);
        assert_eq!(seasons_in_title("Сериал (4 сезон)"), [4]);
        assert!(seasons_in_title("Movie.1080p.x265").is_empty());
    }

    #[test]
    fn matches_by_metadata_or_title() {
        assert!(matches_season(&row("Show", "a", &[1, 2]), 2));
        assert!(matches_season(&row("Show.S01.WEB", "a", &[]), 1));
        assert!(!matches_season(&row("Show.S01.WEB", "a", &[]), 3));
    }

    #[test]
    fn fallback_only_for_small_season_results() {
        assert!(needs_season_fallback(Some(1), 4));
        assert!(!needs_season_fallback(Some(1), 5));
        assert!(!needs_season_fallback(None, 0));
    }

    #[test]
    fn fallback_union_dedups_and_keeps_requested_season() {
        let initial = vec![
            row("Show [1]", "a", &[1]),
            row("Show [1b]", "b", &[1]),
            row("Show [2]", "c", &[2]),
            row("Show [3]", "d", &[3]),
        ];
        let fallback = vec![
            row("Show.S01.1080p", "a", &[]),
            row("Show.S01.720p", "e", &[]),
        ];
        assert!(needs_season_fallback(Some(1), initial.len()));

        let merged = merge_season_fallback(initial, fallback);
        let options = TorrentSearchOptions {
            season: Some(1),
            ..Default::default()
        };
        let filtered = filter_torrents(merged, &options);

        let magnets: Vec<_> = filtered.iter().map(|r| r.magnet.as_str()).collect();
        assert_eq!(magnets, ["a", "b", "e"]);
        assert!(filtered.iter().all(|r| matches_season(r, 1)));
    }

    #[test]
    fn available_seasons_unions_metadata_and_titles() {
        let rows = vec![
            row("Show", "a", &[3, 1]),
            row("Show 2 сезон", "b", &[]),
            row("Show.S01", "c", &[0]),
        ];
        assert_eq!(available_seasons(&rows), [1, 2, 3]);
    }
}
