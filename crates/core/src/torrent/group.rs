//! Grouping by quality and by season.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use super::model::TorrentResult;
use super::season::row_seasons;
use super::sort::sort_by_seeders_desc;

/// Bucket for rows without a quality.
pub const UNKNOWN_QUALITY_KEY: &str = "unknown";

/// Bucket for rows without a detectable season.
pub const UNKNOWN_SEASON_KEY: &str = "Неизвестно";

pub type Buckets = BTreeMap<String, Vec<TorrentResult>>;

/// Grouped results, shaped by which grouping flags were set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TorrentGroups {
    /// Grouped by quality or by season alone.
    Flat(Buckets),
    /// Grouped by season, then by quality within each season.
    Nested(BTreeMap<String, Buckets>),
}

impl TorrentGroups {
    pub fn is_empty(&self) -> bool {
        match self {
            TorrentGroups::Flat(groups) => groups.is_empty(),
            TorrentGroups::Nested(groups) => groups.is_empty(),
        }
    }
}

/// Quality bucket key: `2160p` merges into `4K`.
pub fn quality_key(quality: &str) -> String {
    let trimmed = quality.trim();
    if trimmed.is_empty() {
        UNKNOWN_QUALITY_KEY.to_string()
    } else if trimmed.eq_ignore_ascii_case("2160p") || trimmed.eq_ignore_ascii_case("4k") {
        "4K".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Season bucket key: `Сезон N`.
pub fn season_key(season: i32) -> String {
    format!("Сезон {season}")
}

/// Group by quality; each bucket sorted by seeders, most first.
pub fn group_by_quality(rows: Vec<TorrentResult>) -> Buckets {
    let mut groups = Buckets::new();
    for row in rows {
        groups.entry(quality_key(&row.quality)).or_default().push(row);
    }
    groups.values_mut().for_each(|bucket| sort_by_seeders_desc(bucket));
    groups
}

/// Group by season; each bucket sorted by seeders, most first.
///
/// A multi-season row lands in every matching bucket, at most once per
/// bucket (duplicates by magnet link are dropped).
pub fn group_by_season(rows: Vec<TorrentResult>) -> Buckets {
    let mut groups = Buckets::new();
    let mut seen: BTreeMap<String, HashSet<String>> = BTreeMap::new();

    for row in rows {
        let seasons = row_seasons(&row);
        let keys: Vec<String> = if seasons.is_empty() {
            vec![UNKNOWN_SEASON_KEY.to_string()]
        } else {
            seasons.into_iter().map(season_key).collect()
        };

        for key in keys {
            let magnets = seen.entry(key.clone()).or_default();
            if !row.magnet.is_empty() && !magnets.insert(row.magnet.clone()) {
                continue;
            }
            groups.entry(key).or_default().push(row.clone());
        }
    }

    groups.values_mut().for_each(|bucket| sort_by_seeders_desc(bucket));
    groups
}

/// Group according to the flags; `None` when neither is set.
pub fn group_results(
    rows: Vec<TorrentResult>,
    by_quality: bool,
    by_season: bool,
) -> Option<TorrentGroups> {
    match (by_season, by_quality) {
        (true, true) => Some(TorrentGroups::Nested(
            group_by_season(rows)
                .into_iter()
                .map(|(season, bucket)| (season, group_by_quality(bucket)))
                .collect(),
        )),
        (true, false) => Some(TorrentGroups::Flat(group_by_season(rows))),
        (false, true) => Some(TorrentGroups::Flat(group_by_quality(rows))),
        (false, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, magnet: &str, quality: &str, seeders: i64, seasons: &[i32]) -> TorrentResult {
        TorrentResult {
            title: title.to_string(),
            magnet: magnet.to_string(),
            quality: quality.to_string(),
            seeders,
            seasons: seasons.to_vec(),
            ..Default::default()
        }
    }

    #[test]
    fn quality_groups_merge_2160p_into_4k() {
        let groups = group_by_quality(vec![
            row("a", "a", "2160p", 1, &[]),
            row("b", "b", "4K", 9, &[]),
            row("c", "c", "", 3, &[]),
            row("d", "d", "1080p", 2, &[]),
        ]);

        assert_eq!(groups.len(), 3);
        let four_k: Vec<_> = groups["4K"].iter().map(|r| r.magnet.as_str()).collect();
        assert_eq!(four_k, ["b", "a"]);
        assert_eq!(groups[UNKNOWN_QUALITY_KEY].len(), 1);
    }

    #[test]
    fn season_groups_span_buckets_without_duplicates() {
        let rows = vec![
            row("Show S01-S02 pack", "pack", "1080p", 40, &[1, 2]),
            row("Show.S01.720p", "s1", "720p", 10, &[]),
            row("Show.S01.720p mirror", "s1", "720p", 5, &[1]),
            row("Show special", "x", "", 1, &[]),
        ];
        let groups = group_by_season(rows.clone());

        let season_one: Vec<_> = groups["Сезон 1"].iter().map(|r| r.magnet.as_str()).collect();
        assert_eq!(season_one, ["pack", "s1"]);
        assert_eq!(groups["Сезон 2"].len(), 1);
        assert_eq!(groups[UNKNOWN_SEASON_KEY][0].magnet, "x");

        for row in &rows {
            let hits: usize = groups
                .values()
                .map(|b| b.iter().filter(|r| r.magnet == row.magnet).count())
                .sum();
            assert!(hits >= 1);
            assert!(groups
                .values()
                .all(|b| b.iter().filter(|r| r.magnet == row.magnet).count() <= 1));
        }
    }

    #[test]
    fn both_flags_nest_quality_inside_season() {
        let rows = vec![
            row("Show.S01.1080p", "a", "1080p", 1, &[]),
            row("Show.S01.2160p", "b", "2160p", 1, &[]),
        ];
        let Some(TorrentGroups::Nested(groups)) = group_results(rows, true, true) else {
            panic!("expected nested groups");
        };
        assert_eq!(groups["Сезон 1"].len(), 2);
        assert!(groups["Сезон 1"].contains_key("4K"));
    }

    #[test]
    fn no_flags_means_no_groups() {
        assert!(group_results(vec![row("a", "a", "", 0, &[])], false, false).is_none());
    }

    #[test]
    fn nested_groups_serialize_as_objects() {
        let groups = group_results(vec![row("Show.S02", "a", "720p", 3, &[])], true, true).unwrap();
        let json = serde_json::to_value(&groups).unwrap();
        assert_eq!(json["Сезон 2"]["720p"][0]["magnet"], "a");
    }
}
