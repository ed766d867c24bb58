//! Result ordering.

use std::str::FromStr;

use super::model::TorrentResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    Seeders,
    Size,
    Date,
}

impl FromStr for SortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seeders" => Ok(SortBy::Seeders),
            "size" => Ok(SortBy::Size),
            "date" => Ok(SortBy::Date),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

/// Stable sort in place.
///
/// `Size` compares parsed byte counts; `Date` compares publish dates as
/// strings, which orders ISO-8601 timestamps correctly.
pub fn sort_torrents(rows: &mut [TorrentResult], by: SortBy, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ordering = match by {
            SortBy::Seeders => a.seeders.cmp(&b.seeders),
            SortBy::Size => parse_size_bytes(&a.size).total_cmp(&parse_size_bytes(&b.size)),
            SortBy::Date => a.publish_date.cmp(&b.publish_date),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Sort by seeders, most first.
pub fn sort_by_seeders_desc(rows: &mut [TorrentResult]) {
    rows.sort_by(|a, b| b.seeders.cmp(&a.seeders));
}

/// Bytes in a human-readable size such as `"1.46 GB"`, `"700 MiB"`,
/// `"1,5 ГБ"` or a bare byte count. Unparseable sizes are 0.
pub fn parse_size_bytes(size: &str) -> f64 {
    let normalized = size.trim().replace(',', ".");
    let split = normalized
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(normalized.len());
    let (number, unit) = normalized.split_at(split);

    let Ok(value) = number.parse::<f64>() else {
        return 0.0;
    };
    let multiplier: f64 = match unit.trim().to_uppercase().as_str() {
        "" | "B" | "Б" => 1.0,
        "KB" | "KIB" | "КБ" => 1024.0,
        "MB" | "MIB" | "МБ" => 1024.0_f64.powi(2),
        "GB" | "GIB" | "ГБ" => 1024.0_f64.powi(3),
        "TB" | "TIB" | "ТБ" => 1024.0_f64.powi(4),
        _ => return 0.0,
    };
    value * multiplier
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(magnet: &str, seeders: i64, size: &str, date: &str) -> TorrentResult {
        TorrentResult {
            magnet: magnet.to_string(),
            seeders,
            size: size.to_string(),
            publish_date: date.to_string(),
            ..Default::default()
        }
    }

    fn magnets(rows: &[TorrentResult]) -> Vec<&str> {
        rows.iter().map(|r| r.magnet.as_str()).collect()
    }

    #[test]
    fn parses_human_sizes() {
        assert_eq!(parse_size_bytes("1024"), 1024.0);
        assert_eq!(parse_size_bytes("1 KiB"), 1024.0);
        assert_eq!(parse_size_bytes("1.5 GB"), 1.5 * 1024.0 * 1024.0 * 1024.0);
        assert_eq!(parse_size_bytes("700MiB"), 700.0 * 1024.0 * 1024.0);
        assert_eq!(parse_size_bytes("1,5 ГБ"), parse_size_bytes("1.5 GB"));
        assert_eq!(parse_size_bytes(""), 0.0);
        assert_eq!(parse_size_bytes("big"), 0.0);
        assert_eq!(parse_size_bytes("3 parsecs"), 0.0);
    }

    #[test]
    fn size_sort_is_numeric_not_lexical() {
        let mut rows = vec![
            row("small", 0, "900 MB", ""),
            row("big", 0, "1.2 GB", ""),
            row("raw", 0, "104857600", ""),
        ];
        sort_torrents(&mut rows, SortBy::Size, SortOrder::Desc);
        assert_eq!(magnets(&rows), ["big", "small", "raw"]);
    }

    #[test]
    fn default_is_seeders_desc() {
        let mut rows = vec![row("a", 5, "", ""), row("b", 50, "", ""), row("c", 10, "", "")];
        sort_torrents(&mut rows, SortBy::default(), SortOrder::default());
        assert_eq!(magnets(&rows), ["b", "c", "a"]);
    }

    #[test]
    fn date_sort_ascending() {
        let mut rows = vec![
            row("new", 0, "", "2024-03-01T00:00:00"),
            row("old", 0, "", "2019-12-31T00:00:00"),
        ];
        sort_torrents(&mut rows, SortBy::Date, SortOrder::Asc);
        assert_eq!(magnets(&rows), ["old", "new"]);
    }

    #[test]
    fn parses_sort_options() {
        assert_eq!("SIZE".parse::<SortBy>(), Ok(SortBy::Size));
        assert!("rating".parse::<SortBy>().is_err());
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
    }
}
