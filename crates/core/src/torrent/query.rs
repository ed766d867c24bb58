//! Indexer query parameters.

use std::str::FromStr;

/// Media kind as understood by the indexer's `is_serial`/`category`
/// parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TorrentKind {
    #[default]
    Movie,
    Series,
    Anime,
}

impl TorrentKind {
    /// `is_serial` value: 1 movie, 2 series, 5 anime.
    pub fn is_serial(self) -> &'static str {
        match self {
            TorrentKind::Movie => "1",
            TorrentKind::Series => "2",
            TorrentKind::Anime => "5",
        }
    }

    /// Indexer category id.
    pub fn category(self) -> &'static str {
        match self {
            TorrentKind::Movie => "2000",
            TorrentKind::Series => "5000",
            TorrentKind::Anime => "5070",
        }
    }

    /// Label echoed in responses.
    pub fn label(self) -> &'static str {
        match self {
            TorrentKind::Movie => "movie",
            TorrentKind::Series => "series",
            TorrentKind::Anime => "anime",
        }
    }
}

impl FromStr for TorrentKind {
    type Err = ();

    /// `movie`, `tv`/`series`/`serial` or `anime`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(TorrentKind::Movie),
            "tv" | "series" | "serial" => Ok(TorrentKind::Series),
            "anime" => Ok(TorrentKind::Anime),
            _ => Err(()),
        }
    }
}

/// Ordered query-string pairs for an indexer search.
///
/// Blank values are skipped so the upstream never sees `title=`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexerQuery {
    pairs: Vec<(String, String)>,
}

impl IndexerQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    /// `is_serial` and `category[]` for a media kind.
    pub fn kind(self, kind: TorrentKind) -> Self {
        self.param("is_serial", kind.is_serial())
            .param("category[]", kind.category())
    }

    pub fn season(self, season: Option<i32>) -> Self {
        match season {
            Some(season) => self.param("season", season.to_string()),
            None => self,
        }
    }

    /// Copy of this query without the `season` parameter.
    pub fn without_season(&self) -> Self {
        Self {
            pairs: self
                .pairs
                .iter()
                .filter(|(k, _)| k != "season")
                .cloned()
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_indexer_parameters() {
        let query = IndexerQuery::new().kind(TorrentKind::Series);
        assert_eq!(query.get("is_serial"), Some("2"));
        assert_eq!(query.get("category[]"), Some("5000"));
        assert_eq!("tv".parse::<TorrentKind>(), Ok(TorrentKind::Series));
        assert_eq!(TorrentKind::Anime.category(), "5070");
    }

    #[test]
    fn blank_values_are_skipped() {
        let query = IndexerQuery::new()
            .param("title", "Dune")
            .param("title_original", "")
            .param("year", " ");
        assert_eq!(query.pairs().len(), 1);
    }

    #[test]
    fn season_can_be_dropped_for_fallback() {
        let query = IndexerQuery::new().param("title", "Show").season(Some(2));
        assert_eq!(query.get("season"), Some("2"));

        let unscoped = query.without_season();
        assert_eq!(unscoped.get("season"), None);
        assert_eq!(unscoped.get("title"), Some("Show"));
    }
}
