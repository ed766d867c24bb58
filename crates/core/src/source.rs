//! Catalog selection.
//!
//! A request reaches a catalog through one of three inputs, checked in order:
//!
//! | Input                                 | Selection            |
//! |---------------------------------------|----------------------|
//! | prefixed id (`kp_123`, `tmdb_456`)    | the prefix           |
//! | explicit `source` query               | the value (kp/tmdb)  |
//! | Russian `lang` and Kinopoisk enabled  | `kp`                 |
//! | otherwise                             | `tmdb`               |
//!
//! A bare numeric id (`123`) is the legacy form: its catalog is implied by
//! the language, with the same rules as a request without an id.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Upstream catalog that produced (or should produce) a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Kinopoisk, the secondary Russian-language catalog.
    Kp,
    /// TMDB, the primary catalog.
    Tmdb,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Kp => "kp",
            Source::Tmdb => "tmdb",
        }
    }

    /// Build the canonical `<source>_<id>` handle.
    pub fn source_id(self, id: impl fmt::Display) -> String {
        format!("{}_{}", self.as_str(), id)
    }

    /// Name used in "not configured" messages.
    pub fn service_name(self) -> &'static str {
        match self {
            Source::Kp => "Kinopoisk service",
            Source::Tmdb => "TMDB service",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kp" => Ok(Source::Kp),
            "tmdb" => Ok(Source::Tmdb),
            _ => Err(CoreError::Validation(
                "source must be one of: kp, tmdb".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// A path identifier as received from the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentId {
    /// `kp_123` / `tmdb_456`.
    Prefixed(Source, i64),
    /// Legacy bare numeric id; the catalog comes from the language.
    Bare(i64),
}

impl ContentId {
    pub fn number(self) -> i64 {
        match self {
            ContentId::Prefixed(_, id) | ContentId::Bare(id) => id,
        }
    }
}

/// Parse `kp_123`, `tmdb_456` or `789`.
///
/// The prefix is case-insensitive. Anything else is
/// `"invalid SOURCE_ID format"`.
pub fn parse_content_id(raw: &str) -> Result<ContentId, CoreError> {
    let invalid = || CoreError::Validation("invalid SOURCE_ID format".to_string());

    if let Some((prefix, rest)) = raw.split_once('_') {
        let source: Source = prefix.parse().map_err(|_| invalid())?;
        let id = rest.parse::<i64>().map_err(|_| invalid())?;
        return Ok(ContentId::Prefixed(source, id));
    }

    raw.parse::<i64>()
        .map(ContentId::Bare)
        .map_err(|_| invalid())
}

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// Language used when the request names none.
pub const DEFAULT_LANGUAGE: &str = "ru-RU";

/// Normalize a `lang` query value: `ru*` becomes `ru-RU`, anything else
/// `en-US`. An absent or blank value yields [`DEFAULT_LANGUAGE`].
pub fn normalize_language(raw: Option<&str>) -> &'static str {
    let Some(lang) = raw
        .map(|l| l.trim().trim_matches(|c| c == '\'' || c == '"'))
        .filter(|l| !l.is_empty())
    else {
        return DEFAULT_LANGUAGE;
    };

    if lang.to_ascii_lowercase().starts_with("ru") {
        "ru-RU"
    } else {
        "en-US"
    }
}

/// Whether a normalized language selects the Russian catalog.
pub fn is_russian(language: &str) -> bool {
    language.to_ascii_lowercase().starts_with("ru")
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Inputs to [`select_source`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceRequest<'a> {
    pub id: Option<ContentId>,
    pub explicit: Option<&'a str>,
    pub language: &'a str,
    pub kp_enabled: bool,
}

/// Decide which catalog serves a request.
pub fn select_source(req: SourceRequest<'_>) -> Result<Source, CoreError> {
    if let Some(ContentId::Prefixed(source, _)) = req.id {
        return Ok(source);
    }

    if let Some(explicit) = req.explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return explicit.parse();
    }

    if is_russian(req.language) && req.kp_enabled {
        Ok(Source::Kp)
    } else {
        Ok(Source::Tmdb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_prefixed_ids() {
        assert_eq!(
            parse_content_id("kp_326").unwrap(),
            ContentId::Prefixed(Source::Kp, 326)
        );
        assert_eq!(
            parse_content_id("TMDB_278").unwrap(),
            ContentId::Prefixed(Source::Tmdb, 278)
        );
    }

    #[test]
    fn parses_bare_ids() {
        assert_eq!(parse_content_id("550").unwrap(), ContentId::Bare(550));
    }

    #[test]
    fn rejects_malformed_ids() {
        for raw in ["imdb_1", "kp_", "kp_abc", "abc", ""] {
            assert_matches!(
                parse_content_id(raw),
                Err(CoreError::Validation(msg)) if msg == "invalid SOURCE_ID format"
            );
        }
    }

    #[test]
    fn normalizes_language() {
        assert_eq!(normalize_language(Some("ru")), "ru-RU");
        assert_eq!(normalize_language(Some("RU-ru")), "ru-RU");
        assert_eq!(normalize_language(Some("en")), "en-US");
        assert_eq!(normalize_language(Some("de-DE")), "en-US");
        assert_eq!(normalize_language(Some("'ru'")), "ru-RU");
        assert_eq!(normalize_language(None), "ru-RU");
        assert_eq!(normalize_language(Some("  ")), "ru-RU");
    }

    #[test]
    fn prefixed_id_wins_regardless_of_language() {
        let req = SourceRequest {
            id: Some(ContentId::Prefixed(Source::Tmdb, 1)),
            explicit: Some("kp"),
            language: "ru-RU",
            kp_enabled: true,
        };
        assert_eq!(select_source(req).unwrap(), Source::Tmdb);

        let req = SourceRequest {
            id: Some(ContentId::Prefixed(Source::Kp, 1)),
            language: "en-US",
            ..Default::default()
        };
        assert_eq!(select_source(req).unwrap(), Source::Kp);
    }

    #[test]
    fn explicit_source_is_validated() {
        let req = SourceRequest {
            explicit: Some("imdb"),
            language: "en-US",
            ..Default::default()
        };
        assert_matches!(select_source(req), Err(CoreError::Validation(_)));
    }

    #[test]
    fn russian_selects_kp_only_when_enabled() {
        let mut req = SourceRequest {
            language: "ru-RU",
            kp_enabled: true,
            ..Default::default()
        };
        assert_eq!(select_source(req).unwrap(), Source::Kp);

        req.kp_enabled = false;
        assert_eq!(select_source(req).unwrap(), Source::Tmdb);

        req.language = "en-US";
        req.kp_enabled = true;
        assert_eq!(select_source(req).unwrap(), Source::Tmdb);
    }

    #[test]
    fn source_id_uses_prefix() {
        assert_eq!(Source::Kp.source_id(326), "kp_326");
        assert_eq!(Source::Tmdb.source_id("278"), "tmdb_278");
    }
}
