//! Small shared enums used across crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// ---------------------------------------------------------------------------
// MediaType
// ---------------------------------------------------------------------------

/// Kind of catalog entry: a feature film or a TV series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            other => Err(CoreError::Validation(format!(
                "invalid media type '{other}', expected movie or tv"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ReactionType
// ---------------------------------------------------------------------------

/// One of the five reaction tags a user may leave on a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionType {
    Fire,
    Nice,
    Think,
    Bore,
    Shit,
}

impl ReactionType {
    /// Every reaction tag, in display order.
    pub const ALL: [ReactionType; 5] = [
        ReactionType::Fire,
        ReactionType::Nice,
        ReactionType::Think,
        ReactionType::Bore,
        ReactionType::Shit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReactionType::Fire => "fire",
            ReactionType::Nice => "nice",
            ReactionType::Think => "think",
            ReactionType::Bore => "bore",
            ReactionType::Shit => "shit",
        }
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReactionType::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CoreError::Validation("Invalid reaction type".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn media_type_parses_known_values() {
        assert_eq!("movie".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("tv".parse::<MediaType>().unwrap(), MediaType::Tv);
    }

    #[test]
    fn media_type_rejects_unknown() {
        assert_matches!("series".parse::<MediaType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn reaction_type_accepts_all_five_tags() {
        for tag in ["fire", "nice", "think", "bore", "shit"] {
            let parsed: ReactionType = tag.parse().unwrap();
            assert_eq!(parsed.as_str(), tag);
        }
    }

    #[test]
    fn reaction_type_rejects_unknown_tag() {
        assert_matches!("love".parse::<ReactionType>(), Err(CoreError::Validation(_)));
    }
}
