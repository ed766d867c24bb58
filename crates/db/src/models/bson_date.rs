//! Serde adapters that store [`Timestamp`] fields as BSON `Date`.
//!
//! Reading also accepts RFC 3339 strings, the shape older documents used.
//! Use with `#[serde(with = "bson_date")]` or
//! `#[serde(with = "bson_date::optional")]`.

use chrono::{TimeZone, Utc};
use mongodb::bson::{self, Bson};
use neomovies_core::types::Timestamp;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    bson::DateTime::from_millis(value.timestamp_millis()).serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    from_bson(Bson::deserialize(deserializer)?).map_err(D::Error::custom)
}

fn from_bson(value: Bson) -> Result<Timestamp, String> {
    match value {
        Bson::DateTime(dt) => Utc
            .timestamp_millis_opt(dt.timestamp_millis())
            .single()
            .ok_or_else(|| format!("date out of range: {dt}")),
        Bson::String(text) => chrono::DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("invalid date {text:?}: {e}")),
        other => Err(format!("expected a date, found {:?}", other.element_type())),
    }
}

/// `Option<Timestamp>` variant; `null` and a missing field read as `None`.
pub mod optional {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value
            .map(|v| bson::DateTime::from_millis(v.timestamp_millis()))
            .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        match Bson::deserialize(deserializer)? {
            Bson::Null => Ok(None),
            value => from_bson(value).map(Some).map_err(D::Error::custom),
        }
    }
}
