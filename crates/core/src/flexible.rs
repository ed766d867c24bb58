//! Permissive decoders for upstream numeric fields.
//!
//! Catalog payloads deliver the same field as a number, a numeric string,
//! an empty string or `null` depending on endpoint generation. These
//! helpers never fail on a type mismatch:
//!
//! | Input            | `flexible_i64` | `flexible_f64` |
//! |------------------|----------------|----------------|
//! | `null` / missing | `0`            | `0.0`          |
//! | `""`             | `0`            | `0.0`          |
//! | `"abc"`          | `0`            | `0.0`          |
//! | `"7.9"`          | `7`            | `7.9`          |
//! | `42`             | `42`           | `42.0`         |
//!
//! Use together with `#[serde(default)]` so missing fields decode too.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode an integer from a number, a numeric string or `null`.
pub fn flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_i64).unwrap_or(0))
}

/// Decode an `i32`, saturating values outside its range to 0.
pub fn flexible_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = flexible_i64(deserializer)?;
    Ok(i32::try_from(value).unwrap_or(0))
}

/// Decode a float from a number, a numeric string or `null`.
pub fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_f64).unwrap_or(0.0))
}

/// Decode a string, stringifying numbers and mapping `null` to `""`.
pub fn flexible_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Integer interpretation of an arbitrary JSON value.
pub fn value_to_i64(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => parse_int_lenient(s),
        _ => 0,
    }
}

/// Float interpretation of an arbitrary JSON value.
pub fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parse an integer out of a string, taking the integer part of decimals.
pub fn parse_int_lenient(s: &str) -> i64 {
    let trimmed = s.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return v;
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => f.trunc() as i64,
        _ => 0,
    }
}
