//! Deterministic upstream → unified mappers.
//!
//! Mappers are total: they never fail, unknown or missing upstream fields
//! become zero values. Each mapper stamps its own source prefix on
//! `sourceId` and leaves the opposing catalog id empty for the enricher.

pub mod kinopoisk;
pub mod tmdb;

use crate::flexible::parse_int_lenient;
use crate::model::UnifiedGenre;

/// Genre with a slug id: lowercase name, spaces replaced by `-`.
///
/// Blank names fall back to the numeric upstream id.
pub fn genre_from_name(name: &str, numeric_id: i64) -> UnifiedGenre {
    let name = name.trim();
    let id = if name.is_empty() {
        numeric_id.to_string()
    } else {
        name.to_lowercase().replace(' ', "-")
    };
    UnifiedGenre {
        id,
        name: name.to_string(),
    }
}

/// `YYYY-01-01` for a positive year, `""` otherwise.
pub fn year_to_date(year: i64) -> String {
    if year > 0 {
        format!("{year:04}-01-01")
    } else {
        String::new()
    }
}

/// [`year_to_date`] for a year delivered as text.
pub fn year_text_to_date(year: &str) -> String {
    year_to_date(parse_int_lenient(year))
}

/// Leading four-digit year of an ISO date, or 0.
pub fn year_of(date: &str) -> i32 {
    date.get(..4)
        .filter(|y| y.chars().all(|c| c.is_ascii_digit()))
        .and_then(|y| y.parse().ok())
        .unwrap_or(0)
}

/// First non-blank candidate, or `""`.
pub(crate) fn first_non_blank<'a>(candidates: &[&'a str]) -> &'a str {
    candidates
        .iter()
        .copied()
        .find(|c| !c.trim().is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn genre_slug_is_lowercase_hyphenated() {
        let genre = genre_from_name("Science Fiction", 878);
        assert_eq!(genre.id, "science-fiction");
        assert_eq!(genre.name, "Science Fiction");
    }

    #[test]
    fn blank_genre_name_uses_numeric_id() {
        assert_eq!(genre_from_name("  ", 18).id, "18");
    }

    #[test]
    fn year_helpers() {
        assert_eq!(year_to_date(1994), "1994-01-01");
        assert_eq!(year_to_date(0), "");
        assert_eq!(year_text_to_date("1999"), "1999-01-01");
        assert_eq!(year_text_to_date(""), "");
        assert_eq!(year_of("2010-07-16"), 2010);
        assert_eq!(year_of("20"), 0);
        assert_eq!(year_of("n/a-01"), 0);
    }
}
