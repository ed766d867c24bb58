//! Quality ladder: `360p < 480p < 720p < 1080p < 1440p < 4K`, with
//! `2160p` equal to `4K`.

/// Qualities a title can resolve to.
pub const QUALITY_LADDER: [&str; 7] = ["4K", "1440p", "1080p", "720p", "480p", "360p", "Unknown"];

const LADDER_TOKENS: [(&[&str], &str); 6] = [
    (&["2160P", "4K"], "4K"),
    (&["1440P"], "1440p"),
    (&["1080P"], "1080p"),
    (&["720P"], "720p"),
    (&["480P"], "480p"),
    (&["360P"], "360p"),
];

/// Derive a quality from a release title. Always returns a ladder value.
pub fn extract_quality(title: &str) -> &'static str {
    let upper = title.to_uppercase();
    LADDER_TOKENS
        .iter()
        .find(|(tokens, _)| tokens.iter().any(|t| upper.contains(t)))
        .map(|(_, quality)| *quality)
        .unwrap_or("Unknown")
}

/// Position on the ladder; unknown qualities rank 0.
pub fn quality_rank(quality: &str) -> u8 {
    match quality.trim().to_ascii_lowercase().as_str() {
        "360p" => 1,
        "480p" => 2,
        "720p" => 3,
        "1080p" => 4,
        "1440p" => 5,
        "4k" | "2160p" => 6,
        _ => 0,
    }
}

/// `quality >= minimum`. Unranked qualities never meet a minimum.
pub fn meets_minimum(quality: &str, minimum: &str) -> bool {
    quality_rank(quality) >= quality_rank(minimum)
}

/// `quality <= maximum`.
pub fn within_maximum(quality: &str, maximum: &str) -> bool {
    quality_rank(quality) <= quality_rank(maximum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_4k_from_2160p_title() {
        assert_eq!(extract_quality("Movie.Name.2023.2160p.HDR.x265"), "4K");
        assert_eq!(extract_quality("Movie Name [4K UHD]"), "4K");
    }

    #[test]
    fn ladder_is_checked_top_down() {
        assert_eq!(extract_quality("Movie.1080p.from.2160p.source"), "4K");
        assert_eq!(extract_quality("movie.1440p.web"), "1440p");
        assert_eq!(extract_quality("movie.720p.1080p"), "1080p");
        assert_eq!(extract_quality("movie 480p"), "480p");
        assert_eq!(extract_quality("movie 360p"), "360p");
    }

    #[test]
    fn extraction_is_total() {
        for title in ["", "Фильм (2020) DVDRip", "x", "1080", "720i"] {
            assert!(QUALITY_LADDER.contains(&extract_quality(title)));
        }
        assert_eq!(extract_quality("Фильм (2020) DVDRip"), "Unknown");
    }

    #[test]
    fn rank_is_case_insensitive() {
        assert_eq!(quality_rank("1080P"), 4);
        assert_eq!(quality_rank("4k"), quality_rank("2160p"));
        assert_eq!(quality_rank("Unknown"), 0);
    }

    #[test]
    fn range_checks() {
        assert!(meets_minimum("4K", "1080p"));
        assert!(!meets_minimum("720p", "1080p"));
        assert!(!meets_minimum("Unknown", "360p"));
        assert!(within_maximum("720p", "1080p"));
        assert!(!within_maximum("2160p", "1440p"));
    }
}
