//! Players whose embed URL is a fixed pattern: Vidsrc and Vidlink.

use super::{Episode, PlayerEmbed};
use crate::error::{ProviderError, ProviderResult};

pub const VIDSRC_BASE: &str = "https://vidsrc.to/embed";
pub const VIDLINK_BASE: &str = "https://vidlink.pro";

fn episode_required() -> ProviderError {
    ProviderError::InvalidInput("season and episode are required for TV shows".to_string())
}

/// Vidsrc, keyed by IMDb id for both movies and series.
pub fn vidsrc(media_type: &str, imdb_id: &str, episode: Option<Episode>) -> ProviderResult<PlayerEmbed> {
    match media_type {
        "movie" => Ok(PlayerEmbed::Url(format!("{VIDSRC_BASE}/movie/{imdb_id}"))),
        "tv" => {
            let ep = episode.ok_or_else(episode_required)?;
            Ok(PlayerEmbed::Url(format!(
                "{VIDSRC_BASE}/tv/{imdb_id}/{}/{}",
                ep.season, ep.episode
            )))
        }
        _ => Err(ProviderError::InvalidInput(
            "Invalid media_type. Use 'movie' or 'tv'".to_string(),
        )),
    }
}

/// Vidlink movie, keyed by IMDb id.
pub fn vidlink_movie(imdb_id: &str) -> PlayerEmbed {
    PlayerEmbed::Url(format!("{VIDLINK_BASE}/movie/{imdb_id}"))
}

/// Vidlink series episode, keyed by TMDB id.
pub fn vidlink_tv(tmdb_id: &str, episode: Option<Episode>) -> ProviderResult<PlayerEmbed> {
    let ep = episode.ok_or_else(episode_required)?;
    Ok(PlayerEmbed::Url(format!(
        "{VIDLINK_BASE}/tv/{tmdb_id}/{}/{}",
        ep.season, ep.episode
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn vidsrc_builds_movie_and_episode_urls() {
        assert_eq!(
            vidsrc("movie", "tt0111161", None).unwrap(),
            PlayerEmbed::Url("https://vidsrc.to/embed/movie/tt0111161".into())
        );
        assert_eq!(
            vidsrc("tv", "tt0944947", Some(Episode { season: 1, episode: 2 })).unwrap(),
            PlayerEmbed::Url("https://vidsrc.to/embed/tv/tt0944947/1/2".into())
        );
    }

    #[test]
    fn vidsrc_rejects_bad_input() {
        assert_matches!(vidsrc("tv", "tt1", None), Err(ProviderError::InvalidInput(_)));
        assert_matches!(
            vidsrc("anime", "tt1", None),
            Err(ProviderError::InvalidInput(msg)) if msg.contains("Invalid media_type")
        );
    }

    #[test]
    fn vidlink_urls() {
        assert_eq!(
            vidlink_movie("tt0111161"),
            PlayerEmbed::Url("https://vidlink.pro/movie/tt0111161".into())
        );
        assert_eq!(
            vidlink_tv("1399", Some(Episode { season: 3, episode: 9 })).unwrap(),
            PlayerEmbed::Url("https://vidlink.pro/tv/1399/3/9".into())
        );
        assert_matches!(vidlink_tv("1399", None), Err(ProviderError::InvalidInput(_)));
    }
}
