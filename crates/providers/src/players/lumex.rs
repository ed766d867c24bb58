//! Lumex: the player URL is built locally from the configured base.

use super::{append_episode, Episode, IdType, PlayerEmbed};

#[derive(Debug, Clone)]
pub struct LumexPlayer {
    base_url: String,
}

impl LumexPlayer {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn embed(&self, id_type: IdType, id: &str, episode: Option<Episode>) -> PlayerEmbed {
        let key = match id_type {
            IdType::Imdb => "imdb_id",
            IdType::Kp => "kp_id",
        };
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{separator}{key}={}",
            self.base_url,
            urlencoding::encode(id)
        );
        PlayerEmbed::Url(append_episode(&url, episode, &[]))
    }
}
