//! Reaction document.

use neomovies_core::types::{MediaType, ReactionType, Timestamp};
use serde::{Deserialize, Serialize};

/// A user's reaction to a title. Unique per `(userId, mediaType, mediaId)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub media_id: String,
    pub media_type: MediaType,
    #[serde(rename = "type")]
    pub reaction_type: ReactionType,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Reaction {
    pub fn new(
        user_id: &str,
        media_type: MediaType,
        media_id: &str,
        reaction_type: ReactionType,
        now: Timestamp,
    ) -> Self {
        Self {
            id: super::new_id(),
            user_id: user_id.to_string(),
            media_id: media_id.to_string(),
            media_type,
            reaction_type,
            created_at: now,
            updated_at: now,
        }
    }

    /// Key used by the external reaction counter: `{mediaType}_{mediaId}`.
    pub fn counter_key(&self) -> String {
        format!("{}_{}", self.media_type, self.media_id)
    }
}
