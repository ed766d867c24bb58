//! Favorite document.

use neomovies_core::types::{MediaType, Timestamp};
use serde::{Deserialize, Serialize};

/// One saved title. Unique per `(userId, mediaId, mediaType)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub media_id: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub rating: f64,
    pub created_at: Timestamp,
}

/// Catalog details copied onto a favorite when it is added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavoriteDetails {
    pub title: String,
    pub poster_path: String,
    pub year: i32,
    pub rating: f64,
}

impl Favorite {
    pub fn new(
        user_id: &str,
        media_id: &str,
        media_type: MediaType,
        details: FavoriteDetails,
        now: Timestamp,
    ) -> Self {
        Self {
            id: super::new_id(),
            user_id: user_id.to_string(),
            media_id: media_id.to_string(),
            media_type,
            title: details.title,
            poster_path: details.poster_path,
            year: details.year,
            rating: details.rating,
            created_at: now,
        }
    }
}
