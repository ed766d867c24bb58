//! In-memory repositories.
//!
//! Enforces the same unique keys as the MongoDB indexes. Used by the API
//! test-suite and when no database URI is configured in development.

use std::sync::Arc;

use async_trait::async_trait;
use neomovies_core::types::MediaType;
use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};
use crate::models::favorite::Favorite;
use crate::models::reaction::Reaction;
use crate::models::user::User;
use crate::repositories::{FavoriteRepository, ReactionRepository, UserRepository};

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    favorites: Vec<Favorite>,
    reactions: Vec<Reaction>,
}

/// All three collections behind one lock.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
}

fn same_favorite(f: &Favorite, user_id: &str, media_id: &str, media_type: MediaType) -> bool {
    f.user_id == user_id && f.media_id == media_id && f.media_type == media_type
}

fn same_reaction(r: &Reaction, user_id: &str, media_type: MediaType, media_id: &str) -> bool {
    r.user_id == user_id && r.media_type == media_type && r.media_id == media_id
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> DbResult<()> {
        let mut store = self.inner.write().await;
        if store.users.iter().any(|u| u.email == user.email) {
            return Err(DbError::Duplicate { entity: "user" });
        }
        store.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let store = self.inner.read().await;
        Ok(store.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let store = self.inner.read().await;
        Ok(store.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> DbResult<Option<User>> {
        let store = self.inner.read().await;
        Ok(store
            .users
            .iter()
            .find(|u| u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn find_by_refresh_token(&self, token: &str) -> DbResult<Option<User>> {
        let store = self.inner.read().await;
        Ok(store
            .users
            .iter()
            .find(|u| u.refresh_tokens.iter().any(|t| t.token == token))
            .cloned())
    }

    async fn update(&self, user: &User) -> DbResult<bool> {
        let mut store = self.inner.write().await;
        if store
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DbError::Duplicate { entity: "user" });
        }
        match store.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> DbResult<bool> {
        let mut store = self.inner.write().await;
        let before = store.users.len();
        store.users.retain(|u| u.id != id);
        Ok(store.users.len() < before)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn add(&self, favorite: &Favorite) -> DbResult<()> {
        let mut store = self.inner.write().await;
        let exists = store.favorites.iter().any(|f| {
            same_favorite(f, &favorite.user_id, &favorite.media_id, favorite.media_type)
        });
        if !exists {
            store.favorites.push(favorite.clone());
        }
        Ok(())
    }

    async fn remove(&self, user_id: &str, media_id: &str, media_type: MediaType) -> DbResult<()> {
        let mut store = self.inner.write().await;
        store
            .favorites
            .retain(|f| !same_favorite(f, user_id, media_id, media_type));
        Ok(())
    }

    async fn exists(
        &self,
        user_id: &str,
        media_id: &str,
        media_type: MediaType,
    ) -> DbResult<bool> {
        let store = self.inner.read().await;
        Ok(store
            .favorites
            .iter()
            .any(|f| same_favorite(f, user_id, media_id, media_type)))
    }

    async fn list(&self, user_id: &str) -> DbResult<Vec<Favorite>> {
        let store = self.inner.read().await;
        let mut favorites: Vec<Favorite> = store
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(favorites)
    }

    async fn delete_all(&self, user_id: &str) -> DbResult<u64> {
        let mut store = self.inner.write().await;
        let before = store.favorites.len();
        store.favorites.retain(|f| f.user_id != user_id);
        Ok((before - store.favorites.len()) as u64)
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn upsert(&self, reaction: &Reaction) -> DbResult<()> {
        let mut store = self.inner.write().await;
        let existing = store.reactions.iter_mut().find(|r| {
            same_reaction(r, &reaction.user_id, reaction.media_type, &reaction.media_id)
        });
        match existing {
            Some(existing) => {
                existing.reaction_type = reaction.reaction_type;
                existing.updated_at = reaction.updated_at;
            }
            None => store.reactions.push(reaction.clone()),
        }
        Ok(())
    }

    async fn find(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: &str,
    ) -> DbResult<Option<Reaction>> {
        let store = self.inner.read().await;
        Ok(store
            .reactions
            .iter()
            .find(|r| same_reaction(r, user_id, media_type, media_id))
            .cloned())
    }

    async fn remove(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: &str,
    ) -> DbResult<Option<Reaction>> {
        let mut store = self.inner.write().await;
        let position = store
            .reactions
            .iter()
            .position(|r| same_reaction(r, user_id, media_type, media_id));
        Ok(position.map(|i| store.reactions.remove(i)))
    }

    async fn list_by_user(&self, user_id: &str, skip: u64, limit: i64) -> DbResult<Vec<Reaction>> {
        let store = self.inner.read().await;
        let mut reactions: Vec<Reaction> = store
            .reactions
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reactions
            .into_iter()
            .skip(skip as usize)
            .take(usize::try_from(limit).unwrap_or(0))
            .collect())
    }

    async fn delete_all(&self, user_id: &str) -> DbResult<Vec<Reaction>> {
        let mut store = self.inner.write().await;
        let (removed, kept): (Vec<Reaction>, Vec<Reaction>) = std::mem::take(&mut store.reactions)
            .into_iter()
            .partition(|r| r.user_id == user_id);
        store.reactions = kept;
        Ok(removed)
    }
}
