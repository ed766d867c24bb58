//! Repository ports.
//!
//! Each trait covers one collection. Mutations on favorites and reactions
//! go through the collection's unique key, so repeating an add or a remove
//! is harmless.

pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;
use neomovies_core::types::MediaType;

use crate::error::DbResult;
use crate::models::favorite::Favorite;
use crate::models::reaction::Reaction;
use crate::models::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. A taken email is [`crate::DbError::Duplicate`].
    async fn create(&self, user: &User) -> DbResult<()>;
    async fn find_by_id(&self, id: &str) -> DbResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>>;
    async fn find_by_google_id(&self, google_id: &str) -> DbResult<Option<User>>;
    async fn find_by_refresh_token(&self, token: &str) -> DbResult<Option<User>>;
    /// Replace the stored document. Returns `false` if it no longer exists.
    async fn update(&self, user: &User) -> DbResult<bool>;
    async fn delete(&self, id: &str) -> DbResult<bool>;
}

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Insert unless the `(user, media, type)` triple already exists.
    async fn add(&self, favorite: &Favorite) -> DbResult<()>;
    async fn remove(&self, user_id: &str, media_id: &str, media_type: MediaType) -> DbResult<()>;
    async fn exists(&self, user_id: &str, media_id: &str, media_type: MediaType)
        -> DbResult<bool>;
    /// A user's favorites, newest first.
    async fn list(&self, user_id: &str) -> DbResult<Vec<Favorite>>;
    async fn delete_all(&self, user_id: &str) -> DbResult<u64>;
}

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Insert or overwrite the user's reaction, bumping `updatedAt`.
    async fn upsert(&self, reaction: &Reaction) -> DbResult<()>;
    async fn find(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: &str,
    ) -> DbResult<Option<Reaction>>;
    /// Returns the removed reaction, if there was one.
    async fn remove(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: &str,
    ) -> DbResult<Option<Reaction>>;
    /// A page of the user's reactions, newest first.
    async fn list_by_user(&self, user_id: &str, skip: u64, limit: i64) -> DbResult<Vec<Reaction>>;
    /// Remove every reaction of a user, returning what was removed.
    async fn delete_all(&self, user_id: &str) -> DbResult<Vec<Reaction>>;
}

/// The repositories a request handler works with.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub reactions: Arc<dyn ReactionRepository>,
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

impl Repositories {
    /// MongoDB-backed repositories on `db`.
    pub fn mongo(db: &mongodb::Database) -> Self {
        Self {
            users: Arc::new(mongo::MongoUserRepo::new(db)),
            favorites: Arc::new(mongo::MongoFavoriteRepo::new(db)),
            reactions: Arc::new(mongo::MongoReactionRepo::new(db)),
        }
    }

    /// Process-local repositories with no persistence.
    pub fn in_memory() -> Self {
        let store = crate::memory::MemoryStore::default();
        Self {
            users: Arc::new(store.clone()),
            favorites: Arc::new(store.clone()),
            reactions: Arc::new(store),
        }
    }
}
