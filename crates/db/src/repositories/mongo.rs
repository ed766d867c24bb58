//! MongoDB implementations of the repository ports.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, to_bson, Document};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use neomovies_core::types::MediaType;

use crate::error::{map_write_error, DbResult};
use crate::models::favorite::Favorite;
use crate::models::reaction::Reaction;
use crate::models::user::User;

use super::{FavoriteRepository, ReactionRepository, UserRepository};

pub const USERS: &str = "users";
pub const FAVORITES: &str = "favorites";
pub const REACTIONS: &str = "reactions";

/// Create the unique indexes every collection relies on. Safe to repeat.
pub async fn ensure_indexes(db: &Database) -> DbResult<()> {
    let unique = || IndexOptions::builder().unique(true).build();

    db.collection::<Document>(USERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
        )
        .await?;
    db.collection::<Document>(FAVORITES)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "userId": 1, "mediaId": 1, "mediaType": 1 })
                .options(unique())
                .build(),
        )
        .await?;
    db.collection::<Document>(REACTIONS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "userId": 1, "mediaType": 1, "mediaId": 1 })
                .options(unique())
                .build(),
        )
        .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub struct MongoUserRepo {
    users: Collection<User>,
}

impl MongoUserRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            users: db.collection(USERS),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepo {
    async fn create(&self, user: &User) -> DbResult<()> {
        self.users
            .insert_one(user)
            .await
            .map_err(|e| map_write_error(e, "user"))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<User>> {
        Ok(self.users.find_one(user_key(id)).await?)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<User>> {
        Ok(self.users.find_one(doc! { "email": email }).await?)
    }

    async fn find_by_google_id(&self, google_id: &str) -> DbResult<Option<User>> {
        Ok(self.users.find_one(doc! { "googleId": google_id }).await?)
    }

    async fn find_by_refresh_token(&self, token: &str) -> DbResult<Option<User>> {
        Ok(self
            .users
            .find_one(doc! { "refreshTokens.token": token })
            .await?)
    }

    async fn update(&self, user: &User) -> DbResult<bool> {
        let result = self
            .users
            .replace_one(user_key(&user.id), user)
            .await
            .map_err(|e| map_write_error(e, "user"))?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = self.users.delete_one(user_key(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

/// `_id` filter for a hex user id. A malformed id matches nothing.
fn user_key(id: &str) -> Document {
    match ObjectId::parse_str(id) {
        Ok(oid) => doc! { "_id": oid },
        Err(_) => doc! { "_id": id },
    }
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

pub struct MongoFavoriteRepo {
    favorites: Collection<Favorite>,
}

impl MongoFavoriteRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            favorites: db.collection(FAVORITES),
        }
    }
}

fn favorite_key(user_id: &str, media_id: &str, media_type: MediaType) -> Document {
    doc! { "userId": user_id, "mediaId": media_id, "mediaType": media_type.as_str() }
}

#[async_trait]
impl FavoriteRepository for MongoFavoriteRepo {
    async fn add(&self, favorite: &Favorite) -> DbResult<()> {
        let filter = favorite_key(&favorite.user_id, &favorite.media_id, favorite.media_type);
        let document = mongodb::bson::to_document(favorite)?;
        self.favorites
            .update_one(filter, doc! { "$setOnInsert": document })
            .upsert(true)
            .await
            .map_err(|e| map_write_error(e, "favorite"))?;
        Ok(())
    }

    async fn remove(&self, user_id: &str, media_id: &str, media_type: MediaType) -> DbResult<()> {
        self.favorites
            .delete_one(favorite_key(user_id, media_id, media_type))
            .await?;
        Ok(())
    }

    async fn exists(
        &self,
        user_id: &str,
        media_id: &str,
        media_type: MediaType,
    ) -> DbResult<bool> {
        let count = self
            .favorites
            .count_documents(favorite_key(user_id, media_id, media_type))
            .await?;
        Ok(count > 0)
    }

    async fn list(&self, user_id: &str) -> DbResult<Vec<Favorite>> {
        let cursor = self
            .favorites
            .find(doc! { "userId": user_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete_all(&self, user_id: &str) -> DbResult<u64> {
        let result = self.favorites.delete_many(doc! { "userId": user_id }).await?;
        Ok(result.deleted_count)
    }
}

// ---------------------------------------------------------------------------
// Reactions
// ---------------------------------------------------------------------------

pub struct MongoReactionRepo {
    reactions: Collection<Reaction>,
}

impl MongoReactionRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            reactions: db.collection(REACTIONS),
        }
    }
}

fn reaction_key(user_id: &str, media_type: MediaType, media_id: &str) -> Document {
    doc! { "userId": user_id, "mediaType": media_type.as_str(), "mediaId": media_id }
}

#[async_trait]
impl ReactionRepository for MongoReactionRepo {
    async fn upsert(&self, reaction: &Reaction) -> DbResult<()> {
        let filter = reaction_key(&reaction.user_id, reaction.media_type, &reaction.media_id);
        let updated_at = to_bson(&reaction.updated_at)?;
        let created_at = to_bson(&reaction.created_at)?;
        let update = doc! {
            "$set": {
                "type": reaction.reaction_type.as_str(),
                "updatedAt": updated_at,
            },
            "$setOnInsert": {
                "_id": reaction.id.as_str(),
                "createdAt": created_at,
            },
        };
        self.reactions
            .update_one(filter, update)
            .upsert(true)
            .await
            .map_err(|e| map_write_error(e, "reaction"))?;
        Ok(())
    }

    async fn find(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: &str,
    ) -> DbResult<Option<Reaction>> {
        Ok(self
            .reactions
            .find_one(reaction_key(user_id, media_type, media_id))
            .await?)
    }

    async fn remove(
        &self,
        user_id: &str,
        media_type: MediaType,
        media_id: &str,
    ) -> DbResult<Option<Reaction>> {
        Ok(self
            .reactions
            .find_one_and_delete(reaction_key(user_id, media_type, media_id))
            .await?)
    }

    async fn list_by_user(&self, user_id: &str, skip: u64, limit: i64) -> DbResult<Vec<Reaction>> {
        let cursor = self
            .reactions
            .find(doc! { "userId": user_id })
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete_all(&self, user_id: &str) -> DbResult<Vec<Reaction>> {
        let cursor = self.reactions.find(doc! { "userId": user_id }).await?;
        let removed: Vec<Reaction> = cursor.try_collect().await?;
        self.reactions.delete_many(doc! { "userId": user_id }).await?;
        Ok(removed)
    }
}
