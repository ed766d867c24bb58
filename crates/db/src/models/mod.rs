//! Stored documents and their API-facing views.
//!
//! Documents use camelCase field names. User documents keep an ObjectId
//! `_id` and BSON dates; favorites and reactions use a string `_id`.

pub mod bson_date;
pub mod favorite;
pub mod reaction;
pub mod user;

/// Fresh document id (24 hex characters).
pub fn new_id() -> String {
    mongodb::bson::oid::ObjectId::new().to_hex()
}
