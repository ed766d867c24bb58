//! Persistence for users, favorites and reactions.
//!
//! Handlers talk to the [`repositories`] traits through a [`Repositories`]
//! bundle. Two backends implement them: MongoDB ([`repositories::mongo`])
//! for production and an in-memory store ([`memory`]) for tests and
//! local runs without a database.
//!
//! [`DbHandle`] wraps the bundle in a one-shot initialization latch: the
//! first caller connects, every later caller gets the cached outcome.

pub mod error;
pub mod handle;
pub mod memory;
pub mod models;
pub mod repositories;

pub use error::{DbError, DbResult};
pub use handle::DbHandle;
pub use repositories::{FavoriteRepository, ReactionRepository, Repositories, UserRepository};
