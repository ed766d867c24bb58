//! Authentication primitives.
//!
//! - [`password`] -- bcrypt password hashing and verification.
//! - [`jwt`] -- JWT access-token generation, validation, and refresh-token helpers.
//! - [`codes`] -- email verification codes and OAuth state values.

pub mod codes;
pub mod jwt;
pub mod password;
