//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`seed`] -- demo accounts loaded into a fresh user store.

pub mod password;
pub mod seed;
