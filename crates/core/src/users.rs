//! User accounts and the credential store seam.
//!
//! The store only keeps password hashes; hashing and verification live in
//! the API crate. [`InMemoryUserStore`] is the default backing table.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::types::UserRecordId;

/// Message returned when registering an email that already has an account.
pub const EMAIL_TAKEN_MSG: &str = "Email already registered";

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// Full user row.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserRecordId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub parking_zone: Option<i64>,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    pub id: UserRecordId,
    pub email: String,
    pub role: Role,
    pub parking_zone: Option<i64>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            parking_zone: user.parking_zone,
        }
    }
}

/// DTO for creating a new user. The id is assigned by the store.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub parking_zone: Option<i64>,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Credential store seam.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Find a user by email (case-sensitive).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError>;

    /// Insert a new user, returning the created row.
    ///
    /// Fails with [`CoreError::Conflict`] when the email is already taken.
    async fn insert(&self, input: CreateUser) -> Result<User, CoreError>;

    /// Replace the password hash for `email`. Returns `false` if no such user.
    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool, CoreError>;

    /// Delete a user. Returns `false` if no row with `id` existed.
    async fn delete(&self, id: UserRecordId) -> Result<bool, CoreError>;

    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, CoreError>;
}

#[derive(Default)]
struct UserTable {
    last_id: UserRecordId,
    rows: BTreeMap<UserRecordId, User>,
}

/// Process-local user table. Ids count up from 1 and are never reused.
#[derive(Default)]
pub struct InMemoryUserStore {
    table: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, input: CreateUser) -> Result<User, CoreError> {
        let mut table = self.table.write().await;
        if table.rows.values().any(|u| u.email == input.email) {
            return Err(CoreError::Conflict(EMAIL_TAKEN_MSG.into()));
        }

        table.last_id += 1;
        let user = User {
            id: table.last_id,
            email: input.email,
            password_hash: input.password_hash,
            role: input.role,
            parking_zone: input.parking_zone,
        };
        table.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool, CoreError> {
        let mut table = self.table.write().await;
        match table.rows.values_mut().find(|u| u.email == email) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: UserRecordId) -> Result<bool, CoreError> {
        Ok(self.table.write().await.rows.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }
}
