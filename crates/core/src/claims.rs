//! Parking-spot claim registry.
//!
//! The registry is the single source of truth for spot ownership. A claim is
//! an exclusive, non-expiring association between a spot id and a user id;
//! it lives until its owner releases it (or the process restarts).
//!
//! Handlers only ever see [`ClaimStore`], so the in-memory table can later be
//! swapped for a shared store without touching call sites.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::types::ClaimMap;

/// Message returned when a spot is held by a different user.
pub const SPOT_TAKEN_MSG: &str = "Spot already taken";

/// Message returned when the caller does not own the claim it tries to release.
pub const CANNOT_UNCLAIM_MSG: &str = "Cannot unclaim this spot";

/// Message returned when either identifier is missing or empty.
pub const IDS_REQUIRED_MSG: &str = "spot_id and user_id are required";

/// Storage seam for spot claims.
///
/// Implementations must make the check-and-mutate in [`claim`](Self::claim)
/// and [`unclaim`](Self::unclaim) a single atomic step per spot: two distinct
/// users can never both own a spot, and an unclaim only succeeds against the
/// owner observed inside that same step.
#[async_trait]
pub trait ClaimStore: Send + Sync + 'static {
    /// Record `user_id` as the owner of `spot_id`.
    ///
    /// Succeeds when the spot is unclaimed or already owned by `user_id`.
    /// Fails with [`CoreError::Conflict`] when another user owns it, leaving
    /// the registry unchanged.
    async fn claim(&self, spot_id: &str, user_id: &str) -> Result<(), CoreError>;

    /// Release `spot_id` if and only if it is currently owned by `user_id`.
    ///
    /// Fails with [`CoreError::Forbidden`] otherwise, including when the spot
    /// has no claim at all.
    async fn unclaim(&self, spot_id: &str, user_id: &str) -> Result<(), CoreError>;

    /// Current owner of `spot_id`, if any.
    async fn lookup(&self, spot_id: &str) -> Result<Option<String>, CoreError>;

    /// Consistent copy of all claims, taken in one critical section.
    async fn snapshot(&self) -> Result<ClaimMap, CoreError>;

    /// Number of live claims.
    async fn count(&self) -> Result<usize, CoreError>;
}

/// Reject empty spot or user identifiers before touching the registry.
pub fn validate_claim_ids(spot_id: &str, user_id: &str) -> Result<(), CoreError> {
    if spot_id.is_empty() || user_id.is_empty() {
        return Err(CoreError::InvalidInput(IDS_REQUIRED_MSG.into()));
    }
    Ok(())
}

/// Process-local claim table guarded by a single `RwLock`.
///
/// Every mutation holds the write guard across its check and its write, so
/// per-spot operations are linearizable. Reads share the lock.
#[derive(Default)]
pub struct InMemoryClaimStore {
    claims: RwLock<HashMap<String, String>>,
}

impl InMemoryClaimStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn claim(&self, spot_id: &str, user_id: &str) -> Result<(), CoreError> {
        validate_claim_ids(spot_id, user_id)?;

        let mut claims = self.claims.write().await;
        match claims.get(spot_id) {
            Some(owner) if owner != user_id => Err(CoreError::Conflict(SPOT_TAKEN_MSG.into())),
            Some(_) => Ok(()),
            None => {
                claims.insert(spot_id.to_string(), user_id.to_string());
                Ok(())
            }
        }
    }

    async fn unclaim(&self, spot_id: &str, user_id: &str) -> Result<(), CoreError> {
        validate_claim_ids(spot_id, user_id)?;

        let mut claims = self.claims.write().await;
        match claims.get(spot_id) {
            Some(owner) if owner == user_id => {
                claims.remove(spot_id);
                Ok(())
            }
            _ => Err(CoreError::Forbidden(CANNOT_UNCLAIM_MSG.into())),
        }
    }

    async fn lookup(&self, spot_id: &str) -> Result<Option<String>, CoreError> {
        Ok(self.claims.read().await.get(spot_id).cloned())
    }

    async fn snapshot(&self) -> Result<ClaimMap, CoreError> {
        Ok(self.claims.read().await.clone())
    }

    async fn count(&self) -> Result<usize, CoreError> {
        Ok(self.claims.read().await.len())
    }
}
