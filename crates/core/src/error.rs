use crate::types::UserRecordId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound {
        entity: &'static str,
        id: UserRecordId,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Malformed occupancy snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Occupancy snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
