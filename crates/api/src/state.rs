use std::sync::Arc;

use stables_core::claims::{ClaimStore, InMemoryClaimStore};
use stables_core::snapshot::{FileSnapshotSource, SnapshotReader};
use stables_core::users::{InMemoryUserStore, UserStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Spot claim registry, shared by every request.
    pub claims: Arc<dyn ClaimStore>,
    /// User credential store.
    pub users: Arc<dyn UserStore>,
    /// Latest occupancy snapshot.
    pub snapshots: Arc<SnapshotReader>,
}

impl AppState {
    /// Build state with the in-memory claim and user stores and a
    /// file-backed snapshot reader pointed at `config.snapshot.path`.
    pub fn in_memory(config: ServerConfig) -> Self {
        let source = Arc::new(FileSnapshotSource::new(config.snapshot.path.clone()));
        let snapshots = Arc::new(SnapshotReader::new(source, config.snapshot.max_age));

        Self {
            config: Arc::new(config),
            claims: Arc::new(InMemoryClaimStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            snapshots,
        }
    }
}
