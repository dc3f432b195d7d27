//! Occupancy snapshot model and reader.
//!
//! A snapshot is the full occupancy document produced by the sensor
//! generator: an array of lots, each carrying an ordered `parking_status`
//! list of spots with a raw `available`/`occupied` status. A new document
//! replaces the previous one wholesale; nothing is merged field by field.
//!
//! [`SnapshotReader`] publishes each load through an atomically swapped
//! `Arc`, so request handlers never observe a half-written snapshot while a
//! refresh is in flight.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// Status of a single spot.
///
/// Raw snapshots only ever contain `Available` and `Occupied`; `Claimed` and
/// `Taken` are produced by the view composer for a specific requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Occupied,
    Claimed,
    Taken,
}

impl SpotStatus {
    /// Whether this status can appear in a sensor-produced document.
    pub fn is_raw(self) -> bool {
        matches!(self, SpotStatus::Available | SpotStatus::Occupied)
    }
}

/// One parking spot inside a lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub spot_id: String,
    pub status: SpotStatus,
    /// Generator fields this service does not interpret; passed through as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One parking lot and its spots, in generator order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub lot_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_spots: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_spots: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub parking_status: Vec<Spot>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A complete occupancy document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    pub lots: Vec<Lot>,
}

impl Snapshot {
    /// Parse and validate a JSON occupancy document.
    ///
    /// Fails with [`CoreError::MalformedSnapshot`] when the bytes are not
    /// JSON, do not have the lot/spot shape, or break a snapshot invariant.
    pub fn from_json(bytes: &[u8]) -> Result<Self, CoreError> {
        let snapshot: Snapshot = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::MalformedSnapshot(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check snapshot invariants.
    ///
    /// - every spot id is non-empty and unique within its lot
    /// - every status is a raw sensor status
    pub fn validate(&self) -> Result<(), CoreError> {
        for lot in &self.lots {
            let mut seen = HashSet::with_capacity(lot.parking_status.len());
            for spot in &lot.parking_status {
                if spot.spot_id.is_empty() {
                    return Err(CoreError::MalformedSnapshot(format!(
                        "lot {} contains a spot with an empty spot_id",
                        lot.lot_id
                    )));
                }
                if !spot.status.is_raw() {
                    return Err(CoreError::MalformedSnapshot(format!(
                        "spot {} has non-sensor status {:?}",
                        spot.spot_id, spot.status
                    )));
                }
                if !seen.insert(spot.spot_id.as_str()) {
                    return Err(CoreError::MalformedSnapshot(format!(
                        "spot {} appears twice in lot {}",
                        spot.spot_id, lot.lot_id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Total number of spots across all lots.
    pub fn spot_count(&self) -> usize {
        self.lots.iter().map(|lot| lot.parking_status.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Where occupancy documents come from.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    /// Load and parse the most recent document.
    async fn load(&self) -> Result<Snapshot, CoreError>;
}

/// Reads the document the sensor generator writes to disk.
#[derive(Debug, Clone)]
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn load(&self) -> Result<Snapshot, CoreError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => CoreError::SnapshotUnavailable(format!(
                "{} does not exist",
                self.path.display()
            )),
            _ => CoreError::SnapshotUnavailable(format!("{}: {e}", self.path.display())),
        })?;
        Snapshot::from_json(&bytes)
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Result of one load attempt, published as a unit.
struct LoadOutcome {
    /// Order in which the load started; a later load always wins.
    seq: u64,
    loaded_at: Instant,
    result: Result<Arc<Snapshot>, CoreError>,
    last_good: Option<Arc<Snapshot>>,
}

/// Caches the latest load attempt and reloads once it is older than `max_age`.
///
/// A failed load is published like a successful one: requests inside the
/// freshness window see the failure instead of a silently stale view. The
/// last successfully parsed snapshot is kept separately for reporting.
///
/// Loads are serialized: concurrent stale requests wait for one reload
/// instead of each reading the source, and an outcome is never published
/// over one from a later load.
pub struct SnapshotReader {
    source: Arc<dyn SnapshotSource>,
    latest: ArcSwapOption<LoadOutcome>,
    next_seq: AtomicU64,
    reload: Mutex<()>,
    max_age: Duration,
}

impl SnapshotReader {
    pub fn new(source: Arc<dyn SnapshotSource>, max_age: Duration) -> Self {
        Self {
            source,
            latest: ArcSwapOption::empty(),
            next_seq: AtomicU64::new(1),
            reload: Mutex::new(()),
            max_age,
        }
    }

    /// Load from the source now and publish the outcome.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _guard = self.reload.lock().await;
        self.load_and_publish().await
    }

    /// Latest published snapshot, reloading synchronously if it has gone stale.
    pub async fn current(&self) -> Result<Arc<Snapshot>, CoreError> {
        if let Some(result) = self.fresh() {
            return result;
        }

        let _guard = self.reload.lock().await;
        // Another request may have reloaded while we waited.
        if let Some(result) = self.fresh() {
            return result;
        }
        self.load_and_publish().await
    }

    /// Most recent snapshot that parsed successfully, regardless of age.
    pub fn last_good(&self) -> Option<Arc<Snapshot>> {
        self.latest
            .load_full()
            .and_then(|outcome| outcome.last_good.clone())
    }

    fn fresh(&self) -> Option<Result<Arc<Snapshot>, CoreError>> {
        self.latest
            .load_full()
            .filter(|outcome| outcome.loaded_at.elapsed() <= self.max_age)
            .map(|outcome| outcome.result.clone())
    }

    async fn load_and_publish(&self) -> Result<Arc<Snapshot>, CoreError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let result = self.source.load().await.map(Arc::new);

        let last_good = match &result {
            Ok(snapshot) => Some(Arc::clone(snapshot)),
            Err(_) => self.last_good(),
        };

        self.publish(Arc::new(LoadOutcome {
            seq,
            loaded_at: Instant::now(),
            result: result.clone(),
            last_good,
        }));

        result
    }

    fn publish(&self, outcome: Arc<LoadOutcome>) {
        self.latest.rcu(|current| match current {
            Some(existing) if existing.seq > outcome.seq => Some(Arc::clone(existing)),
            _ => Some(Arc::clone(&outcome)),
        });
    }
}
