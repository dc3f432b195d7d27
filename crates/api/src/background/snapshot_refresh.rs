//! Periodic reload of the occupancy snapshot.
//!
//! Keeps the published snapshot fresh so `GET /parking` rarely has to read
//! the document itself. Runs on a fixed interval using
//! `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use stables_core::snapshot::SnapshotReader;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Run the snapshot refresh loop until `cancel` is triggered.
///
/// A failed load is logged; the failure stays published until the next
/// successful tick so requests report it rather than serving stale data.
pub async fn run(reader: Arc<SnapshotReader>, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        interval_ms = interval.as_millis() as u64,
        "Snapshot refresh job started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut healthy = true;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Snapshot refresh job stopping");
                break;
            }
            _ = ticker.tick() => {
                match reader.refresh().await {
                    Ok(snapshot) => {
                        if !healthy {
                            tracing::info!("Snapshot refresh recovered");
                            healthy = true;
                        }
                        tracing::trace!(
                            lots = snapshot.lots.len(),
                            spots = snapshot.spot_count(),
                            "Snapshot refreshed"
                        );
                    }
                    Err(e) => {
                        // Log once per failure streak; the source is polled every tick.
                        if healthy {
                            tracing::warn!(error = %e, "Snapshot refresh failed");
                            healthy = false;
                        }
                    }
                }
            }
        }
    }
}
