//! Simulated sensor feed.
//!
//! Writes a freshly generated occupancy document to the snapshot path on a
//! fixed interval. Only spawned when `SENSOR_SIMULATION` is enabled.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use stables_core::simulation::{generate_snapshot, write_snapshot, SimulatedLot};
use tokio_util::sync::CancellationToken;

/// Run the generator loop until `cancel` is triggered.
pub async fn run(
    path: PathBuf,
    lots: Vec<SimulatedLot>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        path = %path.display(),
        lots = lots.len(),
        interval_ms = interval.as_millis() as u64,
        "Sensor simulation started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Sensor simulation stopping");
                break;
            }
            _ = ticker.tick() => {
                // ThreadRng is !Send, keep it out of the await below.
                let snapshot = {
                    let mut rng = rand::rng();
                    generate_snapshot(&lots, &mut rng, Utc::now())
                };
                match write_snapshot(&path, &snapshot).await {
                    Ok(()) => tracing::debug!(spots = snapshot.spot_count(), "Sensor data generated"),
                    Err(e) => tracing::error!(error = %e, "Sensor simulation: write failed"),
                }
            }
        }
    }
}
