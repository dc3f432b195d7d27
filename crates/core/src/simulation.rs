//! Simulated parking sensors.
//!
//! Stands in for the campus sensor feed during development and demos. Each
//! generation picks a random number of free spots per lot; the first
//! `available_spots` spots are reported `available` and the remainder
//! `occupied`.

use std::path::Path;

use rand::Rng;
use serde_json::Map;

use crate::error::CoreError;
use crate::snapshot::{Lot, Snapshot, Spot, SpotStatus};
use crate::types::Timestamp;

/// Static description of a simulated lot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedLot {
    pub lot_id: String,
    pub zone_type: String,
    pub total_spots: u32,
}

impl SimulatedLot {
    pub fn new(lot_id: &str, zone_type: &str, total_spots: u32) -> Self {
        Self {
            lot_id: lot_id.to_string(),
            zone_type: zone_type.to_string(),
            total_spots,
        }
    }
}

/// The three campus lots the sensor feed covers.
pub fn default_lots() -> Vec<SimulatedLot> {
    vec![
        SimulatedLot::new("Lot_A", "zone_1", 50),
        SimulatedLot::new("Lot_B", "zone_2", 30),
        SimulatedLot::new("Lot_C", "zone_3", 40),
    ]
}

/// Parse a lot list of the form `Lot_A:zone_1:50,Lot_B:zone_2:30`.
pub fn parse_lot_list(list: &str) -> Result<Vec<SimulatedLot>, CoreError> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            match parts.as_slice() {
                [lot_id, zone_type, total] if !lot_id.is_empty() => {
                    let total_spots = total.parse::<u32>().map_err(|_| {
                        CoreError::InvalidInput(format!(
                            "lot '{lot_id}': spot count '{total}' is not a number"
                        ))
                    })?;
                    Ok(SimulatedLot::new(lot_id, zone_type, total_spots))
                }
                _ => Err(CoreError::InvalidInput(format!(
                    "lot entry '{entry}' must look like LOT_ID:ZONE:SPOTS"
                ))),
            }
        })
        .collect()
}

/// Spot identifier for the `index`-th (1-based) spot of a lot.
pub fn spot_id(lot_id: &str, index: u32) -> String {
    format!("{lot_id}_Spot_id_{index}")
}

/// Generate one occupancy document for `lots`.
pub fn generate_snapshot<R: Rng>(
    lots: &[SimulatedLot],
    rng: &mut R,
    now: Timestamp,
) -> Snapshot {
    let updated_at = now.to_rfc3339();

    let lots = lots
        .iter()
        .map(|lot| {
            let available = rng.random_range(0..=lot.total_spots);
            let parking_status = (1..=lot.total_spots)
                .map(|i| Spot {
                    spot_id: spot_id(&lot.lot_id, i),
                    status: if i <= available {
                        SpotStatus::Available
                    } else {
                        SpotStatus::Occupied
                    },
                    extra: Map::new(),
                })
                .collect();

            Lot {
                lot_id: lot.lot_id.clone(),
                zone_type: Some(lot.zone_type.clone()),
                total_spots: Some(lot.total_spots),
                available_spots: Some(available),
                updated_at: Some(updated_at.clone()),
                parking_status,
                extra: Map::new(),
            }
        })
        .collect();

    Snapshot { lots }
}

/// Write `snapshot` to `path` so readers never see a partial document.
///
/// The JSON is written to a sibling temp file which is then renamed over the
/// target.
pub async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), CoreError> {
    let json = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| CoreError::Internal(format!("serialize snapshot: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CoreError::Internal(format!("create {}: {e}", parent.display())))?;
    }

    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, &json)
        .await
        .map_err(|e| CoreError::Internal(format!("write {}: {e}", tmp.display())))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| CoreError::Internal(format!("rename onto {}: {e}", path.display())))?;

    Ok(())
}
