//! Per-requester view of the parking lots.
//!
//! The composed view is derived on every request from the latest snapshot
//! and a copy of the claim table. It is a projection: neither input is
//! modified, and lot and spot order follow the snapshot.

use crate::snapshot::{Lot, Snapshot, SpotStatus};
use crate::types::ClaimMap;

/// Effective status of one spot for `requester`.
///
/// - claimed by the requester -> `Claimed`
/// - claimed by anyone else -> `Taken`
/// - unclaimed -> the raw sensor status
pub fn effective_status(
    raw: SpotStatus,
    owner: Option<&str>,
    requester: &str,
) -> SpotStatus {
    match owner {
        Some(owner) if owner == requester => SpotStatus::Claimed,
        Some(_) => SpotStatus::Taken,
        None => raw,
    }
}

/// Build the response payload for `GET /parking`.
///
/// Without a requester the snapshot's lots are returned untouched, so every
/// status stays `available` or `occupied`.
pub fn compose_view(snapshot: &Snapshot, claims: &ClaimMap, requester: Option<&str>) -> Vec<Lot> {
    let Some(requester) = requester else {
        return snapshot.lots.clone();
    };

    snapshot
        .lots
        .iter()
        .map(|lot| {
            let mut lot = lot.clone();
            for spot in &mut lot.parking_status {
                let owner = claims.get(&spot.spot_id).map(String::as_str);
                spot.status = effective_status(spot.status, owner, requester);
            }
            lot
        })
        .collect()
}
