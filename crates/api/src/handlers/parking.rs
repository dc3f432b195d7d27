//! Handlers for the `/parking` resource (view, claim, unclaim).

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use stables_core::claims::validate_claim_ids;
use stables_core::snapshot::Lot;
use stables_core::view::compose_view;

use crate::error::AppResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A spot or user id as sent by clients: either a string or the integer
/// `id` that `/login` returns.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ClaimId {
    Text(String),
    Number(i64),
}

impl ClaimId {
    fn into_string(self) -> String {
        match self {
            ClaimId::Text(s) => s,
            ClaimId::Number(n) => n.to_string(),
        }
    }
}

/// Request body for `POST /parking/claim` and `POST /parking/unclaim`.
///
/// Fields are optional so a missing or `null` id reports the same 400 as an
/// empty one instead of a deserialization error.
#[derive(Debug, Deserialize)]
pub struct ClaimRequest {
    pub spot_id: Option<ClaimId>,
    pub user_id: Option<ClaimId>,
}

impl ClaimRequest {
    fn into_ids(self) -> AppResult<(String, String)> {
        let spot_id = self.spot_id.map(ClaimId::into_string).unwrap_or_default();
        let user_id = self.user_id.map(ClaimId::into_string).unwrap_or_default();
        validate_claim_ids(&spot_id, &user_id)?;
        Ok((spot_id, user_id))
    }
}

/// Successful claim/unclaim response.
#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub success: bool,
    pub spot_id: String,
}

/// Query parameters for `GET /parking`.
#[derive(Debug, Deserialize)]
pub struct ParkingQuery {
    pub user_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /parking
///
/// Returns every lot with its spots. With `?user_id=` each spot's status is
/// the requester's effective status (`claimed`/`taken` where a claim exists).
pub async fn list_lots(
    State(state): State<AppState>,
    query: Result<Query<ParkingQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Lot>>> {
    let Query(query) = query?;
    let requester = query.user_id.as_deref().filter(|id| !id.is_empty());

    let snapshot = state.snapshots.current().await?;
    let lots = match requester {
        Some(_) => {
            let claims = state.claims.snapshot().await?;
            compose_view(&snapshot, &claims, requester)
        }
        None => snapshot.lots.clone(),
    };

    Ok(Json(lots))
}

/// POST /parking/claim
///
/// Claim a spot for a user. Re-claiming one's own spot succeeds; a spot held
/// by someone else returns 409.
pub async fn claim(
    State(state): State<AppState>,
    payload: Result<Json<ClaimRequest>, JsonRejection>,
) -> AppResult<Json<ClaimResponse>> {
    let Json(input) = payload?;
    let (spot_id, user_id) = input.into_ids()?;

    if let Err(e) = state.claims.claim(&spot_id, &user_id).await {
        tracing::info!(%spot_id, %user_id, error = %e, "Claim rejected");
        return Err(e.into());
    }
    tracing::info!(%spot_id, %user_id, "Spot claimed");

    Ok(Json(ClaimResponse {
        success: true,
        spot_id,
    }))
}

/// POST /parking/unclaim
///
/// Release a spot. Only the current owner may release it; anyone else
/// (including when the spot is unclaimed) gets 403.
pub async fn unclaim(
    State(state): State<AppState>,
    payload: Result<Json<ClaimRequest>, JsonRejection>,
) -> AppResult<Json<ClaimResponse>> {
    let Json(input) = payload?;
    let (spot_id, user_id) = input.into_ids()?;

    if let Err(e) = state.claims.unclaim(&spot_id, &user_id).await {
        tracing::info!(%spot_id, %user_id, error = %e, "Unclaim rejected");
        return Err(e.into());
    }
    tracing::info!(%spot_id, %user_id, "Spot released");

    Ok(Json(ClaimResponse {
        success: true,
        spot_id,
    }))
}
