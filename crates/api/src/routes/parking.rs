//! Route definitions for the `/parking` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::parking;
use crate::state::AppState;

/// Routes mounted at `/parking`.
///
/// ```text
/// GET  /          -> list_lots (?user_id=)
/// POST /claim     -> claim
/// POST /unclaim   -> unclaim
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(parking::list_lots))
        .route("/claim", post(parking::claim))
        .route("/unclaim", post(parking::unclaim))
}
