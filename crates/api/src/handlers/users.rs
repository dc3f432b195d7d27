//! Handlers for the `/users` resource.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use stables_core::error::CoreError;
use stables_core::types::UserRecordId;
use stables_core::users::UserResponse;

use crate::error::AppResult;
use crate::handlers::auth::MessageResponse;
use crate::state::AppState;

/// GET /users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// DELETE /users/{id}
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<UserRecordId>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Path(id) = id?;

    if !state.users.delete(id).await? {
        return Err(CoreError::NotFound { entity: "User", id }.into());
    }
    tracing::info!(user_id = id, "User deleted");

    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
