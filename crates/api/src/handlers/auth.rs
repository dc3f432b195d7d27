//! Handlers for account endpoints (register, login, change-password).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use stables_core::error::CoreError;
use stables_core::users::{CreateUser, Role, UserResponse};

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const INVALID_CREDENTIALS_MSG: &str = "Invalid email or password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub parking_zone: Option<i64>,
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /change-password`.
///
/// Omitting `oldPassword` performs a reset instead of a change.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: Option<String>,
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

/// `{ "message": ... }` acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /register
///
/// Create a `user`-role account. Returns 201.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let Json(input) = payload?;
    let (email, password) = required_pair(
        input.email.as_deref(),
        input.password.as_deref(),
        "Email and password are required",
    )?;
    validate_password_strength(password, MIN_PASSWORD_LENGTH).map_err(AppError::BadRequest)?;

    let password_hash = hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = state
        .users
        .insert(CreateUser {
            email: email.to_string(),
            password_hash,
            role: Role::User,
            parking_zone: input.parking_zone,
        })
        .await;

    match created {
        Ok(user) => {
            tracing::info!(user_id = user.id, email, "User registered");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse {
                    message: "User registered successfully",
                }),
            ))
        }
        // Duplicate registration is reported as a plain 400.
        Err(CoreError::Conflict(msg)) => Err(AppError::BadRequest(msg)),
        Err(e) => Err(e.into()),
    }
}

/// POST /login
///
/// Check credentials and return the user's profile.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<UserResponse>> {
    let Json(input) = payload?;
    let (email, password) = required_pair(
        input.email.as_deref(),
        input.password.as_deref(),
        "Email and password are required",
    )?;

    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| CoreError::Unauthorized(INVALID_CREDENTIALS_MSG.into()))?;

    let valid = verify_password(password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        tracing::info!(email, "Login failed");
        return Err(CoreError::Unauthorized(INVALID_CREDENTIALS_MSG.into()).into());
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(UserResponse::from(&user)))
}

/// POST /change-password
///
/// With `oldPassword`: verify it, then set `newPassword`. Without it: reset
/// the password outright.
pub async fn change_password(
    State(state): State<AppState>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(input) = payload?;
    let (email, new_password) = required_pair(
        input.email.as_deref(),
        input.new_password.as_deref(),
        "Email and new password are required",
    )?;
    validate_password_strength(new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::BadRequest)?;

    let user = state
        .users
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let is_reset = match input.old_password.as_deref() {
        Some(old) if !old.is_empty() => {
            let valid = verify_password(old, &user.password_hash).map_err(|e| {
                AppError::InternalError(format!("Password verification error: {e}"))
            })?;
            if !valid {
                return Err(
                    CoreError::Unauthorized("Current password is incorrect".into()).into(),
                );
            }
            false
        }
        _ => true,
    };

    let password_hash = hash_password(new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    if !state.users.update_password(email, &password_hash).await? {
        // Deleted between the lookup and the update.
        return Err(AppError::NotFound("User not found".into()));
    }

    tracing::info!(user_id = user.id, is_reset, "Password updated");
    let message = if is_reset {
        "Password reset successfully"
    } else {
        "Password changed successfully"
    };
    Ok(Json(MessageResponse { message }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Both values must be present and non-empty.
fn required_pair<'a>(
    first: Option<&'a str>,
    second: Option<&'a str>,
    message: &str,
) -> AppResult<(&'a str, &'a str)> {
    match (first, second) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => Ok((a, b)),
        _ => Err(CoreError::InvalidInput(message.to_string()).into()),
    }
}
