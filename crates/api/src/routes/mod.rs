pub mod auth;
pub mod health;
pub mod parking;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the application route tree.
///
/// Route hierarchy:
///
/// ```text
/// /register                  register (POST)
/// /login                     login (POST)
/// /change-password           change or reset password (POST)
///
/// /users                     list (GET)
/// /users/{id}                delete (DELETE)
///
/// /parking                   lots with per-user status (GET, ?user_id=)
/// /parking/claim             claim a spot (POST)
/// /parking/unclaim           release a spot (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .nest("/users", users::router())
        .nest("/parking", parking::router())
}
