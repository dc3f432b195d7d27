//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the stores in [`AppState`](crate::state::AppState)
//! and map errors via [`AppError`](crate::error::AppError).

pub mod auth;
pub mod parking;
pub mod users;
