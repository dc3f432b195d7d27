//! Domain logic for the Stables parking-status service.
//!
//! Holds the claim registry, occupancy snapshot model and reader, the view
//! composer, the sensor simulator and the user store. Nothing in here knows
//! about HTTP; the `stables-api` crate wires these pieces into handlers.

pub mod claims;
pub mod error;
pub mod simulation;
pub mod snapshot;
pub mod types;
pub mod users;
pub mod view;
