//! Shared types for the timesheet workspace
//!
//! This crate defines the data exchanged between providers, the store and
//! front ends:
//! - Students and schedule entries (with their JSON wire names)
//! - Provider requests and results
//! - Class status classification values

mod types;

pub use types::*;

/// Path of the remote timesheet endpoint
pub const TIMESHEET_ENDPOINT: &str = "/api/student/timesheet";
