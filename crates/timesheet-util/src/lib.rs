//! Shared utilities for the timesheet workspace
//!
//! This crate provides:
//! - ID types (StudentId, EntryId, SessionToken)
//! - Time utilities (wall-clock time of day, weekdays, injectable clocks)
//! - Error types
//! - Default paths for the configuration file

mod error;
mod ids;
mod paths;
mod time;

pub use error::*;
pub use ids::*;
pub use paths::*;
pub use time::*;
