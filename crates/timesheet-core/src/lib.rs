//! Core of the timesheet front ends
//!
//! This crate contains:
//! - Status evaluation (current / next / upcoming / completed / scheduled)
//! - Session token construction
//! - The timesheet store state machine (Idle -> Loading -> Loaded | Errored)
//! - Periodic refresh tasks with cancellation handles
//! - Summary helpers for renderers

mod evaluator;
mod events;
mod session;
mod store;
mod summary;
mod ticker;

pub use evaluator::*;
pub use events::*;
pub use session::*;
pub use store::*;
pub use summary::*;
pub use ticker::*;
