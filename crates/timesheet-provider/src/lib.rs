//! Timesheet data providers
//!
//! This crate defines the interface between the timesheet store and the
//! places timesheets come from:
//! - [`TimesheetProvider`], the provider trait
//! - [`MockProvider`], a fixed in-memory roster with simulated latency
//! - [`RemoteProvider`], a JSON-over-HTTP client for the timesheet endpoint

mod mock;
mod remote;
mod traits;

pub use mock::*;
pub use remote::*;
pub use traits::*;
