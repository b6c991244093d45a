//! Taskboard Common
//!
//! Shared utilities used across the Taskboard workspace:
//! - [`logging`] - structured logging initialization (text or JSON)
//! - [`tsid`] - time-sorted ID generation for stored records

pub mod logging;
pub mod tsid;

pub use tsid::TsidGenerator;
