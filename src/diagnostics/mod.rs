//! Serializable run reports.
//!
//! [`RmMapReport`] accounts for every pixel of an RM map run (masked, fitted,
//! failed, skipped). [`TimingBreakdown`] collects per-step durations for
//! callers that chain several stages.

pub mod rm_map;
pub mod timing;

pub use rm_map::RmMapReport;
pub use timing::{StageTiming, TimingBreakdown};
