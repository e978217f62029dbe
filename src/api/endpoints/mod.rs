//! API endpoint handlers.
//!
//! Handlers are thin: they validate the request shape and hand the work to
//! [`ReportProcessor`](crate::pipeline::processor::ReportProcessor) on the
//! blocking pool.

pub mod analyze;
pub mod health;
pub mod reports;
