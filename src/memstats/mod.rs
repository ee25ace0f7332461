//! Module for turning the `memstats` object of `/debug/vars` into a memory statistics record.
//!
//! The expvar endpoint publishes the runtime memory statistics of the process as a nested object.
//! This module only picks the nine counters that matter for memory telemetry,
//! validates them, and stamps them with the capture time.
//!
mod structs;
mod functions;

pub use structs::*;
pub use functions::*;
