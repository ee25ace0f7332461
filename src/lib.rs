//! Poll the expvar `/debug/vars` endpoint of a process and emit its memory statistics as JSON lines.
//!
//! - [`poller`]: the ticking loop, the error ceiling and the single tick.
//! - [`memstats`]: extraction of the memory statistics record from the vars document.
//! - [`utility`]: HTTP and configuration helpers.
//!
#[macro_use]
extern crate serde_derive;

pub mod memstats;
pub mod poller;
pub mod utility;

/// The address polled when neither `--addr` nor `ADDR` is set.
pub const DEFAULT_ADDR: &str = "localhost:6060";
/// Seconds between two polls.
pub const DEFAULT_INTERVAL: u64 = 30;
/// Number of failed polls after which the process stops.
pub const DEFAULT_MAX_ERRORS: u32 = 10;
