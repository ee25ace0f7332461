//! The structs
//!
use std::time::Duration;
use thiserror::Error;
use crate::memstats::SchemaError;
use crate::{DEFAULT_ADDR, DEFAULT_INTERVAL, DEFAULT_MAX_ERRORS};

/// The poller settings; fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// hostname:port of the process publishing `/debug/vars`.
    pub addr: String,
    pub interval: Duration,
    /// The number of failed ticks after which polling stops.
    pub max_errors: u32,
    /// Per request timeout. Without it, the request can take as long as the transport allows.
    pub timeout: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            addr: DEFAULT_ADDR.to_string(),
            interval: Duration::from_secs(DEFAULT_INTERVAL),
            max_errors: DEFAULT_MAX_ERRORS,
            timeout: None,
        }
    }
}

/// Cumulative count of failed ticks. It is never decremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCounter {
    pub(crate) count: u32,
    pub(crate) ceiling: u32,
}

/// The ways a single tick can fail. Each one counts as exactly one error.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("error fetching expvars: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("error decoding response from expvar check: {0}")]
    Decode(#[from] DecodeError),
    #[error("error: {0}")]
    Schema(#[from] SchemaError),
    #[error("error encoding memory stats as JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why the response did not yield a vars document.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("error reading response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("empty response")]
    Empty,
}

/// Returned by the poll loop when the error ceiling is reached.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("maximum error threshold of {ceiling} breached; exiting")]
pub struct CeilingBreached {
    pub ceiling: u32,
    pub failures: u32,
}
