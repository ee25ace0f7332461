//! The structs
//!
use thiserror::Error;

/// The decoded root of `/debug/vars`.
///
/// ```text
/// {
///   "cmdline": ["/usr/local/bin/server"],
///   "memstats": {
///     "Alloc": 1453096,
///     "TotalAlloc": 1453096,
///     "Sys": 7947264,
///     "Lookups": 0,
///     "Mallocs": 4532,
///     "HeapAlloc": 1453096,
///     "HeapSys": 3801088,
///     "HeapIdle": 1466368,
///     "HeapInuse": 2334720,
///     "HeapReleased": 1433600,
///     "HeapObjects": 3989,
///     ...
///   }
/// }
/// ```
/// Only the top level is required to be an object; everything else is looked up on demand.
pub type VarsDocument = serde_json::Map<String, serde_json::Value>;

/// The memory statistics record that is emitted for every successful poll.
///
/// The field names are serialized in the casing of the expvar `memstats` object,
/// with the exception of `HeapInUse`, which the endpoint spells `HeapInuse`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct MemoryStatsRecord {
    /// RFC3339 capture time.
    pub timestamp: String,
    /// The same instant as `timestamp`, in seconds since the epoch.
    pub timestamp_unix: i64,
    pub alloc: u64,
    pub total_alloc: u64,
    pub sys: u64,
    pub heap_in_use: u64,
    pub heap_alloc: u64,
    pub heap_idle: u64,
    pub heap_released: u64,
    pub heap_objects: u64,
    pub heap_sys: u64,
}

/// Everything that can be wrong with the shape of a vars document.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SchemaError {
    #[error("expected \"memstats\" in response, but missing")]
    MissingMemstats,
    #[error("expected \"memstats\" to be an object")]
    MemstatsNotObject,
    #[error("invalid memstats fields: missing: {missing:?}, not a number: {wrong_type:?}")]
    Fields {
        missing: Vec<&'static str>,
        wrong_type: Vec<&'static str>,
    },
}
