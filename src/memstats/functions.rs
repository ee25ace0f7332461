//! The impls and functions
//!
use chrono::{DateTime, Local, SecondsFormat};
use serde_json::{Map, Number, Value};
use crate::memstats::{MemoryStatsRecord, SchemaError, VarsDocument};

/// The key in `/debug/vars` that holds the runtime memory statistics.
pub const MEMSTATS_KEY: &str = "memstats";

/// The `memstats` fields that are read, in the order of the record fields.
const MEMSTATS_FIELDS: [&str; 9] = [
    "Alloc",
    "TotalAlloc",
    "Sys",
    "HeapInuse",
    "HeapAlloc",
    "HeapIdle",
    "HeapReleased",
    "HeapObjects",
    "HeapSys",
];

impl MemoryStatsRecord {
    /// Locate the `memstats` object in a decoded vars document and extract the record from it.
    pub fn from_vars(
        vars: &VarsDocument,
    ) -> Result<MemoryStatsRecord, SchemaError>
    {
        match vars.get(MEMSTATS_KEY)
        {
            Some(Value::Object(memstats)) => MemoryStatsRecord::from_memstats(memstats),
            Some(_) => Err(SchemaError::MemstatsNotObject),
            None => Err(SchemaError::MissingMemstats),
        }
    }
    /// Validate the `memstats` object and convert the required fields.
    ///
    /// All fields are checked before returning, so the error lists every missing
    /// and every non-numeric field at once.
    /// The timestamp is taken here, after validation, so it reflects record construction.
    pub fn from_memstats(
        memstats: &Map<String, Value>,
    ) -> Result<MemoryStatsRecord, SchemaError>
    {
        let mut counters = [0_u64; MEMSTATS_FIELDS.len()];
        let mut missing = Vec::new();
        let mut wrong_type = Vec::new();

        for (counter, name) in counters.iter_mut().zip(MEMSTATS_FIELDS)
        {
            match memstats.get(name)
            {
                Some(Value::Number(number)) => *counter = number_to_u64(number),
                Some(_) => wrong_type.push(name),
                None => missing.push(name),
            }
        }

        if !missing.is_empty() || !wrong_type.is_empty()
        {
            return Err(SchemaError::Fields { missing, wrong_type });
        }

        Ok(MemoryStatsRecord::captured_at(Local::now(), counters))
    }
    fn captured_at(
        timestamp: DateTime<Local>,
        counters: [u64; MEMSTATS_FIELDS.len()],
    ) -> MemoryStatsRecord
    {
        let [alloc, total_alloc, sys, heap_in_use, heap_alloc, heap_idle, heap_released, heap_objects, heap_sys] = counters;
        MemoryStatsRecord {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            timestamp_unix: timestamp.timestamp(),
            alloc,
            total_alloc,
            sys,
            heap_in_use,
            heap_alloc,
            heap_idle,
            heap_released,
            heap_objects,
            heap_sys,
        }
    }
    /// The record as a single line of JSON, including the trailing newline.
    pub fn to_json_line(&self) -> serde_json::Result<Vec<u8>>
    {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

// JSON numbers are doubles for the publishing runtime, so anything that is not an exact
// unsigned integer is truncated. Negative values saturate to zero.
fn number_to_u64(number: &Number) -> u64
{
    number.as_u64()
        .unwrap_or_else(|| number.as_f64().map_or(0, |value| value as u64))
}
