//! Module for polling `/debug/vars` on a fixed interval.
//!
//! Every tick performs one HTTP GET, extracts the memory statistics and writes them as a JSON line.
//! A failed tick is counted and skipped; the next tick is the only retry.
//! Once the number of failed ticks reaches the ceiling, the loop stops and returns [`CeilingBreached`].
//!
mod structs;
mod functions;

pub use structs::*;
pub use functions::*;
