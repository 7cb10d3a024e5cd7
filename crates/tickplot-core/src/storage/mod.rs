//! Multi-resolution time-series storage
//!
//! Samples arrive once per sample period as open `series name -> value`
//! mappings. Each [`Interval`] keeps a fixed ring buffer of them plus running
//! sums and counts; an [`IntervalSet`] chains intervals so that every
//! `cascade_size` inserts at one level produce one averaged insert at the next.

extern crate alloc;
use alloc::collections::BTreeMap;
use alloc::string::String;

pub mod interval;
pub mod interval_set;
pub mod snapshot;

pub use interval::Interval;
pub use interval_set::IntervalSet;
pub use snapshot::SnapshotError;

/// One sample: series name to value. Any subset of series may be present.
pub type SeriesMap = BTreeMap<String, f64>;
