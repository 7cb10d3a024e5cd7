//! Binary snapshots of aggregator state
//!
//! The host owns persistence; this module only turns an [`IntervalSet`] into
//! bytes and back using postcard. Restored state is checked for structural
//! sanity before it is handed out.

extern crate alloc;
use alloc::vec::Vec;

use log::debug;
use thiserror_no_std::Error;

use super::IntervalSet;

/// Errors from encoding or restoring a snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization failed
    #[error("Failed to encode snapshot: {0}")]
    Encode(postcard::Error),

    /// The bytes are not a postcard-encoded interval set
    #[error("Failed to decode snapshot: {0}")]
    Decode(postcard::Error),

    /// Decoded, but indices or aggregates are out of range
    #[error("Snapshot is structurally invalid")]
    Corrupt,
}

impl IntervalSet {
    /// Encode the full state (configuration, buffers, aggregates)
    pub fn to_snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        postcard::to_allocvec(self).map_err(SnapshotError::Encode)
    }

    /// Restore a set previously produced by [`IntervalSet::to_snapshot`]
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let set: Self = postcard::from_bytes(bytes).map_err(SnapshotError::Decode)?;
        if !set.is_consistent() {
            return Err(SnapshotError::Corrupt);
        }
        debug!(
            "Restored interval set with {} levels from {} bytes",
            set.len(),
            bytes.len()
        );
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IntervalDefinition, default_intervals};
    use crate::storage::SeriesMap;
    use alloc::string::ToString;

    #[test]
    fn test_snapshot_restores_state() {
        let mut set = IntervalSet::new(&default_intervals());
        for i in 0..90 {
            let mut sample = SeriesMap::new();
            sample.insert("copper".to_string(), i as f64);
            if i % 3 == 0 {
                sample.insert("coal".to_string(), 1.5);
            }
            set.insert(sample);
        }

        let bytes = set.to_snapshot().unwrap();
        let restored = IntervalSet::from_snapshot(&bytes).unwrap();

        assert_eq!(restored, set);
        assert_eq!(restored.level(0).unwrap().write_index(), 30);
        assert_eq!(
            restored.by_name("10m").unwrap().average("coal"),
            set.by_name("10m").unwrap().average("coal")
        );
    }

    #[test]
    fn test_restored_set_keeps_cascading() {
        let definitions = [
            IntervalDefinition::new("fine", 1, 4, Some(2)),
            IntervalDefinition::new("coarse", 2, 4, None),
        ];
        let mut set = IntervalSet::new(&definitions);
        let mut one = SeriesMap::new();
        one.insert("a".to_string(), 4.0);
        set.insert(one.clone());

        let mut restored = IntervalSet::from_snapshot(&set.to_snapshot().unwrap()).unwrap();
        assert_eq!(restored.insert(one), 2);
        assert_eq!(restored.level(1).unwrap().average("a"), Some(4.0));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            IntervalSet::from_snapshot(&[0xff, 0xff, 0xff]),
            Err(SnapshotError::Decode(_))
        ));
    }

    #[test]
    fn test_empty_levels_are_corrupt() {
        let set = IntervalSet::new(&[IntervalDefinition::new("zero", 1, 0, None)]);
        let bytes = set.to_snapshot().unwrap();
        assert!(matches!(
            IntervalSet::from_snapshot(&bytes),
            Err(SnapshotError::Corrupt)
        ));
    }
}
