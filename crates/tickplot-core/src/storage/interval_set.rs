//! Chained intervals, finest resolution first.

extern crate alloc;
use alloc::vec::Vec;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::{Interval, SeriesMap};
use crate::config::{ConfigError, IntervalDefinition, validate_table};

/// Ordered set of [`Interval`]s forming one cascading aggregator
///
/// Created once from a level table and never resized. Inserting a sample
/// writes it to the finest level; every time a level completes a cascade
/// group the group's average is inserted into the next level, and so on.
///
/// ## Example cascade
///
/// With levels `1m (cascade 10) -> 10m (cascade 6) -> 1h`, sixty raw inserts
/// produce six inserts at `10m` and one at `1h`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// Build a set without validating the table.
    ///
    /// A cascade size that does not divide its level's capacity gives
    /// cascade boundaries that drift against buffer wraparound. That is
    /// logged but not rejected; use [`IntervalSet::try_new`] to reject it.
    pub fn new(definitions: &[IntervalDefinition]) -> Self {
        if let Err(e) = validate_table(definitions) {
            warn!("Building interval set from an invalid table: {}", e);
        }
        Self::build(definitions)
    }

    /// Build a set, rejecting tables that break the cascade preconditions
    pub fn try_new(definitions: &[IntervalDefinition]) -> Result<Self, ConfigError> {
        validate_table(definitions)?;
        Ok(Self::build(definitions))
    }

    fn build(definitions: &[IntervalDefinition]) -> Self {
        Self {
            intervals: definitions.iter().map(Interval::new).collect(),
        }
    }

    /// Insert one raw sample at the finest level and cascade as needed.
    ///
    /// An empty sample is legal and occupies a slot. Returns the number of
    /// levels that received a sample (1 when no cascade happened, 0 for a
    /// set with no levels).
    pub fn insert(&mut self, sample: SeriesMap) -> usize {
        let mut pending = Some(sample);
        let mut written = 0;

        for (level, interval) in self.intervals.iter_mut().enumerate() {
            let Some(sample) = pending.take() else {
                break;
            };

            written += 1;
            if interval.push(sample) {
                let merged = interval.consolidate();
                trace!(
                    "Cascade from level {} ({}) with {} series",
                    level,
                    interval.name(),
                    merged.len()
                );
                pending = Some(merged);
            }
        }

        written
    }

    /// Empty every level; configuration is kept.
    pub fn clear(&mut self) {
        debug!("Clearing {} interval levels", self.intervals.len());
        self.intervals.iter_mut().for_each(Interval::clear);
    }

    /// Level by index (0 = finest)
    pub fn level(&self, index: usize) -> Option<&Interval> {
        self.intervals.get(index)
    }

    /// Level by display label
    pub fn by_name(&self, name: &str) -> Option<&Interval> {
        self.intervals.iter().find(|interval| interval.name() == name)
    }

    /// All levels, finest first
    pub fn levels(&self) -> &[Interval] {
        &self.intervals
    }

    /// Number of levels
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// True for a set built from an empty table
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub(crate) fn is_consistent(&self) -> bool {
        self.intervals.iter().all(Interval::is_consistent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_intervals;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample(pairs: &[(&str, f64)]) -> SeriesMap {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    fn two_levels() -> IntervalSet {
        IntervalSet::try_new(&[
            IntervalDefinition::new("fine", 1, 6, Some(3)),
            IntervalDefinition::new("coarse", 3, 6, None),
        ])
        .unwrap()
    }

    #[test]
    fn test_two_inserts_do_not_cascade() {
        let mut set = two_levels();
        assert_eq!(set.insert(sample(&[("a", 1.0)])), 1);
        assert_eq!(set.insert(sample(&[("a", 2.0)])), 1);
        assert!(set.level(1).unwrap().is_empty());
    }

    #[test]
    fn test_three_inserts_cascade_once() {
        let mut set = two_levels();
        set.insert(sample(&[("a", 10.0)]));
        set.insert(sample(&[("a", 20.0)]));
        assert_eq!(set.insert(sample(&[("a", 30.0)])), 2);

        let coarse = set.level(1).unwrap();
        assert_eq!(coarse.occupied(), 1);
        assert_eq!(coarse.latest(), Some(&sample(&[("a", 20.0)])));
        assert_eq!(coarse.average("a"), Some(20.0));
    }

    #[test]
    fn test_cascade_repeats_on_wraparound() {
        let mut set = two_levels();
        for i in 0..12 {
            set.insert(sample(&[("a", i as f64)]));
        }
        // groups: 0..3, 3..6, 6..9, 9..12 -> averages 1, 4, 7, 10
        let coarse = set.level(1).unwrap();
        assert_eq!(coarse.occupied(), 4);
        assert_eq!(coarse.average("a"), Some(5.5));
    }

    #[test]
    fn test_multi_level_cascade() {
        let mut set = IntervalSet::try_new(&[
            IntervalDefinition::new("l0", 1, 4, Some(2)),
            IntervalDefinition::new("l1", 2, 4, Some(2)),
            IntervalDefinition::new("l2", 4, 4, None),
        ])
        .unwrap();

        let written: Vec<usize> = (0..4)
            .map(|i| set.insert(sample(&[("a", (i * 2) as f64)])))
            .collect();
        assert_eq!(written, vec![1, 2, 1, 3]);
        // l1 holds averages of (0,2) and (4,6); l2 holds the average of those
        assert_eq!(set.level(2).unwrap().average("a"), Some(3.0));
    }

    #[test]
    fn test_coarsest_level_stops_cascade() {
        let mut set = IntervalSet::new(&[IntervalDefinition::new("only", 1, 2, None)]);
        for _ in 0..5 {
            assert_eq!(set.insert(sample(&[("a", 1.0)])), 1);
        }
    }

    #[test]
    fn test_empty_sample_occupies_slot() {
        let mut set = two_levels();
        set.insert(SeriesMap::new());
        let fine = set.level(0).unwrap();
        assert_eq!(fine.occupied(), 1);
        assert_eq!(fine.write_index(), 1);
        assert!(fine.all_averages().is_empty());
    }

    #[test]
    fn test_clear_keeps_configuration() {
        let mut set = IntervalSet::new(&default_intervals());
        for _ in 0..400 {
            set.insert(sample(&[("iron", 5.0)]));
        }
        assert!(set.by_name("10m").unwrap().average("iron").is_some());

        set.clear();
        for level in set.levels() {
            assert!(level.is_empty());
            assert_eq!(level.write_index(), 0);
            assert_eq!(level.capacity(), 60);
            assert_eq!(level.average("iron"), None);
        }
        assert_eq!(set.len(), 7);
    }

    #[test]
    fn test_running_sums_match_buffer() {
        const SERIES: [&str; 4] = ["a", "b", "c", "d"];
        let definitions = [
            IntervalDefinition::new("fine", 1, 6, Some(3)),
            IntervalDefinition::new("coarse", 3, 4, None),
        ];
        let mut rng = StdRng::seed_from_u64(0x7e57);

        for _ in 0..50 {
            let mut set = IntervalSet::new(&definitions);
            let inserts = rng.random_range(0..=12);

            for _ in 0..inserts {
                // Multiples of the cascade size keep every level's averages,
                // and so every running sum, exact through eviction.
                let mut raw = SeriesMap::new();
                for name in SERIES {
                    if rng.random_bool(0.6) {
                        raw.insert(name.to_string(), rng.random_range(-300..300) as f64 * 3.0);
                    }
                }
                set.insert(raw);

                for level in set.levels() {
                    for name in SERIES {
                        let values: Vec<f64> = (0..level.capacity())
                            .filter_map(|i| level.slot(i))
                            .filter_map(|slot| slot.get(name).copied())
                            .collect();
                        assert_eq!(level.running_count(name), values.len(), "{}", level.name());
                        if values.is_empty() {
                            assert_eq!(level.running_sum(name), None, "{}", level.name());
                        } else {
                            assert_eq!(
                                level.running_sum(name),
                                Some(values.iter().sum::<f64>()),
                                "{}",
                                level.name()
                            );
                        }
                    }

                    let names: Vec<String> = level.series().map(String::from).collect();
                    assert!(names.iter().all(|n| level.running_count(n) > 0));
                }
            }
        }
    }
}
