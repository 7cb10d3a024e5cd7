//! A single resolution level: ring buffer plus running aggregates.

extern crate alloc;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use super::SeriesMap;
use crate::config::IntervalDefinition;

/// One resolution level of the aggregator
///
/// The buffer holds `capacity` slots. `write_index` always points at the slot
/// that the next insert overwrites, which is also the oldest surviving slot
/// once the buffer has wrapped.
///
/// For every series present in any occupied slot, `running_sum` holds the sum
/// of its values over those slots and `running_count` the number of slots
/// containing it. Series with a count of zero are absent from both maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    name: String,
    sample_period: u32,
    cascade_size: Option<usize>,
    buffer: Vec<Option<SeriesMap>>,
    write_index: usize,
    running_sum: SeriesMap,
    running_count: BTreeMap<String, usize>,
}

impl Interval {
    /// Create an empty interval from its definition
    pub fn new(definition: &IntervalDefinition) -> Self {
        Self {
            name: definition.name.clone(),
            sample_period: definition.sample_period,
            cascade_size: definition.cascade_size,
            buffer: vec![None; definition.capacity],
            write_index: 0,
            running_sum: SeriesMap::new(),
            running_count: BTreeMap::new(),
        }
    }

    /// Display label of this level
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ticks between inserts at this level
    pub fn sample_period(&self) -> u32 {
        self.sample_period
    }

    /// Number of samples averaged into one insert at the next level
    pub fn cascade_size(&self) -> Option<usize> {
        self.cascade_size
    }

    /// Number of slots in the ring buffer
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Slot that the next insert will overwrite
    pub fn write_index(&self) -> usize {
        self.write_index
    }

    /// Raw slot access in buffer order (not chronological)
    pub fn slot(&self, index: usize) -> Option<&SeriesMap> {
        self.buffer.get(index).and_then(Option::as_ref)
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.buffer.iter().filter(|slot| slot.is_some()).count()
    }

    /// True when no slot has been written since creation or the last clear
    pub fn is_empty(&self) -> bool {
        self.buffer.iter().all(Option::is_none)
    }

    /// Running sum of `series` over occupied slots, if it has any data
    pub fn running_sum(&self, series: &str) -> Option<f64> {
        self.running_sum.get(series).copied()
    }

    /// Number of occupied slots containing `series`
    pub fn running_count(&self, series: &str) -> usize {
        self.running_count.get(series).copied().unwrap_or(0)
    }

    /// Names of all series currently holding data, in sorted order
    pub fn series(&self) -> impl Iterator<Item = &str> {
        self.running_count.keys().map(String::as_str)
    }

    /// Mean of `series` over the slots that contain it
    ///
    /// Returns `None` when no occupied slot contains the series. A recorded
    /// zero averages to `Some(0.0)`.
    pub fn average(&self, series: &str) -> Option<f64> {
        let count = self.running_count(series);
        if count == 0 {
            return None;
        }
        self.running_sum(series).map(|sum| sum / count as f64)
    }

    /// Averages of every series with data; series without data are omitted
    pub fn all_averages(&self) -> SeriesMap {
        self.running_count
            .iter()
            .filter(|(_, count)| **count > 0)
            .filter_map(|(series, &count)| {
                self.running_sum
                    .get(series)
                    .map(|sum| (series.clone(), sum / count as f64))
            })
            .collect()
    }

    /// Slots from oldest to newest: `[write_index, capacity)` then `[0, write_index)`
    ///
    /// Empty slots are yielded as `None` so positions stay aligned with time.
    pub fn chronological(&self) -> impl Iterator<Item = Option<&SeriesMap>> {
        let (newer, older) = self.buffer.split_at(self.write_index);
        older.iter().chain(newer.iter()).map(Option::as_ref)
    }

    /// Most recently written slot
    pub fn latest(&self) -> Option<&SeriesMap> {
        let capacity = self.capacity();
        if capacity == 0 {
            return None;
        }
        let index = (self.write_index + capacity - 1) % capacity;
        self.slot(index)
    }

    /// Write one sample, evicting the oldest slot.
    ///
    /// Returns true when this insert completes a cascade group, i.e. the
    /// level has a cascade size and `write_index` just landed on a multiple
    /// of it.
    pub(crate) fn push(&mut self, sample: SeriesMap) -> bool {
        let capacity = self.capacity();
        if capacity == 0 {
            return false;
        }

        if let Some(evicted) = self.buffer[self.write_index].take() {
            self.forget(&evicted);
        }

        for (series, &value) in &sample {
            *self.running_count.entry(series.clone()).or_insert(0) += 1;
            *self.running_sum.entry(series.clone()).or_insert(0.0) += value;
        }
        self.buffer[self.write_index] = Some(sample);

        self.write_index = (self.write_index + 1) % capacity;

        self.cascade_size
            .is_some_and(|size| size > 0 && self.write_index % size == 0)
    }

    /// Average the last `cascade_size` slots into one sample for the next level.
    ///
    /// Empty slots and missing series contribute nothing to the sum, but the
    /// divisor is always `cascade_size`.
    pub(crate) fn consolidate(&self) -> SeriesMap {
        let capacity = self.capacity();
        let Some(size) = self.cascade_size.filter(|&size| size > 0) else {
            return SeriesMap::new();
        };

        let mut totals = SeriesMap::new();
        for offset in 1..=size.min(capacity) {
            let index = (self.write_index + capacity - offset) % capacity;
            if let Some(slot) = &self.buffer[index] {
                for (series, &value) in slot {
                    *totals.entry(series.clone()).or_insert(0.0) += value;
                }
            }
        }

        let divisor = size as f64;
        for value in totals.values_mut() {
            *value /= divisor;
        }
        totals
    }

    /// Empty every slot and reset aggregates; configuration is kept.
    pub fn clear(&mut self) {
        self.buffer.iter_mut().for_each(|slot| *slot = None);
        self.write_index = 0;
        self.running_sum.clear();
        self.running_count.clear();
    }

    /// Structural checks used when restoring from a snapshot
    pub(crate) fn is_consistent(&self) -> bool {
        let capacity = self.capacity();
        capacity > 0
            && self.write_index < capacity
            && self
                .running_count
                .keys()
                .all(|series| self.running_sum.contains_key(series))
            && self.running_count.values().all(|&count| count > 0 && count <= capacity)
    }

    fn forget(&mut self, evicted: &SeriesMap) {
        for (series, &value) in evicted {
            let Some(count) = self.running_count.get_mut(series) else {
                continue;
            };
            *count -= 1;
            if *count == 0 {
                self.running_count.remove(series);
                self.running_sum.remove(series);
            } else if let Some(sum) = self.running_sum.get_mut(series) {
                *sum -= value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn sample(pairs: &[(&str, f64)]) -> SeriesMap {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    fn interval(capacity: usize, cascade: Option<usize>) -> Interval {
        Interval::new(&IntervalDefinition::new("test", 1, capacity, cascade))
    }

    #[test]
    fn test_average_absent_without_data() {
        let level = interval(4, None);
        assert_eq!(level.average("anything"), None);
        assert_eq!(level.average(""), None);
        assert!(level.all_averages().is_empty());
        assert!(level.is_empty());
    }

    #[test]
    fn test_zero_is_a_value() {
        let mut level = interval(4, None);
        level.push(sample(&[("a", 0.0)]));
        assert_eq!(level.average("a"), Some(0.0));
    }

    #[test]
    fn test_sparse_average() {
        let mut level = interval(4, None);
        level.push(sample(&[("a", 2.0), ("b", 10.0)]));
        level.push(sample(&[("a", 4.0)]));
        level.push(SeriesMap::new());

        assert_eq!(level.average("a"), Some(3.0));
        assert_eq!(level.average("b"), Some(10.0));
        assert_eq!(level.running_count("a"), 2);
        assert_eq!(level.running_count("b"), 1);
        assert_eq!(level.occupied(), 3);

        let all = level.all_averages();
        assert_eq!(all.len(), 2);
        assert_eq!(all.get("a"), Some(&3.0));
    }

    #[test]
    fn test_eviction_removes_first_sample() {
        let mut level = interval(3, None);
        level.push(sample(&[("first", 100.0), ("a", 1.0)]));
        level.push(sample(&[("a", 2.0)]));
        level.push(sample(&[("a", 3.0)]));
        level.push(sample(&[("a", 4.0)]));

        assert_eq!(level.average("first"), None);
        assert_eq!(level.running_sum("first"), None);
        assert_eq!(level.running_count("first"), 0);
        assert_eq!(level.running_sum("a"), Some(9.0));
        assert_eq!(level.running_count("a"), 3);

        let order: Vec<f64> = level
            .chronological()
            .map(|slot| slot.and_then(|s| s.get("a").copied()).unwrap())
            .collect();
        assert_eq!(order, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_chronological_before_wrap() {
        let mut level = interval(4, None);
        level.push(sample(&[("a", 1.0)]));
        level.push(sample(&[("a", 2.0)]));

        let slots: Vec<Option<f64>> = level
            .chronological()
            .map(|slot| slot.and_then(|s| s.get("a").copied()))
            .collect();
        assert_eq!(slots, vec![None, None, Some(1.0), Some(2.0)]);
        assert_eq!(level.latest().and_then(|s| s.get("a")), Some(&2.0));
    }

    #[test]
    fn test_push_reports_cascade_boundary() {
        let mut level = interval(6, Some(3));
        assert!(!level.push(sample(&[("a", 10.0)])));
        assert!(!level.push(sample(&[("a", 20.0)])));
        assert!(level.push(sample(&[("a", 30.0)])));
        assert_eq!(level.consolidate(), sample(&[("a", 20.0)]));
    }

    #[test]
    fn test_consolidate_divides_by_cascade_size() {
        let mut level = interval(6, Some(3));
        level.push(sample(&[("a", 9.0)]));
        level.push(SeriesMap::new());
        level.push(sample(&[("b", 3.0)]));

        let merged = level.consolidate();
        assert_eq!(merged.get("a"), Some(&3.0));
        assert_eq!(merged.get("b"), Some(&1.0));
    }

    #[test]
    fn test_clear_resets_state() {
        let mut level = interval(4, Some(2));
        level.push(sample(&[("a", 1.0)]));
        level.push(sample(&[("a", 1.0)]));
        level.push(sample(&[("a", 1.0)]));
        level.clear();

        assert_eq!(level.write_index(), 0);
        assert_eq!(level.capacity(), 4);
        assert_eq!(level.cascade_size(), Some(2));
        assert!(level.is_empty());
        assert_eq!(level.average("a"), None);
        assert_eq!(level.series().count(), 0);
    }
}
