//! Interval level definitions
//!
//! A chart's time scales are described once, up front, as an ordered table of
//! [`IntervalDefinition`]s (finest first). The table is plain serde data so a
//! host can ship it in whatever config format it already loads.

extern crate alloc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

/// Host ticks per second used by [`default_intervals`]
pub const TICKS_PER_SECOND: u32 = 60;

/// Slots per level in [`default_intervals`]
pub const DEFAULT_INTERVAL_CAPACITY: usize = 60;

/// Errors reported when validating a level table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The table has no levels at all
    #[error("Interval table is empty")]
    NoLevels,

    /// A level was given zero slots
    #[error("Level {level} has zero capacity")]
    ZeroCapacity {
        /// Offending level index (0 = finest)
        level: usize,
    },

    /// A level was given a cascade size of zero
    #[error("Level {level} has a cascade size of zero")]
    ZeroCascade {
        /// Offending level index
        level: usize,
    },

    /// Cascade boundaries would not line up with buffer wraparound
    #[error("Level {level}: cascade size {cascade_size} does not divide capacity {capacity}")]
    CascadeMisaligned {
        /// Offending level index
        level: usize,
        /// Configured cascade size
        cascade_size: usize,
        /// Configured capacity
        capacity: usize,
    },

    /// The coarsest level has nowhere to cascade to
    #[error("Coarsest level {level} cannot cascade")]
    TrailingCascade {
        /// Index of the last level
        level: usize,
    },
}

/// Static description of one resolution level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalDefinition {
    /// Short label for display (e.g. `"10m"`)
    pub name: String,
    /// Ticks between inserts at this level (informational, not enforced)
    pub sample_period: u32,
    /// Number of slots in the ring buffer
    pub capacity: usize,
    /// Samples averaged and forwarded to the next level, `None` on the coarsest
    pub cascade_size: Option<usize>,
}

impl IntervalDefinition {
    /// Create a level definition
    pub fn new(
        name: &str,
        sample_period: u32,
        capacity: usize,
        cascade_size: Option<usize>,
    ) -> Self {
        Self {
            name: name.to_string(),
            sample_period,
            capacity,
            cascade_size,
        }
    }

    /// Check this level on its own; `level` is only used for error reporting.
    pub fn validate(&self, level: usize) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity { level });
        }

        match self.cascade_size {
            Some(0) => Err(ConfigError::ZeroCascade { level }),
            Some(cascade_size) if self.capacity % cascade_size != 0 => {
                Err(ConfigError::CascadeMisaligned {
                    level,
                    cascade_size,
                    capacity: self.capacity,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Validate a whole level table, finest first.
pub fn validate_table(definitions: &[IntervalDefinition]) -> Result<(), ConfigError> {
    let Some(last) = definitions.len().checked_sub(1) else {
        return Err(ConfigError::NoLevels);
    };

    for (level, definition) in definitions.iter().enumerate() {
        definition.validate(level)?;
    }

    if definitions[last].cascade_size.is_some() {
        return Err(ConfigError::TrailingCascade { level: last });
    }

    Ok(())
}

/// Stock level table: one sample per second of game time, cascading up to
/// a 1000 hour view. Each level's period is the previous period times its
/// cascade size.
pub fn default_intervals() -> Vec<IntervalDefinition> {
    const SCALES: [(&str, u32, Option<usize>); 7] = [
        ("1m", TICKS_PER_SECOND, Some(10)),
        ("10m", TICKS_PER_SECOND * 10, Some(6)),
        ("1h", TICKS_PER_SECOND * 60, Some(10)),
        ("10h", TICKS_PER_SECOND * 600, Some(5)),
        ("50h", TICKS_PER_SECOND * 3_000, Some(5)),
        ("250h", TICKS_PER_SECOND * 15_000, Some(4)),
        ("1000h", TICKS_PER_SECOND * 60_000, None),
    ];

    SCALES
        .iter()
        .map(|&(name, period, cascade)| {
            IntervalDefinition::new(name, period, DEFAULT_INTERVAL_CAPACITY, cascade)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_default_table_is_valid() {
        let table = default_intervals();
        assert_eq!(validate_table(&table), Ok(()));
        assert_eq!(table.first().map(|d| d.name.as_str()), Some("1m"));
        assert_eq!(table.last().map(|d| d.name.as_str()), Some("1000h"));
    }

    #[test]
    fn test_default_periods_chain() {
        let table = default_intervals();
        for pair in table.windows(2) {
            let cascade = pair[0].cascade_size.unwrap() as u32;
            assert_eq!(pair[0].sample_period * cascade, pair[1].sample_period);
        }
    }

    #[test]
    fn test_default_spans_match_labels() {
        const SPANS_SECS: [(&str, u64); 7] = [
            ("1m", 60),
            ("10m", 600),
            ("1h", 3_600),
            ("10h", 36_000),
            ("50h", 180_000),
            ("250h", 900_000),
            ("1000h", 3_600_000),
        ];

        let table = default_intervals();
        assert_eq!(table.len(), SPANS_SECS.len());
        for (definition, (label, secs)) in table.iter().zip(SPANS_SECS) {
            let span = definition.sample_period as u64 * definition.capacity as u64
                / TICKS_PER_SECOND as u64;
            assert_eq!(definition.name, label);
            assert_eq!(span, secs, "{} level spans {} s", label, span);
        }
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(validate_table(&[]), Err(ConfigError::NoLevels));
    }

    #[test]
    fn test_level_errors() {
        let table = vec![
            IntervalDefinition::new("fine", 1, 6, Some(4)),
            IntervalDefinition::new("coarse", 4, 6, None),
        ];
        assert_eq!(
            validate_table(&table),
            Err(ConfigError::CascadeMisaligned {
                level: 0,
                cascade_size: 4,
                capacity: 6
            })
        );

        let zero = IntervalDefinition::new("zero", 1, 0, None);
        assert_eq!(zero.validate(2), Err(ConfigError::ZeroCapacity { level: 2 }));

        let zero_cascade = IntervalDefinition::new("zc", 1, 6, Some(0));
        assert_eq!(
            zero_cascade.validate(0),
            Err(ConfigError::ZeroCascade { level: 0 })
        );
    }

    #[test]
    fn test_trailing_cascade_rejected() {
        let table = vec![
            IntervalDefinition::new("fine", 1, 6, Some(3)),
            IntervalDefinition::new("coarse", 3, 6, Some(3)),
        ];
        assert_eq!(
            validate_table(&table),
            Err(ConfigError::TrailingCascade { level: 1 })
        );
    }
}
