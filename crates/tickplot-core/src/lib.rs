//! Host-independent core library for tickplot
//!
//! This crate contains the platform-agnostic logic of the tickplot charting
//! add-on: the cascading interval aggregator that downsamples per-tick series
//! data into coarser time scales, and the coordinate transform / hit-region
//! layer that turns pointer positions into tooltip and overlay decisions.
//!
//! Everything that draws is left to the host. The host calls [`IntervalSet::insert`]
//! once per sample period, reads averages back for rendering, builds a list of
//! [`HitRegion`]s while it draws, and queries that list with pointer positions.
//!
//! It is `#![no_std]` with `extern crate alloc` so it compiles inside sandboxed
//! hosts as well as on desktop targets (for the simulator and tests).

#![no_std]

extern crate alloc;

pub mod animation;
pub mod config;
pub mod storage;
pub mod ui;

pub use animation::{Animation, AnimationError, AnimationId, AnimationPool, Easing};
pub use config::{ConfigError, IntervalDefinition, default_intervals};
pub use storage::{Interval, IntervalSet, SeriesMap, SnapshotError};
pub use ui::{
    BASE_PIXELS_PER_UNIT, Camera, HitRegion, PointerEvent, PointerOutcome, PointerTracker,
    RegionKind, RegionPayload, ScreenPoint, WorldPoint, WorldRect, hit_test, hit_test_all,
    screen_rect, screen_to_world, visible_regions, world_to_screen,
};
