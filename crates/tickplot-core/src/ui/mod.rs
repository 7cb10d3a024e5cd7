//! Coordinate transforms and pointer interaction
//!
//! Chart geometry lives in world units. The host shows it through a camera
//! onto a pixel viewport and reports pointer positions in pixels. This module
//! converts between the two spaces and answers "what is under this point"
//! against the hit regions a renderer recorded while drawing.

pub mod camera;
pub mod constants;
pub mod hit_region;
pub mod pointer;

pub use camera::{Camera, ScreenPoint, WorldPoint, screen_to_world, world_to_screen};
pub use constants::BASE_PIXELS_PER_UNIT;
pub use hit_region::{
    HitRegion, RegionKind, RegionPayload, WorldRect, hit_test, hit_test_all, screen_rect,
    visible_regions,
};
pub use pointer::{PointerEvent, PointerOutcome, PointerTracker};
