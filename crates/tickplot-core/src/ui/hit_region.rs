//! Hit regions and point queries
//!
//! A renderer records one [`HitRegion`] per interactive element while it
//! draws. Region lists are rebuilt on every render pass and are only borrowed
//! by the queries here; nothing in this module mutates them.
//!
//! Later regions are drawn on top of earlier ones, so [`hit_test`] scans in
//! reverse and the topmost region wins without an explicit z-index.

extern crate alloc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use super::camera::{Camera, WorldPoint, world_to_screen};
use super::constants::MIN_OVERLAY_EXTENT_PX;

/// Axis-aligned rectangle in world units (`left <= right`, `top <= bottom`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl WorldRect {
    /// Create a rectangle from its edges
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Square of half-size `half_extent` centered on `center`
    pub fn around(center: WorldPoint, half_extent: f64) -> Self {
        Self::new(
            center.x - half_extent,
            center.y - half_extent,
            center.x + half_extent,
            center.y + half_extent,
        )
    }

    /// Inclusive containment on all four edges
    pub fn contains(&self, point: WorldPoint) -> bool {
        self.left <= point.x && point.x <= self.right && self.top <= point.y && point.y <= self.bottom
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn top_left(&self) -> WorldPoint {
        WorldPoint::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> WorldPoint {
        WorldPoint::new(self.right, self.bottom)
    }
}

/// Shape of a region's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// A single plotted sample
    Point,
    /// A line segment between two consecutive samples
    Segment,
    /// A legend entry naming a series
    Legend,
}

/// Data a region carries for tooltip and click handling
///
/// Opaque to the queries in this module.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionPayload {
    /// One sample of a series
    Point {
        series: String,
        value: f64,
        /// Chronological slot index within the interval
        index: usize,
    },
    /// The span between two chronological slots of a series
    Segment {
        series: String,
        start: usize,
        end: usize,
    },
    /// Legend row for a series
    Legend { series: String },
}

impl RegionPayload {
    /// Tag describing which variant this is
    pub fn kind(&self) -> RegionKind {
        match self {
            Self::Point { .. } => RegionKind::Point,
            Self::Segment { .. } => RegionKind::Segment,
            Self::Legend { .. } => RegionKind::Legend,
        }
    }

    /// Series the region belongs to
    pub fn series(&self) -> &str {
        match self {
            Self::Point { series, .. }
            | Self::Segment { series, .. }
            | Self::Legend { series } => series,
        }
    }
}

/// Interactive rectangle recorded by a renderer
#[derive(Debug, Clone, PartialEq)]
pub struct HitRegion {
    /// Unique within one region list
    pub id: String,
    /// Extent in world units
    pub bounds: WorldRect,
    pub payload: RegionPayload,
}

impl HitRegion {
    /// Create a region
    pub fn new(id: &str, bounds: WorldRect, payload: RegionPayload) -> Self {
        Self {
            id: id.to_string(),
            bounds,
            payload,
        }
    }

    /// Payload tag
    pub fn kind(&self) -> RegionKind {
        self.payload.kind()
    }

    /// Inclusive containment test against the region bounds
    pub fn contains(&self, point: WorldPoint) -> bool {
        self.bounds.contains(point)
    }
}

/// Topmost region containing `point`, scanning last-inserted first
pub fn hit_test(regions: &[HitRegion], point: WorldPoint) -> Option<&HitRegion> {
    regions.iter().rev().find(|region| region.contains(point))
}

/// Every region containing `point`, in list order
pub fn hit_test_all(regions: &[HitRegion], point: WorldPoint) -> Vec<&HitRegion> {
    regions
        .iter()
        .filter(|region| region.contains(point))
        .collect()
}

/// Snapped pixel extent of a world rectangle, before any narrowing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelExtent {
    left: i64,
    top: i64,
    width: i64,
    height: i64,
}

impl PixelExtent {
    /// Project both corners and snap the edges down to the pixel grid.
    /// Width and height are floored too and never drop below one pixel.
    fn project(camera: &Camera, bounds: &WorldRect) -> Self {
        let top_left = world_to_screen(camera, bounds.top_left());
        let bottom_right = world_to_screen(camera, bounds.bottom_right());

        Self {
            left: floor_px(top_left.x),
            top: floor_px(top_left.y),
            width: floor_px(bottom_right.x - top_left.x).max(MIN_OVERLAY_EXTENT_PX),
            height: floor_px(bottom_right.y - top_left.y).max(MIN_OVERLAY_EXTENT_PX),
        }
    }

    fn overlaps_viewport(&self, viewport: Size) -> bool {
        self.left.saturating_add(self.width) > 0
            && self.left < viewport.width as i64
            && self.top.saturating_add(self.height) > 0
            && self.top < viewport.height as i64
    }
}

/// Pixel rectangle covered by `bounds` under `camera`
///
/// Both corners are projected and the edges snapped down to the pixel grid.
/// Width and height are floored too and never drop below one pixel. Extents
/// beyond the `i32`/`u32` range are clamped.
pub fn screen_rect(camera: &Camera, bounds: &WorldRect) -> Rectangle {
    let extent = PixelExtent::project(camera, bounds);

    Rectangle::new(
        Point::new(clamp_i32(extent.left), clamp_i32(extent.top)),
        Size::new(clamp_u32(extent.width), clamp_u32(extent.height)),
    )
}

/// Regions whose projected rectangle overlaps the viewport at least partly
///
/// Touching an edge from the inside counts; a rectangle that starts exactly
/// at the right or bottom viewport edge does not.
pub fn visible_regions<'a>(camera: &Camera, regions: &'a [HitRegion]) -> Vec<&'a HitRegion> {
    regions
        .iter()
        .filter(|region| {
            PixelExtent::project(camera, &region.bounds).overlaps_viewport(camera.viewport)
        })
        .collect()
}

/// Round toward negative infinity; saturates outside the `i64` range.
fn floor_px(value: f64) -> i64 {
    libm::floor(value) as i64
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}
