//! Constants for coordinate conversion
//!
//! All magic numbers are defined here with descriptive names and units.

/// Pixels per world unit at zoom 1.0
pub const BASE_PIXELS_PER_UNIT: f64 = 32.0;

/// Smallest width or height of a projected region in pixels
///
/// Regions that project to less than a pixel still get a one pixel
/// footprint so overlay buttons stay placeable.
pub const MIN_OVERLAY_EXTENT_PX: i64 = 1;

/// Half extent, in world units, of the square region recorded around a
/// plotted point when a renderer does not supply its own size
pub const DEFAULT_POINT_HALF_EXTENT: f64 = 0.25;
