//! Camera and world/screen coordinate conversion
//!
//! Both spaces grow rightward in x and downward in y. The camera center maps
//! to the exact center of the viewport, and one world unit spans
//! `BASE_PIXELS_PER_UNIT * zoom` pixels.

use embedded_graphics::geometry::Size;

use super::constants::BASE_PIXELS_PER_UNIT;

/// A point in world units
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in viewport pixels (sub-pixel positions allowed)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewing state used for coordinate conversion
///
/// Recomputed by the host on every render pass from the widget it draws
/// into. A non-positive zoom is not rejected; the caller supplies sane values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// World point shown at the viewport center
    pub center: WorldPoint,
    /// Magnification; 1.0 shows `BASE_PIXELS_PER_UNIT` pixels per unit
    pub zoom: f64,
    /// Viewport size in pixels
    pub viewport: Size,
}

impl Camera {
    /// Create a camera
    pub const fn new(center: WorldPoint, zoom: f64, viewport: Size) -> Self {
        Self {
            center,
            zoom,
            viewport,
        }
    }

    /// Set the zoom factor
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    /// Move the camera center
    pub fn with_center(mut self, center: WorldPoint) -> Self {
        self.center = center;
        self
    }

    /// Pixels per world unit at the current zoom
    pub fn pixels_per_unit(&self) -> f64 {
        BASE_PIXELS_PER_UNIT * self.zoom
    }

    /// Viewport center in pixels
    pub fn viewport_center(&self) -> ScreenPoint {
        ScreenPoint::new(
            self.viewport.width as f64 / 2.0,
            self.viewport.height as f64 / 2.0,
        )
    }

    /// See [`world_to_screen`]
    pub fn to_screen(&self, point: WorldPoint) -> ScreenPoint {
        world_to_screen(self, point)
    }

    /// See [`screen_to_world`]
    pub fn to_world(&self, point: ScreenPoint) -> WorldPoint {
        screen_to_world(self, point)
    }
}

/// Project a world point into viewport pixels
pub fn world_to_screen(camera: &Camera, point: WorldPoint) -> ScreenPoint {
    let scale = camera.pixels_per_unit();
    let origin = camera.viewport_center();

    ScreenPoint::new(
        origin.x + (point.x - camera.center.x) * scale,
        origin.y + (point.y - camera.center.y) * scale,
    )
}

/// Inverse of [`world_to_screen`]
pub fn screen_to_world(camera: &Camera, point: ScreenPoint) -> WorldPoint {
    let scale = camera.pixels_per_unit();
    let origin = camera.viewport_center();

    WorldPoint::new(
        camera.center.x + (point.x - origin.x) / scale,
        camera.center.y + (point.y - origin.y) / scale,
    )
}
