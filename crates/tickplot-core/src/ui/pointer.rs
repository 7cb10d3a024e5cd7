//! Pointer hover and click tracking over hit regions

extern crate alloc;
use alloc::string::String;

use super::camera::{Camera, ScreenPoint, screen_to_world};
use super::hit_region::{HitRegion, hit_test};

/// Pointer input as delivered by the host, in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Cursor moved to a new position
    Moved(ScreenPoint),
    /// Primary button pressed at a position
    Pressed(ScreenPoint),
    /// Cursor left the chart widget
    Left,
}

/// Result of feeding one event to a [`PointerTracker`]
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// Nothing the renderer needs to redraw
    Unchanged,
    /// The hovered region changed; either side may be `None`
    HoverChanged {
        previous: Option<String>,
        current: Option<String>,
    },
    /// A press landed on a region
    Clicked(String),
}

/// Tracks which region the pointer is over
///
/// Only the hovered region's id is kept, so the tracker survives region lists
/// being rebuilt between frames. A region that keeps its id across rebuilds
/// stays hovered.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    hovered: Option<String>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the currently hovered region
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Feed one pointer event against this frame's regions
    pub fn handle(
        &mut self,
        camera: &Camera,
        regions: &[HitRegion],
        event: PointerEvent,
    ) -> PointerOutcome {
        match event {
            PointerEvent::Moved(point) => {
                let current = Self::region_at(camera, regions, point).map(|r| r.id.clone());
                self.set_hovered(current)
            }
            // Presses never move the hover; a later `Moved` reports that.
            PointerEvent::Pressed(point) => match Self::region_at(camera, regions, point) {
                Some(region) => PointerOutcome::Clicked(region.id.clone()),
                None => PointerOutcome::Unchanged,
            },
            PointerEvent::Left => self.set_hovered(None),
        }
    }

    fn region_at<'a>(
        camera: &Camera,
        regions: &'a [HitRegion],
        point: ScreenPoint,
    ) -> Option<&'a HitRegion> {
        hit_test(regions, screen_to_world(camera, point))
    }

    fn set_hovered(&mut self, current: Option<String>) -> PointerOutcome {
        if self.hovered == current {
            return PointerOutcome::Unchanged;
        }

        let previous = core::mem::replace(&mut self.hovered, current.clone());
        PointerOutcome::HoverChanged { previous, current }
    }
}
