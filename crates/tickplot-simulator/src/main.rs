//! Headless host simulator for tickplot-core.
//!
//! Plays the part of the game engine: runs a fixed-rate tick loop, feeds
//! synthetic production samples into the interval set once per sample period,
//! lays out the chart the way a renderer would (recording hit regions as it
//! goes), drives a zoom tween through the animation pool and replays a
//! scripted cursor path against the regions. Everything a real renderer would
//! draw is logged instead.
//!
//! Run with `RUST_LOG=debug` (or `trace` to see every cascade).

use embedded_graphics::geometry::Size;
use log::{debug, info};

use tickplot_core::{
    AnimationPool, Camera, Easing, HitRegion, Interval, IntervalSet, PointerEvent,
    PointerOutcome, PointerTracker, RegionPayload, ScreenPoint, SeriesMap, WorldPoint, WorldRect,
    default_intervals, screen_rect, visible_regions,
};
use tickplot_core::config::TICKS_PER_SECOND;
use tickplot_core::ui::constants::DEFAULT_POINT_HALF_EXTENT;

// ---------------------------------------------------------------------------
// Simulation constants
// ---------------------------------------------------------------------------

/// Simulated game time in seconds: the 10m level wraps once and the 1h
/// level is a third full.
const SIMULATED_SECONDS: u64 = 1_200;

/// Chart widget size in pixels.
const VIEWPORT: Size = Size::new(480, 320);

/// World units between consecutive slots on the x axis.
const SLOT_SPACING: f64 = 0.25;

/// World units per unit of sampled value on the y axis.
const VALUE_SCALE: f64 = 0.05;

/// Level the simulated renderer draws.
const DISPLAYED_LEVEL: &str = "10m";

/// Maximum concurrent tweens.
const MAX_ANIMATIONS: usize = 4;

/// Length of the zoom tween in ticks.
const ZOOM_TICKS: u64 = 90;

// ---------------------------------------------------------------------------
// Mock data generation
// ---------------------------------------------------------------------------

/// Generates synthetic per-second production rates that vary over time.
struct MockProductionGenerator {
    elapsed_secs: f64,
}

impl MockProductionGenerator {
    fn new() -> Self {
        Self { elapsed_secs: 0.0 }
    }

    /// Advance one second and return a sparse sample.
    fn next_sample(&mut self) -> SeriesMap {
        self.elapsed_secs += 1.0;
        let t = self.elapsed_secs;

        let mut sample = SeriesMap::new();
        sample.insert(
            "iron-plate".to_string(),
            40.0 + 15.0 * (t / 90.0).sin() + 3.0 * (t / 17.0).cos(),
        );
        sample.insert("copper-plate".to_string(), 25.0 + 10.0 * (t / 140.0).cos());

        // Coal is only mined in bursts, so most samples omit it.
        if (t as u64) % 5 == 0 {
            sample.insert("coal".to_string(), 60.0 + 20.0 * (t / 45.0).sin());
        }
        sample
    }
}

// ---------------------------------------------------------------------------
// Renderer stand-in
// ---------------------------------------------------------------------------

/// Lay out one interval as a line chart plus legend and record hit regions.
///
/// Slot `i` (chronological) sits at `x = i * SLOT_SPACING`; values grow
/// upward, i.e. towards negative world y.
fn layout_chart(interval: &Interval) -> Vec<HitRegion> {
    let mut regions = Vec::new();
    let series: Vec<String> = interval.series().map(String::from).collect();

    for (index, slot) in interval.chronological().enumerate() {
        let Some(slot) = slot else {
            continue;
        };
        let x = index as f64 * SLOT_SPACING;

        for (name, &value) in slot {
            let center = WorldPoint::new(x, -value * VALUE_SCALE);
            regions.push(HitRegion::new(
                &format!("{name}@{index}"),
                WorldRect::around(center, DEFAULT_POINT_HALF_EXTENT),
                RegionPayload::Point {
                    series: name.clone(),
                    value,
                    index,
                },
            ));
        }
    }

    // Legend rows go last so they sit on top of any data underneath them.
    for (row, name) in series.iter().enumerate() {
        let top = 0.5 + row as f64 * 0.5;
        regions.push(HitRegion::new(
            &format!("legend:{name}"),
            WorldRect::new(0.0, top, 3.0, top + 0.4),
            RegionPayload::Legend {
                series: name.clone(),
            },
        ));
    }

    regions
}

/// Camera that frames the whole chart at the given zoom.
fn chart_camera(interval: &Interval, zoom: f64) -> Camera {
    let width = interval.capacity() as f64 * SLOT_SPACING;
    Camera::new(WorldPoint::new(width / 2.0, -1.5), zoom, VIEWPORT)
}

fn describe(region: &HitRegion) -> String {
    match &region.payload {
        RegionPayload::Point {
            series,
            value,
            index,
        } => format!("{series} = {value:.2} (slot {index})"),
        RegionPayload::Segment { series, start, end } => {
            format!("{series} slots {start}..{end}")
        }
        RegionPayload::Legend { series } => format!("legend entry for {series}"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut intervals = IntervalSet::try_new(&default_intervals())
        .map_err(|e| format!("invalid interval table: {e}"))?;
    let mut generator = MockProductionGenerator::new();

    info!(
        "Simulating {} s of game time across {} levels",
        SIMULATED_SECONDS,
        intervals.len()
    );

    let total_ticks = SIMULATED_SECONDS * TICKS_PER_SECOND as u64;
    let zoom_start = total_ticks - ZOOM_TICKS;

    let mut animations = AnimationPool::<MAX_ANIMATIONS>::new();
    let zoom_tween = animations
        .start(1.0, 2.0, zoom_start, ZOOM_TICKS, Easing::EaseInOutCubic)
        .map_err(|e| format!("failed to start zoom tween: {e}"))?;
    let mut zoom = 1.0;

    for tick in 1..=total_ticks {
        if tick % TICKS_PER_SECOND as u64 == 0 {
            let levels = intervals.insert(generator.next_sample());
            if levels > 2 {
                debug!("Tick {}: sample reached {} levels", tick, levels);
            }
        }

        if let Some(value) = animations.value(zoom_tween, tick) {
            zoom = value;
        }
        let (next, completed) = animations.tick(tick);
        animations = next;
        for id in completed {
            info!("Tick {}: tween {} finished at zoom {:.2}", tick, id, zoom);
        }
    }

    for level in intervals.levels() {
        let averages = level.all_averages();
        if averages.is_empty() {
            continue;
        }
        let summary: Vec<String> = averages
            .iter()
            .map(|(name, value)| format!("{name}={value:.2}"))
            .collect();
        info!(
            "Level {:>5}: {} of {} slots, averages [{}]",
            level.name(),
            level.occupied(),
            level.capacity(),
            summary.join(", ")
        );
    }

    let displayed = intervals
        .by_name(DISPLAYED_LEVEL)
        .ok_or_else(|| format!("no level named {DISPLAYED_LEVEL}"))?;
    let regions = layout_chart(displayed);
    let camera = chart_camera(displayed, zoom);

    let visible = visible_regions(&camera, &regions);
    info!(
        "Rendered {} regions for {}, {} on screen at zoom {:.2}",
        regions.len(),
        DISPLAYED_LEVEL,
        visible.len(),
        zoom
    );
    for region in visible.iter().filter(|r| r.id.starts_with("legend:")) {
        let rect = screen_rect(&camera, &region.bounds);
        debug!(
            "Overlay button {} at ({}, {}) size {}x{}",
            region.id, rect.top_left.x, rect.top_left.y, rect.size.width, rect.size.height
        );
    }

    // Sweep the cursor along the vertical center line, then click and leave.
    let mut tracker = PointerTracker::new();
    let mut events: Vec<PointerEvent> = (0..VIEWPORT.width)
        .step_by(8)
        .map(|x| PointerEvent::Moved(ScreenPoint::new(x as f64, VIEWPORT.height as f64 / 2.0)))
        .collect();
    if let Some(first) = visible.first() {
        let rect = screen_rect(&camera, &first.bounds);
        events.push(PointerEvent::Pressed(ScreenPoint::new(
            rect.center().x as f64,
            rect.center().y as f64,
        )));
    }
    events.push(PointerEvent::Left);

    for event in events {
        match tracker.handle(&camera, &regions, event) {
            PointerOutcome::Unchanged => {}
            PointerOutcome::HoverChanged { current, .. } => {
                let tooltip = current
                    .as_deref()
                    .and_then(|id| regions.iter().find(|r| r.id == id))
                    .map(describe);
                match tooltip {
                    Some(text) => info!("Tooltip: {}", text),
                    None => debug!("Tooltip hidden"),
                }
            }
            PointerOutcome::Clicked(id) => info!("Clicked {}", id),
        }
    }

    let snapshot = intervals
        .to_snapshot()
        .map_err(|e| format!("snapshot failed: {e}"))?;
    let restored =
        IntervalSet::from_snapshot(&snapshot).map_err(|e| format!("restore failed: {e}"))?;
    info!(
        "Snapshot of {} bytes restored {}",
        snapshot.len(),
        if restored == intervals {
            "identically"
        } else {
            "with differences"
        }
    );

    intervals.clear();
    info!(
        "Cleared; finest level empty: {}",
        intervals.level(0).is_some_and(Interval::is_empty)
    );

    Ok(())
}
