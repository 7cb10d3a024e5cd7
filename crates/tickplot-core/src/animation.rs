//! Tick-driven value tweening
//!
//! Chart transitions (zooming, fading a highlight in, sliding a tooltip) are
//! tweens from one number to another over a number of host ticks. The pool
//! of running tweens is an ordinary value owned by the host's per-tick
//! callback and threaded through [`AnimationPool::tick`]; there is no global
//! table.
//!
//! ```ignore
//! let mut pool = AnimationPool::<8>::new();
//! let zoom = pool.start(1.0, 2.0, now, 30, Easing::EaseInOutCubic)?;
//!
//! // every tick
//! let current = pool.value(zoom, now);
//! let (next, done) = pool.tick(now);
//! pool = next;
//! ```

use heapless::Vec;
use log::warn;
use thiserror_no_std::Error;

/// Identifier handed out by [`AnimationPool::start`]
pub type AnimationId = u32;

/// Errors from animation pool operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnimationError {
    /// All slots are in use
    #[error("Animation pool is full (max: {max})")]
    PoolFull {
        /// Pool capacity
        max: usize,
    },
}

/// Progress curve applied to the linear time fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Slow start
    EaseInQuad,
    /// Slow finish
    EaseOutQuad,
    /// Slow start and finish
    EaseInOutCubic,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 - 2.0 * t;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// One running tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub id: AnimationId,
    pub from: f64,
    pub to: f64,
    /// Host tick at which the tween starts
    pub start_tick: u64,
    /// Length in ticks; zero jumps straight to `to`
    pub duration_ticks: u64,
    pub easing: Easing,
}

impl Animation {
    /// Value at host tick `now`
    pub fn value_at(&self, now: u64) -> f64 {
        if self.is_complete(now) {
            return self.to;
        }
        if now <= self.start_tick {
            return self.from;
        }

        let elapsed = (now - self.start_tick) as f64;
        let progress = self.easing.apply(elapsed / self.duration_ticks as f64);
        self.from + (self.to - self.from) * progress
    }

    /// True once `now` has reached the end tick
    pub fn is_complete(&self, now: u64) -> bool {
        now >= self.start_tick.saturating_add(self.duration_ticks)
    }
}

/// Fixed-capacity set of running tweens
///
/// `N` bounds how many tweens can run at once. Ids are assigned in increasing
/// order and wrap after `u32::MAX`.
#[derive(Debug, Clone, Default)]
pub struct AnimationPool<const N: usize> {
    active: Vec<Animation, N>,
    next_id: AnimationId,
}

impl<const N: usize> AnimationPool<N> {
    /// Create an empty pool
    pub const fn new() -> Self {
        Self {
            active: Vec::new(),
            next_id: 0,
        }
    }

    /// Start a tween and return its id
    pub fn start(
        &mut self,
        from: f64,
        to: f64,
        start_tick: u64,
        duration_ticks: u64,
        easing: Easing,
    ) -> Result<AnimationId, AnimationError> {
        let id = self.next_id;
        let animation = Animation {
            id,
            from,
            to,
            start_tick,
            duration_ticks,
            easing,
        };

        if self.active.push(animation).is_err() {
            warn!("Animation pool full, dropping tween {} -> {}", from, to);
            return Err(AnimationError::PoolFull { max: N });
        }

        self.next_id = self.next_id.wrapping_add(1);
        Ok(id)
    }

    /// Stop a tween early; returns false if it was not running
    pub fn cancel(&mut self, id: AnimationId) -> bool {
        let before = self.active.len();
        self.active.retain(|animation| animation.id != id);
        self.active.len() != before
    }

    /// Look up a running tween
    pub fn get(&self, id: AnimationId) -> Option<&Animation> {
        self.active.iter().find(|animation| animation.id == id)
    }

    /// Current value of a running tween
    pub fn value(&self, id: AnimationId, now: u64) -> Option<f64> {
        self.get(id).map(|animation| animation.value_at(now))
    }

    /// Running tweens in start order
    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.active.iter()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance to host tick `now`.
    ///
    /// Returns the pool without the tweens that finished at or before `now`,
    /// together with their ids in start order.
    pub fn tick(mut self, now: u64) -> (Self, Vec<AnimationId, N>) {
        let mut completed = Vec::new();
        for animation in self.active.iter().filter(|a| a.is_complete(now)) {
            // At most N tweens can be running, so this never overflows.
            let _ = completed.push(animation.id);
        }
        self.active.retain(|animation| !animation.is_complete(now));
        (self, completed)
    }
}
