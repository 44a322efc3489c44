// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-axis inertial fling driven by a [`DecaySpec`].
//!
//! ## Usage
//!
//! 1) Seed the simulation with [`FlingSimulator::fling`]: a start position, a
//!    release velocity (units per second), the range the position may travel,
//!    and the current time.
//! 2) On every frame call [`FlingSimulator::compute_offset`] with the current
//!    time and apply the difference between successive [`FlingSimulator::current`]
//!    positions.
//! 3) Stop once [`FlingSimulator::is_finished`] reports `true`.
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use understory_timing::FlingSimulator;
//!
//! let mut fling = FlingSimulator::default();
//! fling.fling(
//!     Point::ORIGIN,
//!     Vec2::new(-2000.0, 0.0),
//!     Rect::new(-100.0, 0.0, 0.0, 0.0),
//!     0,
//! );
//!
//! let mut now = 0;
//! while !fling.is_finished() {
//!     now += 16;
//!     fling.compute_offset(now);
//! }
//! // The fling stopped at the left end of its range.
//! assert_eq!(fling.current(), Point::new(-100.0, 0.0));
//! ```

use kurbo::{Point, Rect, Vec2};

use crate::decay::{DecaySpec, ExponentialDecay};

/// Decaying motion along one axis, bounded by a range.
#[derive(Clone, Copy, Debug, Default)]
struct AxisFling {
    start: f64,
    velocity: f64,
    min: f64,
    max: f64,
    duration: u64,
    current: f64,
    finished: bool,
}

impl AxisFling {
    fn new<D: DecaySpec>(decay: &D, start: f64, velocity: f64, min: f64, max: f64) -> Self {
        let velocity = if velocity.is_finite() { velocity } else { 0.0 };
        let duration = decay.duration_ms(velocity);
        // Already at (or past) the bound in the direction of motion.
        let blocked = (velocity > 0.0 && start >= max) || (velocity < 0.0 && start <= min);
        Self {
            start,
            velocity,
            min,
            max,
            duration,
            current: start,
            finished: duration == 0 || blocked,
        }
    }

    fn update<D: DecaySpec>(&mut self, decay: &D, elapsed: u64) {
        if self.finished {
            return;
        }
        let position = decay.value_at(elapsed, self.start, self.velocity);
        if self.velocity > 0.0 && position >= self.max {
            self.current = self.max;
            self.finished = true;
        } else if self.velocity < 0.0 && position <= self.min {
            self.current = self.min;
            self.finished = true;
        } else {
            self.current = position;
            self.finished = elapsed >= self.duration;
        }
    }
}

/// Simulates a fling on both axes independently.
///
/// Each axis decelerates according to the decay curve `D` and finishes either
/// when its decay duration has elapsed or when it reaches the bound of its
/// range in the direction of motion. The position never passes that bound.
#[derive(Clone, Debug)]
pub struct FlingSimulator<D: DecaySpec = ExponentialDecay> {
    decay: D,
    x: AxisFling,
    y: AxisFling,
    start_time: u64,
}

impl Default for FlingSimulator {
    fn default() -> Self {
        Self::new(ExponentialDecay::default())
    }
}

impl<D: DecaySpec> FlingSimulator<D> {
    /// Creates an idle simulator using `decay`.
    #[must_use]
    pub fn new(decay: D) -> Self {
        Self {
            decay,
            x: AxisFling {
                finished: true,
                ..AxisFling::default()
            },
            y: AxisFling {
                finished: true,
                ..AxisFling::default()
            },
            start_time: 0,
        }
    }

    /// Returns the decay curve.
    pub fn decay(&self) -> &D {
        &self.decay
    }

    /// Starts a fling from `start` with `velocity` (units per second).
    ///
    /// `range` bounds the position on each axis. Non-finite velocity
    /// components are treated as zero.
    pub fn fling(&mut self, start: Point, velocity: Vec2, range: Rect, now_ms: u64) {
        let range = range.abs();
        self.x = AxisFling::new(&self.decay, start.x, velocity.x, range.x0, range.x1);
        self.y = AxisFling::new(&self.decay, start.y, velocity.y, range.y0, range.y1);
        self.start_time = now_ms;
        log::trace!(
            "fling from {start:?} at {velocity:?} within {range:?}, lasting {}ms",
            self.x.duration.max(self.y.duration)
        );
    }

    /// Advances the simulation to `now_ms`.
    ///
    /// Returns `false` if the fling had already finished, in which case the
    /// position is unchanged.
    pub fn compute_offset(&mut self, now_ms: u64) -> bool {
        if self.is_finished() {
            return false;
        }
        let elapsed = now_ms.saturating_sub(self.start_time);
        self.x.update(&self.decay, elapsed);
        self.y.update(&self.decay, elapsed);
        true
    }

    /// Returns the current position.
    #[must_use]
    pub fn current(&self) -> Point {
        Point::new(self.x.current, self.y.current)
    }

    /// Returns the start position of the current or last fling.
    #[must_use]
    pub fn start(&self) -> Point {
        Point::new(self.x.start, self.y.start)
    }

    /// Returns the distance travelled since the fling started.
    #[must_use]
    pub fn distance(&self) -> Vec2 {
        self.current() - self.start()
    }

    /// Returns the time when both axes come to rest, absent any bound.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.x.duration.max(self.y.duration)
    }

    /// Stops both axes at their current position.
    pub fn force_finished(&mut self) {
        self.x.finished = true;
        self.y.finished = true;
    }

    /// Returns `true` once both axes have come to rest.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.x.finished && self.y.finished
    }
}
