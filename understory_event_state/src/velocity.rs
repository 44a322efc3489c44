// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer velocity estimation for fling detection.
//!
//! [`VelocityTracker`] keeps a small ring buffer of timestamped positions and
//! fits a least-squares line through the recent ones. Samples older than
//! 100 ms are ignored, and a gap of more than 40 ms between samples means the
//! pointer rested, so only motion after the gap counts.
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::velocity::VelocityTracker;
//!
//! let mut tracker = VelocityTracker::new();
//! for i in 0..5_u32 {
//!     tracker.add(u64::from(i) * 10, Point::new(f64::from(i) * 20.0, 0.0));
//! }
//! let v = tracker.velocity(8000.0);
//! assert!((v.x - 2000.0).abs() < 1e-6);
//! assert_eq!(v.y, 0.0);
//! ```

use kurbo::{Point, Vec2};

/// Ring buffer size.
const HISTORY_SIZE: usize = 20;

/// Only samples within this window before the newest one are used.
const HORIZON_MS: u64 = 100;

/// A gap longer than this between samples means the pointer stopped.
const ASSUME_STOPPED_MS: u64 = 40;

#[derive(Clone, Copy, Debug)]
struct Sample {
    time_ms: u64,
    position: Point,
}

/// Estimates pointer velocity in pixels per second.
#[derive(Clone, Debug, Default)]
pub struct VelocityTracker {
    samples: [Option<Sample>; HISTORY_SIZE],
    index: usize,
}

impl VelocityTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the pointer position at `time_ms`.
    pub fn add(&mut self, time_ms: u64, position: Point) {
        self.index = (self.index + 1) % HISTORY_SIZE;
        self.samples[self.index] = Some(Sample { time_ms, position });
    }

    /// Forgets all samples.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns the current velocity, each axis clamped to `±max_velocity`.
    ///
    /// Zero with fewer than two usable samples.
    #[must_use]
    pub fn velocity(&self, max_velocity: f64) -> Vec2 {
        let Some(newest) = self.samples[self.index] else {
            return Vec2::ZERO;
        };

        // Times are relative to the newest sample, in ms (all <= 0).
        let mut count = 0.0;
        let mut sum_t = 0.0;
        let mut sum_tt = 0.0;
        let mut sum_p = Vec2::ZERO;
        let mut sum_tp = Vec2::ZERO;

        let mut previous_time = newest.time_ms;
        let mut index = self.index;
        for _ in 0..HISTORY_SIZE {
            let Some(sample) = self.samples[index] else {
                break;
            };
            if sample.time_ms > previous_time
                || newest.time_ms - sample.time_ms > HORIZON_MS
                || previous_time - sample.time_ms > ASSUME_STOPPED_MS
            {
                break;
            }
            let t = -((newest.time_ms - sample.time_ms) as f64);
            let p = sample.position.to_vec2();
            count += 1.0;
            sum_t += t;
            sum_tt += t * t;
            sum_p += p;
            sum_tp += p * t;

            previous_time = sample.time_ms;
            index = (index + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        let denom = count * sum_tt - sum_t * sum_t;
        if count < 2.0 || denom.abs() < f64::EPSILON {
            return Vec2::ZERO;
        }
        // Slope in px/ms, converted to px/s.
        let slope = (sum_tp * count - sum_p * sum_t) / denom * 1000.0;
        let max = max_velocity.abs();
        Vec2::new(slope.x.clamp(-max, max), slope.y.clamp(-max, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_or_single_sample_is_still() {
        let mut tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(8000.0), Vec2::ZERO);
        tracker.add(0, Point::new(5.0, 5.0));
        assert_eq!(tracker.velocity(8000.0), Vec2::ZERO);
    }

    #[test]
    fn constant_motion_gives_its_speed() {
        let mut tracker = VelocityTracker::new();
        // 10 px per 10 ms leftwards, 5 px per 10 ms down.
        for i in 0..8_u32 {
            let t = u64::from(i) * 10;
            tracker.add(t, Point::new(300.0 - f64::from(i) * 10.0, f64::from(i) * 5.0));
        }
        let v = tracker.velocity(8000.0);
        assert!((v.x + 1000.0).abs() < 1e-6);
        assert!((v.y - 500.0).abs() < 1e-6);
    }

    #[test]
    fn old_samples_are_outside_the_horizon() {
        let mut tracker = VelocityTracker::new();
        // A fast burst long ago, then slow motion in steps under the rest gap.
        tracker.add(0, Point::new(0.0, 0.0));
        tracker.add(10, Point::new(500.0, 0.0));
        for i in 0..10_u32 {
            let t = 40 + u64::from(i) * 30;
            tracker.add(t, Point::new(500.0 + f64::from(i) * 3.0, 0.0));
        }
        let v = tracker.velocity(8000.0);
        assert!((v.x - 100.0).abs() < 1e-6);
    }

    #[test]
    fn resting_before_release_kills_velocity() {
        let mut tracker = VelocityTracker::new();
        for i in 0..5_u32 {
            tracker.add(u64::from(i) * 10, Point::new(f64::from(i) * 30.0, 0.0));
        }
        // Held still for 60 ms, then released.
        tracker.add(100, Point::new(120.0, 0.0));
        assert_eq!(tracker.velocity(8000.0), Vec2::ZERO);
    }

    #[test]
    fn velocity_is_clamped_per_axis() {
        let mut tracker = VelocityTracker::new();
        tracker.add(0, Point::new(0.0, 0.0));
        tracker.add(1, Point::new(100.0, -100.0));
        assert_eq!(tracker.velocity(8000.0), Vec2::new(8000.0, -8000.0));
    }

    #[test]
    fn reset_forgets_samples() {
        let mut tracker = VelocityTracker::new();
        tracker.add(0, Point::new(0.0, 0.0));
        tracker.add(10, Point::new(10.0, 0.0));
        tracker.reset();
        assert_eq!(tracker.velocity(8000.0), Vec2::ZERO);
    }
}
