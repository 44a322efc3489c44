// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Velocity decay curves for inertial motion.
//!
//! A decay has no fixed target: it starts with a velocity and decelerates
//! until the velocity falls below a threshold. The distance travelled follows
//! from the initial velocity.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A friction model producing position and velocity over time.
///
/// Velocities are in units per second; times are in milliseconds.
pub trait DecaySpec {
    /// Velocity magnitude below which the motion is considered at rest.
    fn abs_velocity_threshold(&self) -> f64;

    /// Position after `time_ms`.
    fn value_at(&self, time_ms: u64, initial_value: f64, initial_velocity: f64) -> f64;

    /// Velocity after `time_ms`.
    fn velocity_at(&self, time_ms: u64, initial_velocity: f64) -> f64;

    /// Time until the velocity decays below the threshold.
    fn duration_ms(&self, initial_velocity: f64) -> u64;

    /// Position at rest.
    fn target_value(&self, initial_value: f64, initial_velocity: f64) -> f64;
}

/// Exponential friction decay: `v(t) = v0 * e^(-k t)` with `k = 4.2 * friction_multiplier`.
///
/// Position is the integral of the velocity, so it approaches
/// `x0 + v0 / k` monotonically and the motion reaches the velocity threshold
/// in finite time for any finite start velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExponentialDecay {
    friction_multiplier: f64,
    abs_velocity_threshold: f64,
}

/// Base friction of [`ExponentialDecay`] per second.
const BASE_FRICTION: f64 = 4.2;

const DEFAULT_FRICTION_MULTIPLIER: f64 = 1.0;
const DEFAULT_VELOCITY_THRESHOLD: f64 = 0.1;

impl Default for ExponentialDecay {
    fn default() -> Self {
        Self::new(DEFAULT_FRICTION_MULTIPLIER, DEFAULT_VELOCITY_THRESHOLD)
    }
}

impl ExponentialDecay {
    /// Creates a decay.
    ///
    /// Non-positive or non-finite arguments fall back to the defaults
    /// (`friction_multiplier = 1.0`, `abs_velocity_threshold = 0.1`).
    #[must_use]
    pub fn new(friction_multiplier: f64, abs_velocity_threshold: f64) -> Self {
        let valid = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        Self {
            friction_multiplier: valid(friction_multiplier, DEFAULT_FRICTION_MULTIPLIER),
            abs_velocity_threshold: valid(abs_velocity_threshold, DEFAULT_VELOCITY_THRESHOLD),
        }
    }

    /// Creates a decay with the default velocity threshold.
    #[must_use]
    pub fn with_friction(friction_multiplier: f64) -> Self {
        Self::new(friction_multiplier, DEFAULT_VELOCITY_THRESHOLD)
    }

    /// The friction multiplier.
    #[must_use]
    pub fn friction_multiplier(&self) -> f64 {
        self.friction_multiplier
    }

    fn friction(&self) -> f64 {
        BASE_FRICTION * self.friction_multiplier
    }
}

impl DecaySpec for ExponentialDecay {
    fn abs_velocity_threshold(&self) -> f64 {
        self.abs_velocity_threshold
    }

    fn value_at(&self, time_ms: u64, initial_value: f64, initial_velocity: f64) -> f64 {
        if !initial_velocity.is_finite() {
            return initial_value;
        }
        let t = secs(time_ms.min(self.duration_ms(initial_velocity)));
        let k = self.friction();
        initial_value + initial_velocity / k * (1.0 - (-k * t).exp())
    }

    fn velocity_at(&self, time_ms: u64, initial_velocity: f64) -> f64 {
        if time_ms >= self.duration_ms(initial_velocity) {
            return 0.0;
        }
        initial_velocity * (-self.friction() * secs(time_ms)).exp()
    }

    fn duration_ms(&self, initial_velocity: f64) -> u64 {
        let v = initial_velocity.abs();
        if !v.is_finite() || v <= self.abs_velocity_threshold {
            return 0;
        }
        let seconds = (v / self.abs_velocity_threshold).ln() / self.friction();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "duration is finite, positive and far below u64::MAX"
        )]
        let ms = (seconds * 1000.0).ceil() as u64;
        ms
    }

    fn target_value(&self, initial_value: f64, initial_velocity: f64) -> f64 {
        self.value_at(
            self.duration_ms(initial_velocity),
            initial_value,
            initial_velocity,
        )
    }
}

fn secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}
