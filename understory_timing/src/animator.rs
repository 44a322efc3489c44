// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-paced value animator with a quadratic ease-out curve.
//!
//! ## Usage
//!
//! 1) Create an animator with [`FrameAnimator::new`] and call [`FrameAnimator::start`].
//! 2) Each time the host's frame timer fires, call [`FrameAnimator::step`] and
//!    apply the returned value.
//! 3) Re-arm the timer with [`FrameAnimator::next_delay`] until a step reports
//!    [`FrameStep::ended`].
//!
//! Values are absolute. Consumers composing incremental transforms should
//! remember the previous value and apply only the difference.
//!
//! ## Minimal example
//!
//! ```
//! use understory_timing::{AnimationState, FrameAnimator};
//!
//! let mut anim = FrameAnimator::new(0.0, 1.0, 100);
//! anim.start();
//!
//! let mut last = 0.0;
//! while let Some(step) = anim.step() {
//!     assert!(step.value >= last - 1e-9);
//!     last = step.value;
//!     if step.ended {
//!         break;
//!     }
//! }
//! assert_eq!(last, 1.0);
//! assert_eq!(anim.state(), AnimationState::Finished);
//! ```

use crate::FRAME_INTERVAL_MS;

/// Lifecycle of a [`FrameAnimator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AnimationState {
    /// Created but not started.
    #[default]
    Stopped,
    /// Producing intermediate values.
    Running,
    /// Completed naturally or by [`FrameAnimator::finish`]; the last value is the end value.
    Finished,
    /// Cancelled by [`FrameAnimator::cancel`]; the last value is the start value.
    Cancelled,
}

/// One value produced by [`FrameAnimator::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStep {
    /// The animated value for this frame.
    pub value: f64,
    /// `true` for the final step; no more steps follow.
    pub ended: bool,
}

/// Interpolates from a start to an end value over a fixed duration.
///
/// The curve is `a * (t - duration)^2 + end` with `a = (start - end) / duration^2`:
/// it starts at `start`, decelerates, and lands exactly on `end`.
#[derive(Clone, Debug)]
pub struct FrameAnimator {
    start: f64,
    end: f64,
    duration: u64,
    remaining: i64,
    value: f64,
    state: AnimationState,
    done: bool,
}

impl FrameAnimator {
    /// Creates a stopped animator from `start` to `end` over `duration_ms`.
    #[must_use]
    pub fn new(start: f64, end: f64, duration_ms: u64) -> Self {
        Self {
            start,
            end,
            duration: duration_ms,
            remaining: duration_to_i64(duration_ms),
            value: start,
            state: AnimationState::Stopped,
            done: false,
        }
    }

    /// Starts (or restarts) the animation from its start value.
    ///
    /// Returns the delay before the first [`FrameAnimator::step`].
    pub fn start(&mut self) -> u64 {
        self.value = self.start;
        self.remaining = duration_to_i64(self.duration);
        self.state = AnimationState::Running;
        self.done = false;
        FRAME_INTERVAL_MS
    }

    /// Requests cancellation; the next step emits the start value and ends.
    pub fn cancel(&mut self) {
        if self.state == AnimationState::Running {
            self.state = AnimationState::Cancelled;
        }
    }

    /// Requests forced completion; the next step emits the end value and ends.
    pub fn finish(&mut self) {
        if self.state == AnimationState::Running {
            self.state = AnimationState::Finished;
        }
    }

    /// Advances one frame.
    ///
    /// Returns `None` before [`FrameAnimator::start`] and after the final step.
    pub fn step(&mut self) -> Option<FrameStep> {
        if self.done {
            return None;
        }
        match self.state {
            AnimationState::Stopped => return None,
            AnimationState::Running => {
                let elapsed = duration_to_i64(self.duration) - self.remaining;
                self.value = self.value_at(elapsed);
                self.remaining -= duration_to_i64(FRAME_INTERVAL_MS);
            }
            AnimationState::Finished => {
                self.value = self.end;
                self.remaining = 0;
            }
            AnimationState::Cancelled => {
                self.value = self.start;
                self.remaining = 0;
            }
        }

        if self.state != AnimationState::Running {
            self.done = true;
            return Some(FrameStep {
                value: self.value,
                ended: true,
            });
        }

        // The next step is the last one.
        if self.remaining <= duration_to_i64(FRAME_INTERVAL_MS) {
            self.state = AnimationState::Finished;
        }
        if self.remaining < 0 {
            self.remaining = 0;
        }
        Some(FrameStep {
            value: self.value,
            ended: false,
        })
    }

    /// Delay in milliseconds before the next [`FrameAnimator::step`] is due.
    #[must_use]
    pub fn next_delay(&self) -> u64 {
        let remaining = u64::try_from(self.remaining).unwrap_or(0);
        remaining.min(FRAME_INTERVAL_MS)
    }

    /// The most recently produced value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The start value.
    #[must_use]
    pub fn start_value(&self) -> f64 {
        self.start
    }

    /// The end value.
    #[must_use]
    pub fn end_value(&self) -> f64 {
        self.end
    }

    /// The configured duration in milliseconds.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Returns `true` while intermediate values are being produced.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == AnimationState::Running
    }

    /// Returns `true` once [`FrameAnimator::start`] has been called.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state != AnimationState::Stopped
    }

    /// Returns `true` after the final step has been produced.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    fn value_at(&self, t: i64) -> f64 {
        if self.duration == 0 {
            return self.end;
        }
        let d = self.duration as f64;
        let a = (self.start - self.end) / (d * d);
        let x = t as f64 - d;
        a * x * x + self.end
    }
}

fn duration_to_i64(ms: u64) -> i64 {
    i64::try_from(ms).unwrap_or(i64::MAX / 2)
}

#[cfg(test)]
mod tests {
    extern crate alloc;

    use alloc::vec::Vec;

    use super::*;

    fn run(anim: &mut FrameAnimator) -> Vec<FrameStep> {
        let mut steps = Vec::new();
        while let Some(step) = anim.step() {
            steps.push(step);
        }
        steps
    }

    #[test]
    fn unstarted_animator_produces_nothing() {
        let mut anim = FrameAnimator::new(0.0, 10.0, 100);
        assert_eq!(anim.step(), None);
        assert!(!anim.is_started());
    }

    #[test]
    fn runs_from_start_to_end_with_ease_out() {
        let mut anim = FrameAnimator::new(1.0, 2.0, 500);
        assert_eq!(anim.start(), FRAME_INTERVAL_MS);
        let steps = run(&mut anim);

        assert!((steps[0].value - 1.0).abs() < 1e-12);
        let last = steps.last().copied().unwrap();
        assert!(last.ended);
        assert_eq!(last.value, 2.0);
        assert_eq!(anim.state(), AnimationState::Finished);
        assert!(anim.is_done());

        // Ease-out: increments shrink as the animation progresses.
        let deltas: Vec<f64> = steps.windows(2).map(|w| w[1].value - w[0].value).collect();
        assert!(deltas.iter().all(|d| *d >= 0.0));
        assert!(deltas[0] > deltas[deltas.len() - 2]);
        assert_eq!(steps.iter().filter(|s| s.ended).count(), 1);
    }

    #[test]
    fn last_delay_is_the_remainder() {
        let mut anim = FrameAnimator::new(0.0, 1.0, 40);
        anim.start();
        anim.step();
        assert_eq!(anim.next_delay(), 16);
        anim.step();
        // 40 - 32 = 8ms left.
        assert_eq!(anim.next_delay(), 8);
        assert_eq!(anim.state(), AnimationState::Finished);
        assert_eq!(
            anim.step(),
            Some(FrameStep {
                value: 1.0,
                ended: true
            })
        );
    }

    #[test]
    fn cancel_reverts_to_start_value() {
        let mut anim = FrameAnimator::new(0.0, 100.0, 500);
        anim.start();
        anim.step();
        anim.step();
        assert!(anim.value() > 0.0);

        anim.cancel();
        assert_eq!(
            anim.step(),
            Some(FrameStep {
                value: 0.0,
                ended: true
            })
        );
        assert_eq!(anim.state(), AnimationState::Cancelled);
        assert_eq!(anim.step(), None);
    }

    #[test]
    fn finish_jumps_to_end_value() {
        let mut anim = FrameAnimator::new(3.0, -3.0, 1000);
        anim.start();
        anim.step();
        anim.finish();
        let step = anim.step().unwrap();
        assert_eq!(step.value, -3.0);
        assert!(step.ended);
    }

    #[test]
    fn cancel_after_completion_is_ignored() {
        let mut anim = FrameAnimator::new(0.0, 1.0, 16);
        anim.start();
        run(&mut anim);
        anim.cancel();
        assert_eq!(anim.state(), AnimationState::Finished);
        assert_eq!(anim.value(), 1.0);
    }

    #[test]
    fn zero_duration_lands_on_end() {
        let mut anim = FrameAnimator::new(5.0, 7.0, 0);
        anim.start();
        let steps = run(&mut anim);
        assert_eq!(steps.last().map(|s| s.value), Some(7.0));
        assert!(steps.iter().all(|s| s.value == 7.0));
    }

    #[test]
    fn restart_resets_progress() {
        let mut anim = FrameAnimator::new(0.0, 1.0, 64);
        anim.start();
        run(&mut anim);
        anim.start();
        assert!(anim.is_running());
        assert_eq!(anim.step().map(|s| s.value), Some(0.0));
    }
}
