// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: frame-paced animation and inertial decay primitives.
//!
//! This crate contains the time-driven pieces of an interactive viewport,
//! independent of any event loop or rendering backend:
//!
//! - [`FrameAnimator`]: interpolates a value from a start to an end over a
//!   fixed duration with a quadratic ease-out, one step per frame. Supports
//!   cancellation (reverts to the start value) and forced completion.
//! - [`DecaySpec`] and [`ExponentialDecay`]: friction curves giving position
//!   and velocity over time for a released velocity.
//! - [`FlingSimulator`]: a two-axis fling built on a decay curve, bounded by a
//!   range of permitted positions.
//!
//! Nothing here owns a clock. The host calls `step`/`compute_offset` from its
//! own frame callback and passes the current time in milliseconds where needed;
//! [`FRAME_INTERVAL_MS`] is the nominal delay between frames.
//!
//! ## Example
//!
//! ```rust
//! use understory_timing::{FRAME_INTERVAL_MS, FrameAnimator};
//!
//! // Animate a zoom factor from 1.0 to 2.0 over 64ms.
//! let mut zoom = FrameAnimator::new(1.0, 2.0, 64);
//! assert_eq!(zoom.start(), FRAME_INTERVAL_MS);
//!
//! // Consumers compose incremental transforms: apply the ratio between
//! // consecutive values rather than the absolute value.
//! let mut applied = 1.0;
//! let mut previous = zoom.start_value();
//! while let Some(step) = zoom.step() {
//!     applied *= step.value / previous;
//!     previous = step.value;
//! }
//! assert!((applied - 2.0).abs() < 1e-12);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod animator;
mod decay;
mod fling;

pub use animator::{AnimationState, FrameAnimator, FrameStep};
pub use decay::{DecaySpec, ExponentialDecay};
pub use fling::FlingSimulator;

/// Nominal delay between animation frames in milliseconds (60 Hz).
pub const FRAME_INTERVAL_MS: u64 = 1000 / 60;
