// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Limit policy engine: permitted zoom/pan deltas and spring-back corrections.
//!
//! All functions here are pure: they take the image's on-screen bounds (or its
//! zoom factor) and a proposed delta, and return the delta that the policy
//! allows. Callers apply the result to an [`ImageViewport`](crate::ImageViewport).
//!
//! ## Pan bounds
//!
//! Per axis, an image larger than the view must cover it (its near edge may not
//! pass the view's near edge, nor its far edge the view's far edge). An image
//! smaller than the view must lie entirely inside it.
//!
//! ## Zoom bounds
//!
//! The zoom factor relative to the origin layout must stay within
//! [`ScaleLimits`]. Factors derived from the limits are rounded to three
//! decimals so repeated corrections cannot oscillate on floating-point noise.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Rect, Size, Vec2};

use crate::modes::LimitPolicy;

/// Minimum and maximum zoom factor relative to the origin layout.
///
/// `min_scale <= 1.0 <= max_scale` is recommended but not required. A bound
/// of `0.0` disables spring-back correction on that side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLimits {
    /// Smallest permitted zoom factor.
    pub min_scale: f64,
    /// Largest permitted zoom factor.
    pub max_scale: f64,
}

impl Default for ScaleLimits {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 2.0,
        }
    }
}

impl ScaleLimits {
    /// Returns `true` if `scale` lies within the limits.
    #[must_use]
    pub fn contains(&self, scale: f64) -> bool {
        scale >= self.min_scale && scale <= self.max_scale
    }
}

/// Zoom limits plus the policies enforcing zoom and pan limits.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LimitConfig {
    /// Zoom factor range.
    pub limits: ScaleLimits,
    /// How zoom limits are enforced.
    pub zoom_policy: LimitPolicy,
    /// How pan bounds are enforced.
    pub drag_policy: LimitPolicy,
}

/// Rounds to three decimal places.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Returns the part of a proposed scale `factor` that `policy` permits.
///
/// This is the programmatic path: [`LimitPolicy::Clamped`] and
/// [`LimitPolicy::SpringBack`] both clamp, [`LimitPolicy::Unrestricted`]
/// passes the factor through. Live gestures should only call this when
/// [`LimitPolicy::clamps_live`] holds. A result of `1.0` means the zoom is
/// fully absorbed by the limit.
#[must_use]
pub fn permitted_scale(
    policy: LimitPolicy,
    factor: f64,
    current_scale: f64,
    limits: ScaleLimits,
) -> f64 {
    if !policy.clamps_programmatic() || current_scale <= 0.0 {
        return factor;
    }
    if factor > 1.0 {
        // Round down so the clamped result never lands above `max_scale`.
        let limit = (limits.max_scale / current_scale * 1000.0 + 1e-9).floor() / 1000.0;
        factor.min(limit).max(1.0)
    } else {
        // Round up so the clamped result never lands below `min_scale`.
        let limit = (limits.min_scale / current_scale * 1000.0 - 1e-9).ceil() / 1000.0;
        factor.max(limit).min(1.0)
    }
}

/// Returns the factor that brings `current_scale` back within `limits`.
///
/// The result is `target / current` rounded to three decimals, or `1.0` when
/// no correction is needed.
#[must_use]
pub fn scale_correction(current_scale: f64, limits: ScaleLimits) -> f64 {
    if current_scale <= 0.0 {
        return 1.0;
    }
    let mut fix = 1.0;
    if limits.min_scale > 0.0 && current_scale < limits.min_scale {
        fix = limits.min_scale / current_scale;
    }
    if limits.max_scale > 0.0 && current_scale > limits.max_scale {
        fix = limits.max_scale / current_scale;
    }
    round3(fix)
}

/// Returns the part of a proposed pan `delta` that `policy` permits.
///
/// `bounds` is the image's current on-screen rectangle. The permitted delta
/// never points against the request: an image already outside its pan bounds
/// can move back in, but not further out.
#[must_use]
pub fn permitted_translation(policy: LimitPolicy, delta: Vec2, bounds: Rect, view: Size) -> Vec2 {
    if !policy.clamps_programmatic() {
        return delta;
    }
    Vec2::new(
        permitted_axis(delta.x, bounds.x0, bounds.x1, view.width),
        permitted_axis(delta.y, bounds.y0, bounds.y1, view.height),
    )
}

fn permitted_axis(delta: f64, near: f64, far: f64, view_len: f64) -> f64 {
    let (lo, hi) = axis_range(near, far, view_len);
    // `lo`/`hi` bound the movement of the near edge.
    let (lo, hi) = (lo - near, hi - near);
    if delta > 0.0 {
        delta.min(hi).max(0.0)
    } else {
        delta.max(lo).min(0.0)
    }
}

/// Permitted range of the near edge for an image spanning `near..far`.
fn axis_range(near: f64, far: f64, view_len: f64) -> (f64, f64) {
    let size = far - near;
    if size > view_len {
        (view_len - size, 0.0)
    } else {
        (0.0, view_len - size)
    }
}

/// Returns the pan delta that moves the image back within its pan bounds.
///
/// Zero on axes that already satisfy the bounds.
#[must_use]
pub fn pan_correction(bounds: Rect, view: Size) -> Vec2 {
    Vec2::new(
        axis_correction(bounds.x0, bounds.x1, view.width),
        axis_correction(bounds.y0, bounds.y1, view.height),
    )
}

fn axis_correction(near: f64, far: f64, view_len: f64) -> f64 {
    let (lo, hi) = axis_range(near, far, view_len);
    if near < lo {
        lo - near
    } else if near > hi {
        hi - near
    } else {
        0.0
    }
}

/// Returns `true` if the image already sits past a pan bound in the direction of `velocity`.
///
/// A fling in that direction could only push the image further out of bounds.
#[must_use]
pub fn fling_blocked(velocity: Vec2, bounds: Rect, view: Size) -> bool {
    axis_blocked(velocity.x, bounds.x0, bounds.x1, view.width)
        || axis_blocked(velocity.y, bounds.y0, bounds.y1, view.height)
}

fn axis_blocked(velocity: f64, near: f64, far: f64, view_len: f64) -> bool {
    let (lo, hi) = axis_range(near, far, view_len);
    (velocity > 0.0 && near > hi) || (velocity < 0.0 && near < lo)
}

/// Returns the range the image's top-left corner may travel during a fling.
///
/// [`LimitPolicy::Clamped`] uses the hard pan bounds. The other policies allow
/// an overrun of twice the view extent around the current position; any
/// spring-back correction runs after the fling settles.
#[must_use]
pub fn fling_range(policy: LimitPolicy, bounds: Rect, view: Size) -> Rect {
    if policy == LimitPolicy::Clamped {
        let (x0, x1) = axis_range(bounds.x0, bounds.x1, view.width);
        let (y0, y1) = axis_range(bounds.y0, bounds.y1, view.height);
        Rect::new(x0, y0, x1, y1)
    } else {
        Rect::new(
            bounds.x0 - 2.0 * view.width,
            bounds.y0 - 2.0 * view.height,
            bounds.x0 + 2.0 * view.width,
            bounds.y0 + 2.0 * view.height,
        )
    }
}
