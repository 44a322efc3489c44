// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-pointer pinch tracking: span and midpoint deltas.
//!
//! ## Usage
//!
//! 1) Begin with [`PinchState::start`] when the second pointer goes down.
//! 2) Feed every move of either pointer to [`PinchState::update`]. Until the
//!    span or the midpoint has moved more than the slop, it returns `None`;
//!    afterwards it returns a [`PinchStep`] relative to the previous step.
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::pinch::PinchState;
//!
//! let mut pinch = PinchState::start(Point::new(100.0, 100.0), Point::new(200.0, 100.0), 8.0);
//! assert_eq!(pinch.span(), 100.0);
//!
//! // Spread the second finger by 40px.
//! let step = pinch.update_second(Point::new(240.0, 100.0)).unwrap();
//! assert_eq!(step.span_delta, 40.0);
//! assert_eq!(step.center, Point::new(170.0, 100.0));
//! ```

use kurbo::{Point, Vec2};

/// Change reported by [`PinchState::update`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchStep {
    /// Current midpoint of the two pointers.
    pub center: Point,
    /// Change of the distance between the pointers since the previous step.
    pub span_delta: f64,
    /// Movement of the midpoint since the previous step.
    pub pan: Vec2,
}

/// Tracks two pointers forming a pinch.
#[derive(Clone, Copy, Debug)]
pub struct PinchState {
    first: Point,
    second: Point,
    start_center: Point,
    start_span: f64,
    last_center: Point,
    last_span: f64,
    slop: f64,
    moving: bool,
}

impl PinchState {
    /// Starts tracking a pinch between `first` and `second`.
    #[must_use]
    pub fn start(first: Point, second: Point, slop: f64) -> Self {
        let center = first.midpoint(second);
        let span = first.distance(second);
        Self {
            first,
            second,
            start_center: center,
            start_span: span,
            last_center: center,
            last_span: span,
            slop: slop.max(0.0),
            moving: false,
        }
    }

    /// Moves both pointers.
    pub fn update(&mut self, first: Point, second: Point) -> Option<PinchStep> {
        self.first = first;
        self.second = second;
        let center = self.center();
        let span = self.span();
        if !self.moving {
            let spread = (span - self.start_span).abs();
            let drift = (center - self.start_center).hypot();
            if spread <= self.slop && drift <= self.slop {
                return None;
            }
            self.moving = true;
        }
        let step = PinchStep {
            center,
            span_delta: span - self.last_span,
            pan: center - self.last_center,
        };
        self.last_center = center;
        self.last_span = span;
        Some(step)
    }

    /// Moves the first pointer.
    pub fn update_first(&mut self, position: Point) -> Option<PinchStep> {
        self.update(position, self.second)
    }

    /// Moves the second pointer.
    pub fn update_second(&mut self, position: Point) -> Option<PinchStep> {
        self.update(self.first, position)
    }

    /// Current midpoint.
    #[must_use]
    pub fn center(&self) -> Point {
        self.first.midpoint(self.second)
    }

    /// Midpoint when the pinch started.
    #[must_use]
    pub fn start_center(&self) -> Point {
        self.start_center
    }

    /// Current distance between the pointers.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.first.distance(self.second)
    }

    /// Returns `true` once the slop has been exceeded.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }
}
