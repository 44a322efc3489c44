// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag state helper: a touch slop dead-zone followed by incremental movement deltas.
//!
//! ## Usage
//!
//! 1) Start tracking with [`DragState::start`] at the pointer-down position.
//! 2) On each move call [`DragState::update`]. It returns `None` until the
//!    pointer has left the slop circle around the start position; from then on
//!    it returns the delta since the previously reported position. The first
//!    delta covers the whole motion from the start position.
//! 3) Reset with [`DragState::end`].
//!
//! Crossing the slop is sticky: once [`DragState::is_moving`] is `true`, small
//! moves keep being reported until the drag ends.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Vec2};
//! use understory_event_state::drag::DragState;
//!
//! let mut drag = DragState::with_slop(8.0);
//! drag.start(Point::new(10.0, 20.0));
//!
//! // Within the slop: nothing to report yet.
//! assert_eq!(drag.update(Point::new(13.0, 20.0)), None);
//! assert!(!drag.is_moving());
//!
//! // Past the slop: the first delta covers the motion from the start.
//! assert_eq!(drag.update(Point::new(20.0, 20.0)), Some(Vec2::new(10.0, 0.0)));
//!
//! // Small moves are reported from now on.
//! assert_eq!(drag.update(Point::new(21.0, 20.0)), Some(Vec2::new(1.0, 0.0)));
//! ```

use kurbo::{Point, Vec2};

/// Tracks a pointer from press to release with a movement dead-zone.
#[derive(Debug, Clone, Default, Copy)]
pub struct DragState {
    /// Start position of the drag operation.
    pub start_pos: Option<Point>,
    /// Last position reported as a delta.
    pub last_pos: Option<Point>,
    /// Radius the pointer must leave before motion is reported.
    pub slop: f64,
    moving: bool,
}

impl DragState {
    /// Creates an idle drag state with the given slop radius.
    #[must_use]
    pub fn with_slop(slop: f64) -> Self {
        Self {
            slop: slop.max(0.0),
            ..Self::default()
        }
    }

    /// Start tracking a new drag operation from the given position.
    pub fn start(&mut self, pos: Point) {
        self.start_pos = Some(pos);
        self.last_pos = Some(pos);
        self.moving = false;
    }

    /// Update the drag state with a new position.
    ///
    /// Returns the movement since the last reported position once the slop has
    /// been crossed, or `None` while inside the slop or when no drag is active.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let start = self.start_pos?;
        if !self.moving {
            if (pos - start).hypot() <= self.slop {
                return None;
            }
            self.moving = true;
        }
        let last = self.last_pos.unwrap_or(start);
        self.last_pos = Some(pos);
        Some(pos - last)
    }

    /// End the current drag operation and reset state.
    pub fn end(&mut self) {
        self.start_pos = None;
        self.last_pos = None;
        self.moving = false;
    }

    /// Returns `true` while a drag operation is active.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start_pos.is_some()
    }

    /// Returns `true` once the pointer has left the slop circle.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_drag_state_is_not_dragging() {
        let drag = DragState::default();
        assert!(!drag.is_dragging());
        assert!(!drag.is_moving());
    }

    #[test]
    fn update_returns_none_when_not_dragging() {
        let mut drag = DragState::default();
        assert_eq!(drag.update(Point::new(15.0, 25.0)), None);
        assert!(drag.last_pos.is_none());
    }

    #[test]
    fn zero_slop_reports_every_nonzero_move() {
        let mut drag = DragState::default();
        drag.start(Point::new(0.0, 0.0));

        assert_eq!(drag.update(Point::new(0.0, 0.0)), None);
        assert_eq!(drag.update(Point::new(5.0, 3.0)), Some(Vec2::new(5.0, 3.0)));
        assert_eq!(drag.update(Point::new(8.0, 7.0)), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(drag.update(Point::new(8.0, 7.0)), Some(Vec2::ZERO));
    }

    #[test]
    fn slop_is_measured_from_the_start() {
        let mut drag = DragState::with_slop(10.0);
        drag.start(Point::new(100.0, 100.0));

        // Wandering inside the circle never starts the drag.
        for p in [(105.0, 100.0), (100.0, 93.0), (94.0, 106.0)] {
            assert_eq!(drag.update(Point::new(p.0, p.1)), None);
        }
        assert!(!drag.is_moving());

        let delta = drag.update(Point::new(90.0, 85.0));
        assert_eq!(delta, Some(Vec2::new(-10.0, -15.0)));
        assert!(drag.is_moving());
    }

    #[test]
    fn crossing_is_sticky() {
        let mut drag = DragState::with_slop(8.0);
        drag.start(Point::ORIGIN);
        drag.update(Point::new(9.0, 0.0));

        // Back inside the slop circle: still reported.
        assert_eq!(drag.update(Point::new(2.0, 0.0)), Some(Vec2::new(-7.0, 0.0)));
        assert!(drag.is_moving());
    }

    #[test]
    fn start_overwrites_previous_drag() {
        let mut drag = DragState::with_slop(4.0);
        drag.start(Point::new(0.0, 0.0));
        drag.update(Point::new(10.0, 10.0));

        let new_start = Point::new(50.0, 60.0);
        drag.start(new_start);

        assert_eq!(drag.start_pos, Some(new_start));
        assert_eq!(drag.start_pos, drag.last_pos);
        assert!(!drag.is_moving());
        assert_eq!(drag.update(Point::new(51.0, 61.0)), None);
    }

    #[test]
    fn end_resets_drag_state() {
        let mut drag = DragState::default();
        drag.start(Point::new(10.0, 20.0));
        drag.update(Point::new(15.0, 25.0));

        drag.end();

        assert!(drag.start_pos.is_none());
        assert!(drag.last_pos.is_none());
        assert!(!drag.is_moving());
    }

    #[test]
    fn negative_slop_is_treated_as_zero() {
        let drag = DragState::with_slop(-3.0);
        assert_eq!(drag.slop, 0.0);
    }
}
