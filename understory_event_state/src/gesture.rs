// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch gesture classification: drags, flings, taps, double taps and pinches.
//!
//! [`GestureClassifier`] consumes raw [`PointerEvent`]s (one or two active
//! pointers) and produces semantic [`GestureEvent`]s. It owns no timer: events
//! carry timestamps, and time-based outcomes (long press, expiry of the
//! double-tap window) are produced by [`GestureClassifier::poll`] once
//! [`GestureClassifier::next_deadline`] has passed, or lazily by the next
//! pointer event.
//!
//! ## Classification
//!
//! - One pointer: `Down`, then `DragStart` + `Drag` once the pointer leaves the
//!   touch slop. Release ends with `Fling` if the release velocity reaches
//!   [`GestureConfig::min_fling_velocity`] on either axis, `DragEnd` otherwise.
//!   Released without moving it is a tap; holding still past the long-press
//!   timeout yields `LongClick` instead.
//! - Taps are held back for the double-tap window. A second press close to the
//!   first within the window turns into `DoubleTapDown`; releasing it without
//!   moving yields `DoubleClick`, moving it yields the `DoubleTapDrag*` family.
//!   Otherwise the held-back tap is released as `Click`. A double click never
//!   also yields single clicks.
//! - Two pointers: `PinchDown`, `Pinch` steps once span or midpoint leave the
//!   slop, then `PinchEnd`, or `TwoFingerTap` if neither pointer moved. A
//!   second pointer ends any single-pointer drag first. Further pointers are
//!   ignored, and so are the remaining pointers after a pinch until all are up.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::Point;
//! use understory_event_state::gesture::{
//!     GestureClassifier, GestureConfig, GestureEvent, PointerEvent, PointerId,
//! };
//!
//! let mut gestures = GestureClassifier::new(GestureConfig::default());
//! let id = PointerId(1);
//! let at = Point::new(50.0, 50.0);
//!
//! gestures.on_pointer(&PointerEvent::down(id, at, 0));
//! gestures.on_pointer(&PointerEvent::up(id, at, 60));
//! gestures.on_pointer(&PointerEvent::down(id, at, 150));
//! let events = gestures.on_pointer(&PointerEvent::up(id, at, 200));
//! assert_eq!(events, vec![GestureEvent::DoubleClick { position: at }]);
//!
//! // Nothing is left pending.
//! assert_eq!(gestures.next_deadline(), None);
//! ```

use alloc::vec::Vec;
use core::mem;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

use crate::drag::DragState;
use crate::pinch::PinchState;
use crate::velocity::VelocityTracker;

/// Identifier of a pointer (finger) for the duration of its contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

/// Phase of a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    /// The pointer touched down.
    Down,
    /// The pointer moved while down.
    Move,
    /// The pointer lifted.
    Up,
    /// The platform aborted the whole gesture.
    Cancel,
}

/// A raw pointer event in view coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Which pointer.
    pub pointer: PointerId,
    /// Event phase.
    pub kind: PointerKind,
    /// Position in view pixels.
    pub position: Point,
    /// Monotonic timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(pointer: PointerId, kind: PointerKind, position: Point, time_ms: u64) -> Self {
        Self {
            pointer,
            kind,
            position,
            time_ms,
        }
    }

    /// A [`PointerKind::Down`] event.
    #[must_use]
    pub fn down(pointer: PointerId, position: Point, time_ms: u64) -> Self {
        Self::new(pointer, PointerKind::Down, position, time_ms)
    }

    /// A [`PointerKind::Move`] event.
    #[must_use]
    pub fn moved(pointer: PointerId, position: Point, time_ms: u64) -> Self {
        Self::new(pointer, PointerKind::Move, position, time_ms)
    }

    /// A [`PointerKind::Up`] event.
    #[must_use]
    pub fn up(pointer: PointerId, position: Point, time_ms: u64) -> Self {
        Self::new(pointer, PointerKind::Up, position, time_ms)
    }

    /// A [`PointerKind::Cancel`] event.
    #[must_use]
    pub fn cancel(pointer: PointerId, position: Point, time_ms: u64) -> Self {
        Self::new(pointer, PointerKind::Cancel, position, time_ms)
    }
}

/// Tunable thresholds of a [`GestureClassifier`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Distance in pixels a pointer must travel before it drags or pinches.
    pub touch_slop: f64,
    /// Maximum time between a tap's release and the next press for a double tap.
    pub double_tap_timeout_ms: u64,
    /// Maximum distance between the two presses of a double tap.
    pub double_tap_slop: f64,
    /// Hold time after which a still pointer becomes a long click.
    pub long_press_timeout_ms: u64,
    /// Release speed in pixels per second needed for a fling.
    pub min_fling_velocity: f64,
    /// Release speeds are clamped to this, in pixels per second.
    pub max_fling_velocity: f64,
    /// Whether taps wait for a possible second tap.
    pub double_tap_enabled: bool,
    /// Whether long clicks are detected.
    pub long_press_enabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: 8.0,
            double_tap_timeout_ms: 300,
            double_tap_slop: 100.0,
            long_press_timeout_ms: 500,
            min_fling_velocity: 50.0,
            max_fling_velocity: 8000.0,
            double_tap_enabled: true,
            long_press_enabled: true,
        }
    }
}

/// Semantic gesture produced by a [`GestureClassifier`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A single pointer went down.
    Down {
        /// Press position.
        position: Point,
    },
    /// The pointer left the touch slop; a drag begins.
    DragStart {
        /// Press position.
        position: Point,
    },
    /// The dragging pointer moved.
    Drag {
        /// Current position.
        position: Point,
        /// Motion since the previous drag event.
        delta: Vec2,
    },
    /// The dragging pointer lifted slowly.
    DragEnd {
        /// Release position.
        position: Point,
    },
    /// The dragging pointer lifted fast; replaces `DragEnd`.
    Fling {
        /// Release position.
        position: Point,
        /// Release velocity in pixels per second.
        velocity: Vec2,
    },
    /// A tap that did not become a double tap.
    Click {
        /// Press position.
        position: Point,
    },
    /// A pointer held still past the long-press timeout.
    LongClick {
        /// Press position.
        position: Point,
    },
    /// Second press of a double tap.
    DoubleTapDown {
        /// Press position.
        position: Point,
    },
    /// The second press of a double tap left the touch slop.
    DoubleTapDragStart {
        /// Press position.
        position: Point,
    },
    /// The second press of a double tap moved.
    DoubleTapDrag {
        /// Current position.
        position: Point,
        /// Motion since the previous event.
        delta: Vec2,
    },
    /// A moved second press lifted.
    DoubleTapDragEnd {
        /// Release position.
        position: Point,
    },
    /// The second press lifted without moving.
    DoubleClick {
        /// Press position of the second tap.
        position: Point,
    },
    /// A second pointer went down; a pinch begins.
    PinchDown {
        /// Midpoint of the pointers.
        center: Point,
        /// Distance between the pointers.
        span: f64,
    },
    /// The pinching pointers moved.
    Pinch {
        /// Current midpoint.
        center: Point,
        /// Change in distance between the pointers since the previous event.
        span_delta: f64,
        /// Motion of the midpoint since the previous event.
        pan: Vec2,
    },
    /// One of the pinching pointers lifted.
    PinchEnd {
        /// Midpoint at release.
        center: Point,
    },
    /// Two pointers tapped together without moving.
    TwoFingerTap {
        /// Midpoint of the pointers at the press.
        center: Point,
    },
    /// The platform cancelled the gesture; any session in progress is over.
    Cancel,
}

#[derive(Clone, Copy, Debug)]
struct SingleSession {
    pointer: PointerId,
    down_pos: Point,
    down_time: u64,
    drag: DragState,
    long_pressed: bool,
}

#[derive(Clone, Copy, Debug)]
struct DoubleTapSession {
    pointer: PointerId,
    down_pos: Point,
    drag: DragState,
}

#[derive(Clone, Copy, Debug)]
struct PinchSession {
    first: PointerId,
    second: PointerId,
    down_time: u64,
    state: PinchState,
}

#[derive(Clone, Copy, Debug, Default)]
enum Mode {
    #[default]
    Idle,
    Single(SingleSession),
    DoubleTap(DoubleTapSession),
    Pinch(PinchSession),
    /// Waiting for the pointers left after a pinch to lift.
    Drain,
}

#[derive(Clone, Copy, Debug)]
struct PendingTap {
    position: Point,
    up_time: u64,
}

/// Turns a pointer event stream into [`GestureEvent`]s.
///
/// See the [module documentation](self) for the classification rules.
#[derive(Clone, Debug)]
pub struct GestureClassifier {
    config: GestureConfig,
    mode: Mode,
    pointers: SmallVec<[(PointerId, Point); 4]>,
    velocity: VelocityTracker,
    pending_tap: Option<PendingTap>,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureClassifier {
    /// Creates an idle classifier.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            mode: Mode::Idle,
            pointers: SmallVec::new(),
            velocity: VelocityTracker::new(),
            pending_tap: None,
        }
    }

    /// Returns the thresholds in use.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replaces the thresholds; takes effect for the next gesture.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Number of pointers currently down.
    #[must_use]
    pub fn active_pointers(&self) -> usize {
        self.pointers.len()
    }

    /// Returns `true` when no pointer is down and no tap is held back.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.mode, Mode::Idle) && self.pending_tap.is_none()
    }

    /// Drops all state without emitting anything.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.pointers.clear();
        self.velocity.reset();
        self.pending_tap = None;
    }

    /// Processes one pointer event.
    ///
    /// Deadlines that passed before the event's timestamp are resolved first,
    /// so the returned events are in time order.
    pub fn on_pointer(&mut self, event: &PointerEvent) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        self.poll_into(event.time_ms, &mut out);
        match event.kind {
            PointerKind::Down => self.on_down(event, &mut out),
            PointerKind::Move => self.on_move(event, &mut out),
            PointerKind::Up => self.on_up(event, &mut out),
            PointerKind::Cancel => self.on_cancel(&mut out),
        }
        out
    }

    /// Resolves time-based outcomes due at `now_ms`.
    pub fn poll(&mut self, now_ms: u64) -> Vec<GestureEvent> {
        let mut out = Vec::new();
        self.poll_into(now_ms, &mut out);
        out
    }

    /// Earliest time at which [`GestureClassifier::poll`] would produce an event.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        let tap = self.pending_tap.map(|tap| {
            tap.up_time
                .saturating_add(self.config.double_tap_timeout_ms)
                .saturating_add(1)
        });
        let long_press = match &self.mode {
            Mode::Single(s) if self.long_press_pending(s) => {
                Some(s.down_time.saturating_add(self.config.long_press_timeout_ms))
            }
            _ => None,
        };
        match (tap, long_press) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn long_press_pending(&self, session: &SingleSession) -> bool {
        self.config.long_press_enabled && !session.long_pressed && !session.drag.is_moving()
    }

    fn poll_into(&mut self, now_ms: u64, out: &mut Vec<GestureEvent>) {
        if let Some(tap) = self.pending_tap
            && now_ms.saturating_sub(tap.up_time) > self.config.double_tap_timeout_ms
        {
            self.pending_tap = None;
            out.push(GestureEvent::Click {
                position: tap.position,
            });
        }
        if let Mode::Single(session) = self.mode
            && self.long_press_pending(&session)
            && now_ms.saturating_sub(session.down_time) >= self.config.long_press_timeout_ms
        {
            log::debug!("long press at {:?}", session.down_pos);
            self.mode = Mode::Single(SingleSession {
                long_pressed: true,
                ..session
            });
            out.push(GestureEvent::LongClick {
                position: session.down_pos,
            });
        }
    }

    fn position_of(&self, pointer: PointerId) -> Option<Point> {
        self.pointers
            .iter()
            .find(|(id, _)| *id == pointer)
            .map(|(_, p)| *p)
    }

    fn on_down(&mut self, event: &PointerEvent, out: &mut Vec<GestureEvent>) {
        if self.position_of(event.pointer).is_some() {
            return;
        }
        self.pointers.push((event.pointer, event.position));

        match mem::take(&mut self.mode) {
            Mode::Idle => self.start_single(event, out),
            Mode::Single(session) => {
                if session.drag.is_moving() {
                    out.push(GestureEvent::DragEnd {
                        position: self.position_of(session.pointer).unwrap_or(session.down_pos),
                    });
                }
                self.start_pinch(session.pointer, event, out);
            }
            Mode::DoubleTap(session) => {
                if session.drag.is_moving() {
                    out.push(GestureEvent::DoubleTapDragEnd {
                        position: self.position_of(session.pointer).unwrap_or(session.down_pos),
                    });
                }
                self.start_pinch(session.pointer, event, out);
            }
            // Third and later pointers do not take part.
            mode @ (Mode::Pinch(_) | Mode::Drain) => self.mode = mode,
        }
    }

    fn start_single(&mut self, event: &PointerEvent, out: &mut Vec<GestureEvent>) {
        let mut drag = DragState::with_slop(self.config.touch_slop);
        drag.start(event.position);

        if let Some(tap) = self.pending_tap.take() {
            let in_time =
                event.time_ms.saturating_sub(tap.up_time) <= self.config.double_tap_timeout_ms;
            let near = (event.position - tap.position).hypot() <= self.config.double_tap_slop;
            if in_time && near {
                log::debug!("double tap at {:?}", event.position);
                self.mode = Mode::DoubleTap(DoubleTapSession {
                    pointer: event.pointer,
                    down_pos: event.position,
                    drag,
                });
                out.push(GestureEvent::DoubleTapDown {
                    position: event.position,
                });
                return;
            }
            out.push(GestureEvent::Click {
                position: tap.position,
            });
        }

        self.velocity.reset();
        self.velocity.add(event.time_ms, event.position);
        self.mode = Mode::Single(SingleSession {
            pointer: event.pointer,
            down_pos: event.position,
            down_time: event.time_ms,
            drag,
            long_pressed: false,
        });
        out.push(GestureEvent::Down {
            position: event.position,
        });
    }

    fn start_pinch(&mut self, first: PointerId, event: &PointerEvent, out: &mut Vec<GestureEvent>) {
        let first_pos = self.position_of(first).unwrap_or(event.position);
        let state = PinchState::start(first_pos, event.position, self.config.touch_slop);
        log::debug!("pinch start, span {}", state.span());
        out.push(GestureEvent::PinchDown {
            center: state.center(),
            span: state.span(),
        });
        self.mode = Mode::Pinch(PinchSession {
            first,
            second: event.pointer,
            down_time: event.time_ms,
            state,
        });
    }

    fn on_move(&mut self, event: &PointerEvent, out: &mut Vec<GestureEvent>) {
        let Some(slot) = self.pointers.iter_mut().find(|(id, _)| *id == event.pointer) else {
            return;
        };
        slot.1 = event.position;

        match &mut self.mode {
            Mode::Single(session) if session.pointer == event.pointer => {
                self.velocity.add(event.time_ms, event.position);
                if session.long_pressed {
                    return;
                }
                let started = !session.drag.is_moving();
                if let Some(delta) = session.drag.update(event.position) {
                    if started {
                        out.push(GestureEvent::DragStart {
                            position: session.down_pos,
                        });
                    }
                    out.push(GestureEvent::Drag {
                        position: event.position,
                        delta,
                    });
                }
            }
            Mode::DoubleTap(session) if session.pointer == event.pointer => {
                let started = !session.drag.is_moving();
                if let Some(delta) = session.drag.update(event.position) {
                    if started {
                        out.push(GestureEvent::DoubleTapDragStart {
                            position: session.down_pos,
                        });
                    }
                    out.push(GestureEvent::DoubleTapDrag {
                        position: event.position,
                        delta,
                    });
                }
            }
            Mode::Pinch(session) => {
                let step = if event.pointer == session.first {
                    session.state.update_first(event.position)
                } else if event.pointer == session.second {
                    session.state.update_second(event.position)
                } else {
                    None
                };
                if let Some(step) = step {
                    out.push(GestureEvent::Pinch {
                        center: step.center,
                        span_delta: step.span_delta,
                        pan: step.pan,
                    });
                }
            }
            _ => {}
        }
    }

    fn on_up(&mut self, event: &PointerEvent, out: &mut Vec<GestureEvent>) {
        let Some(index) = self.pointers.iter().position(|(id, _)| *id == event.pointer) else {
            return;
        };
        self.pointers.remove(index);
        let all_up = self.pointers.is_empty();

        match mem::take(&mut self.mode) {
            Mode::Single(session) if session.pointer == event.pointer => {
                self.velocity.add(event.time_ms, event.position);
                self.finish_single(&session, event, out);
            }
            Mode::DoubleTap(session) if session.pointer == event.pointer => {
                if session.drag.is_moving() {
                    out.push(GestureEvent::DoubleTapDragEnd {
                        position: event.position,
                    });
                } else {
                    out.push(GestureEvent::DoubleClick {
                        position: session.down_pos,
                    });
                }
            }
            Mode::Pinch(session)
                if event.pointer == session.first || event.pointer == session.second =>
            {
                let held = event.time_ms.saturating_sub(session.down_time);
                if !session.state.is_moving() && held < self.config.long_press_timeout_ms {
                    out.push(GestureEvent::TwoFingerTap {
                        center: session.state.start_center(),
                    });
                } else {
                    out.push(GestureEvent::PinchEnd {
                        center: session.state.center(),
                    });
                }
                if !all_up {
                    self.mode = Mode::Drain;
                }
            }
            Mode::Drain if all_up => {}
            mode => self.mode = mode,
        }
    }

    fn finish_single(
        &mut self,
        session: &SingleSession,
        event: &PointerEvent,
        out: &mut Vec<GestureEvent>,
    ) {
        if session.drag.is_moving() {
            let velocity = self.velocity.velocity(self.config.max_fling_velocity);
            let min = self.config.min_fling_velocity;
            if velocity.x.abs() >= min || velocity.y.abs() >= min {
                log::debug!("fling at {velocity:?}");
                out.push(GestureEvent::Fling {
                    position: event.position,
                    velocity,
                });
            } else {
                out.push(GestureEvent::DragEnd {
                    position: event.position,
                });
            }
            return;
        }
        let held = event.time_ms.saturating_sub(session.down_time);
        if session.long_pressed || held >= self.config.long_press_timeout_ms {
            return;
        }
        if self.config.double_tap_enabled {
            self.pending_tap = Some(PendingTap {
                position: session.down_pos,
                up_time: event.time_ms,
            });
        } else {
            out.push(GestureEvent::Click {
                position: session.down_pos,
            });
        }
    }

    fn on_cancel(&mut self, out: &mut Vec<GestureEvent>) {
        let active = !matches!(self.mode, Mode::Idle);
        self.reset();
        if active {
            log::debug!("gesture cancelled");
            out.push(GestureEvent::Cancel);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    const A: PointerId = PointerId(1);
    const B: PointerId = PointerId(2);

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn classifier() -> GestureClassifier {
        GestureClassifier::new(GestureConfig::default())
    }

    #[test]
    fn tap_is_held_back_until_the_double_tap_window_expires() {
        let mut g = classifier();
        assert_eq!(
            g.on_pointer(&PointerEvent::down(A, p(10.0, 10.0), 0)),
            vec![GestureEvent::Down {
                position: p(10.0, 10.0)
            }]
        );
        assert!(g.on_pointer(&PointerEvent::up(A, p(11.0, 10.0), 80)).is_empty());
        assert_eq!(g.next_deadline(), Some(381));
        assert!(g.poll(380).is_empty());
        assert_eq!(
            g.poll(381),
            vec![GestureEvent::Click {
                position: p(10.0, 10.0)
            }]
        );
        assert!(g.is_idle());
    }

    #[test]
    fn late_second_press_releases_the_first_click() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(10.0, 10.0), 0));
        g.on_pointer(&PointerEvent::up(A, p(10.0, 10.0), 50));
        let events = g.on_pointer(&PointerEvent::down(A, p(10.0, 10.0), 500));
        assert_eq!(
            events,
            vec![
                GestureEvent::Click {
                    position: p(10.0, 10.0)
                },
                GestureEvent::Down {
                    position: p(10.0, 10.0)
                },
            ]
        );
    }

    #[test]
    fn distant_second_press_is_not_a_double_tap() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(0.0, 0.0), 0));
        g.on_pointer(&PointerEvent::up(A, p(0.0, 0.0), 50));
        let events = g.on_pointer(&PointerEvent::down(A, p(300.0, 0.0), 100));
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GestureEvent::Click { .. }));
        assert!(matches!(events[1], GestureEvent::Down { .. }));
    }

    #[test]
    fn two_quick_taps_make_exactly_one_double_click() {
        let mut g = classifier();
        let mut all = Vec::new();
        all.extend(g.on_pointer(&PointerEvent::down(A, p(40.0, 40.0), 0)));
        all.extend(g.on_pointer(&PointerEvent::up(A, p(40.0, 40.0), 70)));
        all.extend(g.on_pointer(&PointerEvent::down(B, p(42.0, 41.0), 180)));
        all.extend(g.on_pointer(&PointerEvent::up(B, p(42.0, 41.0), 240)));
        all.extend(g.poll(10_000));

        assert_eq!(
            all,
            vec![
                GestureEvent::Down {
                    position: p(40.0, 40.0)
                },
                GestureEvent::DoubleTapDown {
                    position: p(42.0, 41.0)
                },
                GestureEvent::DoubleClick {
                    position: p(42.0, 41.0)
                },
            ]
        );
    }

    #[test]
    fn double_tap_then_slide() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(40.0, 40.0), 0));
        g.on_pointer(&PointerEvent::up(A, p(40.0, 40.0), 50));
        g.on_pointer(&PointerEvent::down(A, p(40.0, 40.0), 120));
        let events = g.on_pointer(&PointerEvent::moved(A, p(40.0, 60.0), 140));
        assert_eq!(
            events,
            vec![
                GestureEvent::DoubleTapDragStart {
                    position: p(40.0, 40.0)
                },
                GestureEvent::DoubleTapDrag {
                    position: p(40.0, 60.0),
                    delta: Vec2::new(0.0, 20.0)
                },
            ]
        );
        assert_eq!(
            g.on_pointer(&PointerEvent::up(A, p(40.0, 60.0), 200)),
            vec![GestureEvent::DoubleTapDragEnd {
                position: p(40.0, 60.0)
            }]
        );
    }

    #[test]
    fn disabled_double_tap_clicks_immediately() {
        let mut g = GestureClassifier::new(GestureConfig {
            double_tap_enabled: false,
            ..GestureConfig::default()
        });
        g.on_pointer(&PointerEvent::down(A, p(1.0, 1.0), 0));
        assert_eq!(
            g.on_pointer(&PointerEvent::up(A, p(1.0, 1.0), 30)),
            vec![GestureEvent::Click {
                position: p(1.0, 1.0)
            }]
        );
        g.on_pointer(&PointerEvent::down(A, p(1.0, 1.0), 60));
        assert_eq!(
            g.on_pointer(&PointerEvent::up(A, p(1.0, 1.0), 90)),
            vec![GestureEvent::Click {
                position: p(1.0, 1.0)
            }]
        );
    }

    #[test]
    fn drag_starts_after_slop_and_is_sticky() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(100.0, 100.0), 0));
        assert!(
            g.on_pointer(&PointerEvent::moved(A, p(104.0, 100.0), 16))
                .is_empty()
        );
        let events = g.on_pointer(&PointerEvent::moved(A, p(110.0, 100.0), 32));
        assert_eq!(
            events,
            vec![
                GestureEvent::DragStart {
                    position: p(100.0, 100.0)
                },
                GestureEvent::Drag {
                    position: p(110.0, 100.0),
                    delta: Vec2::new(10.0, 0.0)
                },
            ]
        );
        // Small moves stay drags.
        assert_eq!(
            g.on_pointer(&PointerEvent::moved(A, p(109.0, 100.0), 48)),
            vec![GestureEvent::Drag {
                position: p(109.0, 100.0),
                delta: Vec2::new(-1.0, 0.0)
            }]
        );
        // A drag never turns into a tap, and a held drag does not long press.
        assert!(g.poll(5_000).is_empty());
        let end = g.on_pointer(&PointerEvent::up(A, p(109.0, 100.0), 5_000));
        assert_eq!(
            end,
            vec![GestureEvent::DragEnd {
                position: p(109.0, 100.0)
            }]
        );
        assert!(g.poll(10_000).is_empty());
    }

    #[test]
    fn fast_release_flings() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(300.0, 100.0), 0));
        for i in 1..=5_u32 {
            let x = 300.0 - f64::from(i) * 20.0;
            g.on_pointer(&PointerEvent::moved(A, p(x, 100.0), u64::from(i) * 10));
        }
        let events = g.on_pointer(&PointerEvent::up(A, p(180.0, 100.0), 60));
        let [GestureEvent::Fling { velocity, .. }] = events.as_slice() else {
            panic!("expected a fling, got {events:?}");
        };
        assert!((velocity.x + 2000.0).abs() < 1e-6);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn long_press_fires_once_and_suppresses_click() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(5.0, 5.0), 1_000));
        assert_eq!(g.next_deadline(), Some(1_500));
        assert_eq!(
            g.poll(1_500),
            vec![GestureEvent::LongClick {
                position: p(5.0, 5.0)
            }]
        );
        assert_eq!(g.next_deadline(), None);
        assert!(g.poll(2_000).is_empty());
        // Moving after the long press does not drag.
        assert!(
            g.on_pointer(&PointerEvent::moved(A, p(80.0, 5.0), 2_100))
                .is_empty()
        );
        assert!(
            g.on_pointer(&PointerEvent::up(A, p(80.0, 5.0), 2_200))
                .is_empty()
        );
        assert!(g.is_idle());
    }

    #[test]
    fn long_press_is_resolved_lazily_by_the_next_event() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(5.0, 5.0), 0));
        let events = g.on_pointer(&PointerEvent::up(A, p(5.0, 5.0), 900));
        assert_eq!(
            events,
            vec![GestureEvent::LongClick {
                position: p(5.0, 5.0)
            }]
        );
    }

    #[test]
    fn pinch_reports_span_changes() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(100.0, 100.0), 0));
        assert_eq!(
            g.on_pointer(&PointerEvent::down(B, p(200.0, 100.0), 10)),
            vec![GestureEvent::PinchDown {
                center: p(150.0, 100.0),
                span: 100.0
            }]
        );
        assert_eq!(g.active_pointers(), 2);
        let events = g.on_pointer(&PointerEvent::moved(B, p(260.0, 100.0), 30));
        assert_eq!(
            events,
            vec![GestureEvent::Pinch {
                center: p(180.0, 100.0),
                span_delta: 60.0,
                pan: Vec2::new(30.0, 0.0)
            }]
        );
        assert_eq!(
            g.on_pointer(&PointerEvent::up(A, p(100.0, 100.0), 60)),
            vec![GestureEvent::PinchEnd {
                center: p(180.0, 100.0)
            }]
        );
        // The remaining pointer is ignored until it lifts.
        assert!(
            g.on_pointer(&PointerEvent::moved(B, p(400.0, 100.0), 70))
                .is_empty()
        );
        assert!(
            g.on_pointer(&PointerEvent::up(B, p(400.0, 100.0), 80))
                .is_empty()
        );
        assert!(g.is_idle());
    }

    #[test]
    fn second_pointer_ends_a_drag() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(0.0, 0.0), 0));
        g.on_pointer(&PointerEvent::moved(A, p(30.0, 0.0), 16));
        let events = g.on_pointer(&PointerEvent::down(B, p(30.0, 100.0), 32));
        assert_eq!(
            events,
            vec![
                GestureEvent::DragEnd {
                    position: p(30.0, 0.0)
                },
                GestureEvent::PinchDown {
                    center: p(30.0, 50.0),
                    span: 100.0
                },
            ]
        );
    }

    #[test]
    fn still_two_finger_touch_is_a_tap() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(0.0, 0.0), 0));
        g.on_pointer(&PointerEvent::down(B, p(100.0, 0.0), 20));
        g.on_pointer(&PointerEvent::moved(A, p(2.0, 1.0), 40));
        let events = g.on_pointer(&PointerEvent::up(B, p(100.0, 0.0), 90));
        assert_eq!(
            events,
            vec![GestureEvent::TwoFingerTap {
                center: p(50.0, 0.0)
            }]
        );
        g.on_pointer(&PointerEvent::up(A, p(2.0, 1.0), 100));
        // No click or long click from the leftover pointer.
        assert!(g.poll(10_000).is_empty());
    }

    #[test]
    fn third_pointer_is_ignored() {
        let mut g = classifier();
        let c = PointerId(3);
        g.on_pointer(&PointerEvent::down(A, p(0.0, 0.0), 0));
        g.on_pointer(&PointerEvent::down(B, p(100.0, 0.0), 10));
        assert!(
            g.on_pointer(&PointerEvent::down(c, p(50.0, 50.0), 20))
                .is_empty()
        );
        assert!(
            g.on_pointer(&PointerEvent::moved(c, p(90.0, 90.0), 30))
                .is_empty()
        );
        assert!(
            g.on_pointer(&PointerEvent::up(c, p(90.0, 90.0), 40))
                .is_empty()
        );
        assert_eq!(g.active_pointers(), 2);
    }

    #[test]
    fn cancel_drops_everything() {
        let mut g = classifier();
        g.on_pointer(&PointerEvent::down(A, p(0.0, 0.0), 0));
        g.on_pointer(&PointerEvent::moved(A, p(50.0, 0.0), 16));
        assert_eq!(
            g.on_pointer(&PointerEvent::cancel(A, p(50.0, 0.0), 20)),
            vec![GestureEvent::Cancel]
        );
        assert!(g.is_idle());
        assert_eq!(g.active_pointers(), 0);
        assert!(
            g.on_pointer(&PointerEvent::up(A, p(50.0, 0.0), 30))
                .is_empty()
        );
    }
}
