// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: touch gesture state managers for UI interactions.
//!
//! This crate provides small, focused state machines for pointer interactions
//! that need state across several events. Each module handles one concern:
//!
//! - [`drag`]: a touch slop dead-zone followed by incremental movement deltas
//! - [`velocity`]: release velocity estimation for flings
//! - [`pinch`]: span and midpoint tracking for two pointers
//! - [`gesture`]: a classifier combining the above into drags, flings, taps,
//!   double taps, long presses and pinches
//!
//! ## Design Philosophy
//!
//! Each state manager is designed to be:
//!
//! - **Minimal and focused**: Each handles one specific interaction pattern
//! - **Clock-free**: Events carry timestamps; time-based outcomes are polled
//! - **Integration-friendly**: Work with any event loop or platform input API
//!
//! The crate does not assume any particular UI framework. The managers accept
//! raw pointer positions in view coordinates and produce events or deltas that
//! applications interpret.
//!
//! ## Usage Patterns
//!
//! ### Gesture Classification
//!
//! Use [`gesture::GestureClassifier`] to turn pointer events into gestures:
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_event_state::gesture::{
//!     GestureClassifier, GestureEvent, PointerEvent, PointerId,
//! };
//!
//! let mut gestures = GestureClassifier::default();
//! let finger = PointerId(0);
//!
//! gestures.on_pointer(&PointerEvent::down(finger, Point::new(10.0, 10.0), 0));
//! let events = gestures.on_pointer(&PointerEvent::moved(finger, Point::new(40.0, 10.0), 16));
//! assert_eq!(events, vec![
//!     GestureEvent::DragStart { position: Point::new(10.0, 10.0) },
//!     GestureEvent::Drag { position: Point::new(40.0, 10.0), delta: Vec2::new(30.0, 0.0) },
//! ]);
//! ```
//!
//! ### Drag Operations
//!
//! Use [`drag::DragState`] directly when only movement deltas are needed:
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use understory_event_state::drag::DragState;
//!
//! let mut drag = DragState::with_slop(4.0);
//! drag.start(Point::new(10.0, 10.0));
//!
//! // Move pointer, get delta since last reported position
//! let delta = drag.update(Point::new(15.0, 12.0));
//! assert_eq!(delta, Some(Vec2::new(5.0, 2.0)));
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`) for all modules.

#![no_std]

extern crate alloc;

pub mod drag;
pub mod gesture;
pub mod pinch;
pub mod velocity;
