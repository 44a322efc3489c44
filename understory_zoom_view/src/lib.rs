// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_zoom_view --heading-base-level=0

//! Understory Zoom View: touch-driven zoom and pan for a single image.
//!
//! [`ZoomView`] turns raw pointer events into an image-to-view transform. It
//! combines the pieces of the other Understory crates:
//!
//! - `understory_view2d` lays the image out ([`FitMode`]) and enforces zoom
//!   and pan limits ([`LimitPolicy`]).
//! - `understory_event_state` classifies pointer events into drags, flings,
//!   taps, double taps and pinches.
//! - `understory_timing` drives the settle animations and flings.
//!
//! The view is toolkit-agnostic. A widget implements [`TransformHost`] to
//! report its size, display the transform and schedule frames, then forwards
//! its pointer events to [`ZoomView::on_pointer`] and its frame callbacks to
//! [`ZoomView::on_frame`]. Notifications are published on typed
//! [`events`] channels.
//!
//! ## Gestures
//!
//! - One finger pans; releasing it quickly flings the image.
//! - A double tap zooms in by [`ViewConfig::zoom_step`] about the tap.
//! - A double tap followed by a vertical slide zooms continuously.
//! - Two fingers pinch-zoom; a quick two-finger tap zooms out.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Affine, Point, Size, Vec2};
//! use understory_event_state::gesture::{PointerEvent, PointerId};
//! use understory_zoom_view::{FitMode, TransformHost, ZoomView};
//!
//! struct Widget {
//!     size: Size,
//!     transform: Affine,
//!     frame_in: Option<u64>,
//! }
//!
//! impl TransformHost for Widget {
//!     fn view_size(&self) -> Size {
//!         self.size
//!     }
//!     fn set_display_transform(&mut self, transform: Affine) {
//!         self.transform = transform;
//!     }
//!     fn schedule_frame(&mut self, delay_ms: u64) {
//!         self.frame_in = Some(delay_ms);
//!     }
//! }
//!
//! fn settle(view: &mut ZoomView, widget: &mut Widget, mut now: u64) -> u64 {
//!     while let Some(delay) = widget.frame_in.take() {
//!         now += delay;
//!         view.on_frame(widget, now);
//!     }
//!     now
//! }
//!
//! let mut widget = Widget {
//!     size: Size::new(400.0, 300.0),
//!     transform: Affine::IDENTITY,
//!     frame_in: None,
//! };
//! let mut view = ZoomView::default();
//! view.set_fit_mode(&mut widget, FitMode::FitStart);
//! view.set_image_size(&mut widget, Size::new(800.0, 600.0));
//! assert_eq!(view.current_scale(), 1.0);
//!
//! // Drag one finger 40px to the right. The fitted image has no room to pan,
//! // so on release it springs back.
//! let finger = PointerId(1);
//! view.on_pointer(&mut widget, &PointerEvent::down(finger, Point::new(100.0, 100.0), 0));
//! view.on_pointer(&mut widget, &PointerEvent::moved(finger, Point::new(140.0, 100.0), 16));
//! assert_eq!(view.current_translate(), Vec2::new(40.0, 0.0));
//! view.on_pointer(&mut widget, &PointerEvent::up(finger, Point::new(140.0, 100.0), 100));
//! let now = settle(&mut view, &mut widget, 100);
//! assert_eq!(view.current_translate(), Vec2::ZERO);
//!
//! // Zoom in programmatically and let the animation run.
//! assert!(view.perform_zoom(&mut widget, 1.5, Point::new(200.0, 150.0)));
//! settle(&mut view, &mut widget, now);
//! assert!((view.current_scale() - 1.5).abs() < 1e-9);
//! assert_eq!(widget.transform, view.transform());
//! ```
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

mod config;
mod error;
pub mod events;
mod host;
mod view;

pub use config::ViewConfig;
pub use error::ConfigError;
pub use host::TransformHost;
pub use view::ZoomView;

pub use understory_view2d::{FitMode, LimitConfig, LimitPolicy, ScaleLimits};
