// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_view2d --heading-base-level=0

//! Understory View 2D: bounded pan/zoom transforms for a displayed image.
//!
//! This crate provides a small, headless model of an image shown inside a
//! view, where both are measured in device pixels. It focuses on:
//! - Layout-time placement of the image (the *origin* transform) for a
//!   [`FitMode`].
//! - The current scale + translation transform and queries relative to the
//!   origin (zoom factor, pan offset, on-screen image bounds).
//! - A pure limit-policy engine ([`limits`]) that clamps proposed zoom/pan
//!   deltas or computes spring-back corrections.
//!
//! It does **not** own any rendering backend, gesture recognition, or
//! animation. Callers are expected to:
//! - Feed layout changes into [`ImageViewport::layout`].
//! - Run proposed deltas through [`limits`] according to their policy.
//! - Apply the permitted deltas with [`ImageViewport::apply_scale`] and
//!   [`ImageViewport::apply_translate`], and hand
//!   [`ViewTransform::to_affine`] to the renderer.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use understory_view2d::{FitMode, ImageViewport, LimitPolicy, ScaleLimits, limits};
//!
//! // A 200x100 image fitted into a 400x400 view.
//! let mut view = ImageViewport::new(
//!     Size::new(400.0, 400.0),
//!     Size::new(200.0, 100.0),
//!     FitMode::FitCenter,
//! );
//!
//! // Ask the engine how much of a 3x zoom the limits allow.
//! let factor = limits::permitted_scale(
//!     LimitPolicy::Clamped,
//!     3.0,
//!     view.current_scale(),
//!     ScaleLimits { min_scale: 0.5, max_scale: 2.0 },
//! );
//! view.apply_scale(factor, Point::new(200.0, 200.0));
//! assert_eq!(view.current_scale(), 2.0);
//! ```
//!
//! ## Design notes
//!
//! - Transforms are axis‑aligned; zoom is uniform except for a
//!   [`FitMode::FitXy`] origin.
//! - Every mutation is an incremental step (scale about a pivot, or
//!   translate), so several drivers can compose on the same transform.
//!
//! This crate is `no_std`.

#![no_std]

mod image_viewport;
pub mod limits;
mod modes;
mod transform;

pub use image_viewport::{ImageViewport, ImageViewportDebugInfo};
pub use limits::{LimitConfig, ScaleLimits};
pub use modes::{FitMode, LimitPolicy, PolicyFlagsError, PolicyFlagsErrorKind};
pub use transform::{ViewTransform, origin_transform};
