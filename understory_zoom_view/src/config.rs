// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_event_state::gesture::GestureConfig;

/// Tunables of a [`ZoomView`](crate::ZoomView).
///
/// Limits and policies live in [`LimitConfig`](understory_view2d::LimitConfig)
/// and are changed through the view's validating setters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    /// Gesture recognition thresholds.
    pub gesture: GestureConfig,
    /// Zoom factor of a double click; a two-finger tap zooms by its inverse.
    pub zoom_step: f64,
    /// Duration of programmatic and corrective animations.
    pub animation_duration_ms: u64,
    /// Pinch span change (pixels) that doubles the zoom.
    pub pinch_weight: f64,
    /// Vertical slide (pixels) after a double tap that doubles the zoom.
    pub slide_weight: f64,
    /// Friction multiplier of flings; higher stops sooner.
    pub fling_friction: f64,
    /// Whether moving the pinch midpoint also pans the image.
    pub pinch_pans: bool,
    /// Whether gestures may zoom.
    pub zoomable: bool,
    /// Whether gestures may pan.
    pub draggable: bool,
    /// Whether double clicks and two-finger taps zoom.
    pub quick_zoom: bool,
    /// Whether double clicks are published.
    pub double_click: bool,
    /// Whether long clicks are published.
    pub long_click: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            zoom_step: 1.5,
            animation_duration_ms: 500,
            pinch_weight: 480.0,
            slide_weight: 192.0,
            fling_friction: 1.0,
            pinch_pans: false,
            zoomable: true,
            draggable: true,
            quick_zoom: true,
            double_click: true,
            long_click: true,
        }
    }
}
