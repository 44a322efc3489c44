// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect, Size, Vec2};

use crate::modes::FitMode;
use crate::transform::{ViewTransform, origin_transform};

/// Transform state of an image displayed inside a view.
///
/// `ImageViewport` tracks the view size, the image's intrinsic size, the
/// layout-time *origin* transform chosen by a [`FitMode`], and the *current*
/// transform after user zoom and pan. It can be used to:
/// - Query zoom and pan relative to the origin layout.
/// - Query the on-screen bounds of the transformed image.
/// - Apply incremental scale (about a pivot) and translation steps.
///
/// It enforces no limits itself; see [`crate::limits`] for the policy engine.
#[derive(Clone, Debug)]
pub struct ImageViewport {
    view_size: Size,
    image_size: Size,
    fit_mode: FitMode,
    origin: ViewTransform,
    current: ViewTransform,
}

impl Default for ImageViewport {
    fn default() -> Self {
        Self::new(Size::ZERO, Size::ZERO, FitMode::default())
    }
}

impl ImageViewport {
    /// Creates a viewport and lays the image out with `fit_mode`.
    #[must_use]
    pub fn new(view_size: Size, image_size: Size, fit_mode: FitMode) -> Self {
        let origin = origin_transform(fit_mode, image_size, view_size);
        Self {
            view_size,
            image_size,
            fit_mode,
            origin,
            current: origin,
        }
    }

    /// Recomputes the origin transform and resets the current transform to it.
    pub fn layout(&mut self, view_size: Size, image_size: Size) {
        self.view_size = view_size;
        self.image_size = image_size;
        self.relayout();
    }

    /// Changes the fit mode, re-laying out the image.
    pub fn set_fit_mode(&mut self, mode: FitMode) {
        self.fit_mode = mode;
        self.relayout();
    }

    fn relayout(&mut self) {
        self.origin = origin_transform(self.fit_mode, self.image_size, self.view_size);
        self.current = self.origin;
    }

    /// Returns the current fit mode.
    #[must_use]
    pub fn fit_mode(&self) -> FitMode {
        self.fit_mode
    }

    /// Returns the view size in pixels.
    #[must_use]
    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Returns the image's intrinsic size.
    #[must_use]
    pub fn image_size(&self) -> Size {
        self.image_size
    }

    /// Returns the layout-time origin transform.
    #[must_use]
    pub fn origin(&self) -> ViewTransform {
        self.origin
    }

    /// Returns the current transform.
    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        self.current
    }

    /// Returns the zoom factor relative to the origin layout.
    ///
    /// This is `1.0` when the image has not been zoomed.
    #[must_use]
    pub fn current_scale(&self) -> f64 {
        if self.origin.scale.x == 0.0 {
            return 1.0;
        }
        self.current.scale.x / self.origin.scale.x
    }

    /// Returns the pan offset of the image's top-left corner relative to the origin layout.
    #[must_use]
    pub fn current_translate(&self) -> Vec2 {
        self.current.translation - self.origin.translation
    }

    /// Returns `true` when the zoom factor differs from the origin layout.
    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.current_scale() != 1.0
    }

    /// Returns `true` when the image has been panned away from the origin layout.
    #[must_use]
    pub fn is_dragged(&self) -> bool {
        self.current_translate() != Vec2::ZERO
    }

    /// Returns the on-screen rectangle covered by the transformed image.
    #[must_use]
    pub fn image_bounds(&self) -> Rect {
        self.current.map_size(self.image_size)
    }

    /// Returns the left edge of the image on screen.
    #[must_use]
    pub fn image_left(&self) -> f64 {
        self.image_bounds().x0
    }

    /// Returns the top edge of the image on screen.
    #[must_use]
    pub fn image_top(&self) -> f64 {
        self.image_bounds().y0
    }

    /// Returns the right edge of the image on screen.
    #[must_use]
    pub fn image_right(&self) -> f64 {
        self.image_bounds().x1
    }

    /// Returns the bottom edge of the image on screen.
    #[must_use]
    pub fn image_bottom(&self) -> f64 {
        self.image_bounds().y1
    }

    /// Returns the displayed width of the image.
    #[must_use]
    pub fn image_width(&self) -> f64 {
        self.image_bounds().width()
    }

    /// Returns the displayed height of the image.
    #[must_use]
    pub fn image_height(&self) -> f64 {
        self.image_bounds().height()
    }

    /// Scales the image by `factor` about a view-space pivot.
    ///
    /// Non-finite or non-positive factors are ignored.
    pub fn apply_scale(&mut self, factor: f64, pivot: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.current.apply_scale(factor, pivot);
    }

    /// Pans the image by `delta` in view space.
    pub fn apply_translate(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        self.current.apply_translate(delta);
    }

    /// Rounds the current translation to whole pixels.
    ///
    /// Call this at settle points (gesture end, animation end) to stop
    /// floating-point drift accumulating across many incremental steps.
    pub fn snap_to_integer_translation(&mut self) {
        self.current.snap_translation();
    }

    /// Snapshot of the current state for debugging and inspection.
    #[must_use]
    pub fn debug_info(&self) -> ImageViewportDebugInfo {
        ImageViewportDebugInfo {
            view_size: self.view_size,
            image_size: self.image_size,
            fit_mode: self.fit_mode,
            origin: self.origin,
            current: self.current,
            image_bounds: self.image_bounds(),
            scale: self.current_scale(),
            translate: self.current_translate(),
        }
    }
}

/// Debug snapshot of an [`ImageViewport`] state.
#[derive(Clone, Copy, Debug)]
pub struct ImageViewportDebugInfo {
    /// View size in pixels.
    pub view_size: Size,
    /// Intrinsic image size.
    pub image_size: Size,
    /// Fit mode used for the origin layout.
    pub fit_mode: FitMode,
    /// Origin transform.
    pub origin: ViewTransform,
    /// Current transform.
    pub current: ViewTransform,
    /// On-screen image rectangle.
    pub image_bounds: Rect,
    /// Zoom relative to the origin.
    pub scale: f64,
    /// Pan relative to the origin.
    pub translate: Vec2,
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Size, Vec2};

    use super::ImageViewport;
    use crate::FitMode;

    fn viewport() -> ImageViewport {
        ImageViewport::new(
            Size::new(400.0, 300.0),
            Size::new(200.0, 100.0),
            FitMode::Center,
        )
    }

    #[test]
    fn fresh_layout_is_neither_zoomed_nor_dragged() {
        let vp = viewport();
        assert_eq!(vp.current_scale(), 1.0);
        assert_eq!(vp.current_translate(), Vec2::ZERO);
        assert!(!vp.is_zoomed());
        assert!(!vp.is_dragged());
        assert_eq!(vp.image_bounds(), Rect::new(100.0, 100.0, 300.0, 200.0));
    }

    #[test]
    fn zoom_is_relative_to_origin() {
        let mut vp = ImageViewport::new(
            Size::new(400.0, 400.0),
            Size::new(200.0, 100.0),
            FitMode::FitCenter,
        );
        assert_eq!(vp.transform().scale.x, 2.0);
        assert_eq!(vp.current_scale(), 1.0);

        vp.apply_scale(1.5, Point::new(200.0, 200.0));
        assert!((vp.current_scale() - 1.5).abs() < 1e-12);
        assert!(vp.is_zoomed());
        assert!((vp.image_width() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn translate_moves_bounds_and_reports_offset() {
        let mut vp = viewport();
        vp.apply_translate(Vec2::new(-30.0, 12.5));
        assert_eq!(vp.current_translate(), Vec2::new(-30.0, 12.5));
        assert_eq!(vp.image_left(), 70.0);
        assert_eq!(vp.image_top(), 112.5);
        assert!(vp.is_dragged());

        vp.snap_to_integer_translation();
        assert_eq!(vp.image_top(), 113.0);
    }

    #[test]
    fn invalid_steps_are_ignored() {
        let mut vp = viewport();
        vp.apply_scale(0.0, Point::ORIGIN);
        vp.apply_scale(f64::NAN, Point::ORIGIN);
        vp.apply_translate(Vec2::new(f64::INFINITY, 0.0));
        assert_eq!(vp.transform(), vp.origin());
    }

    #[test]
    fn layout_and_fit_mode_reset_current_transform() {
        let mut vp = viewport();
        vp.apply_scale(2.0, Point::ORIGIN);
        vp.layout(Size::new(200.0, 200.0), Size::new(200.0, 100.0));
        assert!(!vp.is_zoomed());
        assert_eq!(vp.image_bounds(), Rect::new(0.0, 50.0, 200.0, 150.0));

        vp.apply_translate(Vec2::new(5.0, 5.0));
        vp.set_fit_mode(FitMode::FitStart);
        assert_eq!(vp.fit_mode(), FitMode::FitStart);
        assert!(!vp.is_dragged());

        let info = vp.debug_info();
        assert_eq!(info.current, info.origin);
        assert_eq!(info.scale, 1.0);
    }
}
