// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::modes::FitMode;

/// Axis-aligned scale + translation transform.
///
/// A point `p` maps to `p * scale + translation` (component-wise). Rotation
/// and skew are never introduced, so the transform stays representable by
/// these four numbers. Scale is uniform except for [`FitMode::FitXy`] origins.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Per-axis scale factors.
    pub scale: Vec2,
    /// Translation applied after scaling.
    pub translation: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ViewTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        scale: Vec2::new(1.0, 1.0),
        translation: Vec2::ZERO,
    };

    /// Creates a transform from per-axis scale and translation.
    #[must_use]
    pub const fn new(scale: Vec2, translation: Vec2) -> Self {
        Self { scale, translation }
    }

    /// Scales by `factor` on both axes, keeping `pivot` fixed on screen.
    ///
    /// This composes after the existing transform (a "post" scale): the pivot
    /// is expressed in view coordinates.
    pub fn apply_scale(&mut self, factor: f64, pivot: Point) {
        self.apply_scale_xy(Vec2::new(factor, factor), pivot);
    }

    /// Scales each axis independently about `pivot`.
    pub fn apply_scale_xy(&mut self, factor: Vec2, pivot: Point) {
        self.scale = Vec2::new(self.scale.x * factor.x, self.scale.y * factor.y);
        self.translation = Vec2::new(
            (self.translation.x - pivot.x) * factor.x + pivot.x,
            (self.translation.y - pivot.y) * factor.y + pivot.y,
        );
    }

    /// Adds `delta` to the translation.
    pub fn apply_translate(&mut self, delta: Vec2) {
        self.translation += delta;
    }

    /// Rounds the translation to whole pixels.
    pub fn snap_translation(&mut self) {
        self.translation = Vec2::new(self.translation.x.round(), self.translation.y.round());
    }

    /// Returns the equivalent [`Affine`].
    #[must_use]
    pub fn to_affine(self) -> Affine {
        Affine::new([
            self.scale.x,
            0.0,
            0.0,
            self.scale.y,
            self.translation.x,
            self.translation.y,
        ])
    }

    /// Maps a point through the transform.
    #[must_use]
    pub fn map_point(self, pt: Point) -> Point {
        Point::new(
            pt.x * self.scale.x + self.translation.x,
            pt.y * self.scale.y + self.translation.y,
        )
    }

    /// Returns where an image of intrinsic `size` placed at the origin lands.
    #[must_use]
    pub fn map_size(self, size: Size) -> Rect {
        let p0 = self.map_point(Point::ORIGIN);
        let p1 = self.map_point(Point::new(size.width, size.height));
        Rect::from_points(p0, p1)
    }
}

/// Computes the origin transform placing `image` inside `view` for `mode`.
///
/// Centering translations are truncated to whole pixels before any scaling,
/// so a fitted image starts on the pixel grid. An empty image or view yields
/// [`ViewTransform::IDENTITY`].
#[must_use]
pub fn origin_transform(mode: FitMode, image: Size, view: Size) -> ViewTransform {
    let mut t = ViewTransform::IDENTITY;
    if !has_area(image) || !has_area(view) {
        return t;
    }
    let sw = view.width / image.width;
    let sh = view.height / image.height;
    let fit = sw.min(sh);
    let center = Point::new(view.width / 2.0, view.height / 2.0);
    let centered = Vec2::new(
        ((view.width - image.width) / 2.0).trunc(),
        ((view.height - image.height) / 2.0).trunc(),
    );

    match mode {
        FitMode::Center => t.apply_translate(centered),
        FitMode::CenterCrop => {
            t.apply_translate(centered);
            t.apply_scale(sw.max(sh), center);
        }
        FitMode::CenterInside => {
            t.apply_translate(centered);
            if fit < 1.0 {
                t.apply_scale(fit, center);
            }
        }
        FitMode::FitCenter => {
            t.apply_translate(centered);
            t.apply_scale(fit, center);
        }
        FitMode::FitStart => t.apply_scale(fit, Point::ORIGIN),
        FitMode::FitEnd => {
            t.apply_translate(Vec2::new(
                (view.width - image.width).trunc(),
                (view.height - image.height).trunc(),
            ));
            t.apply_scale(fit, Point::new(view.width, view.height));
        }
        FitMode::FitXy => t.apply_scale_xy(Vec2::new(sw, sh), Point::ORIGIN),
        FitMode::Identity => {}
    }
    t
}

fn has_area(size: Size) -> bool {
    size.width > 0.0 && size.height > 0.0 && size.width.is_finite() && size.height.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rect_near(a: Rect, b: Rect) {
        assert!(
            (a.x0 - b.x0).abs() < 1e-9
                && (a.y0 - b.y0).abs() < 1e-9
                && (a.x1 - b.x1).abs() < 1e-9
                && (a.y1 - b.y1).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn scale_keeps_pivot_fixed() {
        let mut t = ViewTransform::new(Vec2::new(1.5, 1.5), Vec2::new(-20.0, 35.0));
        let pivot = Point::new(120.0, 80.0);
        let image_pt = Point::new((pivot.x + 20.0) / 1.5, (pivot.y - 35.0) / 1.5);
        assert!((t.map_point(image_pt) - pivot).hypot() < 1e-9);

        t.apply_scale(2.5, pivot);
        assert!((t.map_point(image_pt) - pivot).hypot() < 1e-9);
        assert!((t.scale.x - 3.75).abs() < 1e-12);
    }

    #[test]
    fn scale_then_inverse_round_trips() {
        let start = ViewTransform::new(Vec2::new(0.8, 0.8), Vec2::new(13.0, -7.0));
        let mut t = start;
        t.apply_scale(1.7, Point::new(50.0, 60.0));
        t.apply_scale(1.0 / 1.7, Point::new(50.0, 60.0));
        assert!((t.scale - start.scale).hypot() < 1e-12);
        assert!((t.translation - start.translation).hypot() < 1e-9);
    }

    #[test]
    fn snap_rounds_to_nearest_pixel() {
        let mut t = ViewTransform::new(Vec2::new(2.0, 2.0), Vec2::new(10.4, -3.6));
        t.snap_translation();
        assert_eq!(t.translation, Vec2::new(10.0, -4.0));
        assert_eq!(t.scale, Vec2::new(2.0, 2.0));
    }

    #[test]
    fn affine_matches_point_mapping() {
        let t = ViewTransform::new(Vec2::new(2.0, 3.0), Vec2::new(5.0, 7.0));
        let pt = Point::new(1.5, -2.0);
        assert_eq!(t.to_affine() * pt, t.map_point(pt));
    }

    #[test]
    fn center_places_image_in_middle_without_scaling() {
        let t = origin_transform(
            FitMode::Center,
            Size::new(101.0, 50.0),
            Size::new(400.0, 300.0),
        );
        // (400 - 101) / 2 = 149.5, truncated.
        assert_rect_near(
            t.map_size(Size::new(101.0, 50.0)),
            Rect::new(149.0, 125.0, 250.0, 175.0),
        );
    }

    #[test]
    fn fit_center_letterboxes() {
        let image = Size::new(200.0, 100.0);
        let t = origin_transform(FitMode::FitCenter, image, Size::new(400.0, 400.0));
        assert_rect_near(t.map_size(image), Rect::new(0.0, 100.0, 400.0, 300.0));
    }

    #[test]
    fn center_crop_covers_view() {
        let image = Size::new(200.0, 100.0);
        let t = origin_transform(FitMode::CenterCrop, image, Size::new(400.0, 400.0));
        assert_rect_near(t.map_size(image), Rect::new(-200.0, 0.0, 600.0, 400.0));
    }

    #[test]
    fn center_inside_only_shrinks() {
        let small = Size::new(100.0, 50.0);
        let view = Size::new(400.0, 400.0);
        let t = origin_transform(FitMode::CenterInside, small, view);
        assert_eq!(t.scale, Vec2::new(1.0, 1.0));

        let large = Size::new(800.0, 400.0);
        let t = origin_transform(FitMode::CenterInside, large, view);
        assert_rect_near(t.map_size(large), Rect::new(0.0, 100.0, 400.0, 300.0));
    }

    #[test]
    fn fit_start_and_end_align_to_corners() {
        let image = Size::new(200.0, 100.0);
        let view = Size::new(400.0, 400.0);
        let start = origin_transform(FitMode::FitStart, image, view);
        assert_rect_near(start.map_size(image), Rect::new(0.0, 0.0, 400.0, 200.0));
        let end = origin_transform(FitMode::FitEnd, image, view);
        assert_rect_near(end.map_size(image), Rect::new(0.0, 200.0, 400.0, 400.0));
    }

    #[test]
    fn fit_xy_stretches_each_axis() {
        let image = Size::new(200.0, 100.0);
        let t = origin_transform(FitMode::FitXy, image, Size::new(400.0, 400.0));
        assert_eq!(t.scale, Vec2::new(2.0, 4.0));
        assert_rect_near(t.map_size(image), Rect::new(0.0, 0.0, 400.0, 400.0));
    }

    #[test]
    fn empty_sizes_fall_back_to_identity() {
        let t = origin_transform(FitMode::FitCenter, Size::ZERO, Size::new(400.0, 400.0));
        assert_eq!(t, ViewTransform::IDENTITY);
        let t = origin_transform(FitMode::CenterCrop, Size::new(10.0, 10.0), Size::ZERO);
        assert_eq!(t, ViewTransform::IDENTITY);
    }
}
