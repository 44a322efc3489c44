// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Size};

/// The capabilities a [`ZoomView`](crate::ZoomView) needs from the widget showing the image.
///
/// Any toolkit's widget can implement this and forward its input and frame
/// callbacks to the view.
pub trait TransformHost {
    /// Current size of the view in pixels.
    fn view_size(&self) -> Size;

    /// Displays the image with `transform` (image space to view space).
    fn set_display_transform(&mut self, transform: Affine);

    /// Requests a call to [`ZoomView::on_frame`](crate::ZoomView::on_frame) after `delay_ms`.
    ///
    /// Requests may be coalesced: one call serves every request due by then.
    fn schedule_frame(&mut self, delay_ms: u64);
}
