// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::mem;

use kurbo::{Affine, Point, Rect, Size, Vec2};
use understory_event_state::gesture::{GestureClassifier, GestureEvent, PointerEvent};
use understory_timing::{
    AnimationState, ExponentialDecay, FRAME_INTERVAL_MS, FlingSimulator, FrameAnimator,
};
use understory_view2d::{FitMode, ImageViewport, LimitConfig, LimitPolicy, ScaleLimits, limits};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::config::ViewConfig;
use crate::error::ConfigError;
use crate::events::{DragEvent, EventChannels, TapEvent, ZoomEvent};
use crate::host::TransformHost;

/// Work to run once a zoom animation completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FollowUp {
    /// Animate the pan back to the origin layout.
    ResetDrag,
    /// Animate the pan back within bounds.
    CorrectPan,
}

#[derive(Clone, Debug)]
struct ZoomAnimation {
    animator: FrameAnimator,
    previous: f64,
    pivot: Point,
    by_gesture: bool,
    notify: bool,
    then: Option<FollowUp>,
}

#[derive(Clone, Debug)]
struct DragAnimation {
    animator: FrameAnimator,
    previous: f64,
    delta: Vec2,
    by_gesture: bool,
    notify: bool,
}

#[derive(Clone, Debug)]
struct FlingTask {
    simulator: FlingSimulator,
    last: Point,
    /// Motion of the drag that launched the fling.
    prior_moved: Vec2,
}

#[derive(Clone, Copy, Debug, Default)]
struct DragSession {
    started: bool,
    moved: Vec2,
    /// Input absorbed by a clamped bound, per axis.
    over_limit: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct ZoomSession {
    center: Point,
    started: bool,
    scaled: f64,
    /// Input absorbed by a clamped limit, in pixels of finger travel.
    over_limit: f64,
    panned: bool,
}

impl ZoomSession {
    fn new(center: Point) -> Self {
        Self {
            center,
            started: false,
            scaled: 1.0,
            over_limit: 0.0,
            panned: false,
        }
    }
}

/// The live gesture being applied to the image.
#[derive(Clone, Copy, Debug, Default)]
enum Session {
    #[default]
    Idle,
    Drag(DragSession),
    QuickZoom(ZoomSession),
    Pinch(ZoomSession),
}

/// A zoomable, pannable image view driven by touch input.
///
/// `ZoomView` owns the image's [`ImageViewport`], a [`GestureClassifier`] and
/// the animations settling the image. It has no clock: pointer events carry
/// their own timestamps and the host calls [`ZoomView::on_frame`] when a frame
/// it was asked for via [`TransformHost::schedule_frame`] is due.
///
/// Every method that can change the transform takes the host, pushes the new
/// transform to it and requests the next frame if work remains.
pub struct ZoomView {
    viewport: ImageViewport,
    limits: LimitConfig,
    config: ViewConfig,
    classifier: GestureClassifier,
    events: EventChannels,
    session: Session,
    zoom_anim: Option<ZoomAnimation>,
    drag_anim: Option<DragAnimation>,
    fling: Option<FlingTask>,
    now: u64,
    frame_due: Option<u64>,
    dirty: bool,
}

impl core::fmt::Debug for ZoomView {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ZoomView")
            .field("viewport", &self.viewport)
            .field("limits", &self.limits)
            .field("session", &self.session)
            .field("zoom_anim", &self.zoom_anim.is_some())
            .field("drag_anim", &self.drag_anim.is_some())
            .field("fling", &self.fling.is_some())
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

impl Default for ZoomView {
    fn default() -> Self {
        Self::new(ViewConfig::default())
    }
}

impl ZoomView {
    /// Creates a view with no image and default limits.
    ///
    /// Call [`ZoomView::set_image_size`] once the image is known.
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        Self {
            viewport: ImageViewport::new(Size::ZERO, Size::ZERO, FitMode::default()),
            limits: LimitConfig::default(),
            config,
            classifier: GestureClassifier::new(config.gesture),
            events: EventChannels::default(),
            session: Session::Idle,
            zoom_anim: None,
            drag_anim: None,
            fling: None,
            now: 0,
            frame_due: None,
            dirty: false,
        }
    }

    // --- Layout ---

    /// Recomputes the origin layout for the host's current size.
    ///
    /// This resets the transform and stops animations and flings without
    /// publishing events.
    pub fn layout<H: TransformHost + ?Sized>(&mut self, host: &mut H) {
        let image = self.viewport.image_size();
        self.relayout(host.view_size(), image);
        self.flush(host);
    }

    /// Sets the intrinsic image size and lays it out again.
    pub fn set_image_size<H: TransformHost + ?Sized>(&mut self, host: &mut H, image_size: Size) {
        self.relayout(host.view_size(), image_size);
        self.flush(host);
    }

    /// Changes the fit mode and lays the image out again.
    pub fn set_fit_mode<H: TransformHost + ?Sized>(&mut self, host: &mut H, mode: FitMode) {
        self.viewport.set_fit_mode(mode);
        let image = self.viewport.image_size();
        self.relayout(host.view_size(), image);
        self.flush(host);
    }

    /// The current fit mode.
    #[must_use]
    pub fn fit_mode(&self) -> FitMode {
        self.viewport.fit_mode()
    }

    // --- Input and frames ---

    /// Feeds a pointer event.
    pub fn on_pointer<H: TransformHost + ?Sized>(&mut self, host: &mut H, event: &PointerEvent) {
        self.now = event.time_ms;
        self.begin(host);
        for gesture in self.classifier.on_pointer(event) {
            self.handle_gesture(gesture);
        }
        self.flush(host);
    }

    /// Advances timers, animations and flings to `now_ms`.
    ///
    /// Hosts call this when a frame requested through
    /// [`TransformHost::schedule_frame`] is due. Extra calls are harmless.
    pub fn on_frame<H: TransformHost + ?Sized>(&mut self, host: &mut H, now_ms: u64) {
        self.now = now_ms;
        self.frame_due = None;
        self.begin(host);
        for gesture in self.classifier.poll(now_ms) {
            self.handle_gesture(gesture);
        }
        self.step_zoom_animation();
        self.step_drag_animation();
        self.step_fling(now_ms);
        self.flush(host);
    }

    /// Returns `true` when no gesture, animation or fling is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.zoom_anim.is_none()
            && self.drag_anim.is_none()
            && self.fling.is_none()
            && self.classifier.is_idle()
    }

    // --- Programmatic transforms ---

    /// Animates a zoom by `factor` about `center`, within the zoom limits.
    ///
    /// Publishes a zoom start and, once settled, a zoom end. Returns `false`
    /// if the limits absorb the whole zoom or `factor` is not a positive
    /// finite number.
    pub fn perform_zoom<H: TransformHost + ?Sized>(
        &mut self,
        host: &mut H,
        factor: f64,
        center: Point,
    ) -> bool {
        self.begin(host);
        let performed = if factor.is_finite() && factor > 0.0 {
            log::debug!("perform_zoom factor={factor} center={center:?}");
            self.cancel_fling();
            self.events.zoom.emit(&ZoomEvent::Start { by_gesture: false });
            self.zoom_to(false, factor, center, true, None)
        } else {
            false
        };
        self.flush(host);
        performed
    }

    /// Animates a pan by `delta`, within the pan bounds.
    ///
    /// Publishes a pan start and, once settled, a pan end. Returns `false` if
    /// the bounds absorb the whole pan or `delta` is not finite.
    pub fn perform_drag<H: TransformHost + ?Sized>(&mut self, host: &mut H, delta: Vec2) -> bool {
        self.begin(host);
        let performed = if delta.is_finite() {
            log::debug!("perform_drag delta={delta:?}");
            self.cancel_fling();
            self.events.drag.emit(&DragEvent::Start { by_gesture: false });
            self.drag_to(false, delta, true)
        } else {
            false
        };
        self.flush(host);
        performed
    }

    /// Scales immediately by `factor` about `center`.
    ///
    /// Nothing is applied, and `false` returned, unless the whole factor is
    /// permitted by the zoom limits. Publishes no events.
    pub fn post_scale<H: TransformHost + ?Sized>(
        &mut self,
        host: &mut H,
        factor: f64,
        center: Point,
    ) -> bool {
        self.begin(host);
        let applied = factor.is_finite()
            && factor > 0.0
            && limits::permitted_scale(
                self.limits.zoom_policy,
                factor,
                self.viewport.current_scale(),
                self.limits.limits,
            ) == factor;
        if applied {
            self.cancel_fling();
            self.viewport.apply_scale(factor, center);
            self.dirty = true;
        }
        self.flush(host);
        applied
    }

    /// Pans immediately by `delta`.
    ///
    /// Nothing is applied, and `false` returned, unless the whole delta is
    /// permitted by the pan bounds. Publishes no events.
    pub fn post_translate<H: TransformHost + ?Sized>(&mut self, host: &mut H, delta: Vec2) -> bool {
        self.begin(host);
        let applied = delta.is_finite()
            && limits::permitted_translation(
                self.limits.drag_policy,
                delta,
                self.viewport.image_bounds(),
                self.viewport.view_size(),
            ) == delta;
        if applied {
            self.cancel_fling();
            self.viewport.apply_translate(delta);
            self.dirty = true;
        }
        self.flush(host);
        applied
    }

    /// Animates the zoom back to `1.0` about the image's top-left corner.
    ///
    /// Publishes no events.
    pub fn reset_zoom<H: TransformHost + ?Sized>(&mut self, host: &mut H) {
        self.begin(host);
        self.reset_zoom_then(None);
        self.flush(host);
    }

    /// Animates the pan back to the origin layout.
    pub fn reset_drag<H: TransformHost + ?Sized>(&mut self, host: &mut H) {
        self.begin(host);
        self.reset_drag_now();
        self.flush(host);
    }

    /// Animates back to the origin layout: zoom first, then pan.
    pub fn reset<H: TransformHost + ?Sized>(&mut self, host: &mut H) {
        self.begin(host);
        self.cancel_zoom_animation();
        if self.viewport.is_zoomed() {
            self.reset_zoom_then(Some(FollowUp::ResetDrag));
        } else {
            self.reset_drag_now();
        }
        self.flush(host);
    }

    // --- Limits ---

    /// The zoom limits and policies.
    #[must_use]
    pub fn limit_config(&self) -> LimitConfig {
        self.limits
    }

    /// Replaces the zoom limits and policies.
    pub fn set_limit_config(&mut self, config: LimitConfig) -> Result<(), ConfigError> {
        check_scale(config.limits.min_scale)?;
        check_scale(config.limits.max_scale)?;
        log::debug!("limit config {config:?}");
        self.limits = config;
        Ok(())
    }

    /// Sets the smallest zoom factor. `0.0` disables the lower limit.
    pub fn set_min_scale(&mut self, min_scale: f64) -> Result<(), ConfigError> {
        check_scale(min_scale)?;
        self.limits.limits.min_scale = min_scale;
        Ok(())
    }

    /// Sets the largest zoom factor. `0.0` disables spring-back above it.
    pub fn set_max_scale(&mut self, max_scale: f64) -> Result<(), ConfigError> {
        check_scale(max_scale)?;
        self.limits.limits.max_scale = max_scale;
        Ok(())
    }

    /// The zoom factor range.
    #[must_use]
    pub fn scale_limits(&self) -> ScaleLimits {
        self.limits.limits
    }

    /// Sets how zoom limits are enforced.
    pub fn set_zoom_policy(&mut self, policy: LimitPolicy) {
        log::debug!("zoom policy {policy:?}");
        self.limits.zoom_policy = policy;
    }

    /// Sets how pan bounds are enforced.
    pub fn set_drag_policy(&mut self, policy: LimitPolicy) {
        log::debug!("drag policy {policy:?}");
        self.limits.drag_policy = policy;
    }

    /// Sets the zoom policy from legacy bit flags.
    ///
    /// Invalid combinations are rejected and leave the policy unchanged.
    pub fn set_zoom_policy_flags(&mut self, flags: u32) -> Result<(), ConfigError> {
        let policy = LimitPolicy::from_flags(flags)?;
        self.set_zoom_policy(policy);
        Ok(())
    }

    /// Sets the drag policy from legacy bit flags.
    ///
    /// Invalid combinations are rejected and leave the policy unchanged.
    pub fn set_drag_policy_flags(&mut self, flags: u32) -> Result<(), ConfigError> {
        let policy = LimitPolicy::from_flags(flags)?;
        self.set_drag_policy(policy);
        Ok(())
    }

    /// How zoom limits are enforced.
    #[must_use]
    pub fn zoom_policy(&self) -> LimitPolicy {
        self.limits.zoom_policy
    }

    /// How pan bounds are enforced.
    #[must_use]
    pub fn drag_policy(&self) -> LimitPolicy {
        self.limits.drag_policy
    }

    // --- Configuration ---

    /// The tunables.
    #[must_use]
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Replaces the tunables.
    ///
    /// Gesture thresholds apply from the next pointer sequence.
    pub fn set_config(&mut self, config: ViewConfig) {
        self.config = config;
        self.classifier.set_config(config.gesture);
    }

    /// The published event channels.
    #[must_use]
    pub fn events(&self) -> &EventChannels {
        &self.events
    }

    /// The published event channels, for subscribing.
    pub fn events_mut(&mut self) -> &mut EventChannels {
        &mut self.events
    }

    // --- Queries ---

    /// The image layout and current transform.
    #[must_use]
    pub fn viewport(&self) -> &ImageViewport {
        &self.viewport
    }

    /// The current image-to-view transform.
    #[must_use]
    pub fn transform(&self) -> Affine {
        self.viewport.transform().to_affine()
    }

    /// Zoom factor relative to the origin layout.
    #[must_use]
    pub fn current_scale(&self) -> f64 {
        self.viewport.current_scale()
    }

    /// Pan relative to the origin layout, in view pixels.
    #[must_use]
    pub fn current_translate(&self) -> Vec2 {
        self.viewport.current_translate()
    }

    /// Returns `true` if the zoom differs from the origin layout.
    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.viewport.is_zoomed()
    }

    /// Returns `true` if the pan differs from the origin layout.
    #[must_use]
    pub fn is_dragged(&self) -> bool {
        self.viewport.is_dragged()
    }

    /// The displayed image rectangle in view coordinates.
    #[must_use]
    pub fn image_bounds(&self) -> Rect {
        self.viewport.image_bounds()
    }

    /// Left edge of the displayed image.
    #[must_use]
    pub fn image_left(&self) -> f64 {
        self.viewport.image_left()
    }

    /// Top edge of the displayed image.
    #[must_use]
    pub fn image_top(&self) -> f64 {
        self.viewport.image_top()
    }

    /// Right edge of the displayed image.
    #[must_use]
    pub fn image_right(&self) -> f64 {
        self.viewport.image_right()
    }

    /// Bottom edge of the displayed image.
    #[must_use]
    pub fn image_bottom(&self) -> f64 {
        self.viewport.image_bottom()
    }

    /// Displayed width of the image.
    #[must_use]
    pub fn image_width(&self) -> f64 {
        self.viewport.image_width()
    }

    /// Displayed height of the image.
    #[must_use]
    pub fn image_height(&self) -> f64 {
        self.viewport.image_height()
    }

    // --- Internals ---

    fn begin<H: TransformHost + ?Sized>(&mut self, host: &H) {
        let size = host.view_size();
        if size != self.viewport.view_size() {
            let image = self.viewport.image_size();
            self.relayout(size, image);
        }
    }

    fn relayout(&mut self, view: Size, image: Size) {
        log::debug!("layout view={view:?} image={image:?}");
        self.viewport.layout(view, image);
        self.zoom_anim = None;
        self.drag_anim = None;
        self.fling = None;
        self.dirty = true;
    }

    fn flush<H: TransformHost + ?Sized>(&mut self, host: &mut H) {
        if mem::take(&mut self.dirty) {
            host.set_display_transform(self.transform());
        }

        let mut delay: Option<u64> = None;
        let mut want = |d: u64| delay = Some(delay.map_or(d, |c| c.min(d)));
        if let Some(anim) = &self.zoom_anim {
            want(anim.animator.next_delay());
        }
        if let Some(anim) = &self.drag_anim {
            want(anim.animator.next_delay());
        }
        if self.fling.is_some() {
            want(FRAME_INTERVAL_MS);
        }
        if let Some(deadline) = self.classifier.next_deadline() {
            want(deadline.saturating_sub(self.now));
        }

        if let Some(delay) = delay {
            let due = self.now.saturating_add(delay);
            if self.frame_due.is_none_or(|pending| due < pending) {
                self.frame_due = Some(due);
                host.schedule_frame(delay);
            }
        }
    }

    fn handle_gesture(&mut self, gesture: GestureEvent) {
        log::trace!("gesture {gesture:?}");
        match gesture {
            GestureEvent::Down { .. } => {
                self.cancel_fling();
                self.session = Session::Drag(DragSession::default());
            }
            GestureEvent::DragStart { .. } => {
                if let Session::Drag(session) = &mut self.session
                    && self.config.draggable
                {
                    session.started = true;
                    self.events.drag.emit(&DragEvent::Start { by_gesture: true });
                }
            }
            GestureEvent::Drag { delta, .. } => self.live_drag(delta),
            GestureEvent::DragEnd { .. } => {
                if let Session::Drag(session) = mem::take(&mut self.session)
                    && session.started
                {
                    self.after_drag(session.moved);
                }
            }
            GestureEvent::Fling { velocity, .. } => self.live_fling(velocity),
            GestureEvent::Click { position } => {
                self.events.click.emit(&TapEvent { position });
            }
            GestureEvent::LongClick { position } => {
                if self.config.long_click {
                    self.events.long_click.emit(&TapEvent { position });
                }
            }
            GestureEvent::DoubleTapDown { position } => {
                self.cancel_fling();
                self.session = Session::QuickZoom(ZoomSession::new(position));
            }
            GestureEvent::DoubleTapDragStart { .. } => {}
            GestureEvent::DoubleTapDrag { delta, .. } => {
                if let Session::QuickZoom(mut session) = self.session {
                    let factor = weighted_zoom(delta.y, self.config.slide_weight);
                    let pivot = session.center;
                    self.live_zoom(&mut session, factor, delta.y, pivot);
                    self.session = Session::QuickZoom(session);
                }
            }
            GestureEvent::DoubleTapDragEnd { .. } | GestureEvent::PinchEnd { .. } => {
                self.end_live_zoom();
            }
            GestureEvent::DoubleClick { position } => {
                self.session = Session::Idle;
                if self.config.quick_zoom && self.config.zoomable {
                    self.events.zoom.emit(&ZoomEvent::Start { by_gesture: true });
                    self.zoom_to(true, self.config.zoom_step, position, true, None);
                }
                if self.config.double_click {
                    self.events.double_click.emit(&TapEvent { position });
                }
            }
            GestureEvent::PinchDown { center, .. } => {
                self.cancel_fling();
                self.session = Session::Pinch(ZoomSession::new(center));
            }
            GestureEvent::Pinch {
                center,
                span_delta,
                pan,
            } => self.live_pinch(center, span_delta, pan),
            GestureEvent::TwoFingerTap { center } => {
                self.session = Session::Idle;
                if self.config.quick_zoom && self.config.zoomable && self.config.zoom_step > 0.0 {
                    self.events.zoom.emit(&ZoomEvent::Start { by_gesture: true });
                    self.zoom_to(true, 1.0 / self.config.zoom_step, center, true, None);
                }
            }
            GestureEvent::Cancel => match mem::take(&mut self.session) {
                Session::Drag(session) if session.started => self.after_drag(session.moved),
                Session::QuickZoom(session) | Session::Pinch(session) if session.started => {
                    self.after_zoom(session.center, session.scaled, None);
                }
                _ => {}
            },
        }
    }

    fn live_drag(&mut self, delta: Vec2) {
        let Session::Drag(mut session) = self.session else {
            return;
        };
        if !session.started {
            return;
        }
        let policy = self.limits.drag_policy;
        let mut real = delta;
        if policy.clamps_live() {
            real = limits::permitted_translation(
                policy,
                delta,
                self.viewport.image_bounds(),
                self.viewport.view_size(),
            );
            session.over_limit.x = track_over_limit(session.over_limit.x, delta.x, real.x);
            session.over_limit.y = track_over_limit(session.over_limit.y, delta.y, real.y);
            if session.over_limit.x > 0.0 {
                real.x = 0.0;
            }
            if session.over_limit.y > 0.0 {
                real.y = 0.0;
            }
        }
        session.moved += real;
        self.session = Session::Drag(session);
        if real != Vec2::ZERO {
            self.viewport.apply_translate(real);
            self.dirty = true;
        }
    }

    fn live_fling(&mut self, velocity: Vec2) {
        let Session::Drag(session) = mem::take(&mut self.session) else {
            return;
        };
        if !session.started {
            return;
        }
        let policy = self.limits.drag_policy;
        let bounds = self.viewport.image_bounds();
        let view = self.viewport.view_size();
        if policy != LimitPolicy::Unrestricted && limits::fling_blocked(velocity, bounds, view) {
            self.after_drag(session.moved);
            return;
        }

        let range = limits::fling_range(policy, bounds, view);
        let mut simulator =
            FlingSimulator::new(ExponentialDecay::with_friction(self.config.fling_friction));
        let start = bounds.origin();
        simulator.fling(start, velocity, range, self.now);
        log::debug!("fling start={start:?} velocity={velocity:?} range={range:?}");
        self.fling = Some(FlingTask {
            simulator,
            last: start,
            prior_moved: session.moved,
        });
    }

    fn after_drag(&mut self, moved: Vec2) {
        self.cancel_drag_animation();
        self.viewport.snap_to_integer_translation();
        self.dirty = true;
        let correction = if self.limits.drag_policy == LimitPolicy::SpringBack {
            limits::pan_correction(self.viewport.image_bounds(), self.viewport.view_size())
        } else {
            Vec2::ZERO
        };
        self.events.drag.emit(&DragEvent::End {
            by_gesture: true,
            delta: moved,
            correction,
        });
        if correction != Vec2::ZERO {
            log::debug!("pan spring-back {correction:?}");
            self.start_drag_animation(false, correction, false);
        }
    }

    fn live_pinch(&mut self, center: Point, span_delta: f64, pan: Vec2) {
        let Session::Pinch(mut session) = self.session else {
            return;
        };
        let pans = self.config.pinch_pans && self.config.draggable;
        if pans && pan != Vec2::ZERO {
            let policy = self.limits.drag_policy;
            let real = if policy.clamps_live() {
                limits::permitted_translation(
                    policy,
                    pan,
                    self.viewport.image_bounds(),
                    self.viewport.view_size(),
                )
            } else {
                pan
            };
            if real != Vec2::ZERO {
                self.viewport.apply_translate(real);
                self.dirty = true;
                session.panned = true;
            }
        }
        let factor = weighted_zoom(span_delta, self.config.pinch_weight);
        let pivot = if pans { center } else { session.center };
        self.live_zoom(&mut session, factor, span_delta, pivot);
        self.session = Session::Pinch(session);
    }

    /// Applies one step of a live zoom. `input` is the finger travel behind `factor`.
    fn live_zoom(&mut self, session: &mut ZoomSession, factor: f64, input: f64, pivot: Point) {
        if !self.config.zoomable {
            return;
        }
        if !session.started {
            session.started = true;
            self.events.zoom.emit(&ZoomEvent::Start { by_gesture: true });
        }
        let policy = self.limits.zoom_policy;
        let mut real = factor;
        if policy.clamps_live() {
            real = limits::permitted_scale(
                policy,
                factor,
                self.viewport.current_scale(),
                self.limits.limits,
            );
            if real == 1.0 {
                session.over_limit += input.abs();
                return;
            }
            if session.over_limit > 0.0 {
                session.over_limit = (session.over_limit - input.abs()).max(0.0);
                return;
            }
        }
        session.scaled *= real;
        self.viewport.apply_scale(real, pivot);
        self.dirty = true;
    }

    fn end_live_zoom(&mut self) {
        let (session, pinch) = match mem::take(&mut self.session) {
            Session::QuickZoom(session) => (session, false),
            Session::Pinch(session) => (session, true),
            _ => return,
        };
        if !session.started {
            return;
        }
        let then = (pinch && session.panned && self.limits.drag_policy == LimitPolicy::SpringBack)
            .then_some(FollowUp::CorrectPan);
        self.after_zoom(session.center, session.scaled, then);
    }

    fn after_zoom(&mut self, center: Point, scaled: f64, then: Option<FollowUp>) {
        self.viewport.snap_to_integer_translation();
        self.dirty = true;
        let (fix, scale) = if self.limits.zoom_policy == LimitPolicy::SpringBack {
            let fix = limits::scale_correction(self.viewport.current_scale(), self.limits.limits);
            (fix, limits::round3(scaled * fix))
        } else {
            (1.0, scaled)
        };
        self.events.zoom.emit(&ZoomEvent::End {
            by_gesture: true,
            scale,
            center,
        });
        if fix != 1.0 {
            log::debug!("zoom spring-back {fix}");
            self.start_zoom_animation(false, fix, center, false, then);
        } else if let Some(then) = then {
            self.run_follow_up(then);
        }
    }

    fn run_follow_up(&mut self, then: FollowUp) {
        match then {
            FollowUp::ResetDrag => {
                self.reset_drag_now();
            }
            FollowUp::CorrectPan => {
                self.cancel_drag_animation();
                let correction =
                    limits::pan_correction(self.viewport.image_bounds(), self.viewport.view_size());
                if correction != Vec2::ZERO {
                    self.start_drag_animation(false, correction, false);
                }
            }
        }
    }

    fn zoom_to(
        &mut self,
        by_gesture: bool,
        factor: f64,
        center: Point,
        notify: bool,
        then: Option<FollowUp>,
    ) -> bool {
        self.cancel_zoom_animation();
        let real = limits::permitted_scale(
            self.limits.zoom_policy,
            factor,
            self.viewport.current_scale(),
            self.limits.limits,
        );
        if real == 1.0 {
            self.viewport.snap_to_integer_translation();
            self.dirty = true;
            if notify {
                self.events.zoom.emit(&ZoomEvent::End {
                    by_gesture,
                    scale: 1.0,
                    center,
                });
            }
            if let Some(then) = then {
                self.run_follow_up(then);
            }
            return false;
        }
        self.start_zoom_animation(by_gesture, real, center, notify, then);
        true
    }

    fn drag_to(&mut self, by_gesture: bool, delta: Vec2, notify: bool) -> bool {
        self.cancel_drag_animation();
        let real = limits::permitted_translation(
            self.limits.drag_policy,
            delta,
            self.viewport.image_bounds(),
            self.viewport.view_size(),
        );
        if real == Vec2::ZERO {
            self.viewport.snap_to_integer_translation();
            self.dirty = true;
            if notify {
                self.events.drag.emit(&DragEvent::End {
                    by_gesture,
                    delta: Vec2::ZERO,
                    correction: Vec2::ZERO,
                });
            }
            return false;
        }
        self.start_drag_animation(by_gesture, real, notify);
        true
    }

    fn reset_zoom_then(&mut self, then: Option<FollowUp>) -> bool {
        self.cancel_zoom_animation();
        let scale = self.viewport.current_scale();
        if scale == 1.0 || scale <= 0.0 {
            if let Some(then) = then {
                self.run_follow_up(then);
            }
            return false;
        }
        self.cancel_fling();
        let pivot = self.viewport.image_bounds().origin();
        self.zoom_to(false, 1.0 / scale, pivot, false, then)
    }

    fn reset_drag_now(&mut self) -> bool {
        self.cancel_fling();
        self.cancel_drag_animation();
        let translate = self.viewport.current_translate();
        if translate == Vec2::ZERO {
            return false;
        }
        self.events.drag.emit(&DragEvent::Start { by_gesture: false });
        self.drag_to(false, -translate, true)
    }

    fn start_zoom_animation(
        &mut self,
        by_gesture: bool,
        factor: f64,
        pivot: Point,
        notify: bool,
        then: Option<FollowUp>,
    ) {
        self.cancel_zoom_animation();
        let mut animator = FrameAnimator::new(1.0, factor, self.config.animation_duration_ms);
        animator.start();
        self.zoom_anim = Some(ZoomAnimation {
            animator,
            previous: 1.0,
            pivot,
            by_gesture,
            notify,
            then,
        });
    }

    fn start_drag_animation(&mut self, by_gesture: bool, delta: Vec2, notify: bool) {
        self.cancel_drag_animation();
        let mut animator = FrameAnimator::new(0.0, 1.0, self.config.animation_duration_ms);
        animator.start();
        self.drag_anim = Some(DragAnimation {
            animator,
            previous: 0.0,
            delta,
            by_gesture,
            notify,
        });
    }

    /// Reverts an unfinished zoom animation and settles it without follow-ups.
    ///
    /// One already on its last step completes instead, follow-up included.
    fn cancel_zoom_animation(&mut self) {
        let Some(mut anim) = self.zoom_anim.take() else {
            return;
        };
        anim.animator.cancel();
        if let Some(step) = anim.animator.step() {
            self.viewport.apply_scale(step.value / anim.previous, anim.pivot);
        }
        let completed = anim.animator.state() == AnimationState::Finished;
        self.finish_zoom_animation(&anim, completed);
    }

    /// Settles a running pan animation. A published pan reverts; an unpublished
    /// correction lands on its end so the image stays within bounds.
    fn cancel_drag_animation(&mut self) {
        let Some(mut anim) = self.drag_anim.take() else {
            return;
        };
        if anim.notify {
            anim.animator.cancel();
        } else {
            anim.animator.finish();
        }
        if let Some(step) = anim.animator.step() {
            self.viewport.apply_translate(anim.delta * (step.value - anim.previous));
        }
        self.finish_drag_animation(&anim);
    }

    fn step_zoom_animation(&mut self) {
        let Some(anim) = &mut self.zoom_anim else {
            return;
        };
        let Some(step) = anim.animator.step() else {
            self.zoom_anim = None;
            return;
        };
        self.viewport.apply_scale(step.value / anim.previous, anim.pivot);
        anim.previous = step.value;
        self.dirty = true;
        log::trace!("zoom animation value={}", step.value);
        if step.ended
            && let Some(anim) = self.zoom_anim.take()
        {
            let completed = anim.animator.state() == AnimationState::Finished;
            self.finish_zoom_animation(&anim, completed);
        }
    }

    fn step_drag_animation(&mut self) {
        let Some(anim) = &mut self.drag_anim else {
            return;
        };
        let Some(step) = anim.animator.step() else {
            self.drag_anim = None;
            return;
        };
        self.viewport.apply_translate(anim.delta * (step.value - anim.previous));
        anim.previous = step.value;
        self.dirty = true;
        log::trace!("drag animation value={}", step.value);
        if step.ended
            && let Some(anim) = self.drag_anim.take()
        {
            self.finish_drag_animation(&anim);
        }
    }

    fn finish_zoom_animation(&mut self, anim: &ZoomAnimation, completed: bool) {
        self.viewport.snap_to_integer_translation();
        self.dirty = true;
        if anim.notify {
            self.events.zoom.emit(&ZoomEvent::End {
                by_gesture: anim.by_gesture,
                scale: anim.animator.value(),
                center: anim.pivot,
            });
        }
        if completed && let Some(then) = anim.then {
            self.run_follow_up(then);
        }
    }

    fn finish_drag_animation(&mut self, anim: &DragAnimation) {
        self.viewport.snap_to_integer_translation();
        self.dirty = true;
        if anim.notify {
            self.events.drag.emit(&DragEvent::End {
                by_gesture: anim.by_gesture,
                delta: anim.delta * anim.animator.value(),
                correction: Vec2::ZERO,
            });
        }
    }

    fn step_fling(&mut self, now_ms: u64) {
        let Some(task) = &mut self.fling else {
            return;
        };
        task.simulator.compute_offset(now_ms);
        let current = task.simulator.current();
        let delta = current - task.last;
        task.last = current;
        let finished = task.simulator.is_finished();
        let moved = task.prior_moved + task.simulator.distance();

        if delta != Vec2::ZERO {
            self.viewport.apply_translate(delta);
            self.dirty = true;
        }
        if finished {
            log::debug!("fling settled after {moved:?}");
            self.fling = None;
            self.after_drag(moved);
        }
    }

    /// Stops a fling where it is and ends its pan like a released drag.
    fn cancel_fling(&mut self) {
        let Some(mut task) = self.fling.take() else {
            return;
        };
        task.simulator.force_finished();
        let moved = task.prior_moved + task.simulator.distance();
        log::debug!("fling cancelled after {moved:?}");
        self.after_drag(moved);
    }
}

fn check_scale(value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidScale { value })
    }
}

/// Zoom factor for `travel` pixels when `weight` pixels double the zoom.
fn weighted_zoom(travel: f64, weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 && travel.is_finite() {
        2.0_f64.powf(travel / weight)
    } else {
        1.0
    }
}

/// Updates the input absorbed by a clamped bound after one step.
fn track_over_limit(over: f64, requested: f64, permitted: f64) -> f64 {
    if permitted == 0.0 {
        over + requested.abs()
    } else if over > 0.0 {
        (over - requested.abs()).max(0.0)
    } else {
        over
    }
}
