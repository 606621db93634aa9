// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport fitting for the active scope.

use core::time::Duration;

use kurbo::{Affine, Point, Rect, Vec2};

/// Recommended animation length for a camera move.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(750);

/// Fraction of the view a fitted box may fill.
pub const DEFAULT_PADDING: f64 = 0.9;

/// Camera instruction for the rendering layer.
///
/// `scale` and `translate` describe a uniform zoom applied in view space, on
/// top of the fixed world → view mapping of the owning [`Camera`]:
/// `view' = view * scale + translate`.
///
/// The core does not animate. It emits a target and returns; the renderer
/// tweens toward it over `duration`. A transform with a higher `generation`
/// supersedes any earlier one still in flight, which should be abandoned in
/// favor of the newer target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    /// Uniform zoom factor.
    pub scale: f64,
    /// Offset applied after scaling, in view units.
    pub translate: Vec2,
    /// Recommended animation length.
    pub duration: Duration,
    /// Emission counter; strictly increasing per controller.
    pub generation: u64,
}

impl CameraTransform {
    /// The view-space zoom as an affine.
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }
}

/// Fixed world → view mapping plus the fitting rule.
///
/// The world extent (the layout canvas) is stretched onto `view_rect` per
/// axis. Fitting happens in that view space: the target box is scaled so it
/// fills at most `padding` of the view on its tighter axis, then centered.
#[derive(Clone, Debug)]
pub struct Camera {
    view_rect: Rect,
    world_extent: Rect,
    padding: f64,
    duration: Duration,
    min_scale: f64,
    max_scale: f64,
    world_to_view: Affine,
}

impl Camera {
    /// Creates a camera mapping `world_extent` onto `view_rect`.
    ///
    /// - Padding is [`DEFAULT_PADDING`].
    /// - Duration is [`DEFAULT_DURATION`].
    /// - Fitted scales are clamped to `[1e-3, 1e3]`.
    #[must_use]
    pub fn new(view_rect: Rect, world_extent: Rect) -> Self {
        let mut camera = Self {
            view_rect,
            world_extent,
            padding: DEFAULT_PADDING,
            duration: DEFAULT_DURATION,
            min_scale: 1e-3,
            max_scale: 1e3,
            world_to_view: Affine::IDENTITY,
        };
        camera.rebuild_transform();
        camera
    }

    /// Builder: set the padding factor.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Builder: set the recommended animation length.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Builder: set the scale limits.
    ///
    /// The range is normalized so that `min <= max`.
    #[must_use]
    pub fn with_scale_limits(mut self, min: f64, max: f64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_scale = min;
        self.max_scale = max;
        self
    }

    /// Current view rectangle in device coordinates.
    #[must_use]
    pub fn view_rect(&self) -> Rect {
        self.view_rect
    }

    /// Sets the view rectangle, e.g. after a window resize.
    ///
    /// Transforms already emitted are not updated; the next navigation step
    /// fits against the new rect.
    pub fn set_view_rect(&mut self, rect: Rect) {
        if self.view_rect != rect {
            self.view_rect = rect;
            self.rebuild_transform();
        }
    }

    /// World extent mapped onto the view.
    #[must_use]
    pub fn world_extent(&self) -> Rect {
        self.world_extent
    }

    /// Recommended animation length.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// The fixed world → view mapping, before any zoom.
    #[must_use]
    pub fn world_to_view(&self) -> Affine {
        self.world_to_view
    }

    /// Computes the transform framing the world-space `rect`.
    ///
    /// Degenerate boxes are treated as tiny rather than rejected; the scale
    /// limits keep the result finite. The returned generation is `0`.
    #[must_use]
    pub fn fit(&self, rect: Rect) -> CameraTransform {
        let target = self.world_to_view.transform_rect_bbox(rect);
        let view_size = self.view_rect.size();

        let sx = view_size.width / target.width().max(f64::MIN_POSITIVE) * self.padding;
        let sy = view_size.height / target.height().max(f64::MIN_POSITIVE) * self.padding;
        let scale = sx.min(sy).clamp(self.min_scale, self.max_scale);

        let translate = self.view_rect.center().to_vec2() - target.center().to_vec2() * scale;
        CameraTransform {
            scale,
            translate,
            duration: self.duration,
            generation: 0,
        }
    }

    /// Transform framing the whole world extent.
    #[must_use]
    pub fn fit_extent(&self) -> CameraTransform {
        self.fit(self.world_extent)
    }

    /// Converts a world point to the view under `transform`.
    #[must_use]
    pub fn world_to_view_point(&self, transform: &CameraTransform, pt: Point) -> Point {
        transform.to_affine() * (self.world_to_view * pt)
    }

    /// Converts a view point back to world space under `transform`.
    #[must_use]
    pub fn view_to_world_point(&self, transform: &CameraTransform, pt: Point) -> Point {
        (transform.to_affine() * self.world_to_view).inverse() * pt
    }

    fn rebuild_transform(&mut self) {
        let world = self.world_extent;
        let view = self.view_rect;
        let sx = view.width() / world.width().max(f64::MIN_POSITIVE);
        let sy = view.height() / world.height().max(f64::MIN_POSITIVE);
        // World → view: move extent origin to zero, stretch per axis, then
        // move into the view rect.
        self.world_to_view = Affine::translate(view.origin().to_vec2())
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-world.origin().to_vec2());
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Point, Rect, Vec2};

    use super::{Camera, DEFAULT_DURATION};

    fn camera() -> Camera {
        Camera::new(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            Rect::new(0.0, 0.0, 90_000.0, 90_000.0),
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn extent_fit_uses_padding_only() {
        let t = camera().fit_extent();
        assert!(close(t.scale, 0.9), "whole view padded by 0.9");
        assert!(close(t.translate.x, 40.0), "center kept: 400 - 0.9 * 400");
        assert!(close(t.translate.y, 30.0), "center kept: 300 - 0.9 * 300");
        assert_eq!(t.duration, DEFAULT_DURATION, "default duration");
    }

    #[test]
    fn fit_frames_box_at_view_center() {
        let cam = camera();
        let rect = Rect::new(30_000.0, 30_000.0, 60_000.0, 60_000.0);
        let t = cam.fit(rect);
        // The box is a third of the view on both axes; the tighter axis wins.
        assert!(close(t.scale, 2.7), "min(800/266.67, 600/200) * 0.9");
        let center = cam.world_to_view_point(&t, rect.center());
        assert!(close(center.x, 400.0) && close(center.y, 300.0), "{center:?}");
    }

    #[test]
    fn fitted_box_stays_inside_view() {
        let cam = camera();
        let rect = Rect::new(0.0, 60_000.0, 30_000.0, 90_000.0);
        let t = cam.fit(rect);
        let a = cam.world_to_view_point(&t, Point::new(rect.x0, rect.y0));
        let b = cam.world_to_view_point(&t, Point::new(rect.x1, rect.y1));
        let view = cam.view_rect();
        assert!(a.x >= view.x0 && a.y >= view.y0, "top-left inside {a:?}");
        assert!(b.x <= view.x1 && b.y <= view.y1, "bottom-right inside {b:?}");
    }

    #[test]
    fn view_world_roundtrip_under_zoom() {
        let cam = camera();
        let t = cam.fit(Rect::new(10_000.0, 20_000.0, 40_000.0, 50_000.0));
        let world = Point::new(12_345.0, 23_456.0);
        let back = cam.view_to_world_point(&t, cam.world_to_view_point(&t, world));
        assert!((back - world).hypot() < 1e-6, "{back:?}");
    }

    #[test]
    fn degenerate_box_is_clamped() {
        let t = camera().fit(Rect::new(5.0, 5.0, 5.0, 5.0));
        assert!(t.scale.is_finite() && close(t.scale, 1e3), "clamped to max");
        assert!(t.translate != Vec2::ZERO, "still centered");
    }
}
