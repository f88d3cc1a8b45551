use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};
use tracing::trace;

pub const MIN_SCALE: f64 = 0.2;
pub const MAX_SCALE: f64 = 4.0;
pub const ZOOM_SENSITIVITY: f64 = 0.1;
/// Additive step used by the zoom buttons
pub const ZOOM_STEP: f64 = 0.1;
pub const DEFAULT_PAN: Point = Point::new(100.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportLimits {
    pub min_scale: f64,
    pub max_scale: f64,
    pub sensitivity: f64,
    pub default_pan: Point,
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self {
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
            sensitivity: ZOOM_SENSITIVITY,
            default_pan: DEFAULT_PAN,
        }
    }
}

/// The affine transform handed to renderers: `screen = world * scale + pan`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f64,
    pan: Point,
    limits: ViewportLimits,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportLimits::default())
    }
}

impl Viewport {
    pub fn new(limits: ViewportLimits) -> Self {
        let mut viewport = Self {
            scale: 1.0,
            pan: Point::default(),
            limits,
        };
        viewport.reset();
        viewport
    }

    /// Restores a previously saved transform, clamping the scale.
    pub fn with_transform(limits: ViewportLimits, transform: Transform) -> Self {
        Self {
            scale: transform.scale.clamp(limits.min_scale, limits.max_scale),
            pan: Point::new(transform.pan_x, transform.pan_y),
            limits,
        }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan_offset(&self) -> Point {
        self.pan
    }

    pub fn limits(&self) -> &ViewportLimits {
        &self.limits
    }

    pub fn transform(&self) -> Transform {
        Transform {
            scale: self.scale,
            pan_x: self.pan.x,
            pan_y: self.pan.y,
        }
    }

    /// Unbounded; the world canvas has no edges.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.scale + self.pan.x,
            world.y * self.scale + self.pan.y,
        )
    }

    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.scale,
            (screen.y - self.pan.y) / self.scale,
        )
    }

    /// Multiplicative zoom around `pointer`: the world point under the
    /// pointer stays on the same screen pixel. Only the sign of `direction`
    /// matters; zero leaves the viewport untouched.
    pub fn zoom_at(&mut self, pointer: Point, direction: i32) {
        let direction = direction.signum() as f64;
        if direction == 0.0 {
            return;
        }
        let target = self.scale + direction * self.limits.sensitivity * self.scale;
        self.rescale_around(pointer, target);
    }

    /// Additive zoom around `anchor`, used by the zoom buttons.
    pub fn zoom_by_step(&mut self, anchor: Point, delta: f64) {
        self.rescale_around(anchor, self.scale + delta);
    }

    fn rescale_around(&mut self, anchor: Point, target: f64) {
        let world = self.screen_to_world(anchor);
        let new_scale = target.clamp(self.limits.min_scale, self.limits.max_scale);

        if new_scale != target {
            trace!(target, new_scale, "zoom clamped");
        }

        self.pan.x = anchor.x - world.x * new_scale;
        self.pan.y = anchor.y - world.y * new_scale;
        self.scale = new_scale;
    }

    /// Idempotent.
    pub fn reset(&mut self) {
        self.scale = 1.0_f64.clamp(self.limits.min_scale, self.limits.max_scale);
        self.pan = self.limits.default_pan;
    }

    /// World-space area covered by a `width` x `height` screen.
    pub fn visible_world_rect(&self, width: f64, height: f64) -> Rect {
        let origin = self.screen_to_world(Point::default());
        Rect::new(origin.x, origin.y, width / self.scale, height / self.scale)
    }
}

/// Maps a wheel delta to a zoom direction: scrolling down zooms out.
pub fn wheel_direction(delta_y: f64) -> i32 {
    if delta_y > 0.0 {
        -1
    } else if delta_y < 0.0 {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin_viewport() -> Viewport {
        Viewport::new(ViewportLimits {
            default_pan: Point::default(),
            ..ViewportLimits::default()
        })
    }

    fn assert_close(a: Point, b: Point) {
        assert!(a.distance(b) < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_default_state() {
        let viewport = Viewport::default();
        assert_eq!(viewport.scale(), 1.0);
        assert_eq!(viewport.pan_offset(), DEFAULT_PAN);
    }

    #[test]
    fn test_zoom_in_keeps_point_under_pointer() {
        let mut viewport = origin_viewport();
        let pointer = Point::new(100.0, 100.0);
        assert_eq!(viewport.screen_to_world(pointer), Point::new(100.0, 100.0));

        viewport.zoom_at(pointer, 1);

        assert!(viewport.scale() > 1.0);
        assert_close(viewport.screen_to_world(pointer), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_zoom_out_keeps_point_under_pointer() {
        let mut viewport = Viewport::default();
        viewport.pan(-37.0, 12.5);
        let pointer = Point::new(420.0, 215.0);
        let before = viewport.screen_to_world(pointer);

        viewport.zoom_at(pointer, -1);

        assert!((viewport.scale() - 0.9).abs() < 1e-12);
        assert_close(viewport.screen_to_world(pointer), before);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut viewport = Viewport::default();
        for _ in 0..100 {
            viewport.zoom_at(Point::new(10.0, 10.0), 1);
        }
        assert_eq!(viewport.scale(), MAX_SCALE);

        for _ in 0..200 {
            viewport.zoom_at(Point::new(10.0, 10.0), -1);
        }
        assert_eq!(viewport.scale(), MIN_SCALE);
    }

    #[test]
    fn test_zero_direction_is_noop() {
        let mut viewport = Viewport::default();
        let before = viewport.clone();
        viewport.zoom_at(Point::new(55.0, 66.0), 0);
        assert_eq!(viewport, before);
    }

    #[test]
    fn test_pan_is_additive_regardless_of_scale() {
        let mut viewport = Viewport::default();
        viewport.zoom_at(Point::new(0.0, 0.0), 1);
        let before = viewport.pan_offset();
        viewport.pan(50.0, 30.0);
        assert_eq!(viewport.pan_offset(), before + Point::new(50.0, 30.0));
    }

    #[test]
    fn test_round_trip_between_spaces() {
        let mut viewport = Viewport::default();
        viewport.zoom_at(Point::new(321.0, 123.0), 1);
        let world = Point::new(-40.0, 875.5);
        assert_close(viewport.screen_to_world(viewport.world_to_screen(world)), world);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut viewport = Viewport::default();
        viewport.pan(10.0, 10.0);
        viewport.zoom_at(Point::new(5.0, 5.0), 1);
        viewport.reset();
        let once = viewport.clone();
        viewport.reset();
        assert_eq!(viewport, once);
        assert_eq!(viewport.transform().scale, 1.0);
    }

    #[test]
    fn test_zoom_by_step_is_additive() {
        let mut viewport = origin_viewport();
        let anchor = Point::new(400.0, 300.0);
        let before = viewport.screen_to_world(anchor);
        viewport.zoom_by_step(anchor, ZOOM_STEP);
        assert!((viewport.scale() - 1.1).abs() < 1e-12);
        assert_close(viewport.screen_to_world(anchor), before);
    }

    #[test]
    fn test_wheel_direction() {
        assert_eq!(wheel_direction(120.0), -1);
        assert_eq!(wheel_direction(-3.0), 1);
        assert_eq!(wheel_direction(0.0), 0);
    }

    #[test]
    fn test_visible_world_rect() {
        let mut viewport = origin_viewport();
        viewport.zoom_by_step(Point::default(), 1.0);
        let rect = viewport.visible_world_rect(800.0, 600.0);
        assert_eq!(rect, Rect::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn test_with_transform_clamps_scale() {
        let viewport = Viewport::with_transform(
            ViewportLimits::default(),
            Transform {
                scale: 9.0,
                pan_x: 1.0,
                pan_y: 2.0,
            },
        );
        assert_eq!(viewport.scale(), MAX_SCALE);
        assert_eq!(viewport.pan_offset(), Point::new(1.0, 2.0));
    }
}
