//! The pan/zoom transform mapping world-space section layout to the screen.

use egui::{pos2, Pos2, Vec2};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_SCALE, LINEAR_RESET_OFFSET, MAX_SCALE, MIN_SCALE};
use crate::layout::LayoutKind;

/// A 2D translation plus uniform scale. `x`/`y` are the pixel offsets of the
/// world origin inside the canvas container; `scale` is always kept within
/// `[MIN_SCALE, MAX_SCALE]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasTransform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl CanvasTransform {
    /// Translates the canvas by a screen-space delta. The canvas is
    /// unbounded, so no clamping applies.
    pub fn pan(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Zooms by `delta_scale`, keeping the world point under `focal`
    /// (container-local screen coordinates) visually fixed.
    pub fn zoom(&mut self, focal: Pos2, delta_scale: f32) {
        let new_scale = (self.scale + delta_scale).clamp(MIN_SCALE, MAX_SCALE);
        let world = self.to_world(focal);
        self.x = focal.x - world.x * new_scale;
        self.y = focal.y - world.y * new_scale;
        self.scale = new_scale;
    }

    /// Adjusts scale around the container center, for the toolbar buttons.
    pub fn zoom_centered(&mut self, container: Vec2, delta_scale: f32) {
        self.zoom(pos2(container.x / 2.0, container.y / 2.0), delta_scale);
    }

    /// Converts a container-local screen point to world space.
    pub fn to_world(&self, screen: Pos2) -> Pos2 {
        pos2((screen.x - self.x) / self.scale, (screen.y - self.y) / self.scale)
    }

    /// Converts a world point to container-local screen space.
    pub fn to_screen(&self, world: Pos2) -> Pos2 {
        pos2(
            world.x * self.scale + self.x,
            world.y * self.scale + self.y,
        )
    }

    /// The canonical transform for a layout kind. Linear boards start near
    /// the origin; grid boards are centered in the container.
    pub fn reset_for(layout: LayoutKind, section_count: usize, container: Vec2) -> Self {
        match layout {
            LayoutKind::Linear => Self {
                x: LINEAR_RESET_OFFSET[0],
                y: LINEAR_RESET_OFFSET[1],
                scale: DEFAULT_SCALE,
            },
            LayoutKind::Matrix2x2 | LayoutKind::SixHats => {
                let bounds = crate::layout::content_bounds(layout, section_count);
                let scaled = bounds.size() * DEFAULT_SCALE;
                Self {
                    x: (container.x - scaled.x) / 2.0 - bounds.min.x * DEFAULT_SCALE,
                    y: (container.y - scaled.y) / 2.0 - bounds.min.y * DEFAULT_SCALE,
                    scale: DEFAULT_SCALE,
                }
            }
        }
    }
}

/// Tracks an in-progress drag-to-pan gesture. The gesture only exists while
/// a primary or middle button stays down after a press on empty canvas;
/// every pointer move applies the delta since the last recorded position.
#[derive(Debug, Default)]
pub struct PanGesture {
    last_pos: Option<Pos2>,
}

impl PanGesture {
    pub fn is_active(&self) -> bool {
        self.last_pos.is_some()
    }

    /// Begins tracking. The caller is responsible for only starting a
    /// gesture when the press landed on empty canvas.
    pub fn begin(&mut self, pos: Pos2) {
        self.last_pos = Some(pos);
    }

    /// Feeds a pointer position; returns the delta to apply to the
    /// transform, if a gesture is active.
    pub fn update(&mut self, pos: Pos2) -> Option<Vec2> {
        let last = self.last_pos?;
        self.last_pos = Some(pos);
        Some(pos - last)
    }

    /// Ends the gesture (button release or pointer leaving the canvas).
    pub fn end(&mut self) {
        self.last_pos = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn pan_is_unbounded_accumulation() {
        let mut t = CanvasTransform::default();
        t.pan(vec2(15.0, -7.5));
        t.pan(vec2(-100.0, 2.5));
        assert!(close(t.x, -85.0));
        assert!(close(t.y, -5.0));
        assert!(close(t.scale, 1.0));
    }

    #[test]
    fn zoom_keeps_focal_world_point_fixed() {
        let mut t = CanvasTransform {
            x: 33.0,
            y: -12.0,
            scale: 0.9,
        };
        let focal = pos2(412.0, 267.0);
        let before = t.to_world(focal);
        t.zoom(focal, 0.35);
        let after = t.to_world(focal);
        assert!(close(before.x, after.x));
        assert!(close(before.y, after.y));
        assert!(close(t.scale, 1.25));
    }

    #[test]
    fn zoom_focal_invariant_across_many_steps() {
        let mut t = CanvasTransform::default();
        let focal = pos2(640.0, 360.0);
        for step in [0.1, -0.05, 0.2, 0.07, -0.15] {
            let before = t.to_world(focal);
            t.zoom(focal, step);
            let after = t.to_world(focal);
            assert!(close(before.x, after.x));
            assert!(close(before.y, after.y));
        }
    }

    #[test]
    fn repeated_zoom_never_escapes_clamp() {
        let mut t = CanvasTransform::default();
        for _ in 0..100 {
            t.zoom(pos2(100.0, 100.0), 0.5);
        }
        assert!(close(t.scale, MAX_SCALE));
        for _ in 0..100 {
            t.zoom(pos2(100.0, 100.0), -0.5);
        }
        assert!(close(t.scale, MIN_SCALE));
    }

    #[test]
    fn world_screen_round_trip() {
        let t = CanvasTransform {
            x: -20.0,
            y: 55.0,
            scale: 1.7,
        };
        let world = pos2(123.4, -56.7);
        let back = t.to_world(t.to_screen(world));
        assert!(close(back.x, world.x));
        assert!(close(back.y, world.y));
    }

    #[test]
    fn linear_reset_is_near_origin() {
        let t = CanvasTransform::reset_for(LayoutKind::Linear, 3, vec2(1280.0, 800.0));
        assert!(close(t.x, 40.0));
        assert!(close(t.y, 80.0));
        assert!(close(t.scale, DEFAULT_SCALE));
    }

    #[test]
    fn grid_reset_centers_content() {
        let t = CanvasTransform::reset_for(LayoutKind::Matrix2x2, 4, vec2(1280.0, 800.0));
        let bounds = crate::layout::content_bounds(LayoutKind::Matrix2x2, 4);
        let center = t.to_screen(bounds.center());
        assert!(close(center.x, 640.0));
        assert!(close(center.y, 400.0));
    }

    #[test]
    fn pan_gesture_reports_deltas_until_ended() {
        let mut gesture = PanGesture::default();
        assert!(gesture.update(pos2(5.0, 5.0)).is_none());

        gesture.begin(pos2(10.0, 10.0));
        assert_eq!(gesture.update(pos2(14.0, 7.0)), Some(vec2(4.0, -3.0)));
        assert_eq!(gesture.update(pos2(14.0, 7.0)), Some(Vec2::ZERO));

        gesture.end();
        assert!(!gesture.is_active());
        assert!(gesture.update(pos2(0.0, 0.0)).is_none());
    }
}
