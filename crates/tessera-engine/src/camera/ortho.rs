use glam::{Mat4, Vec2};

use crate::coords::Viewport;

use super::Camera;

/// Half-extent of the orthographic depth range, in world z units.
///
/// World `z = DEPTH_RANGE` maps to depth 0 (front), `z = -DEPTH_RANGE` to
/// depth 1 (back). Depth layers stay strictly inside this range.
pub const DEPTH_RANGE: f32 = 1000.0;

/// Orthographic 2D camera (y-up), centered on `position`.
///
/// `size` is the visible extent in world units. Sized from a [`Viewport`],
/// one world unit covers one pixel.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthographicCamera {
    pub size: Vec2,
    pub position: Vec2,
}

impl Default for OrthographicCamera {
    fn default() -> Self {
        Self {
            size: Vec2::new(2.0, 2.0),
            position: Vec2::ZERO,
        }
    }
}

impl OrthographicCamera {
    #[inline]
    pub fn from_viewport(viewport: Viewport) -> Self {
        Self {
            size: Vec2::new(viewport.width.max(1.0), viewport.height.max(1.0)),
            position: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width.max(1.0), height.max(1.0));
    }

    #[inline]
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn projection(&self) -> Mat4 {
        let half = self.size * 0.5;
        let ortho =
            Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -DEPTH_RANGE, DEPTH_RANGE);
        ortho * Mat4::from_translation((-self.position).extend(0.0))
    }

    #[inline]
    pub fn camera(&self) -> Camera {
        Camera::new(self.projection(), self.position)
    }
}
