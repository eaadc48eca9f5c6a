//! Camera contract shared by all draw kinds.
//!
//! A [`Camera`] is a projection matrix plus a world position. The position is
//! uploaded with the projection but no shading formula reads it.
//! [`OrthographicCamera`] is the host-side builder most 2D hosts want.

mod ortho;
mod uniform;

pub use ortho::{OrthographicCamera, DEPTH_RANGE};
pub use uniform::CameraUniform;

use glam::{Mat4, Vec2, Vec4};

/// Projection + position, rebuilt by the host per frame or on resize.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub projection: Mat4,
    pub position: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            position: Vec2::ZERO,
        }
    }
}

impl Camera {
    #[inline]
    pub const fn new(projection: Mat4, position: Vec2) -> Self {
        Self { projection, position }
    }

    /// Clip-space position of a world point at depth constant `z`.
    ///
    /// Mirrors the vertex stage of every program:
    /// `projection * vec4(p, z, 1)`.
    #[inline]
    pub fn clip_position(&self, p: Vec2, z: f32) -> Vec4 {
        self.projection * p.extend(z).extend(1.0)
    }

    #[inline]
    pub fn uniform(&self) -> CameraUniform {
        CameraUniform::from(self)
    }
}
