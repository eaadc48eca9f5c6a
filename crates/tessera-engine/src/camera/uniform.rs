use bytemuck::{Pod, Zeroable};

use super::Camera;

/// Camera uniform layout (80 bytes, group 0 binding 0):
///
///  offset  0  projection  mat4x4<f32>  (column-major)
///  offset 64  position    vec2<f32>
///  offset 72  _pad        vec2<f32>    (uniform structs round up to 16)
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
    pub position: [f32; 2],
    pub _pad: [f32; 2],
}

impl From<&Camera> for CameraUniform {
    fn from(camera: &Camera) -> Self {
        Self {
            projection: camera.projection.to_cols_array_2d(),
            position: camera.position.to_array(),
            _pad: [0.0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec2, Vec3};

    #[test]
    fn layout_is_80_bytes() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 80);
    }

    #[test]
    fn projection_is_column_major() {
        let projection = Mat4::from_translation(Vec3::new(5.0, 6.0, 7.0));
        let u = CameraUniform::from(&Camera::new(projection, Vec2::new(1.0, 2.0)));
        // Translation lives in the fourth column.
        assert_eq!(u.projection[3], [5.0, 6.0, 7.0, 1.0]);
        assert_eq!(u.position, [1.0, 2.0]);
    }
}
