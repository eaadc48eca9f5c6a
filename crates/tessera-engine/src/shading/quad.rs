use glam::Vec2;

/// Unit quad corners, centered on the origin: TL, BL, TR, BR (y-up).
pub const QUAD_CORNERS: [[f32; 2]; 4] = [[-0.5, 0.5], [-0.5, -0.5], [0.5, 0.5], [0.5, -0.5]];

/// Texture coordinates matching [`QUAD_CORNERS`]; v grows downwards.
pub const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];

/// Two counter-clockwise triangles over [`QUAD_CORNERS`].
pub const QUAD_INDICES: [u16; 6] = [0, 1, 3, 0, 3, 2];

/// Instanced quad placement: `vertex_position * size + pos`.
///
/// Sprite kinds pass their `size`; circles pass `(radius + border_radius) * 2`
/// on both axes.
#[inline]
pub fn quad_world_position(vertex_position: Vec2, size: Vec2, pos: Vec2) -> Vec2 {
    vertex_position * size + pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::OrthographicCamera;
    use crate::coords::Viewport;
    use glam::Vec4;

    #[test]
    fn every_corner_matches_projection_formula() {
        let camera = OrthographicCamera::from_viewport(Viewport::new(640.0, 480.0)).camera();
        let size = Vec2::new(48.0, 32.0);
        let pos = Vec2::new(-100.0, 75.0);
        let z = 2.0;

        for corner in QUAD_CORNERS {
            let vertex = Vec2::from_array(corner);
            let world = quad_world_position(vertex, size, pos);
            let expected = camera.projection
                * Vec4::new(vertex.x * size.x + pos.x, vertex.y * size.y + pos.y, z, 1.0);
            assert_eq!(camera.clip_position(world, z), expected);
        }
    }

    #[test]
    fn corners_span_size_around_pos() {
        let pos = Vec2::new(10.0, 20.0);
        let size = Vec2::new(4.0, 6.0);
        let tl = quad_world_position(Vec2::from_array(QUAD_CORNERS[0]), size, pos);
        let br = quad_world_position(Vec2::from_array(QUAD_CORNERS[3]), size, pos);
        assert_eq!(tl, Vec2::new(8.0, 23.0));
        assert_eq!(br, Vec2::new(12.0, 17.0));
    }

    #[test]
    fn negative_size_mirrors() {
        let corner = Vec2::from_array(QUAD_CORNERS[0]);
        let tl = quad_world_position(corner, Vec2::new(-2.0, 2.0), Vec2::ZERO);
        assert_eq!(tl, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn indices_cover_both_triangles() {
        let mut seen = [0u8; 4];
        for i in QUAD_INDICES {
            seen[i as usize] += 1;
        }
        // Diagonal corners 0 and 3 are shared.
        assert_eq!(seen, [2, 1, 1, 2]);
    }
}
