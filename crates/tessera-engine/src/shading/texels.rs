use glam::Vec2;

use crate::coords::ColorRgba;

/// Something a fragment stage can sample.
///
/// Stands in for the bound texture + sampler pair in reference shading.
pub trait TexelSource {
    fn sample(&self, uv: Vec2) -> ColorRgba;
}

/// A solid color samples the same everywhere.
impl TexelSource for ColorRgba {
    #[inline]
    fn sample(&self, _uv: Vec2) -> ColorRgba {
        *self
    }
}

/// Row-major texel image sampled with nearest filtering and clamp-to-edge
/// addressing.
#[derive(Debug, Clone, PartialEq)]
pub struct TexelGrid {
    width: u32,
    height: u32,
    texels: Vec<ColorRgba>,
}

impl TexelGrid {
    /// Builds a grid by evaluating `f(x, y)` per texel. Zero dimensions are
    /// bumped to one texel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> ColorRgba) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut texels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self { width, height, texels }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> ColorRgba {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.texels[(y * self.width + x) as usize]
    }
}

impl TexelSource for TexelGrid {
    fn sample(&self, uv: Vec2) -> ColorRgba {
        let to_index = |t: f32, extent: u32| -> u32 {
            let i = (t * extent as f32).floor();
            if i.is_nan() || i < 0.0 { 0 } else { (i as u32).min(extent - 1) }
        };
        self.texel(to_index(uv.x, self.width), to_index(uv.y, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> TexelGrid {
        TexelGrid::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 { ColorRgba::white() } else { ColorRgba::black() }
        })
    }

    #[test]
    fn nearest_sampling_picks_containing_texel() {
        let grid = checker();
        assert_eq!(grid.sample(Vec2::new(0.25, 0.25)), ColorRgba::white());
        assert_eq!(grid.sample(Vec2::new(0.75, 0.25)), ColorRgba::black());
        assert_eq!(grid.sample(Vec2::new(0.75, 0.75)), ColorRgba::white());
    }

    #[test]
    fn out_of_range_clamps_to_edge() {
        let grid = checker();
        assert_eq!(grid.sample(Vec2::new(-3.0, 0.1)), grid.texel(0, 0));
        assert_eq!(grid.sample(Vec2::new(1.0, 1.0)), grid.texel(1, 1));
        assert_eq!(grid.sample(Vec2::new(f32::NAN, 7.0)), grid.texel(0, 1));
    }

    #[test]
    fn solid_color_samples_constant() {
        let c = ColorRgba::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(c.sample(Vec2::new(0.9, 0.1)), c);
    }
}
