use glam::Vec2;

use crate::atlas::{AtlasDescriptor, FrameSelector};
use crate::coords::ColorRgba;

use super::TexelSource;

/// One textured quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteInstance {
    pub pos: Vec2,
    pub size: Vec2,
    /// Straight-alpha tint multiplied into every sampled texel.
    pub color: ColorRgba,
}

impl SpriteInstance {
    #[inline]
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size, color: ColorRgba::white() }
    }

    #[inline]
    pub fn with_color(mut self, color: ColorRgba) -> Self {
        self.color = color;
        self
    }
}

/// One animated quad sampling a cell of the bound atlas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AtlasSpriteInstance {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: ColorRgba,
    pub frame: FrameSelector,
}

impl AtlasSpriteInstance {
    #[inline]
    pub fn new(pos: Vec2, size: Vec2, frame: impl Into<FrameSelector>) -> Self {
        Self {
            pos,
            size,
            color: ColorRgba::white(),
            frame: frame.into(),
        }
    }

    #[inline]
    pub fn with_color(mut self, color: ColorRgba) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn with_frame(mut self, frame: impl Into<FrameSelector>) -> Self {
        self.frame = frame.into();
        self
    }
}

/// Plain sprite fragment: sample at `uv`, tint by `color`. Never discards.
#[inline]
pub fn shade_sprite(texture: &impl TexelSource, uv: Vec2, color: ColorRgba) -> ColorRgba {
    texture.sample(uv) * color
}

/// Atlas sprite fragment: resolve the frame to a cell, remap `uv` into the
/// cell, sample, tint.
#[inline]
pub fn shade_atlas_sprite(
    texture: &impl TexelSource,
    atlas: &AtlasDescriptor,
    instance: &AtlasSpriteInstance,
    uv: Vec2,
) -> ColorRgba {
    let atlas_uv = atlas.frame_uv(instance.frame, uv);
    texture.sample(atlas_uv) * instance.color
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{AtlasLayout, GridCell};
    use crate::shading::TexelGrid;

    const CELL_PX: u32 = 4;

    /// 4x2 cells of 4x4 texels; each texel encodes its cell in r/g.
    fn labelled_sheet() -> (TexelGrid, AtlasDescriptor) {
        let layout = AtlasLayout::packed(8, 4, CELL_PX, CELL_PX);
        let (w, h) = layout.texture_size();
        let grid = TexelGrid::from_fn(w as u32, h as u32, |x, y| {
            ColorRgba::new((x / CELL_PX) as f32, (y / CELL_PX) as f32, 0.0, 1.0)
        });
        (grid, AtlasDescriptor::from_layout(&layout).unwrap())
    }

    fn cell_of(c: ColorRgba) -> GridCell {
        GridCell::new(c.r as u32, c.g as u32)
    }

    #[test]
    fn tint_multiplies_exactly() {
        let tint = ColorRgba::new(0.5, 0.2, 1.0, 0.8);
        let out = shade_sprite(&ColorRgba::white(), Vec2::new(0.5, 0.5), tint);
        assert_eq!(out, tint);
    }

    #[test]
    fn zero_alpha_tint_still_produces_color() {
        let out = shade_sprite(&ColorRgba::white(), Vec2::ZERO, ColorRgba::transparent());
        assert_eq!(out, ColorRgba::transparent());
    }

    #[test]
    fn atlas_samples_stay_inside_the_selected_cell() {
        let (sheet, atlas) = labelled_sheet();
        let samples = [0.01, 0.25, 0.5, 0.75, 0.99];
        for frame in 0..16u32 {
            let instance = AtlasSpriteInstance::new(Vec2::ZERO, Vec2::ONE, frame);
            let expected = atlas.resolve(instance.frame);
            for &u in &samples {
                for &v in &samples {
                    let c = shade_atlas_sprite(&sheet, &atlas, &instance, Vec2::new(u, v));
                    assert_eq!(cell_of(c), expected, "frame {frame} uv ({u}, {v})");
                }
            }
        }
    }

    #[test]
    fn wrapped_frame_shows_same_pixels() {
        let (sheet, atlas) = labelled_sheet();
        let uv = Vec2::new(0.4, 0.6);
        let first = AtlasSpriteInstance::new(Vec2::ZERO, Vec2::ONE, 3u32);
        let wrapped = AtlasSpriteInstance::new(Vec2::ZERO, Vec2::ONE, 11u32);
        let a = shade_atlas_sprite(&sheet, &atlas, &first, uv);
        let b = shade_atlas_sprite(&sheet, &atlas, &wrapped, uv);
        assert_eq!(a, b);
    }

    #[test]
    fn grid_selector_samples_named_cell() {
        let (sheet, atlas) = labelled_sheet();
        let instance = AtlasSpriteInstance::new(Vec2::ZERO, Vec2::ONE, GridCell::new(3, 1))
            .with_color(ColorRgba::new(1.0, 1.0, 1.0, 0.5));
        let c = shade_atlas_sprite(&sheet, &atlas, &instance, Vec2::new(0.5, 0.5));
        assert_eq!(cell_of(c), GridCell::new(3, 1));
        assert_eq!(c.a, 0.5);
    }
}
