//! Reference implementations of the three shading programs.
//!
//! Each function here is the CPU twin of a WGSL stage under
//! `render/shapes/shaders`, with the same arithmetic and the same comparison
//! operators. They are pure: no state, no allocation, safe to map over
//! instances or pixels in parallel.

mod circle;
mod quad;
mod sprite;
mod texels;

pub use circle::{classify_circle, shade_circle, CircleInstance, CircleRegion};
pub use quad::{quad_world_position, QUAD_CORNERS, QUAD_INDICES, QUAD_UVS};
pub use sprite::{shade_atlas_sprite, shade_sprite, AtlasSpriteInstance, SpriteInstance};
pub use texels::{TexelGrid, TexelSource};

use crate::coords::ColorRgba;

/// Outcome of a fragment stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Fragment {
    Color(ColorRgba),
    /// No output; the target keeps whatever was there.
    Discard,
}

impl Fragment {
    #[inline]
    pub fn color(self) -> Option<ColorRgba> {
        match self {
            Fragment::Color(c) => Some(c),
            Fragment::Discard => None,
        }
    }

    #[inline]
    pub fn is_discard(self) -> bool {
        matches!(self, Fragment::Discard)
    }
}
