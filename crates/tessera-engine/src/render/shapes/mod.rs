//! Per-kind renderers: sprite, atlas sprite and circle.
//!
//! Each renderer lazily builds its pipeline for the formats in `RenderCtx`,
//! keeps a static unit quad and appends instances into a per-frame buffer.

pub(super) mod atlas_sprite;
pub(super) mod circle;
pub(super) mod common;
pub(super) mod sprite;

pub use atlas_sprite::{AtlasBinding, AtlasSpriteRenderer};
pub use circle::CircleRenderer;
pub use sprite::{SpriteRenderer, TextureBinding};
