//! GPU rendering subsystem.
//!
//! One renderer per draw kind, each owning its pipeline and buffers and
//! issuing one instanced draw per batch via wgpu.
//!
//! Convention:
//! - instance geometry is in world units (+Y up)
//! - the vertex stage applies the bound camera's projection
//! - fragment output is straight-alpha RGBA, blended with `ALPHA_BLENDING`

mod camera;
mod ctx;
mod layer;
pub mod shader;
pub mod shapes;
mod texture;

pub use camera::CameraBinding;
pub use ctx::{RenderCtx, RenderTarget};
pub use layer::{DepthLayer, DrawKind};
pub use shader::{BindingSlot, SlotResource};
pub use shapes::{
    AtlasBinding, AtlasSpriteRenderer, CircleRenderer, SpriteRenderer, TextureBinding,
};
pub use texture::{DepthTexture, Texture, TextureOptions};
