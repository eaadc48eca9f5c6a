use crate::camera::DEPTH_RANGE;

use super::shader::{BindingSlot, SlotResource};
use super::shapes::{atlas_sprite, circle, common, sprite};

/// The three draw kinds this core supports.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawKind {
    Sprite,
    AtlasSprite,
    Circle,
}

const SPRITE_BINDINGS: [BindingSlot; 3] = [
    BindingSlot::new(0, 0, SlotResource::Uniform),
    BindingSlot::new(1, 0, SlotResource::Texture),
    BindingSlot::new(1, 1, SlotResource::Sampler),
];

const ATLAS_SPRITE_BINDINGS: [BindingSlot; 4] = [
    BindingSlot::new(0, 0, SlotResource::Uniform),
    BindingSlot::new(1, 0, SlotResource::Texture),
    BindingSlot::new(1, 1, SlotResource::Sampler),
    BindingSlot::new(1, 2, SlotResource::Uniform),
];

const CIRCLE_BINDINGS: [BindingSlot; 1] = [BindingSlot::new(0, 0, SlotResource::Uniform)];

impl DrawKind {
    pub const ALL: [DrawKind; 3] = [DrawKind::Sprite, DrawKind::AtlasSprite, DrawKind::Circle];

    pub fn label(self) -> &'static str {
        match self {
            DrawKind::Sprite => "sprite",
            DrawKind::AtlasSprite => "atlas sprite",
            DrawKind::Circle => "circle",
        }
    }

    pub fn shader_source(self) -> &'static str {
        match self {
            DrawKind::Sprite => include_str!("shapes/shaders/sprite.wgsl"),
            DrawKind::AtlasSprite => include_str!("shapes/shaders/atlas_sprite.wgsl"),
            DrawKind::Circle => include_str!("shapes/shaders/circle.wgsl"),
        }
    }

    /// Slot 0: static quad, slot 1: instances.
    pub fn vertex_layouts(self) -> [wgpu::VertexBufferLayout<'static>; 2] {
        match self {
            DrawKind::Sprite => [
                common::TexturedQuadVertex::layout(),
                sprite::RawSpriteInstance::layout(),
            ],
            DrawKind::AtlasSprite => [
                common::TexturedQuadVertex::layout(),
                atlas_sprite::RawAtlasSpriteInstance::layout(),
            ],
            DrawKind::Circle => [common::QuadVertex::layout(), circle::RawCircleInstance::layout()],
        }
    }

    /// Resource bindings the program expects, ordered by (group, binding).
    pub fn bindings(self) -> &'static [BindingSlot] {
        match self {
            DrawKind::Sprite => &SPRITE_BINDINGS,
            DrawKind::AtlasSprite => &ATLAS_SPRITE_BINDINGS,
            DrawKind::Circle => &CIRCLE_BINDINGS,
        }
    }

    /// Default depth constant. Later kinds stack in front of earlier ones.
    pub fn default_layer(self) -> DepthLayer {
        match self {
            DrawKind::Sprite => DepthLayer::new(1.0),
            DrawKind::AtlasSprite => DepthLayer::new(2.0),
            DrawKind::Circle => DepthLayer::new(3.0),
        }
    }
}

/// World-space z written for every instance of one draw.
///
/// Only meaningful with depth testing enabled: under the orthographic camera
/// a higher layer is closer and wins the `Less` depth test.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct DepthLayer(f32);

impl DepthLayer {
    /// Largest `|z|` a layer can take.
    ///
    /// One unit inside the camera's depth range: `-DEPTH_RANGE` lands on
    /// depth 1.0, which never passes `Less` against a cleared depth buffer.
    pub const LIMIT: f32 = DEPTH_RANGE - 1.0;

    /// Clamps `z` into `[-LIMIT, LIMIT]`.
    #[inline]
    pub fn new(z: f32) -> Self {
        Self(z.clamp(-Self::LIMIT, Self::LIMIT))
    }

    #[inline]
    pub fn z(self) -> f32 {
        self.0
    }
}

impl Default for DepthLayer {
    fn default() -> Self {
        Self(0.0)
    }
}
