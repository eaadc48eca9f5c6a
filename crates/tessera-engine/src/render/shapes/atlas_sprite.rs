use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::atlas::{AtlasDescriptor, AtlasUniform};
use crate::render::{CameraBinding, DepthLayer, DrawKind, RenderCtx, RenderTarget, Texture};
use crate::shading::AtlasSpriteInstance;

use super::common::{
    build_pipeline, pipeline_key, InstanceBuffer, PipelineKey, QuadBuffers, QUAD_INDEX_COUNT,
    TEXTURED_QUAD_VERTICES,
};
use super::sprite::{sampler_entry, texture_entry};

const PASS_LABEL: &str = "tessera atlas sprite pass";

/// Renderer for sprites animated through the frames of one texture atlas.
///
/// Each instance picks its cell with a `FrameSelector`; the cell lookup runs
/// in the fragment stage against the atlas uniform of the bound
/// [`AtlasBinding`].
pub struct AtlasSpriteRenderer {
    layer: DepthLayer,

    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
    atlas_layout: Option<wgpu::BindGroupLayout>,

    quad: Option<QuadBuffers>,
    instances: InstanceBuffer<RawAtlasSpriteInstance>,
}

impl Default for AtlasSpriteRenderer {
    fn default() -> Self {
        Self {
            layer: DrawKind::AtlasSprite.default_layer(),
            pipeline_key: None,
            pipeline: None,
            atlas_layout: None,
            quad: None,
            instances: InstanceBuffer::new("tessera atlas sprite instance vbo"),
        }
    }
}

/// Atlas texture, sampler and frame grid bound at group 1.
pub struct AtlasBinding {
    bind_group: wgpu::BindGroup,
    uniform: wgpu::Buffer,
    descriptor: AtlasDescriptor,
}

impl AtlasBinding {
    #[inline]
    pub fn descriptor(&self) -> &AtlasDescriptor {
        &self.descriptor
    }

    /// Replaces the frame grid while keeping the texture (e.g. a re-packed atlas).
    pub fn update_descriptor(&mut self, queue: &wgpu::Queue, descriptor: AtlasDescriptor) {
        if self.descriptor == descriptor {
            return;
        }
        queue.write_buffer(&self.uniform, 0, bytemuck::bytes_of(&descriptor.uniform()));
        self.descriptor = descriptor;
    }
}

impl AtlasSpriteRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: DepthLayer) -> Self {
        self.layer = layer;
        self
    }

    #[inline]
    pub fn layer(&self) -> DepthLayer {
        self.layer
    }

    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, camera: &CameraBinding) -> anyhow::Result<()> {
        self.ensure_pipeline(ctx, camera)?;
        self.ensure_static_buffers(ctx);
        Ok(())
    }

    pub fn begin_frame(&mut self) {
        self.instances.reset();
    }

    /// Binds `texture` as an atlas laid out by `descriptor`.
    pub fn bind_atlas(
        &mut self,
        ctx: &RenderCtx<'_>,
        texture: &Texture,
        descriptor: AtlasDescriptor,
    ) -> AtlasBinding {
        let uniform = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera atlas ubo"),
            contents: bytemuck::bytes_of(&descriptor.uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = self.atlas_layout(ctx.device);
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera atlas bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(texture.sampler()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: uniform.as_entire_binding(),
                },
            ],
        });

        AtlasBinding {
            bind_group,
            uniform,
            descriptor,
        }
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &CameraBinding,
        atlas: &AtlasBinding,
        sprites: &[AtlasSpriteInstance],
    ) -> anyhow::Result<()> {
        if sprites.is_empty() {
            return Ok(());
        }

        target.check_depth(ctx, PASS_LABEL)?;
        self.prepare(ctx, camera)?;

        let z = self.layer.z();
        let raw: Vec<RawAtlasSpriteInstance> =
            sprites.iter().map(|s| RawAtlasSpriteInstance::new(s, z)).collect();
        let range = self.instances.push(ctx, &raw);

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(()) };
        let Some(quad) = self.quad.as_ref() else { return Ok(()) };
        let Some(instance_vbo) = self.instances.buffer() else { return Ok(()) };

        let mut rpass = target.begin_pass(ctx, PASS_LABEL)?;
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera.bind_group(), &[]);
        rpass.set_bind_group(1, &atlas.bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, range);

        Ok(())
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn atlas_layout(&mut self, device: &wgpu::Device) -> &wgpu::BindGroupLayout {
        self.atlas_layout.get_or_insert_with(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tessera atlas bgl"),
                entries: &[
                    texture_entry(0),
                    sampler_entry(1),
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<AtlasUniform>() as u64,
                            ),
                        },
                        count: None,
                    },
                ],
            })
        })
    }

    fn ensure_pipeline(
        &mut self,
        ctx: &RenderCtx<'_>,
        camera: &CameraBinding,
    ) -> anyhow::Result<()> {
        let key = pipeline_key(ctx);
        if self.pipeline_key == Some(key) && self.pipeline.is_some() {
            return Ok(());
        }

        let atlas_layout = self.atlas_layout(ctx.device);
        let pipeline =
            build_pipeline(ctx, DrawKind::AtlasSprite, &[camera.layout(), atlas_layout])?;

        self.pipeline = Some(pipeline);
        self.pipeline_key = Some(key);
        Ok(())
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(
                ctx.device,
                "tessera atlas sprite",
                &TEXTURED_QUAD_VERTICES,
            ));
        }
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (48 bytes):
///
///  offset  0  pos         [f32; 2]  loc 2
///  offset  8  size        [f32; 2]  loc 3
///  offset 16  color       [f32; 4]  loc 4
///  offset 32  frame       [u32; 2]  loc 5  (scalar index in .x, or grid cell)
///  offset 40  frame_kind  u32       loc 6
///  offset 44  depth       f32       loc 7
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct RawAtlasSpriteInstance {
    pos: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
    frame: [u32; 2],
    frame_kind: u32,
    depth: f32,
}

impl RawAtlasSpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        2 => Float32x2, // pos
        3 => Float32x2, // size
        4 => Float32x4, // color
        5 => Uint32x2,  // frame
        6 => Uint32,    // frame_kind
        7 => Float32    // depth
    ];

    fn new(sprite: &AtlasSpriteInstance, depth: f32) -> Self {
        let (frame, frame_kind) = sprite.frame.to_raw();
        Self {
            pos: sprite.pos.to_array(),
            size: sprite.size.to_array(),
            color: sprite.color.to_array(),
            frame,
            frame_kind,
            depth,
        }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RawAtlasSpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{FrameSelector, GridCell};
    use glam::Vec2;

    #[test]
    fn instance_layout_is_48_bytes() {
        assert_eq!(std::mem::size_of::<RawAtlasSpriteInstance>(), 48);
        assert_eq!(RawAtlasSpriteInstance::layout().array_stride, 48);
    }

    #[test]
    fn attribute_offsets_match_struct() {
        let offsets: Vec<u64> = RawAtlasSpriteInstance::ATTRS.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 16, 32, 40, 44]);
    }

    #[test]
    fn scalar_frame_is_tagged_for_the_shader() {
        let sprite = AtlasSpriteInstance::new(Vec2::ZERO, Vec2::ONE, 7u32);
        let raw = RawAtlasSpriteInstance::new(&sprite, 2.0);
        assert_eq!(raw.frame[0], 7);
        assert_eq!(raw.frame_kind, FrameSelector::KIND_SCALAR);
        assert_eq!(raw.depth, 2.0);
    }

    #[test]
    fn grid_frame_is_passed_through() {
        let sprite = AtlasSpriteInstance::new(Vec2::ZERO, Vec2::ONE, GridCell::new(3, 1));
        let raw = RawAtlasSpriteInstance::new(&sprite, 0.0);
        assert_eq!(raw.frame, [3, 1]);
        assert_eq!(raw.frame_kind, FrameSelector::KIND_GRID);
    }

    #[test]
    fn atlas_uniform_fits_its_binding() {
        assert_eq!(std::mem::size_of::<AtlasUniform>(), 16);
    }
}
