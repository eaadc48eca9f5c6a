use bytemuck::{Pod, Zeroable};

use crate::render::{CameraBinding, DepthLayer, DrawKind, RenderCtx, RenderTarget, Texture};
use crate::shading::SpriteInstance;

use super::common::{
    build_pipeline, pipeline_key, InstanceBuffer, PipelineKey, QuadBuffers, QUAD_INDEX_COUNT,
    TEXTURED_QUAD_VERTICES,
};

const PASS_LABEL: &str = "tessera sprite pass";

/// Renderer for plain textured sprites.
///
/// Every instance of one `render` call samples the same texture; the tint is
/// multiplied into the sampled texel as straight alpha.
pub struct SpriteRenderer {
    layer: DepthLayer,

    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,
    texture_layout: Option<wgpu::BindGroupLayout>,

    quad: Option<QuadBuffers>,
    instances: InstanceBuffer<RawSpriteInstance>,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self {
            layer: DrawKind::Sprite.default_layer(),
            pipeline_key: None,
            pipeline: None,
            texture_layout: None,
            quad: None,
            instances: InstanceBuffer::new("tessera sprite instance vbo"),
        }
    }
}

/// Texture bound at group 1 for [`SpriteRenderer::render`].
pub struct TextureBinding {
    bind_group: wgpu::BindGroup,
}

impl SpriteRenderer {
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

    /// Builds the pipeline and static buffers for the formats in `ctx`.
    ///
    /// Called by `render` as needed; calling it at startup surfaces shader
    /// contract errors before the first frame.
    pub fn prepare(&mut self, ctx: &RenderCtx<'_>, camera: &CameraBinding) -> anyhow::Result<()> {
        self.ensure_pipeline(ctx, camera)?;
        self.ensure_static_buffers(ctx);
        Ok(())
    }

    /// Starts a new frame's instance range. Call after the previous frame was submitted.
    pub fn begin_frame(&mut self) {
        self.instances.reset();
    }

    pub fn bind_texture(&mut self, ctx: &RenderCtx<'_>, texture: &Texture) -> TextureBinding {
        let layout = self.texture_layout(ctx.device);
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessera sprite texture bind group"),
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
            ],
        });
        TextureBinding { bind_group }
    }

    /// Draws `sprites` in one instanced call.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &CameraBinding,
        texture: &TextureBinding,
        sprites: &[SpriteInstance],
    ) -> anyhow::Result<()> {
        if sprites.is_empty() {
            return Ok(());
        }

        target.check_depth(ctx, PASS_LABEL)?;
        self.prepare(ctx, camera)?;

        let z = self.layer.z();
        let raw: Vec<RawSpriteInstance> =
            sprites.iter().map(|s| RawSpriteInstance::new(s, z)).collect();
        let range = self.instances.push(ctx, &raw);

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(()) };
        let Some(quad) = self.quad.as_ref() else { return Ok(()) };
        let Some(instance_vbo) = self.instances.buffer() else { return Ok(()) };

        let mut rpass = target.begin_pass(ctx, PASS_LABEL)?;
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera.bind_group(), &[]);
        rpass.set_bind_group(1, &texture.bind_group, &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, range);

        Ok(())
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn texture_layout(&mut self, device: &wgpu::Device) -> &wgpu::BindGroupLayout {
        self.texture_layout.get_or_insert_with(|| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tessera sprite texture bgl"),
                entries: &[texture_entry(0), sampler_entry(1)],
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

        let texture_layout = self.texture_layout(ctx.device);
        let pipeline = build_pipeline(ctx, DrawKind::Sprite, &[camera.layout(), texture_layout])?;

        self.pipeline = Some(pipeline);
        self.pipeline_key = Some(key);
        Ok(())
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(
                ctx.device,
                "tessera sprite",
                &TEXTURED_QUAD_VERTICES,
            ));
        }
    }
}

// ── group 1 entries shared with the atlas renderer ────────────────────────

pub(super) fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub(super) fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (36 bytes):
///
///  offset  0  pos    [f32; 2]  loc 2
///  offset  8  size   [f32; 2]  loc 3
///  offset 16  color  [f32; 4]  loc 4
///  offset 32  depth  f32       loc 5
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct RawSpriteInstance {
    pos: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
    depth: f32,
}

impl RawSpriteInstance {
    const ATTRS: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        2 => Float32x2, // pos
        3 => Float32x2, // size
        4 => Float32x4, // color
        5 => Float32    // depth
    ];

    fn new(sprite: &SpriteInstance, depth: f32) -> Self {
        Self {
            pos: sprite.pos.to_array(),
            size: sprite.size.to_array(),
            color: sprite.color.to_array(),
            depth,
        }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RawSpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}
