use bytemuck::{Pod, Zeroable};

use crate::render::{CameraBinding, DepthLayer, DrawKind, RenderCtx, RenderTarget};
use crate::shading::CircleInstance;

use super::common::{
    build_pipeline, pipeline_key, InstanceBuffer, PipelineKey, QuadBuffers, QUAD_INDEX_COUNT,
    QUAD_VERTICES,
};

const PASS_LABEL: &str = "tessera circle pass";

/// Renderer for filled circles with an outer ring.
///
/// Coverage is a hard distance test, no anti-aliasing. Fully transparent
/// fill or ring colors discard, so a hollow circle leaves the target as-is
/// inside the ring.
pub struct CircleRenderer {
    layer: DepthLayer,

    pipeline_key: Option<PipelineKey>,
    pipeline: Option<wgpu::RenderPipeline>,

    quad: Option<QuadBuffers>,
    instances: InstanceBuffer<RawCircleInstance>,
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self {
            layer: DrawKind::Circle.default_layer(),
            pipeline_key: None,
            pipeline: None,
            quad: None,
            instances: InstanceBuffer::new("tessera circle instance vbo"),
        }
    }
}

impl CircleRenderer {
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
        let key = pipeline_key(ctx);
        if self.pipeline_key != Some(key) || self.pipeline.is_none() {
            self.pipeline = Some(build_pipeline(ctx, DrawKind::Circle, &[camera.layout()])?);
            self.pipeline_key = Some(key);
        }
        if self.quad.is_none() {
            self.quad = Some(QuadBuffers::new(ctx.device, "tessera circle", &QUAD_VERTICES));
        }
        Ok(())
    }

    pub fn begin_frame(&mut self) {
        self.instances.reset();
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        camera: &CameraBinding,
        circles: &[CircleInstance],
    ) -> anyhow::Result<()> {
        if circles.is_empty() {
            return Ok(());
        }

        target.check_depth(ctx, PASS_LABEL)?;
        self.prepare(ctx, camera)?;

        let z = self.layer.z();
        let raw: Vec<RawCircleInstance> =
            circles.iter().map(|c| RawCircleInstance::new(c, z)).collect();
        let range = self.instances.push(ctx, &raw);

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(()) };
        let Some(quad) = self.quad.as_ref() else { return Ok(()) };
        let Some(instance_vbo) = self.instances.buffer() else { return Ok(()) };

        let mut rpass = target.begin_pass(ctx, PASS_LABEL)?;
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, camera.bind_group(), &[]);
        rpass.set_vertex_buffer(0, quad.vbo.slice(..));
        rpass.set_vertex_buffer(1, instance_vbo.slice(..));
        rpass.set_index_buffer(quad.ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDEX_COUNT, 0, range);

        Ok(())
    }
}

// ── GPU types ─────────────────────────────────────────────────────────────

/// Instance data layout (52 bytes):
///
///  offset  0  pos            [f32; 2]  loc 1
///  offset  8  radius         f32       loc 2
///  offset 12  border_radius  f32       loc 3
///  offset 16  color          [f32; 4]  loc 4
///  offset 32  border_color   [f32; 4]  loc 5
///  offset 48  depth          f32       loc 6
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct RawCircleInstance {
    pos: [f32; 2],
    radius: f32,
    border_radius: f32,
    color: [f32; 4],
    border_color: [f32; 4],
    depth: f32,
}

impl RawCircleInstance {
    const ATTRS: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        1 => Float32x2, // pos
        2 => Float32,   // radius
        3 => Float32,   // border_radius
        4 => Float32x4, // color
        5 => Float32x4, // border_color
        6 => Float32    // depth
    ];

    fn new(circle: &CircleInstance, depth: f32) -> Self {
        Self {
            pos: circle.pos.to_array(),
            radius: circle.radius,
            border_radius: circle.border_radius,
            color: circle.color.to_array(),
            border_color: circle.border_color.to_array(),
            depth,
        }
    }

    pub(crate) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RawCircleInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::ColorRgba;
    use glam::Vec2;

    #[test]
    fn instance_layout_is_52_bytes() {
        assert_eq!(std::mem::size_of::<RawCircleInstance>(), 52);
        assert_eq!(RawCircleInstance::layout().array_stride, 52);
    }

    #[test]
    fn attribute_offsets_match_struct() {
        let offsets: Vec<u64> = RawCircleInstance::ATTRS.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 12, 16, 32, 48]);
    }

    #[test]
    fn depth_mismatch_leaves_instances_untouched() {
        let Some((device, queue)) = super::super::tests::gpu() else {
            eprintln!("no GPU adapter; skipping");
            return;
        };

        let ctx = RenderCtx::new(&device, &queue, wgpu::TextureFormat::Rgba8Unorm)
            .with_depth(wgpu::TextureFormat::Depth32Float);
        let camera = CameraBinding::new(&device, &Default::default());
        let texture = super::super::tests::target_texture(&device);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&Default::default());
        let mut target = RenderTarget::new(&mut encoder, &view);

        let mut circles = CircleRenderer::new();
        let batch = [CircleInstance::new(Vec2::ZERO, 4.0)];
        assert!(circles.render(&ctx, &mut target, &camera, &batch).is_err());
        assert!(circles.instances.buffer().is_none());
        assert!(circles.pipeline.is_none());
    }

    #[test]
    fn raw_instance_keeps_both_colors() {
        let circle = CircleInstance::new(Vec2::new(1.0, 2.0), 10.0)
            .with_color(ColorRgba::new(1.0, 0.0, 0.0, 1.0))
            .with_border(5.0, ColorRgba::new(0.0, 0.0, 1.0, 0.5));
        let raw = RawCircleInstance::new(&circle, 3.0);
        assert_eq!(raw.pos, [1.0, 2.0]);
        assert_eq!(raw.radius, 10.0);
        assert_eq!(raw.border_radius, 5.0);
        assert_eq!(raw.color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(raw.border_color, [0.0, 0.0, 1.0, 0.5]);
        assert_eq!(raw.depth, 3.0);
    }
}
