//! Shared GPU types and utilities used by all shape renderers.

use std::marker::PhantomData;
use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::shader;
use crate::render::{DrawKind, RenderCtx};
use crate::shading::{QUAD_CORNERS, QUAD_INDICES, QUAD_UVS};

// ── quad vertices ─────────────────────────────────────────────────────────

/// Unit quad corner, centered on the origin (circle).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Unit quad corner with its texture coordinate (sprite, atlas sprite).
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct TexturedQuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl TexturedQuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x2  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedQuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

pub(super) const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { position: QUAD_CORNERS[0] },
    QuadVertex { position: QUAD_CORNERS[1] },
    QuadVertex { position: QUAD_CORNERS[2] },
    QuadVertex { position: QUAD_CORNERS[3] },
];

pub(super) const TEXTURED_QUAD_VERTICES: [TexturedQuadVertex; 4] = [
    TexturedQuadVertex { position: QUAD_CORNERS[0], uv: QUAD_UVS[0] },
    TexturedQuadVertex { position: QUAD_CORNERS[1], uv: QUAD_UVS[1] },
    TexturedQuadVertex { position: QUAD_CORNERS[2], uv: QUAD_UVS[2] },
    TexturedQuadVertex { position: QUAD_CORNERS[3], uv: QUAD_UVS[3] },
];

pub(super) const QUAD_INDEX_COUNT: u32 = QUAD_INDICES.len() as u32;

/// Static vertex + index buffers for the unit quad.
pub(super) struct QuadBuffers {
    pub vbo: wgpu::Buffer,
    pub ibo: wgpu::Buffer,
}

impl QuadBuffers {
    pub fn new<V: Pod>(device: &wgpu::Device, label: &str, vertices: &[V]) -> Self {
        Self {
            vbo: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} quad vbo")),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            ibo: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} quad ibo")),
                contents: bytemuck::cast_slice(&QUAD_INDICES),
                usage: wgpu::BufferUsages::INDEX,
            }),
        }
    }
}

// ── instance ring ─────────────────────────────────────────────────────────

/// Append-only instance storage for one frame.
///
/// `queue.write_buffer` lands at the next submit, before any recorded pass
/// runs. Each batch therefore gets its own range instead of reusing offset 0,
/// and [`InstanceBuffer::reset`] is only called once the frame is submitted.
pub(super) struct InstanceBuffer<T> {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    slots: InstanceSlots,
    _marker: PhantomData<T>,
}

impl<T: Pod> InstanceBuffer<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            slots: InstanceSlots::default(),
            _marker: PhantomData,
        }
    }

    pub fn reset(&mut self) {
        self.slots.reset();
    }

    /// Writes `data` behind the previous batches and returns its instance range.
    ///
    /// When the buffer is full a new one replaces it; passes already
    /// recorded keep the old buffer alive until they have executed.
    pub fn push(&mut self, ctx: &RenderCtx<'_>, data: &[T]) -> Range<u32> {
        let (grown, range) = self.slots.reserve(data.len());
        if let Some(capacity) = grown {
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: (capacity * std::mem::size_of::<T>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            log::debug!("{}: allocated {capacity} instances", self.label);
        }

        if let Some(buffer) = self.buffer.as_ref() {
            let offset = range.start as u64 * std::mem::size_of::<T>() as u64;
            ctx.queue.write_buffer(buffer, offset, bytemuck::cast_slice(data));
        }
        range
    }

    #[inline]
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }
}

/// Slot bookkeeping behind [`InstanceBuffer`].
///
/// A replacement buffer only has to hold the batch that triggered it; the
/// batches before it stay in the old buffer. The next frame is sized from the
/// previous frame's total, so a steady workload stops reallocating after one
/// frame. Without `reset` capacity stays bounded by the largest batch and
/// that total.
#[derive(Debug, Default)]
struct InstanceSlots {
    capacity: usize,
    len: usize,
    frame_total: usize,
    last_frame_total: usize,
}

impl InstanceSlots {
    const MIN_CAPACITY: usize = 64;

    fn reset(&mut self) {
        if self.frame_total > self.capacity {
            // Forces the first batch of the next frame to allocate room for a whole frame.
            self.capacity = 0;
        }
        self.last_frame_total = self.frame_total;
        self.frame_total = 0;
        self.len = 0;
    }

    /// Reserves `count` slots. Returns the capacity of a new buffer when one
    /// is needed, and the reserved range.
    fn reserve(&mut self, count: usize) -> (Option<usize>, Range<u32>) {
        let mut grown = None;
        if self.capacity == 0 || self.len + count > self.capacity {
            let capacity = count
                .max(self.last_frame_total)
                .next_power_of_two()
                .max(Self::MIN_CAPACITY);
            self.capacity = capacity;
            self.len = 0;
            grown = Some(capacity);
        }

        let start = self.len;
        self.len += count;
        self.frame_total += count;
        (grown, start as u32..self.len as u32)
    }
}

// ── pipeline ──────────────────────────────────────────────────────────────

/// Color + optional depth formats a pipeline was built for.
pub(super) type PipelineKey = (wgpu::TextureFormat, Option<wgpu::TextureFormat>);

#[inline]
pub(super) fn pipeline_key(ctx: &RenderCtx<'_>) -> PipelineKey {
    (ctx.surface_format, ctx.depth_format)
}

/// Validates the program for `kind` and builds its render pipeline.
///
/// Straight-alpha output is blended with `ALPHA_BLENDING`. With a depth
/// format the pipeline writes depth and keeps the nearer fragment.
pub(super) fn build_pipeline(
    ctx: &RenderCtx<'_>,
    kind: DrawKind,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> anyhow::Result<wgpu::RenderPipeline> {
    shader::validate(kind)?;

    let label = kind.label();
    let module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("tessera {label} shader")),
        source: wgpu::ShaderSource::Wgsl(kind.shader_source().into()),
    });

    let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("tessera {label} pipeline layout")),
        bind_group_layouts,
        immediate_size: 0,
    });

    let depth_stencil = ctx.depth_format.map(|format| wgpu::DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    });

    let buffers = kind.vertex_layouts();
    let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("tessera {label} pipeline")),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(shader::VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(shader::FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    log::debug!(
        "built {label} pipeline for {:?} (depth {:?})",
        ctx.surface_format,
        ctx.depth_format
    );
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::quad_world_position;
    use glam::Vec2;

    #[test]
    fn quad_vertices_follow_shared_corner_table() {
        for (i, v) in TEXTURED_QUAD_VERTICES.iter().enumerate() {
            assert_eq!(v.position, QUAD_VERTICES[i].position);
            assert_eq!(v.uv, QUAD_UVS[i]);
        }
    }

    #[test]
    fn quad_is_unit_sized_and_centered() {
        let world: Vec<Vec2> = QUAD_VERTICES
            .iter()
            .map(|v| quad_world_position(Vec2::from(v.position), Vec2::ONE, Vec2::ZERO))
            .collect();
        let min = world.iter().copied().reduce(Vec2::min).unwrap();
        let max = world.iter().copied().reduce(Vec2::max).unwrap();
        assert_eq!(min, Vec2::splat(-0.5));
        assert_eq!(max, Vec2::splat(0.5));
    }

    #[test]
    fn top_left_corner_samples_uv_origin() {
        let top_left = TEXTURED_QUAD_VERTICES
            .iter()
            .find(|v| v.position == [-0.5, 0.5])
            .unwrap();
        assert_eq!(top_left.uv, [0.0, 0.0]);
    }

    #[test]
    fn batches_in_one_frame_get_disjoint_ranges() {
        let mut slots = InstanceSlots::default();
        assert_eq!(slots.reserve(10), (Some(64), 0..10));
        assert_eq!(slots.reserve(20), (None, 10..30));
    }

    #[test]
    fn replacement_buffer_holds_only_the_new_batch() {
        let mut slots = InstanceSlots::default();
        assert_eq!(slots.reserve(100), (Some(128), 0..100));
        assert_eq!(slots.reserve(100), (Some(128), 0..100));
    }

    #[test]
    fn capacity_stays_bounded_without_reset() {
        let mut slots = InstanceSlots::default();
        for _ in 0..32 {
            slots.reserve(100);
            assert!(slots.capacity <= 128, "capacity {}", slots.capacity);
        }
    }

    #[test]
    fn steady_frames_stop_reallocating() {
        let mut slots = InstanceSlots::default();
        slots.reserve(100);
        slots.reserve(100);
        slots.reset();

        assert_eq!(slots.reserve(100), (Some(256), 0..100));
        assert_eq!(slots.reserve(100), (None, 100..200));
        slots.reset();

        assert_eq!(slots.reserve(100), (None, 0..100));
        assert_eq!(slots.reserve(100), (None, 100..200));
        assert_eq!(slots.capacity, 256);
    }

    #[test]
    fn vertex_strides_match_struct_sizes() {
        assert_eq!(QuadVertex::layout().array_stride, 8);
        assert_eq!(TexturedQuadVertex::layout().array_stride, 16);
        assert_eq!(QUAD_INDEX_COUNT, 6);
    }
}
