/// Renderer-facing context (device/queue + target formats).
///
/// `depth_format` decides whether pipelines are built with a depth test.
/// When it is `Some`, every [`RenderTarget`] passed alongside must carry a
/// depth view of that format.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            depth_format: None,
        }
    }

    #[inline]
    pub fn with_depth(mut self, depth_format: wgpu::TextureFormat) -> Self {
        self.depth_format = Some(depth_format);
        self
    }
}

/// Target for drawing (encoder + color view, optional depth view).
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
    pub depth_view: Option<&'a wgpu::TextureView>,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self {
            encoder,
            color_view,
            depth_view: None,
        }
    }

    #[inline]
    pub fn with_depth(mut self, depth_view: &'a wgpu::TextureView) -> Self {
        self.depth_view = Some(depth_view);
        self
    }

    /// Fails when the depth configuration of `ctx` and this target disagree.
    pub(crate) fn check_depth(&self, ctx: &RenderCtx<'_>, label: &str) -> anyhow::Result<()> {
        anyhow::ensure!(
            ctx.depth_format.is_some() == self.depth_view.is_some(),
            "{label}: depth format configured = {}, depth view supplied = {}",
            ctx.depth_format.is_some(),
            self.depth_view.is_some(),
        );
        Ok(())
    }

    /// Begins a pass that loads and stores color (and depth, if present).
    ///
    /// Fails like [`RenderTarget::check_depth`].
    pub(crate) fn begin_pass(
        &mut self,
        ctx: &RenderCtx<'_>,
        label: &str,
    ) -> anyhow::Result<wgpu::RenderPass<'_>> {
        self.check_depth(ctx, label)?;

        let depth_stencil_attachment =
            self.depth_view.map(|view| wgpu::RenderPassDepthStencilAttachment {
                view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });

        Ok(self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        }))
    }
}
