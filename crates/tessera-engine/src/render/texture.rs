use anyhow::ensure;

/// Sampler configuration for [`Texture::from_rgba8`].
///
/// Defaults to nearest filtering with clamped edges, which keeps pixel art
/// and atlas cells from bleeding into their neighbours.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TextureOptions {
    pub filter: wgpu::FilterMode,
    pub address_mode: wgpu::AddressMode,
}

impl Default for TextureOptions {
    fn default() -> Self {
        Self {
            filter: wgpu::FilterMode::Nearest,
            address_mode: wgpu::AddressMode::ClampToEdge,
        }
    }
}

impl TextureOptions {
    #[inline]
    pub fn linear() -> Self {
        Self {
            filter: wgpu::FilterMode::Linear,
            ..Self::default()
        }
    }

    fn sampler_descriptor<'a>(&self, label: &'a str) -> wgpu::SamplerDescriptor<'a> {
        wgpu::SamplerDescriptor {
            label: Some(label),
            address_mode_u: self.address_mode,
            address_mode_v: self.address_mode,
            address_mode_w: self.address_mode,
            mag_filter: self.filter,
            min_filter: self.filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }
    }
}

/// Sampled 2D texture (view + sampler) consumed by the sprite renderers.
pub struct Texture {
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    size: (u32, u32),
}

impl Texture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Uploads tightly packed RGBA8 rows (`width * height * 4` bytes).
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        bytes: &[u8],
        options: TextureOptions,
    ) -> anyhow::Result<Self> {
        ensure!(width > 0 && height > 0, "{label}: texture size {width}x{height} is empty");
        let expected = width as usize * height as usize * 4;
        ensure!(
            bytes.len() == expected,
            "{label}: expected {expected} bytes of RGBA8 for {width}x{height}, got {}",
            bytes.len()
        );

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            size,
        );

        log::debug!("uploaded texture `{label}` ({width}x{height})");

        Ok(Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            sampler: device.create_sampler(&options.sampler_descriptor(label)),
            size: (width, height),
        })
    }

    /// 1x1 texture of a single color; with it a sprite draws as a flat tinted quad.
    pub fn from_color(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        rgba: [u8; 4],
    ) -> anyhow::Result<Self> {
        Self::from_rgba8(device, queue, label, 1, 1, &rgba, TextureOptions::default())
    }

    /// Wraps a texture the host created itself.
    #[inline]
    pub fn from_parts(view: wgpu::TextureView, sampler: wgpu::Sampler, size: (u32, u32)) -> Self {
        Self { view, sampler, size }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

/// Depth attachment matching pipelines built with [`DepthTexture::FORMAT`].
pub struct DepthTexture {
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl DepthTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessera depth texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            size: (width, height),
        }
    }

    /// Recreates the attachment when the surface size changed.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.size != (width.max(1), height.max(1)) {
            *self = Self::new(device, width, height);
        }
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_do_not_blend_neighbouring_texels() {
        let options = TextureOptions::default();
        assert_eq!(options.filter, wgpu::FilterMode::Nearest);
        assert_eq!(options.address_mode, wgpu::AddressMode::ClampToEdge);
    }

    #[test]
    fn sampler_descriptor_applies_options_to_every_axis() {
        let desc = TextureOptions {
            filter: wgpu::FilterMode::Linear,
            address_mode: wgpu::AddressMode::Repeat,
        }
        .sampler_descriptor("t");
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_w, wgpu::AddressMode::Repeat);
    }
}
