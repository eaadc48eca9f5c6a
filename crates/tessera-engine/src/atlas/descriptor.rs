use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::{AtlasError, FrameSelector, GridCell};

/// Authoring-time atlas description, in frame counts and pixels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AtlasLayout {
    pub total_frames: u32,
    pub frames_per_row: u32,
    pub total_rows: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl AtlasLayout {
    /// Layout with just enough rows to hold `total_frames`.
    pub fn packed(
        total_frames: u32,
        frames_per_row: u32,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        let total_rows = if frames_per_row == 0 {
            0
        } else {
            total_frames.div_ceil(frames_per_row)
        };
        Self {
            total_frames,
            frames_per_row,
            total_rows,
            frame_width,
            frame_height,
        }
    }

    /// Full atlas texture size in pixels.
    #[inline]
    pub fn texture_size(&self) -> (u64, u64) {
        (
            self.frame_width as u64 * self.frames_per_row as u64,
            self.frame_height as u64 * self.total_rows as u64,
        )
    }
}

/// Canonical atlas descriptor consumed by the atlas sprite program.
///
/// `sample_width` / `sample_height` are the UV span of one cell; they are
/// precomputed so the fragment stage never divides.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AtlasDescriptor {
    total_frames: u32,
    frames_per_row: u32,
    sample_width: f32,
    sample_height: f32,
}

impl AtlasDescriptor {
    /// Builds a descriptor from an already-known cell span.
    ///
    /// A span that does not tile the texture exactly is accepted; it shows as
    /// neighbouring cells bleeding in, not as an error.
    pub fn new(
        total_frames: u32,
        frames_per_row: u32,
        sample_width: f32,
        sample_height: f32,
    ) -> Result<Self, AtlasError> {
        if total_frames == 0 {
            return Err(AtlasError::NoFrames);
        }
        if frames_per_row == 0 {
            return Err(AtlasError::NoColumns);
        }
        let span_ok = |s: f32| s.is_finite() && s > 0.0;
        if !span_ok(sample_width) || !span_ok(sample_height) {
            return Err(AtlasError::InvalidSpan {
                width: sample_width,
                height: sample_height,
            });
        }

        let row_coverage = frames_per_row as f32 * sample_width;
        if (row_coverage - 1.0).abs() > 1e-4 {
            log::debug!(
                "atlas row covers {row_coverage} of the texture width; neighbouring cells may bleed"
            );
        }

        Ok(Self {
            total_frames,
            frames_per_row,
            sample_width,
            sample_height,
        })
    }

    /// Derives the cell span from an authoring layout.
    pub fn from_layout(layout: &AtlasLayout) -> Result<Self, AtlasError> {
        if layout.total_frames == 0 {
            return Err(AtlasError::NoFrames);
        }
        if layout.frames_per_row == 0 {
            return Err(AtlasError::NoColumns);
        }
        if layout.total_rows == 0 {
            return Err(AtlasError::NoRows);
        }
        if layout.frame_width == 0 || layout.frame_height == 0 {
            return Err(AtlasError::EmptyFrame {
                width: layout.frame_width,
                height: layout.frame_height,
            });
        }

        let capacity = layout.frames_per_row as u64 * layout.total_rows as u64;
        if (layout.total_frames as u64) > capacity {
            log::warn!(
                "atlas declares {} frames but its {}x{} grid holds {capacity}; \
                 trailing frames sample outside the texture",
                layout.total_frames,
                layout.frames_per_row,
                layout.total_rows,
            );
        }

        let (texture_width, texture_height) = layout.texture_size();
        let sample_width = layout.frame_width as f32 / texture_width as f32;
        let sample_height = layout.frame_height as f32 / texture_height as f32;

        Self::new(layout.total_frames, layout.frames_per_row, sample_width, sample_height)
    }

    #[inline]
    pub fn total_frames(&self) -> u32 {
        self.total_frames
    }

    #[inline]
    pub fn frames_per_row(&self) -> u32 {
        self.frames_per_row
    }

    #[inline]
    pub fn sample_size(&self) -> Vec2 {
        Vec2::new(self.sample_width, self.sample_height)
    }

    #[inline]
    pub fn resolve(&self, frame: FrameSelector) -> GridCell {
        frame.resolve(self.total_frames, self.frames_per_row)
    }

    /// Remaps a quad UV (spanning one cell, `[0,1]²`) into atlas UV space.
    #[inline]
    pub fn cell_uv(&self, cell: GridCell, uv: Vec2) -> Vec2 {
        let span = self.sample_size();
        let origin = Vec2::new(cell.x as f32, cell.y as f32);
        uv * span + origin * span
    }

    #[inline]
    pub fn frame_uv(&self, frame: FrameSelector, uv: Vec2) -> Vec2 {
        self.cell_uv(self.resolve(frame), uv)
    }

    #[inline]
    pub fn uniform(&self) -> AtlasUniform {
        AtlasUniform::from(self)
    }
}

/// Atlas uniform layout (16 bytes, group 1 binding 2):
///
///  offset  0  total_frames    u32
///  offset  4  frames_per_row  u32
///  offset  8  sample_size     vec2<f32>
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct AtlasUniform {
    pub total_frames: u32,
    pub frames_per_row: u32,
    pub sample_size: [f32; 2],
}

impl From<&AtlasDescriptor> for AtlasUniform {
    fn from(d: &AtlasDescriptor) -> Self {
        Self {
            total_frames: d.total_frames,
            frames_per_row: d.frames_per_row,
            sample_size: [d.sample_width, d.sample_height],
        }
    }
}
