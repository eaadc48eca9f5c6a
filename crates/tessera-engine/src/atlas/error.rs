/// Atlas descriptor violations caught at derivation time.
///
/// The shading program performs modulo and division by these values, so they
/// are rejected here rather than defended against per pixel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AtlasError {
    #[error("atlas must contain at least one frame")]
    NoFrames,

    #[error("frames per row must be greater than zero")]
    NoColumns,

    #[error("total rows must be greater than zero")]
    NoRows,

    #[error("frame size must be non-zero (got {width}x{height} px)")]
    EmptyFrame { width: u32, height: u32 },

    #[error("cell UV span must be finite and positive (got {width} x {height})")]
    InvalidSpan { width: f32, height: f32 },
}
