/// Grid coordinates of a frame cell: column `x`, row `y` (row 0 at the top).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub x: u32,
    pub y: u32,
}

impl GridCell {
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Per-instance animation frame selector.
///
/// Both shapes resolve to the same [`GridCell`] before the UV remap.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FrameSelector {
    /// Flattened frame index. Wraps modulo the atlas frame count, so looping
    /// animations can keep incrementing without clamping.
    Scalar(u32),
    /// Explicit cell, used as-is (no wrapping).
    Grid { x: u32, y: u32 },
}

impl Default for FrameSelector {
    fn default() -> Self {
        FrameSelector::Scalar(0)
    }
}

impl FrameSelector {
    /// Discriminant written to the GPU instance (`frame_kind`).
    pub const KIND_SCALAR: u32 = 0;
    pub const KIND_GRID: u32 = 1;

    /// Resolves to a grid cell.
    ///
    /// Precondition: `total_frames > 0` and `frames_per_row > 0`; guaranteed
    /// when the values come from an [`AtlasDescriptor`](super::AtlasDescriptor).
    #[inline]
    pub fn resolve(self, total_frames: u32, frames_per_row: u32) -> GridCell {
        match self {
            FrameSelector::Scalar(frame) => {
                let f = frame % total_frames;
                GridCell::new(f % frames_per_row, f / frames_per_row)
            }
            FrameSelector::Grid { x, y } => GridCell::new(x, y),
        }
    }

    /// `(frame, frame_kind)` as packed into the atlas sprite instance buffer.
    #[inline]
    pub fn to_raw(self) -> ([u32; 2], u32) {
        match self {
            FrameSelector::Scalar(frame) => ([frame, 0], Self::KIND_SCALAR),
            FrameSelector::Grid { x, y } => ([x, y], Self::KIND_GRID),
        }
    }
}

impl From<u32> for FrameSelector {
    #[inline]
    fn from(frame: u32) -> Self {
        FrameSelector::Scalar(frame)
    }
}

impl From<GridCell> for FrameSelector {
    #[inline]
    fn from(cell: GridCell) -> Self {
        FrameSelector::Grid { x: cell.x, y: cell.y }
    }
}
