//! Spritesheet atlas math.
//!
//! An atlas is one texture split into a grid of equally sized frame cells.
//! Authoring tools describe it in pixels ([`AtlasLayout`]); the shading program
//! consumes the precomputed per-cell UV span ([`AtlasDescriptor`]). The
//! derivation between the two happens once, in [`AtlasDescriptor::from_layout`].
//!
//! Instances pick a cell with a [`FrameSelector`], which is resolved to a
//! [`GridCell`] before the UV remap.

mod descriptor;
mod error;
mod frame;

pub use descriptor::{AtlasDescriptor, AtlasLayout, AtlasUniform};
pub use error::AtlasError;
pub use frame::{FrameSelector, GridCell};
