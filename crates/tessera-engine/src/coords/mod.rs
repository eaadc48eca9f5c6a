//! Coordinate and color types shared by the camera, the shading reference
//! functions and the renderers.
//!
//! World space:
//! - arbitrary world units (the camera decides the pixel mapping)
//! - +X right, +Y up
//!
//! Vector and matrix math uses `glam`.

mod color;
mod viewport;

pub use color::ColorRgba;
pub use viewport::Viewport;
