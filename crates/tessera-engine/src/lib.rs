//! Tessera engine crate.
//!
//! GPU shading core for three 2D draw kinds: textured sprites, atlas
//! (spritesheet) sprites and bordered circles. Every shader stage has a
//! pure-Rust reference in `shading` with identical arithmetic.

pub mod logging;
pub mod coords;
pub mod camera;
pub mod atlas;
pub mod shading;
pub mod render;
