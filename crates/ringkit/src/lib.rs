//! Geometry, state and rendering for the ring puzzles.

#[macro_use]
pub mod macros;

pub mod color;
pub mod geom;
pub mod passivegram;
pub mod puzzle;
pub mod rotation;
pub mod scene;
pub mod svg;
pub mod text;
pub mod vocab;
