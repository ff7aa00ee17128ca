//! WebGPU rendering module
//!
//! Turns simulation snapshots into flat-coloured triangles.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
