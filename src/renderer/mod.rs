//! WebGPU rendering module
//!
//! A single flat-color triangle pipeline; the scene is rebuilt as a vertex
//! list each frame from the simulation state.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
