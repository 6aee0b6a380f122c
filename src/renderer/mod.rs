//! WebGPU rendering module
//!
//! `scene` builds a triangle list from a snapshot; `pipeline` draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
