//! WebGPU rendering module
//!
//! Flat-colored triangles in screen pixels, rebuilt from a
//! [`RenderSnapshot`](crate::sim::RenderSnapshot) every frame.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
