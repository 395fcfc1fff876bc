//! Rendering
//!
//! Entities draw through [`DrawTarget`]; [`ShapeBatch`] turns the calls into
//! colored triangles that [`RenderState`] uploads with WebGPU (or WebGL2).

pub mod draw;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use draw::{DrawTarget, ShapeBatch};
pub use pipeline::RenderState;
pub use vertex::{Rgba, Vertex, colors, rgba, with_alpha};
