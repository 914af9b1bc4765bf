//! Marker rendering
//!
//! `MarkerLayer` is the retained draw surface the simulation writes to;
//! `RenderState` draws it with WebGPU.

pub mod markers;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use markers::{Marker, MarkerLayer};
pub use pipeline::RenderState;
