//! WebGPU rendering module
//!
//! Uses SDF (Signed Distance Fields) for all rendering in the fragment shader.
//! Each sprite key has a procedural shape; no textures are sampled.

pub mod frame;
pub mod sdf_pipeline;

pub use frame::{Frame, MAX_SPRITES};
pub use sdf_pipeline::SdfRenderState;
