//! WebGPU rendering module
//!
//! Evaluates the metaball field per pixel in the fragment shader.

pub mod sdf_pipeline;

pub use sdf_pipeline::{BlobData, Globals, MetaballRenderState, pack_blobs};
