//! Deterministic simulation module
//!
//! Blob motion and metaball field evaluation. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by blob index)
//! - No rendering or platform dependencies

pub mod blob;
pub mod config;
pub mod sdf;
pub mod state;
pub mod tick;

pub use blob::{Blob, attraction};
pub use config::{ConfigError, ConfigResult, SimConfig};
pub use sdf::{
    BlobSample, FieldParams, FieldSample, coverage, field_value, sample, sd_blob, smooth_min,
    smoothstep,
};
pub use state::Simulator;
pub use tick::{FixedStep, TickInput, tick};
