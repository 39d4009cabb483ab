//! Quicksilver - liquid-metal blobs that chase the pointer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (blob attraction, field evaluation)
//! - `raster`: Software rasterizer over the metaball field
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Persisted user preferences
//! - `fps`: Frame-rate counter for the HUD

pub mod fps;
pub mod raster;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use fps::FpsCounter;
pub use raster::{Raster, RasterError};
pub use settings::{QualityPreset, Settings};
pub use sim::{SimConfig, Simulator};

use glam::Vec2;

/// Simulation and rendering constants
pub mod consts {
    /// Wall-clock tick period for the frame loop (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Capacity of the GPU blob array (uniform array length)
    pub const MAX_BLOBS: usize = 40;
    /// Blob radius in normalized screen units
    pub const BLOB_RADIUS: f32 = 0.02;

    /// Attraction distance is measured at twice the true separation.
    /// Tuning constant: changing it changes how the blobs feel.
    pub const DISTANCE_DETUNE: f32 = 2.0;

    /// Smooth-min blending width
    pub const SMOOTH_K: f32 = 0.1;
    /// Width of the anti-aliased edge band around d = 0
    pub const EDGE_WIDTH: f32 = 0.001;
    /// Field accumulator seed (far outside every blob)
    pub const FIELD_SENTINEL: f32 = 99.0;

    /// Blob fill color (linear RGB)
    pub const BLOB_COLOR: [f32; 3] = [0.0, 0.1, 0.3];
    /// Background clear color (linear RGB)
    pub const BACKGROUND: [f32; 3] = [1.0, 1.0, 1.0];
}

/// Convert a pixel position to normalized `[0,1]²` space (origin top-left)
#[inline]
pub fn pixel_to_normalized(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    if width <= 0.0 || height <= 0.0 {
        return Vec2::splat(0.5);
    }
    Vec2::new(x / width, y / height)
}

/// True if `p` lies inside the unit square (inclusive)
#[inline]
pub fn in_unit_square(p: Vec2) -> bool {
    (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_normalized() {
        let p = pixel_to_normalized(400.0, 150.0, 800.0, 600.0);
        assert_eq!(p, Vec2::new(0.5, 0.25));
    }

    #[test]
    fn test_pixel_to_normalized_empty_viewport() {
        assert_eq!(pixel_to_normalized(10.0, 10.0, 0.0, 600.0), Vec2::splat(0.5));
    }

    #[test]
    fn test_in_unit_square() {
        assert!(in_unit_square(Vec2::new(0.0, 1.0)));
        assert!(!in_unit_square(Vec2::new(-0.01, 0.5)));
        assert!(!in_unit_square(Vec2::new(0.5, 1.2)));
    }
}
