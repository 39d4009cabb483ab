//! Metaball field evaluation
//!
//! Each blob contributes a circle SDF; the SDFs are folded together with a
//! polynomial smooth minimum so nearby blobs fuse into one silhouette. The
//! functions here are pure: safe to call per pixel from any thread.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{EDGE_WIDTH, FIELD_SENTINEL, MAX_BLOBS, SMOOTH_K};

/// Position and radius of one blob, as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlobSample {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

impl BlobSample {
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Field shaping parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    /// Viewport width / height
    pub aspect: f32,
    /// Smooth-min blending width
    pub k: f32,
    /// Anti-aliasing band around the surface
    pub edge_width: f32,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            aspect: 1.0,
            k: SMOOTH_K,
            edge_width: EDGE_WIDTH,
        }
    }
}

impl FieldParams {
    /// Params for a viewport of the given pixel size
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let aspect = if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        };
        Self {
            aspect,
            ..Self::default()
        }
    }
}

/// Field value and visible coverage at one sample point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    /// Signed field value, `<= 0` inside the merged shape
    pub value: f32,
    /// Opacity in [0, 1]
    pub coverage: f32,
}

/// Signed distance to a blob, with x stretched by the aspect ratio so the
/// blob stays circular on non-square viewports
#[inline]
pub fn sd_blob(p: Vec2, blob: &BlobSample, aspect: f32) -> f32 {
    let mut diff = blob.center() - p;
    diff.x *= aspect;
    diff.length() - blob.radius
}

/// Polynomial smooth minimum
///
/// Equal to `min(a, b)` when the inputs are more than `k` apart, and never
/// greater than it. `k <= 0` is the hard minimum.
#[inline]
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    if k <= 0.0 {
        return a.min(b);
    }
    let h = (0.5 + 0.5 * (a - b) / k).clamp(0.0, 1.0);
    lerp(a, b, h) - k * h * (1.0 - h)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep, GLSL semantics
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Merged field value at `p` over the first `active_count` blobs
///
/// Blobs past `active_count` (or past `MAX_BLOBS`) are ignored.
pub fn field_value(p: Vec2, blobs: &[BlobSample], active_count: usize, params: &FieldParams) -> f32 {
    let count = active_count.min(blobs.len()).min(MAX_BLOBS);
    blobs[..count].iter().fold(FIELD_SENTINEL, |d, blob| {
        smooth_min(d, sd_blob(p, blob, params.aspect), params.k)
    })
}

/// Coverage for a field value: 1 inside, 0 outside, smooth across the edge band
#[inline]
pub fn coverage(d: f32, edge_width: f32) -> f32 {
    1.0 - smoothstep(0.0, edge_width, d)
}

/// Evaluate value and coverage together
pub fn sample(p: Vec2, blobs: &[BlobSample], active_count: usize, params: &FieldParams) -> FieldSample {
    let value = field_value(p, blobs, active_count, params);
    FieldSample {
        value,
        coverage: coverage(value, params.edge_width),
    }
}
