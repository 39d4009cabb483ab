//! Software rasterizer for the metaball field
//!
//! Samples the field at every pixel centre on the CPU. Row 0 is the top of
//! the image, which is the orientation pointer coordinates use, so blob
//! positions go in unflipped.

use glam::Vec2;
use thiserror::Error;

use crate::consts::{BACKGROUND, BLOB_COLOR};
use crate::sim::{BlobSample, FieldParams, sample};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("Raster has no area: {width}x{height}")]
    EmptyTarget { width: u32, height: u32 },

    #[error("Output buffer holds {actual} samples, raster needs {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type RasterResult<T> = Result<T, RasterError>;

/// A fixed-size coverage raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::EmptyTarget { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field params matching this raster's aspect ratio
    pub fn field_params(&self) -> FieldParams {
        FieldParams::for_viewport(self.width, self.height)
    }

    /// Normalized sample point for a pixel centre
    #[inline]
    pub fn pixel_center(&self, px: u32, py: u32) -> Vec2 {
        Vec2::new(
            (px as f32 + 0.5) / self.width as f32,
            (py as f32 + 0.5) / self.height as f32,
        )
    }

    /// Coverage per pixel, row-major
    pub fn coverage(&self, blobs: &[BlobSample], params: &FieldParams) -> Vec<f32> {
        let mut out = vec![0.0; self.len()];
        self.fill_rows(blobs, params, &mut out);
        out
    }

    /// Coverage into a caller-owned buffer
    pub fn coverage_into(
        &self,
        blobs: &[BlobSample],
        params: &FieldParams,
        out: &mut [f32],
    ) -> RasterResult<()> {
        if out.len() != self.len() {
            return Err(RasterError::SizeMismatch {
                expected: self.len(),
                actual: out.len(),
            });
        }
        self.fill_rows(blobs, params, out);
        Ok(())
    }

    fn fill_row(&self, py: u32, blobs: &[BlobSample], params: &FieldParams, row: &mut [f32]) {
        for (px, value) in row.iter_mut().enumerate() {
            let p = self.pixel_center(px as u32, py);
            *value = sample(p, blobs, blobs.len(), params).coverage;
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn fill_rows(&self, blobs: &[BlobSample], params: &FieldParams, out: &mut [f32]) {
        for (py, row) in out.chunks_mut(self.width as usize).enumerate() {
            self.fill_row(py as u32, blobs, params, row);
        }
    }

    #[cfg(feature = "parallel")]
    fn fill_rows(&self, blobs: &[BlobSample], params: &FieldParams, out: &mut [f32]) {
        use rayon::prelude::*;

        out.par_chunks_mut(self.width as usize)
            .enumerate()
            .for_each(|(py, row)| self.fill_row(py as u32, blobs, params, row));
    }
}

/// Composite the blob color over the background, 8-bit RGBA
pub fn to_rgba8(coverage: &[f32]) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(coverage.len() * 4);
    for &alpha in coverage {
        let alpha = alpha.clamp(0.0, 1.0);
        for channel in 0..3 {
            let c = BACKGROUND[channel] + (BLOB_COLOR[channel] - BACKGROUND[channel]) * alpha;
            pixels.push((c * 255.0).round() as u8);
        }
        pixels.push(255);
    }
    pixels
}

/// Fraction of the raster covered by the shape
pub fn covered_fraction(coverage: &[f32]) -> f32 {
    if coverage.is_empty() {
        return 0.0;
    }
    coverage.iter().sum::<f32>() / coverage.len() as f32
}
