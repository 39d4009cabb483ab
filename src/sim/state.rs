//! Simulator state
//!
//! Owns the blob bodies and the one config they all share. Capacity is fixed
//! at construction; requests beyond it are truncated, matching how the GPU
//! blob array drops anything past `MAX_BLOBS`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::blob::Blob;
use super::config::{ConfigResult, SimConfig};
use super::sdf::BlobSample;
use crate::consts::{BLOB_RADIUS, MAX_BLOBS};

/// Bounded collection of blobs plus their shared parameters
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimConfig,
    blobs: Vec<Blob>,
    capacity: usize,
}

impl Simulator {
    /// Spawn `count` blobs from `seed`
    ///
    /// Positions are uniform in the unit square and velocity components
    /// uniform in `[0, max_speed)`, clamped so every blob starts within the
    /// speed limit.
    pub fn new(config: SimConfig, count: usize, capacity: usize, seed: u64) -> ConfigResult<Self> {
        config.validate()?;
        let capacity = clamp_capacity(capacity);
        let count = truncate_count(count, capacity);

        let mut rng = Pcg32::seed_from_u64(seed);
        let blobs = (0..count)
            .map(|_| {
                let position = Vec2::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
                let velocity = Vec2::new(
                    rng.random_range(0.0..config.max_speed),
                    rng.random_range(0.0..config.max_speed),
                )
                .clamp_length_max(config.max_speed);
                Blob::new(position, velocity, BLOB_RADIUS)
            })
            .collect::<Vec<_>>();

        log::info!(
            "Simulator created: {} blobs (capacity {}), seed {}",
            blobs.len(),
            capacity,
            seed
        );

        Ok(Self {
            config,
            blobs,
            capacity,
        })
    }

    /// Build from explicit initial bodies
    pub fn from_blobs(config: SimConfig, mut blobs: Vec<Blob>, capacity: usize) -> ConfigResult<Self> {
        config.validate()?;
        let capacity = clamp_capacity(capacity);
        blobs.truncate(truncate_count(blobs.len(), capacity));
        Ok(Self {
            config,
            blobs,
            capacity,
        })
    }

    /// Add a blob; ignored (returns false) once at capacity
    pub fn push(&mut self, blob: Blob) -> bool {
        if self.blobs.len() >= self.capacity {
            log::trace!("Blob dropped, simulator at capacity {}", self.capacity);
            return false;
        }
        self.blobs.push(blob);
        true
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of blobs the field evaluator should read
    pub fn active_count(&self) -> usize {
        self.blobs.len().min(self.capacity)
    }

    /// `(x, y, radius)` for each active blob, in index order
    pub fn snapshot(&self) -> Vec<BlobSample> {
        self.blobs[..self.active_count()]
            .iter()
            .map(|b| BlobSample {
                x: b.position().x,
                y: b.position().y,
                radius: b.radius(),
            })
            .collect()
    }

    /// Advance every blob one step toward the same target
    #[cfg(not(feature = "parallel"))]
    pub fn step(&mut self, target: Vec2) {
        let config = self.config;
        for blob in &mut self.blobs {
            blob.update(target, &config);
        }
    }

    /// Advance every blob one step toward the same target
    #[cfg(feature = "parallel")]
    pub fn step(&mut self, target: Vec2) {
        use rayon::prelude::*;

        let config = self.config;
        self.blobs
            .par_iter_mut()
            .for_each(|blob| blob.update(target, &config));
    }
}

fn clamp_capacity(capacity: usize) -> usize {
    if capacity > MAX_BLOBS {
        log::warn!("Capacity {} exceeds MAX_BLOBS, using {}", capacity, MAX_BLOBS);
    }
    capacity.min(MAX_BLOBS)
}

fn truncate_count(count: usize, capacity: usize) -> usize {
    if count > capacity {
        log::warn!("Requested {} blobs, truncating to {}", count, capacity);
    }
    count.min(capacity)
}
