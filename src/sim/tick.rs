//! Fixed timestep simulation tick
//!
//! The frame loop snapshots the latest pointer target into a `TickInput`
//! and advances the simulator by whole ticks.

use glam::Vec2;

use super::state::Simulator;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input for a single tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Pointer position in normalized `[0,1]²` space
    pub target: Vec2,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            target: Vec2::splat(0.5),
        }
    }
}

/// Advance the simulator by one fixed step
///
/// The target is read once, so every blob in this tick sees the same value.
pub fn tick(sim: &mut Simulator, input: &TickInput) {
    let target = input.target;
    sim.step(target);
}

/// Accumulates frame time and hands out whole ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame delta (seconds); returns how many ticks to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() { dt.clamp(0.0, 0.1) } else { 0.0 };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop backlog we refused to simulate
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Leftover time, in seconds
    pub fn remainder(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_BLOBS;
    use crate::sim::SimConfig;

    #[test]
    fn test_tick_moves_blobs() {
        let mut sim = Simulator::new(SimConfig::default(), 5, MAX_BLOBS, 12345).unwrap();
        let before = sim.snapshot();
        tick(&mut sim, &TickInput::default());
        assert_ne!(before, sim.snapshot());
    }

    #[test]
    fn test_determinism() {
        // Two simulators with the same seed and inputs stay identical
        let mut sim1 = Simulator::new(SimConfig::default(), MAX_BLOBS, MAX_BLOBS, 99999).unwrap();
        let mut sim2 = Simulator::new(SimConfig::default(), MAX_BLOBS, MAX_BLOBS, 99999).unwrap();

        let targets = [
            Vec2::new(0.1, 0.2),
            Vec2::new(0.9, 0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(0.0, 1.0),
        ];
        for i in 0..400 {
            let input = TickInput {
                target: targets[(i / 100) % targets.len()],
            };
            tick(&mut sim1, &input);
            tick(&mut sim2, &input);
        }

        assert_eq!(sim1.blobs(), sim2.blobs());
    }

    #[test]
    fn test_long_run_stays_bounded() {
        let config = SimConfig::default();
        let mut sim = Simulator::new(config, MAX_BLOBS, MAX_BLOBS, 2024).unwrap();
        for i in 0..2000 {
            let t = i as f32 * 0.01;
            let input = TickInput {
                target: Vec2::new(0.5 + 0.4 * t.cos(), 0.5 + 0.4 * t.sin()),
            };
            tick(&mut sim, &input);
        }
        for blob in sim.blobs() {
            assert!(blob.velocity().length() <= config.max_speed + 1e-6);
            // At most one step's displacement outside the square
            let slack = config.max_speed * config.time_step + 1e-6;
            let p = blob.position();
            assert!(p.x >= -slack && p.x <= 1.0 + slack, "x = {}", p.x);
            assert!(p.y >= -slack && p.y <= 1.0 + slack, "y = {}", p.y);
        }
    }

    #[test]
    fn test_fixed_step_accumulates() {
        let mut clock = FixedStep::new();
        assert_eq!(clock.advance(SIM_DT * 0.5), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
        assert!(clock.remainder() < SIM_DT);
    }

    #[test]
    fn test_fixed_step_caps_substeps() {
        let mut clock = FixedStep::new();
        // 0.1 s would be 6 ticks at 60 Hz
        assert_eq!(clock.advance(5.0), MAX_SUBSTEPS);
        assert!(clock.remainder() <= SIM_DT);

        let mut clock = FixedStep::new();
        let mut total = 0;
        for _ in 0..4 {
            total += clock.advance(0.1);
        }
        assert!(total <= 4 * MAX_SUBSTEPS);
        assert!(clock.remainder() <= SIM_DT);
    }

    #[test]
    fn test_fixed_step_ignores_bad_dt() {
        let mut clock = FixedStep::new();
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(-1.0), 0);
        assert_eq!(clock.remainder(), 0.0);
        clock.advance(SIM_DT * 0.5);
        clock.reset();
        assert_eq!(clock.remainder(), 0.0);
    }
}
