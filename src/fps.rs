//! Frame-rate counter
//!
//! Counts frames seen in the trailing one-second window.

use std::collections::VecDeque;

const WINDOW_MS: f64 = 1000.0;

#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    times: VecDeque<f64>,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame at `now_ms` and return frames in the last second
    pub fn tick(&mut self, now_ms: f64) -> u32 {
        while self
            .times
            .front()
            .is_some_and(|&t| t <= now_ms - WINDOW_MS)
        {
            self.times.pop_front();
        }
        self.times.push_back(now_ms);
        self.times.len() as u32
    }

    /// Current rate without recording a frame
    pub fn fps(&self) -> u32 {
        self.times.len() as u32
    }
}
