//! Fixed-step frame pacing
//!
//! Turns variable requestAnimationFrame deltas into whole simulation ticks.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta taken into account (s)
const MAX_FRAME_DT: f32 = 0.1;

/// Accumulates frame time and hands out fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    /// Add one frame's elapsed seconds; returns how many ticks to run now
    ///
    /// At most `MAX_SUBSTEPS` per frame. When that cap is hit the backlog is
    /// dropped, so sustained slow frames run slower instead of falling behind.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut ticks = 0;
        while self.accumulator >= SIM_DT && ticks < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            ticks += 1;
        }
        if ticks == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        ticks
    }

    /// Unsimulated time carried into the next frame (s)
    pub fn backlog(&self) -> f32 {
        self.accumulator
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
