//! Treasure Hunt - hold to run, dodge the dogs, grab the chest
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, session state machine)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser input plumbing
//! - `assets`: Sprite manifest (keys, paths, nominal sizes)
//! - `tuning`: Data-driven gameplay constants
//! - `settings`: Presentation preferences (LocalStorage)

pub mod assets;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per displayed frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Viewport used before the canvas reports a size
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1280.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 720.0;
}

/// Angle (radians) of the ray from `from` to `to`, screen coordinates (y down)
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
