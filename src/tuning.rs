//! Data-driven gameplay constants
//!
//! Everything the session needs to build a world and run it lives here, so a
//! JSON blob can override any of it. Missing fields keep their defaults.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fall speed range {min}..={max} is empty")]
    EmptyFallRange { min: u32, max: u32 },
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("obstacle spacing {0} is below {min} px", min = MIN_OBSTACLE_SPACING)]
    SpacingTooSmall(f32),
    #[error("default obstacle count must be at least 1")]
    NoDefaultObstacles,
}

/// Narrowest obstacle spacing a tuning may ask for (px)
pub const MIN_OBSTACLE_SPACING: f32 = 1.0;

/// Gameplay balance and layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Rightward speed while the pointer is held (px/s)
    pub player_speed: f32,
    /// Slowest obstacle fall speed sampled each tick (px/s, inclusive)
    pub fall_speed_min: u32,
    /// Fastest obstacle fall speed sampled each tick (px/s, inclusive)
    pub fall_speed_max: u32,

    /// Viewport width per obstacle when deriving the spawn count
    pub obstacle_spacing: f32,
    /// Spawn count when the width yields zero obstacles
    pub default_obstacle_count: usize,
    /// First obstacle position
    pub obstacle_start: [f32; 2],
    /// Horizontal gap between consecutive obstacles
    pub obstacle_step_x: f32,

    /// Scenery repeats this many viewport widths to the right
    pub scenery_columns: u32,

    /// Camera shake on obstacle hit (ms)
    pub shake_duration_ms: f32,
    /// Shake amplitude as a fraction of the viewport
    pub shake_intensity: f32,
    /// Fade-out before restart (ms)
    pub fade_duration_ms: f32,
    /// Fade target colour (RGB, 0-255)
    pub fade_color: [u8; 3],

    /// On-screen instruction while idle
    pub prompt: String,
    /// Notification shown when the treasure is reached
    pub treasure_message: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 300.0,
            fall_speed_min: 50,
            fall_speed_max: 100,

            obstacle_spacing: 250.0,
            default_obstacle_count: 4,
            obstacle_start: [100.0, 50.0],
            obstacle_step_x: 200.0,

            scenery_columns: 5,

            shake_duration_ms: 500.0,
            shake_intensity: 0.05,
            fade_duration_ms: 500.0,
            fade_color: [255, 255, 255],

            prompt: "CLICK the SCREEN TO BEGIN".to_string(),
            treasure_message: "You found the treasure!".to_string(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON override
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that every value can drive a session
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.fall_speed_min > self.fall_speed_max {
            return Err(TuningError::EmptyFallRange {
                min: self.fall_speed_min,
                max: self.fall_speed_max,
            });
        }
        let positives = [
            ("player_speed", self.player_speed),
            ("obstacle_spacing", self.obstacle_spacing),
            ("shake_duration_ms", self.shake_duration_ms),
            ("fade_duration_ms", self.fade_duration_ms),
        ];
        for (field, value) in positives {
            // NaN fails this too
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field, value });
            }
        }
        if self.obstacle_spacing < MIN_OBSTACLE_SPACING {
            return Err(TuningError::SpacingTooSmall(self.obstacle_spacing));
        }
        if self.default_obstacle_count == 0 {
            return Err(TuningError::NoDefaultObstacles);
        }
        Ok(())
    }

    /// Inclusive range obstacle fall speeds are drawn from
    pub fn fall_speed_range(&self) -> RangeInclusive<u32> {
        self.fall_speed_min..=self.fall_speed_max
    }

    /// Shake duration in seconds
    pub fn shake_duration(&self) -> f32 {
        self.shake_duration_ms / 1000.0
    }

    /// Fade duration in seconds
    pub fn fade_duration(&self) -> f32 {
        self.fade_duration_ms / 1000.0
    }

    /// Fade colour as linear 0-1 RGBA
    pub fn fade_rgba(&self) -> [f32; 4] {
        let [r, g, b] = self.fade_color;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }

    /// LocalStorage key for an override
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "treasure_hunt_tuning";

    /// Load an override from LocalStorage, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.fall_speed_range(), 50..=100);
        assert_eq!(tuning.fade_rgba(), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"player_speed": 420.0}"#).unwrap();
        assert_eq!(tuning.player_speed, 420.0);
        assert_eq!(tuning.obstacle_spacing, 250.0);
        assert_eq!(tuning.prompt, "CLICK the SCREEN TO BEGIN");
    }

    #[test]
    fn test_rejects_inverted_fall_range() {
        let err = Tuning::from_json(r#"{"fall_speed_min": 120, "fall_speed_max": 60}"#).unwrap_err();
        assert!(matches!(err, TuningError::EmptyFallRange { min: 120, max: 60 }));
    }

    #[test]
    fn test_rejects_non_positive_spacing() {
        let tuning = Tuning {
            obstacle_spacing: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::NonPositive {
                field: "obstacle_spacing",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_tiny_spacing() {
        let tuning = Tuning {
            obstacle_spacing: 1e-30,
            ..Default::default()
        };
        assert!(matches!(tuning.validate(), Err(TuningError::SpacingTooSmall(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{not json"),
            Err(TuningError::Parse(_))
        ));
    }
}
