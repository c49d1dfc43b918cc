//! Data-driven game balance
//!
//! Gameplay constants in one place, loadable from a JSON file with
//! fall-back-to-default semantics so a missing or broken file never
//! blocks a run.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Balance constants for one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTuning {
    /// Downward acceleration, world units per second squared.
    pub gravity: f32,
    /// Block height; the landing plane sits at half of it.
    pub block_height: f32,
    /// Width of the bottle body; half of it is the probe offset for edge
    /// classification.
    pub bottle_body_width: f32,
    /// Clamp for both launch velocity components.
    pub max_speed: f32,
    /// Press milliseconds per unit of horizontal speed.
    pub horizontal_press_divisor: f32,
    /// Press milliseconds per unit of vertical speed above the base.
    pub vertical_press_divisor: f32,
    /// Vertical speed floor at zero press.
    pub base_vertical_speed: f32,
    /// Spawned block width: `round(r * span) + min`.
    pub block_width_min: f32,
    pub block_width_span: f32,
    /// Gap to the next block: `round(r * span) + min`.
    pub block_gap_min: f32,
    pub block_gap_span: f32,
    /// Width of the two fixed starting blocks.
    pub initial_block_width: f32,
    /// Bottle (and first block) starting position.
    pub bottle_init_x: f32,
    pub bottle_init_z: f32,
    /// Center of the fixed second block.
    pub initial_next_x: f32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            gravity: 1000.0,
            block_height: 10.0,
            bottle_body_width: 1.8782,
            max_speed: 400.0,
            horizontal_press_divisor: 6.0,
            vertical_press_divisor: 20.0,
            base_vertical_speed: 150.0,
            block_width_min: 8.0,
            block_width_span: 12.0,
            block_gap_min: 20.0,
            block_gap_span: 20.0,
            initial_block_width: 16.0,
            bottle_init_x: -15.0,
            bottle_init_z: 0.0,
            initial_next_x: 23.0,
        }
    }
}

impl GameTuning {
    /// Height of the landing plane above the ground.
    #[inline]
    pub fn landing_plane(&self) -> f32 {
        self.block_height / 2.0
    }

    /// Load tuning from a JSON file, falling back to defaults (with a log
    /// line, never an error) when the file is missing or malformed.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Ignoring malformed tuning file {}: {err}", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}
