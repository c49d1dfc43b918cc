//! Bottle Hop - a falling-block stacking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic gameplay core (flight prediction, hit
//!   classification, tween scheduler, round state machine)
//! - `platform`: Capability trait the core calls into (sounds, score upload,
//!   view changes)
//! - `highscores`: File-backed best-score store
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use audio::SoundEffect;
pub use highscores::HighScores;
pub use platform::Platform;
pub use tuning::GameTuning;

/// Game configuration constants
pub mod consts {
    /// Logical animation frame length in milliseconds. Tween progress is
    /// measured in units of this frame regardless of the real tick rate.
    pub const FRAME_MS: f32 = 17.0;

    /// Observed frame rates at or above this advance tweens by whole frames;
    /// slower ticks advance fractionally by elapsed time.
    pub const SMOOTH_FPS: f32 = 30.0;

    /// Minimum airborne time before a flight may resolve, so the launch
    /// frame itself (bottle still at block height) never counts as a landing.
    pub const MIN_AIR_TIME: f32 = 0.3;

    /// Landing within this distance of the target center counts as a
    /// center hit and feeds the combo.
    pub const CENTER_HIT_RADIUS: f32 = 1.0;

    /// Seconds between game over and reporting the score / switching views.
    pub const GAME_OVER_GRACE: f32 = 2.0;

    /// Highest combo sound variant; deeper combos reuse it.
    pub const MAX_COMBO_SOUND: u32 = 8;
}

/// Round to two decimal places.
///
/// Launch velocities, flight times and landing coordinates are all snapped
/// to 2 decimals so downstream comparisons are stable across platforms.
#[inline]
pub fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.363), 0.36);
        assert_eq!(round2(99.999), 100.0);
        assert_eq!(round2(104.728), 104.73);
        assert_eq!(round2(-0.004), 0.0);
    }
}
