//! Platform capability layer
//!
//! Everything the core needs from the outside world, as fire-and-forget
//! calls: sound triggers, score upload, view switches and block-mesh
//! spawning. The core never reads anything back.

use crate::audio::SoundEffect;
use crate::sim::BlockDescriptor;

/// Capabilities the surrounding shell provides to the core.
pub trait Platform {
    fn play_sound(&mut self, sound: SoundEffect);
    fn stop_sound(&mut self, sound: SoundEffect);
    /// Report the final score to the leaderboard collaborator.
    fn post_score(&mut self, score: u32);
    /// Switch the view layer to the game-over page.
    fn show_game_over_view(&mut self);
    /// A new target block exists; build its mesh.
    fn advance_to_next_block(&mut self, block: &BlockDescriptor);
}

/// Discards everything; for benchmarks and the occasional unit test.
#[derive(Debug, Default)]
pub struct NullPlatform;

impl Platform for NullPlatform {
    fn play_sound(&mut self, _sound: SoundEffect) {}
    fn stop_sound(&mut self, _sound: SoundEffect) {}
    fn post_score(&mut self, _score: u32) {}
    fn show_game_over_view(&mut self) {}
    fn advance_to_next_block(&mut self, _block: &BlockDescriptor) {}
}

/// What the core told the platform, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    Sound(SoundEffect),
    SoundStopped(SoundEffect),
    ScorePosted(u32),
    GameOverShown,
    BlockSpawned(BlockDescriptor),
}

/// Records every capability call; the test double.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    pub events: Vec<PlatformEvent>,
}

impl Platform for RecordingPlatform {
    fn play_sound(&mut self, sound: SoundEffect) {
        self.events.push(PlatformEvent::Sound(sound));
    }

    fn stop_sound(&mut self, sound: SoundEffect) {
        self.events.push(PlatformEvent::SoundStopped(sound));
    }

    fn post_score(&mut self, score: u32) {
        self.events.push(PlatformEvent::ScorePosted(score));
    }

    fn show_game_over_view(&mut self) {
        self.events.push(PlatformEvent::GameOverShown);
    }

    fn advance_to_next_block(&mut self, block: &BlockDescriptor) {
        self.events.push(PlatformEvent::BlockSpawned(*block));
    }
}
