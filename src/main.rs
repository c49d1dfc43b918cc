//! Bottle Hop entry point
//!
//! Headless demo: an autopilot plays rounds with a deliberately degrading
//! aim until it falls off, driving the whole core (charge, flight,
//! classification, scoring, game-over hand-off) against a simulated
//! 60 Hz clock.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use bottle_hop::highscores::HighScores;
use bottle_hop::platform::Platform;
use bottle_hop::sim::{BlockDescriptor, Game, RoundPhase, press_duration_for};
use bottle_hop::{GameTuning, SoundEffect};

const TICK_MS: f64 = 1000.0 / 60.0;

/// Native shell: logs the fire-and-forget calls and persists scores.
struct ShellPlatform {
    scores: HighScores,
    scores_path: PathBuf,
}

impl ShellPlatform {
    fn new(scores_path: PathBuf) -> Self {
        Self {
            scores: HighScores::load(&scores_path),
            scores_path,
        }
    }
}

impl Platform for ShellPlatform {
    fn play_sound(&mut self, sound: SoundEffect) {
        log::debug!("sound: {}", sound.key());
    }

    fn stop_sound(&mut self, sound: SoundEffect) {
        log::debug!("sound stopped: {}", sound.key());
    }

    fn post_score(&mut self, score: u32) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        match self.scores.add_score(score, timestamp) {
            Some(rank) => log::info!("score {score} entered the table at rank {rank}"),
            None => log::info!("score {score} did not qualify"),
        }
        self.scores.save(&self.scores_path);
    }

    fn show_game_over_view(&mut self) {
        log::info!("view: game over page");
    }

    fn advance_to_next_block(&mut self, block: &BlockDescriptor) {
        log::debug!(
            "spawn {:?} at ({:.1}, {:.1}) width {:.0}",
            block.kind,
            block.x,
            block.z,
            block.width
        );
    }
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    log::info!("Bottle Hop headless demo, seed {seed}");

    let tuning = GameTuning::load(std::path::Path::new("tuning.json"));
    let platform = ShellPlatform::new(PathBuf::from("highscores.json"));
    let mut game = Game::new(platform, tuning, seed, 0.0);
    let mut aim_rng = Pcg32::seed_from_u64(seed ^ 0x5eed);

    let mut now = 0.0;
    let mut tick = |game: &mut Game<ShellPlatform>, now: &mut f64, count: usize| {
        for _ in 0..count {
            *now += TICK_MS;
            game.tick(*now);
        }
    };

    // Let the bottle drop in
    tick(&mut game, &mut now, 60);

    for round in 0..200u32 {
        let distance = game
            .state
            .target_position
            .distance(game.bottle.position_xz());
        // Aim gets sloppier every round until something gives
        let jitter = (aim_rng.random::<f32>() - 0.5) * (round as f32 * 8.0);
        let press_ms = (press_duration_for(distance, &game.tuning) + jitter).max(30.0) as f64;

        game.press_start(now);
        // Hold through real charge ticks; the shrink sink feeds back into
        // the prediction exactly as it would under a finger
        let hold_ticks = (press_ms / TICK_MS).round() as usize;
        tick(&mut game, &mut now, hold_ticks);
        game.press_end(now);

        while game.state.phase == RoundPhase::Flying {
            tick(&mut game, &mut now, 1);
        }

        if game.state.phase == RoundPhase::GameOver {
            log::info!("fell after {} rounds", round + 1);
            break;
        }
    }

    // Ride out the grace delay so the score gets reported
    tick(&mut game, &mut now, 180);

    println!("final score: {}", game.state.score);
    if let Some(best) = game.platform.scores.top_score() {
        println!("best score:  {best}");
    }
}
