//! Round state machine
//!
//! Ties input edges, the flight predictor and the hit classifier together
//! and owns the single `RoundState`. All mutation happens on the frame tick
//! or on the press/release edges; visual transitions go through the shared
//! scheduler so game-over can freeze them wholesale.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::animation::Scheduler;
use super::block::{Block, spawn_next};
use super::bottle::{Bottle, BottleStatus};
use super::effects::{Camera, ParticleSystem, ScoreFloat};
use super::flight::{Velocity2, launch_velocity, predict_landing};
use super::hit::{FlightOutcome, classify};
use crate::audio::SoundEffect;
use crate::consts::{GAME_OVER_GRACE, MAX_COMBO_SOUND, MIN_AIR_TIME};
use crate::platform::Platform;
use crate::tuning::GameTuning;

/// Phase of the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    /// Waiting for a press.
    #[default]
    Idle,
    /// Press held; bottle and block squashing down.
    Charging,
    /// Bottle airborne; outcome cached, waiting for the landing plane.
    Flying,
    /// Terminal until an external restart.
    GameOver,
}

/// The one mutable round record.
#[derive(Debug, Default)]
pub struct RoundState {
    pub score: u32,
    pub combo: u32,
    pub phase: RoundPhase,
    /// A cached classification is waiting to be consumed.
    pub checking_hit: bool,
    pub launch_velocity: Velocity2,
    /// Classification computed once at launch; `None` before the first
    /// launch or when the flight cleared every footprint.
    pub outcome: Option<FlightOutcome>,
    /// Center of the next block, where the camera and the aim point go.
    pub target_position: Vec2,
}

/// The game: round state plus every collaborator the core drives.
pub struct Game<P: Platform> {
    pub platform: P,
    pub tuning: GameTuning,
    pub scheduler: Scheduler,
    pub state: RoundState,
    pub current_block: Block,
    pub next_block: Block,
    pub bottle: Bottle,
    pub camera: Camera,
    pub particles: ParticleSystem,
    pub score_float: ScoreFloat,
    rng: Pcg32,
    press_started: Option<f64>,
    last_frame: Option<f64>,
    /// Raised by the grace-delay task once the game-over view may show.
    game_over_ready: Rc<Cell<bool>>,
    reported: bool,
}

impl<P: Platform> Game<P> {
    pub fn new(platform: P, tuning: GameTuning, seed: u64, now_ms: f64) -> Self {
        let current = Block::cuboid(tuning.bottle_init_x, 0.0, tuning.initial_block_width);
        let next = Block::cylinder(tuning.initial_next_x, 0.0, tuning.initial_block_width);
        let bottle = Bottle::new(&tuning);

        let mut game = Self {
            platform,
            scheduler: Scheduler::new(),
            state: RoundState {
                target_position: next.center(),
                ..RoundState::default()
            },
            current_block: current,
            next_block: next,
            bottle,
            camera: Camera::new(),
            particles: ParticleSystem::new(),
            score_float: ScoreFloat::new(),
            rng: Pcg32::seed_from_u64(seed),
            press_started: None,
            last_frame: None,
            game_over_ready: Rc::new(Cell::new(false)),
            reported: false,
            tuning,
        };
        game.aim_at_target();
        game.platform.play_sound(SoundEffect::Init);
        game.bottle
            .show_up(&mut game.scheduler, now_ms, game.tuning.block_height);
        game
    }

    /// Point the travel axis from the bottle at the current target.
    fn aim_at_target(&mut self) {
        let axis = self.state.target_position - self.bottle.position_xz();
        let direction = self.bottle.direction;
        self.bottle.set_direction(direction, axis);
    }

    /// Press edge: begin charging.
    pub fn press_start(&mut self, now_ms: f64) {
        if self.state.phase != RoundPhase::Idle {
            return;
        }
        self.state.phase = RoundPhase::Charging;
        self.press_started = Some(now_ms);
        self.bottle.shrink();
        self.particles
            .gather(&mut self.scheduler, &mut self.rng, now_ms);
        self.platform.play_sound(SoundEffect::Shrink);
    }

    /// Release edge: compute the launch, predict and classify the flight
    /// once, and let the bottle fly.
    pub fn press_end(&mut self, now_ms: f64) {
        if self.state.phase != RoundPhase::Charging {
            return;
        }
        let Some(started) = self.press_started.take() else {
            return;
        };
        let duration_ms = (now_ms - started) as f32;
        let velocity = launch_velocity(duration_ms, &self.tuning);
        self.state.launch_velocity = velocity;

        self.bottle.stop();
        let init_y = (1.0 - self.current_block.shrink_scale.get()) * self.tuning.block_height;
        let landing = predict_landing(
            velocity,
            self.tuning.gravity,
            init_y,
            self.bottle.position_xz(),
            self.bottle.axis,
        );
        self.state.outcome = classify(
            landing.point,
            &self.next_block.vertices(),
            self.next_block.center(),
            &self.current_block.vertices(),
            self.tuning.bottle_body_width / 2.0,
        );
        self.state.checking_hit = true;
        self.bottle.destination = Some(landing.point);
        log::debug!(
            "launch: press={duration_ms:.0}ms v=({:.2},{:.2}) landing=({:.2},{:.2}) outcome={:?}",
            velocity.vx,
            velocity.vy,
            landing.point.x,
            landing.point.y,
            self.state.outcome
        );

        self.current_block.rebound(&mut self.scheduler, now_ms);
        self.particles.reset();
        self.bottle.rotate_flip(&mut self.scheduler, now_ms);
        self.bottle.velocity = velocity;
        self.bottle.jump();
        self.platform.stop_sound(SoundEffect::Shrink);
        self.platform.stop_sound(SoundEffect::ShrinkEnd);
        self.state.phase = RoundPhase::Flying;
    }

    /// One frame: advance whichever phase is active, then step every tween.
    pub fn tick(&mut self, now_ms: f64) {
        let dt = self
            .last_frame
            .map(|last| ((now_ms - last) / 1000.0) as f32)
            .unwrap_or(0.0);

        match self.state.phase {
            RoundPhase::Charging => {
                self.bottle.shrink_step(self.tuning.block_height);
                self.current_block.shrink_step();
            }
            RoundPhase::Flying => {
                self.bottle.step_flight(dt, self.tuning.gravity);
                let landing_plane = self.tuning.block_height / 2.0;
                if self.state.checking_hit
                    && self.bottle.status == BottleStatus::Jump
                    && self.bottle.y.get() <= landing_plane
                    && self.bottle.flying_time > MIN_AIR_TIME
                {
                    self.resolve(now_ms);
                }
            }
            RoundPhase::GameOver => {
                if self.game_over_ready.get() && !self.reported {
                    self.reported = true;
                    self.platform.post_score(self.state.score);
                    self.platform.show_game_over_view();
                }
            }
            RoundPhase::Idle => {}
        }

        self.scheduler.step(now_ms);
        self.last_frame = Some(now_ms);
    }

    /// Consume the cached classification exactly once.
    fn resolve(&mut self, now_ms: f64) {
        self.state.checking_hit = false;
        match self.state.outcome {
            Some(
                outcome @ (FlightOutcome::HitNextCenter
                | FlightOutcome::HitNextNormal
                | FlightOutcome::HitCurrent),
            ) => {
                self.land(now_ms, outcome);
            }
            Some(FlightOutcome::GameOverNextBack) | Some(FlightOutcome::GameOverCurrentBack) => {
                self.game_over(now_ms, BottleStatus::Forerake, SoundEffect::FallFromBlock);
            }
            Some(FlightOutcome::GameOverNextFront) => {
                self.game_over(now_ms, BottleStatus::Hypsokinesis, SoundEffect::FallFromBlock);
            }
            Some(FlightOutcome::GameOverBoth) | None => {
                self.game_over(now_ms, BottleStatus::Straight, SoundEffect::Fall);
            }
        }
    }

    fn land(&mut self, now_ms: f64, outcome: FlightOutcome) {
        self.bottle.stop();
        self.bottle.y.set(self.tuning.block_height / 2.0);
        if let Some(dest) = self.bottle.destination {
            self.bottle.x = dest.x;
            self.bottle.z = dest.y;
        }

        match outcome {
            FlightOutcome::HitNextCenter => {
                self.state.combo += 1;
                let award = 2 * self.state.combo;
                self.state.score += award;
                self.platform.play_sound(SoundEffect::Combo(
                    self.state.combo.min(MAX_COMBO_SOUND),
                ));
                self.score_float
                    .show(&mut self.scheduler, now_ms, award, self.tuning.block_height);
            }
            FlightOutcome::HitNextNormal => {
                self.state.combo = 0;
                self.state.score += 1;
                self.platform.play_sound(SoundEffect::Success);
                self.score_float
                    .show(&mut self.scheduler, now_ms, 1, self.tuning.block_height);
            }
            FlightOutcome::HitCurrent => {
                // Landed back where it started; nothing advances
            }
            _ => unreachable!("land() only sees landing outcomes"),
        }

        if outcome.lands_on_next() {
            self.advance_blocks(now_ms);
            self.particles.scatter(
                &mut self.scheduler,
                &mut self.rng,
                now_ms,
                self.tuning.bottle_body_width / 2.0,
            );
        }
        log::debug!(
            "landed: outcome={outcome:?} score={} combo={}",
            self.state.score,
            self.state.combo
        );
        self.state.phase = RoundPhase::Idle;
    }

    /// Demote next to current, roll a fresh target and re-aim everything.
    fn advance_blocks(&mut self, now_ms: f64) {
        let plan = spawn_next(&mut self.rng, &self.next_block, &self.tuning);
        self.current_block = std::mem::replace(&mut self.next_block, plan.block);
        self.state.target_position = self.next_block.center();

        self.bottle.direction = plan.direction;
        self.aim_at_target();
        self.platform
            .advance_to_next_block(&self.next_block.descriptor());

        let mid = (self.current_block.center() + self.next_block.center()) / 2.0;
        self.camera
            .follow(&mut self.scheduler, now_ms, Vec3::new(mid.x, 0.0, mid.y));
    }

    fn game_over(&mut self, now_ms: f64, pose: BottleStatus, sound: SoundEffect) {
        self.state.combo = 0;
        // Freeze every animation from the round so nothing bleeds into the
        // fall pose; the pose tweens scheduled below postdate the watermark
        self.scheduler.cancel_all();
        self.bottle.stop();
        self.bottle.y.set(self.tuning.block_height / 2.0);
        if let Some(dest) = self.bottle.destination {
            self.bottle.x = dest.x;
            self.bottle.z = dest.y;
        }
        let h = self.tuning.block_height;
        match pose {
            BottleStatus::Forerake => self.bottle.forerake(&mut self.scheduler, now_ms, h),
            BottleStatus::Hypsokinesis => self.bottle.hypsokinesis(&mut self.scheduler, now_ms, h),
            _ => self.bottle.straight(&mut self.scheduler, now_ms, h),
        }
        self.platform.play_sound(sound);
        self.state.phase = RoundPhase::GameOver;
        log::info!("game over: {:?}, final score {}", self.state.outcome, self.state.score);

        // Grace delay before reporting, expressed as a scheduled task so the
        // same clock that drives the pose drives the hand-off
        let ready = Rc::new(Cell::new(false));
        self.game_over_ready = ready.clone();
        self.reported = false;
        self.scheduler.tween(
            0.0,
            0.0,
            1.0,
            super::tween::Easing::Linear,
            GAME_OVER_GRACE,
            now_ms,
            move |_, is_final| {
                if is_final {
                    ready.set(true);
                }
            },
        );
    }

    /// External restart from the game-over view.
    pub fn restart(&mut self, now_ms: f64) {
        log::info!("restart");
        self.scheduler.cancel_all();
        self.state = RoundState::default();
        self.current_block = Block::cuboid(
            self.tuning.bottle_init_x,
            0.0,
            self.tuning.initial_block_width,
        );
        self.next_block = Block::cylinder(
            self.tuning.initial_next_x,
            0.0,
            self.tuning.initial_block_width,
        );
        self.state.target_position = self.next_block.center();
        self.bottle.reset(&self.tuning);
        self.aim_at_target();
        self.camera.reset();
        self.particles.reset();
        self.score_float.visible.set(false);
        self.game_over_ready = Rc::new(Cell::new(false));
        self.reported = false;
        self.press_started = None;
        self.platform.play_sound(SoundEffect::Init);
        self.bottle
            .show_up(&mut self.scheduler, now_ms, self.tuning.block_height);
    }
}
