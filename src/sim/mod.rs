//! Deterministic gameplay core
//!
//! All game logic lives here. This module must stay pure and deterministic:
//! - Injected frame clock only (no wall-clock reads)
//! - Seeded RNG only
//! - No rendering or platform dependencies; external effects go through the
//!   `Platform` capability trait
//!
//! Single-threaded cooperative: everything mutates on the frame tick or on
//! input edges, so no locking anywhere.

pub mod animation;
pub mod block;
pub mod bottle;
pub mod effects;
pub mod flight;
pub mod geometry;
pub mod hit;
pub mod round;
pub mod tween;

pub use animation::{AnimValue, Scheduler};
pub use block::{Axis, Block, BlockDescriptor, BlockKind, SpawnPlan, spawn_next};
pub use bottle::{Bottle, BottleStatus};
pub use effects::{Camera, ParticleSystem, ScoreFloat};
pub use flight::{Landing, Velocity2, launch_velocity, predict_landing, press_duration_for};
pub use geometry::point_in_polygon;
pub use hit::{FlightOutcome, classify};
pub use round::{Game, RoundPhase, RoundState};
pub use tween::{ConfigError, Easing};
