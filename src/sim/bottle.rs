//! The flying bottle
//!
//! Holds the kinematic state for the charge/flight/fall lifecycle and
//! schedules every pose transition (mid-air flip, charge squash recovery,
//! the three fall poses) on the shared tween scheduler. Positions are world
//! coordinates; `Vec2.y` is world Z.

use std::f32::consts::PI;

use glam::Vec2;

use super::animation::{AnimValue, Scheduler};
use super::block::Axis;
use super::flight::Velocity2;
use super::tween::Easing;
use crate::tuning::GameTuning;

/// Charge squash per logical frame.
const DELTA_SCALE: f32 = 0.005;
/// Squash floor.
const MIN_SCALE: f32 = 0.55;
/// Horizontal bulge per charging frame.
const HORIZON_DELTA_SCALE: f32 = 0.007;
/// Head sink per charging frame.
const HEAD_DELTA: f32 = 0.03;
/// Head rest height above the bottle origin.
const HEAD_REST_Y: f32 = 7.56;
/// Exaggeration factor for the launch flip.
const FLIP_SCALE: f32 = 1.4;

/// Lifecycle status; the fall variants select which pose animation ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BottleStatus {
    #[default]
    Stop,
    /// Charging: squashing down while the press is held.
    Shrink,
    /// Airborne.
    Jump,
    /// Straight drop (missed everything).
    Straight,
    /// Tipping backward off a near edge.
    Hypsokinesis,
    /// Tipping forward off a far edge.
    Forerake,
}

/// Bottle state and its animatable pose fields.
#[derive(Debug)]
pub struct Bottle {
    pub status: BottleStatus,
    pub velocity: Velocity2,
    /// Seconds airborne this flight.
    pub flying_time: f32,
    pub x: f32,
    pub z: f32,
    pub y: AnimValue,
    /// Fall-pose body rotation about the lateral axis.
    pub lean: AnimValue,
    /// Mid-air somersault rotation.
    pub flip: AnimValue,
    pub head_y: AnimValue,
    /// Head offset along the travel axis.
    pub head_lat: AnimValue,
    pub body_scale_y: AnimValue,
    /// Horizontal body scale (X and Z move together).
    pub body_scale_h: AnimValue,
    /// Charge squash factor, 1.0 at rest.
    pub scale: f32,
    pub direction: Axis,
    /// Unit travel vector, re-aimed every block advancement.
    pub axis: Vec2,
    /// Predicted landing point for the current flight.
    pub destination: Option<Vec2>,
}

impl Bottle {
    pub fn new(tuning: &GameTuning) -> Self {
        Self {
            status: BottleStatus::Stop,
            velocity: Velocity2::default(),
            flying_time: 0.0,
            x: tuning.bottle_init_x,
            z: tuning.bottle_init_z,
            y: AnimValue::new(tuning.block_height / 2.0 + 30.0),
            lean: AnimValue::new(0.0),
            flip: AnimValue::new(0.0),
            head_y: AnimValue::new(HEAD_REST_Y),
            head_lat: AnimValue::new(0.0),
            body_scale_y: AnimValue::new(1.0),
            body_scale_h: AnimValue::new(1.0),
            scale: 1.0,
            direction: Axis::X,
            axis: Vec2::X,
            destination: None,
        }
    }

    /// Landing position in the X/Z plane.
    #[inline]
    pub fn position_xz(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    pub fn set_direction(&mut self, direction: Axis, axis: Vec2) {
        self.direction = direction;
        self.axis = axis.normalize_or_zero();
    }

    /// Drop in from above the first block with a bounce.
    pub fn show_up(&self, scheduler: &mut Scheduler, now_ms: f64, block_height: f32) {
        scheduler.drive(
            0.6,
            &self.y,
            block_height / 2.0,
            Easing::BounceOut,
            0.0,
            now_ms,
        );
    }

    pub fn shrink(&mut self) {
        self.status = BottleStatus::Shrink;
    }

    /// One charging frame: squash the body, sink the head and the origin.
    /// Holds the pose once the squash floor is reached.
    pub fn shrink_step(&mut self, block_height: f32) {
        if self.status != BottleStatus::Shrink {
            return;
        }
        self.scale = (self.scale - DELTA_SCALE).max(MIN_SCALE);
        if self.scale <= MIN_SCALE {
            return;
        }
        self.body_scale_y.set(self.scale);
        self.body_scale_h.set(self.body_scale_h.get() + HORIZON_DELTA_SCALE);
        self.head_y.set(self.head_y.get() - HEAD_DELTA);

        let sink = block_height * DELTA_SCALE / 2.0;
        self.y.set(self.y.get() - (HEAD_DELTA / 2.0 + sink * 2.0));
    }

    pub fn stop(&mut self) {
        self.scale = 1.0;
        self.flying_time = 0.0;
        self.status = BottleStatus::Stop;
    }

    pub fn jump(&mut self) {
        self.status = BottleStatus::Jump;
    }

    /// One airborne frame of projectile motion. The incremental form
    /// telescopes exactly: after total time T the vertical displacement sums
    /// to `vy*T - g*T^2/2` regardless of tick sizes.
    pub fn step_flight(&mut self, dt: f32, gravity: f32) {
        if self.status != BottleStatus::Jump || dt <= 0.0 {
            return;
        }
        let t = dt;
        let dy = self.velocity.vy * t
            - 0.5 * gravity * t * t
            - gravity * self.flying_time * t;
        let dh = self.velocity.vx * t;
        self.y.set(self.y.get() + dy);
        self.x += self.axis.x * dh;
        self.z += self.axis.y * dh;
        self.flying_time += t;
    }

    /// The launch somersault: a fast half turn then the remaining full turn,
    /// with a head bob and a body stretch-and-recover, all as one burst of
    /// scheduled tweens.
    pub fn rotate_flip(&mut self, scheduler: &mut Scheduler, now_ms: f64) {
        let s = FLIP_SCALE;
        self.flip.set(0.0);

        let flip = &self.flip;
        scheduler.drive(0.14, flip, -PI, Easing::Linear, 0.0, now_ms);
        let f = flip.clone();
        scheduler.tween(0.18, -PI, -2.0 * PI, Easing::Linear, 0.14, now_ms, move |v, _| {
            f.set(v)
        });

        // Head bob: up-and-forward, down-and-back, settle
        let h0 = self.head_y.get();
        let l0 = self.head_lat.get();
        let lat_kick = match self.direction {
            Axis::X => 0.45 * s,
            Axis::Z => -0.45 * s,
        };
        scheduler.drive_fields(
            0.1,
            &[(&self.head_y, h0 + 0.9 * s), (&self.head_lat, l0 + lat_kick)],
            Easing::Linear,
            0.0,
            now_ms,
        );
        let hy = self.head_y.clone();
        scheduler.tween(0.1, h0 + 0.9 * s, h0 - 0.9 * s, Easing::Linear, 0.1, now_ms, move |v, _| {
            hy.set(v)
        });
        let hl = self.head_lat.clone();
        scheduler.tween(
            0.1,
            l0 + lat_kick,
            l0 - lat_kick,
            Easing::Linear,
            0.1,
            now_ms,
            move |v, _| hl.set(v),
        );
        let hy = self.head_y.clone();
        scheduler.tween(0.15, h0 - 0.9 * s, HEAD_REST_Y, Easing::Linear, 0.25, now_ms, move |v, _| {
            hy.set(v)
        });
        let hl = self.head_lat.clone();
        scheduler.tween(0.15, l0 - lat_kick, 0.0, Easing::Linear, 0.25, now_ms, move |v, _| {
            hl.set(v)
        });

        // Body stretch then squash then recover
        let stretch_y = s.max(1.0);
        let stretch_h = (1.0 / s).min(1.0).max(0.7);
        let squash_y = (0.9 / s).min(0.7);
        let squash_h = s.max(1.2);
        scheduler.drive_fields(
            0.1,
            &[(&self.body_scale_y, stretch_y), (&self.body_scale_h, stretch_h)],
            Easing::Linear,
            0.0,
            now_ms,
        );
        let by = self.body_scale_y.clone();
        scheduler.tween(0.1, stretch_y, squash_y, Easing::Linear, 0.1, now_ms, move |v, _| {
            by.set(v)
        });
        let bh = self.body_scale_h.clone();
        scheduler.tween(0.1, stretch_h, squash_h, Easing::Linear, 0.1, now_ms, move |v, _| {
            bh.set(v)
        });
        let by = self.body_scale_y.clone();
        scheduler.tween(0.3, squash_y, 1.0, Easing::Linear, 0.2, now_ms, move |v, _| {
            by.set(v)
        });
        let bh = self.body_scale_h.clone();
        scheduler.tween(0.3, squash_h, 1.0, Easing::Linear, 0.2, now_ms, move |v, _| {
            bh.set(v)
        });
    }

    /// Straight drop: missed everything, sink below the landing plane.
    pub fn straight(&mut self, scheduler: &mut Scheduler, now_ms: f64, block_height: f32) {
        self.status = BottleStatus::Straight;
        scheduler.drive(
            0.4,
            &self.y,
            -block_height / 2.0,
            Easing::Linear,
            0.0,
            now_ms,
        );
    }

    /// Tip backward off the near edge: lean to +90° then slide down.
    pub fn hypsokinesis(&mut self, scheduler: &mut Scheduler, now_ms: f64, block_height: f32) {
        self.status = BottleStatus::Hypsokinesis;
        scheduler.drive(0.8, &self.lean, PI / 2.0, Easing::Linear, 0.2, now_ms);
        scheduler.drive(
            0.4,
            &self.y,
            -block_height / 2.0 + 1.2,
            Easing::Linear,
            0.55,
            now_ms,
        );
        scheduler.drive(0.2, &self.head_lat, 1.125, Easing::Linear, 0.55, now_ms);
        let hl = self.head_lat.clone();
        scheduler.tween(0.2, 1.125, 0.0, Easing::Linear, 0.75, now_ms, move |v, _| {
            hl.set(v)
        });
    }

    /// Tip forward off the far edge: lean to -90° then slide down.
    pub fn forerake(&mut self, scheduler: &mut Scheduler, now_ms: f64, block_height: f32) {
        self.status = BottleStatus::Forerake;
        scheduler.drive(1.0, &self.lean, -PI / 2.0, Easing::Linear, 0.2, now_ms);
        scheduler.drive(
            0.4,
            &self.y,
            -block_height / 2.0 + 1.2,
            Easing::Linear,
            0.55,
            now_ms,
        );
    }

    /// Back to the starting perch, poised for a show-up drop.
    pub fn reset(&mut self, tuning: &GameTuning) {
        self.stop();
        self.velocity = Velocity2::default();
        self.destination = None;
        self.x = tuning.bottle_init_x;
        self.z = tuning.bottle_init_z;
        self.y.set(tuning.block_height / 2.0 + 30.0);
        self.lean.set(0.0);
        self.flip.set(0.0);
        self.head_y.set(HEAD_REST_Y);
        self.head_lat.set(0.0);
        self.body_scale_y.set(1.0);
        self.body_scale_h.set(1.0);
        self.direction = Axis::X;
        self.axis = Vec2::X;
    }
}
