//! Scheduler-driven visual feedback
//!
//! Camera follow, the landing particle pool and the floating "+N" score
//! text. All of it is presentation state the render layer reads; none of it
//! feeds back into gameplay. Every transition here runs on the shared tween
//! scheduler so a game-over `cancel_all` freezes the lot at once.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::animation::{AnimValue, Scheduler};
use super::tween::Easing;

/// Fixed offset from the camera focus to the camera position.
const CAMERA_OFFSET: Vec3 = Vec3::new(-10.0, 10.0, 10.0);

/// Orthographic camera pose: position plus look-target, all tweenable.
#[derive(Debug)]
pub struct Camera {
    pub x: AnimValue,
    pub y: AnimValue,
    pub z: AnimValue,
    pub target_x: AnimValue,
    pub target_y: AnimValue,
    pub target_z: AnimValue,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            x: AnimValue::new(CAMERA_OFFSET.x),
            y: AnimValue::new(CAMERA_OFFSET.y),
            z: AnimValue::new(CAMERA_OFFSET.z),
            target_x: AnimValue::new(0.0),
            target_y: AnimValue::new(0.0),
            target_z: AnimValue::new(0.0),
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pan position and look-target to a new focus over half a second.
    pub fn follow(&self, scheduler: &mut Scheduler, now_ms: f64, focus: Vec3) {
        scheduler.drive_fields(
            0.5,
            &[
                (&self.x, focus.x + CAMERA_OFFSET.x),
                (&self.y, focus.y + CAMERA_OFFSET.y),
                (&self.z, focus.z + CAMERA_OFFSET.z),
            ],
            Easing::Linear,
            0.0,
            now_ms,
        );
        scheduler.drive_fields(
            0.5,
            &[
                (&self.target_x, focus.x),
                (&self.target_y, focus.y),
                (&self.target_z, focus.z),
            ],
            Easing::Linear,
            0.0,
            now_ms,
        );
    }

    pub fn reset(&self) {
        self.x.set(CAMERA_OFFSET.x);
        self.y.set(CAMERA_OFFSET.y);
        self.z.set(CAMERA_OFFSET.z);
        self.target_x.set(0.0);
        self.target_y.set(0.0);
        self.target_z.set(0.0);
    }
}

/// One pooled particle; positions are bottle-local.
#[derive(Debug)]
pub struct Particle {
    pub x: AnimValue,
    pub y: AnimValue,
    pub z: AnimValue,
    pub scale: AnimValue,
    pub visible: Rc<Cell<bool>>,
}

impl Particle {
    fn new() -> Self {
        Self {
            x: AnimValue::new(0.0),
            y: AnimValue::new(0.0),
            z: AnimValue::new(0.0),
            scale: AnimValue::new(1.0),
            visible: Rc::new(Cell::new(false)),
        }
    }
}

/// Number of pooled particles; bursts use the first [`BURST_COUNT`].
pub const PARTICLE_COUNT: usize = 20;
const BURST_COUNT: usize = 10;

/// Fixed pool of landing/charging particles.
///
/// A generation counter guards every scheduled write: `reset` bumps it, so
/// tweens from a previous burst that are still in flight stop touching the
/// pool instead of resurrecting hidden particles.
#[derive(Debug)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    epoch: Rc<Cell<u32>>,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self {
            particles: (0..PARTICLE_COUNT).map(|_| Particle::new()).collect(),
            epoch: Rc::new(Cell::new(0)),
        }
    }
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tween `value` from `from` to `to`, ignoring writes once the pool has
    /// been reset past `my_epoch`.
    #[allow(clippy::too_many_arguments)]
    fn drive_guarded(
        &self,
        scheduler: &mut Scheduler,
        value: &AnimValue,
        duration_s: f32,
        from: f32,
        to: f32,
        delay_s: f32,
        now_ms: f64,
    ) {
        let epoch = self.epoch.clone();
        let my_epoch = epoch.get();
        let target = value.clone();
        scheduler.tween(duration_s, from, to, Easing::Linear, delay_s, now_ms, move |v, _| {
            if epoch.get() == my_epoch {
                target.set(v);
            }
        });
    }

    /// Burst outward from the landing point: used after a successful hop.
    pub fn scatter(
        &self,
        scheduler: &mut Scheduler,
        rng: &mut Pcg32,
        now_ms: f64,
        half_width: f32,
    ) {
        let epoch = self.epoch.clone();
        let my_epoch = epoch.get();
        for particle in self.particles.iter().take(BURST_COUNT) {
            let spread = half_width + rng.random::<f32>() * (2.0 - half_width);
            let x = spread * (1.0 - 2.0 * rng.random::<f32>());
            let spread = half_width + rng.random::<f32>() * (2.0 - half_width);
            let z = spread * (1.0 - 2.0 * rng.random::<f32>());

            particle.x.set(x);
            particle.y.set(-0.5);
            particle.z.set(z);
            particle.scale.set(1.0);
            particle.visible.set(false);

            let delay = rng.random::<f32>() * 0.2;
            let duration = 0.2 + rng.random::<f32>() * 0.3;
            self.drive_guarded(scheduler, &particle.scale, duration, 1.0, 0.2, delay, now_ms);
            self.drive_guarded(scheduler, &particle.x, duration, x, 2.0 * x, delay, now_ms);
            self.drive_guarded(scheduler, &particle.z, duration, z, 2.0 * z, delay, now_ms);

            // The vertical tween also owns visibility: shown while rising,
            // hidden at the end of the burst
            let rise_to = 2.5 * rng.random::<f32>() + 2.0;
            let ep = epoch.clone();
            let vis = particle.visible.clone();
            let yv = particle.y.clone();
            scheduler.tween(duration, -0.5, rise_to, Easing::Linear, delay, now_ms, move |v, fin| {
                if ep.get() != my_epoch {
                    return;
                }
                vis.set(!fin);
                yv.set(v);
            });
        }
    }

    /// Drift inward toward the bottle while charging. The second half of the
    /// pool starts immediately, the rest joins after a beat.
    pub fn gather(&self, scheduler: &mut Scheduler, rng: &mut Pcg32, now_ms: f64) {
        let late_start = 0.5 + rng.random::<f32>();
        for (i, particle) in self.particles.iter().enumerate() {
            let extra_delay = if i < BURST_COUNT { late_start } else { 0.0 };

            let sx = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
            let sz = if rng.random::<f32>() > 0.5 { 1.0 } else { -1.0 };
            let x = (1.0 + 7.0 * rng.random::<f32>()) * sx;
            let y = 1.0 + 7.0 * rng.random::<f32>();
            let z = (1.0 + 7.0 * rng.random::<f32>()) * sz;

            particle.x.set(x);
            particle.y.set(y);
            particle.z.set(z);
            particle.scale.set(1.0);
            particle.visible.set(false);

            let delay = extra_delay + rng.random::<f32>() * 0.5;
            let duration = 0.5 + rng.random::<f32>() * 0.4;
            self.drive_guarded(scheduler, &particle.x, duration, x, rng.random::<f32>() * sx, delay, now_ms);
            self.drive_guarded(scheduler, &particle.z, duration, z, rng.random::<f32>() * sz, delay, now_ms);
            self.drive_guarded(
                scheduler,
                &particle.scale,
                duration,
                1.0,
                0.8 + rng.random::<f32>(),
                delay,
                now_ms,
            );

            let ep = self.epoch.clone();
            let my_epoch = ep.get();
            let vis = particle.visible.clone();
            let yv = particle.y.clone();
            scheduler.tween(
                duration,
                y,
                rng.random::<f32>() * 2.5,
                Easing::Linear,
                delay,
                now_ms,
                move |v, fin| {
                    if ep.get() != my_epoch {
                        return;
                    }
                    vis.set(!fin);
                    yv.set(v);
                },
            );
        }
    }

    /// Hide everything and invalidate in-flight particle tweens.
    pub fn reset(&self) {
        self.epoch.set(self.epoch.get().wrapping_add(1));
        for particle in &self.particles {
            particle.visible.set(false);
        }
    }

    #[cfg(test)]
    fn visible_count(&self) -> usize {
        self.particles.iter().filter(|p| p.visible.get()).count()
    }
}

/// Floating "+N" text above the bottle after a scoring hop.
#[derive(Debug)]
pub struct ScoreFloat {
    pub amount: Cell<u32>,
    pub y: AnimValue,
    pub opacity: AnimValue,
    pub visible: Rc<Cell<bool>>,
}

impl Default for ScoreFloat {
    fn default() -> Self {
        Self {
            amount: Cell::new(0),
            y: AnimValue::new(3.0),
            opacity: AnimValue::new(0.0),
            visible: Rc::new(Cell::new(false)),
        }
    }
}

impl ScoreFloat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rise from just above the bottle while fading out.
    pub fn show(&self, scheduler: &mut Scheduler, now_ms: f64, amount: u32, block_height: f32) {
        self.amount.set(amount);
        self.visible.set(true);
        self.y.set(3.0);
        self.opacity.set(1.0);

        scheduler.drive(0.7, &self.y, block_height + 6.0, Easing::Linear, 0.0, now_ms);
        let vis = self.visible.clone();
        let op = self.opacity.clone();
        scheduler.tween(0.7, 1.0, 0.0, Easing::Linear, 0.0, now_ms, move |v, fin| {
            op.set(v);
            if fin {
                vis.set(false);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn run_60hz(sched: &mut Scheduler, start_ms: f64, seconds: f64) -> f64 {
        let dt = 1000.0 / 60.0;
        let steps = (seconds * 60.0).ceil() as usize;
        let mut now = start_ms;
        for _ in 0..steps {
            now += dt;
            sched.step(now);
        }
        now
    }

    #[test]
    fn test_camera_reaches_focus() {
        let mut sched = Scheduler::new();
        let camera = Camera::new();
        camera.follow(&mut sched, 0.0, Vec3::new(19.0, 0.0, -12.0));
        run_60hz(&mut sched, 0.0, 1.0);
        assert_eq!(camera.x.get(), 9.0);
        assert_eq!(camera.y.get(), 10.0);
        assert_eq!(camera.z.get(), -2.0);
        assert_eq!(camera.target_x.get(), 19.0);
        assert_eq!(camera.target_z.get(), -12.0);
    }

    #[test]
    fn test_scatter_shows_then_hides() {
        let mut sched = Scheduler::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let pool = ParticleSystem::new();
        pool.scatter(&mut sched, &mut rng, 0.0, 0.94);

        run_60hz(&mut sched, 0.0, 0.25);
        assert!(pool.visible_count() > 0, "burst never became visible");

        run_60hz(&mut sched, 250.0, 1.0);
        assert_eq!(pool.visible_count(), 0, "burst never finished");
        assert!(sched.is_empty());
    }

    #[test]
    fn test_reset_freezes_stale_tweens() {
        let mut sched = Scheduler::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let pool = ParticleSystem::new();
        pool.scatter(&mut sched, &mut rng, 0.0, 0.94);
        run_60hz(&mut sched, 0.0, 0.1);

        pool.reset();
        assert_eq!(pool.visible_count(), 0);
        // Stale tweens keep stepping but may no longer touch the pool
        run_60hz(&mut sched, 100.0, 1.0);
        assert_eq!(pool.visible_count(), 0);
    }

    #[test]
    fn test_score_float_fades_out() {
        let mut sched = Scheduler::new();
        let float = ScoreFloat::new();
        float.show(&mut sched, 0.0, 6, 10.0);
        assert!(float.visible.get());

        run_60hz(&mut sched, 0.0, 0.3);
        let mid = float.opacity.get();
        assert!(mid > 0.0 && mid < 1.0);
        assert!(float.y.get() > 3.0);

        run_60hz(&mut sched, 300.0, 0.6);
        assert!(!float.visible.get());
        assert_eq!(float.opacity.get(), 0.0);
        assert_eq!(float.y.get(), 16.0);
    }
}
