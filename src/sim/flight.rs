//! Analytic flight prediction
//!
//! The bottle's landing spot is known the instant it launches: solve the
//! vertical equation of motion for the return-to-plane time, then displace
//! along the launch axis. The visual flight that follows is presentation;
//! classification runs against this prediction.

use glam::Vec2;

use crate::round2;
use crate::tuning::GameTuning;

/// Launch velocity along the travel axis (`vx`) and vertically (`vy`).
/// Set once per round on input release; read-only during flight.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity2 {
    pub vx: f32,
    pub vy: f32,
}

/// A predicted landing: remaining forward-travel time and the landing point
/// in world X/Z, both rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landing {
    pub time: f32,
    pub point: Vec2,
}

/// Compute launch velocity from press duration, clamped and rounded per the
/// input contract: `vx = min(ms/6, 400)`, `vy = min(150 + ms/20, 400)`.
pub fn launch_velocity(duration_ms: f32, tuning: &GameTuning) -> Velocity2 {
    let vx = (duration_ms / tuning.horizontal_press_divisor).min(tuning.max_speed);
    let vy = (tuning.base_vertical_speed + duration_ms / tuning.vertical_press_divisor)
        .min(tuning.max_speed);
    Velocity2 {
        vx: round2(vx),
        vy: round2(vy),
    }
}

/// Predict where a flight starting `init_y` above the landing plane comes
/// down.
///
/// Two-stage time computation: the full symmetric flight time `2*vy/g` minus
/// the early-return time `(vy - sqrt(vy^2 - 2*init_y*g)) / g` (the positive
/// quadratic root restricted to the physically valid branch). The remainder
/// is the forward-travel time; starting exactly on the plane makes it the
/// full symmetric time.
///
/// Precondition: `vy^2 >= 2 * init_y * gravity`. Callers produce `init_y`
/// from the charge shrink, which is bounded far below that; a violation is a
/// caller bug, not a handled error.
pub fn predict_landing(
    velocity: Velocity2,
    gravity: f32,
    init_y: f32,
    origin: Vec2,
    axis: Vec2,
) -> Landing {
    let full = 2.0 * velocity.vy / gravity;
    let discriminant = velocity.vy * velocity.vy - 2.0 * init_y * gravity;
    debug_assert!(
        discriminant >= 0.0,
        "launch too weak to clear init_y: vy={} init_y={}",
        velocity.vy,
        init_y
    );
    let early = round2((velocity.vy - discriminant.max(0.0).sqrt()) / gravity);
    let time = round2(full - early);

    let travel = axis.normalize_or_zero() * (velocity.vx * time);
    let point = origin + travel;
    Landing {
        time,
        point: Vec2::new(round2(point.x), round2(point.y)),
    }
}

/// Invert the press clamps and the predictor: the press duration (ms) whose
/// flight covers `distance` when launched from the landing plane.
///
/// Valid while both clamps are slack; distances beyond the clamped reach
/// return the duration that saturates toward it. Used by the demo autopilot
/// and the round tests.
pub fn press_duration_for(distance: f32, tuning: &GameTuning) -> f32 {
    // distance = (d/hx) * 2*(vy0 + d/hy)/g  =>  d^2 + hy*vy0*d - hx*hy*g*distance/2 = 0
    let hx = tuning.horizontal_press_divisor;
    let hy = tuning.vertical_press_divisor;
    let b = hy * tuning.base_vertical_speed;
    let c = hx * hy * tuning.gravity * distance / 2.0;
    let d = (-b + (b * b + 4.0 * c).sqrt()) / 2.0;
    d.min(tuning.max_speed * hx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_symmetric_time_from_plane() {
        // Starting on the plane, landing time is exactly 2*vy/g
        let tuning = GameTuning::default();
        let v = Velocity2 { vx: 0.0, vy: 300.0 };
        let landing = predict_landing(v, tuning.gravity, 0.0, Vec2::ZERO, Vec2::X);
        assert_eq!(landing.time, 2.0 * 300.0 / tuning.gravity);
    }

    #[test]
    fn test_elevated_start_shortens_travel() {
        // Starting below the plane (init_y counts the shrink sink) trims the
        // forward-travel time by the early-return term
        let v = Velocity2 { vx: 100.0, vy: 200.0 };
        let landing = predict_landing(v, 1000.0, 10.0, Vec2::ZERO, Vec2::X);
        // full = 0.4, early = round2((200 - sqrt(40000 - 20000))/1000) = 0.06
        assert_eq!(landing.time, 0.34);
        assert_eq!(landing.point, Vec2::new(34.0, 0.0));
    }

    #[test]
    fn test_displacement_follows_axis() {
        let v = Velocity2 { vx: 100.0, vy: 300.0 };
        let landing = predict_landing(v, 1000.0, 0.0, Vec2::new(5.0, -2.0), Vec2::new(0.0, -1.0));
        assert_eq!(landing.point, Vec2::new(5.0, -62.0));
    }

    #[test]
    fn test_press_clamps_and_rounding() {
        let tuning = GameTuning::default();
        let v = launch_velocity(600.0, &tuning);
        assert_eq!(v.vx, 100.00);
        assert_eq!(v.vy, 180.00);

        // Both components clamp at 400
        let v = launch_velocity(1_000_000.0, &tuning);
        assert_eq!(v.vx, 400.0);
        assert_eq!(v.vy, 400.0);
    }

    #[test]
    fn test_duration_solver_round_trips() {
        let tuning = GameTuning::default();
        for distance in [20.0f32, 28.0, 38.0, 40.0] {
            let ms = press_duration_for(distance, &tuning);
            let v = launch_velocity(ms, &tuning);
            let landing = predict_landing(v, tuning.gravity, 0.0, Vec2::ZERO, Vec2::X);
            let err = (landing.point.x - distance).abs();
            assert!(err < 0.6, "distance {distance}: landed {} off by {err}", landing.point.x);
        }
    }
}
