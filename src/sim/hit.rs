//! Hit classification
//!
//! Compares the predicted landing point against the footprints of the next
//! and current blocks and buckets the flight into one of seven outcomes.
//! The probe layout and evaluation order are part of the observable
//! contract: which lateral probes count as "back" versus "front" decides
//! which fall pose plays on a near-miss, so the mapping is fixed and never
//! re-derived from the travel axis.

use glam::Vec2;

use super::geometry::point_in_polygon;
use crate::consts::CENTER_HIT_RADIUS;

/// Categorical outcome of a resolved flight.
///
/// "No outcome" (nothing matched, or the flight has not resolved yet) is
/// represented as `None` at the call site, a normal non-error state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightOutcome {
    /// Landed on the next block within [`CENTER_HIT_RADIUS`] of its center.
    HitNextCenter,
    /// Landed on the next block, off-center.
    HitNextNormal,
    /// Landed back on the current block; the round continues unscored.
    HitCurrent,
    /// Clipped the far edge of the next block.
    GameOverNextBack,
    /// Clipped the far edge of the current block.
    GameOverCurrentBack,
    /// Clipped the near edge of the next block.
    GameOverNextFront,
    /// Next-block edge contact combined with a current-block back clip.
    GameOverBoth,
}

impl FlightOutcome {
    pub fn is_game_over(self) -> bool {
        matches!(
            self,
            FlightOutcome::GameOverNextBack
                | FlightOutcome::GameOverCurrentBack
                | FlightOutcome::GameOverNextFront
                | FlightOutcome::GameOverBoth
        )
    }

    /// True for the outcomes that advance the round to a new block.
    pub fn lands_on_next(self) -> bool {
        matches!(
            self,
            FlightOutcome::HitNextCenter | FlightOutcome::HitNextNormal
        )
    }
}

/// Classify a landing point against the next and current block footprints.
///
/// `half_width` is half the flying body's width; the four probes sample
/// edge contact at that offset. Back probes are `(x - hw, z)` and
/// `(x, z + hw)`, front probes `(x + hw, z)` and `(x, z - hw)`, for both
/// travel axes.
///
/// Evaluation order: next-block interior first (center vs. normal), then
/// next-block back probes, then front probes. The current block is tested
/// independently, not short-circuited: an interior hit is `HitCurrent`, a
/// back-probe hit is `GameOverCurrentBack`, upgraded to `GameOverBoth`
/// when a next-block outcome also matched. `GameOverBoth` takes
/// precedence over every other result.
pub fn classify(
    landing: Vec2,
    next_vertices: &[Vec2],
    next_center: Vec2,
    current_vertices: &[Vec2],
    half_width: f32,
) -> Option<FlightOutcome> {
    let back_probes = [
        Vec2::new(landing.x - half_width, landing.y),
        Vec2::new(landing.x, landing.y + half_width),
    ];
    let front_probes = [
        Vec2::new(landing.x + half_width, landing.y),
        Vec2::new(landing.x, landing.y - half_width),
    ];

    let next_outcome = if point_in_polygon(landing, next_vertices) {
        if landing.distance(next_center) < CENTER_HIT_RADIUS {
            Some(FlightOutcome::HitNextCenter)
        } else {
            Some(FlightOutcome::HitNextNormal)
        }
    } else if back_probes.iter().any(|p| point_in_polygon(*p, next_vertices)) {
        Some(FlightOutcome::GameOverNextBack)
    } else if front_probes.iter().any(|p| point_in_polygon(*p, next_vertices)) {
        Some(FlightOutcome::GameOverNextFront)
    } else {
        None
    };

    let current_outcome = if point_in_polygon(landing, current_vertices) {
        Some(FlightOutcome::HitCurrent)
    } else if back_probes.iter().any(|p| point_in_polygon(*p, current_vertices)) {
        if next_outcome.is_some() {
            Some(FlightOutcome::GameOverBoth)
        } else {
            Some(FlightOutcome::GameOverCurrentBack)
        }
    } else {
        None
    };

    match current_outcome {
        Some(FlightOutcome::GameOverBoth) => Some(FlightOutcome::GameOverBoth),
        _ => next_outcome.or(current_outcome),
    }
}
