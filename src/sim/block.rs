//! Target blocks
//!
//! Blocks are immutable once spawned except for `shrink_scale`, a purely
//! visual squash driven while the player charges and released with a bounce
//! on launch. Footprints are polygons in world X/Z for hit classification.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{AnimValue, Scheduler};
use super::tween::Easing;
use crate::tuning::GameTuning;

/// Per-frame visual squash while charging.
pub const SHRINK_DELTA: f32 = 0.005;
/// Squash floor; charging past this holds the pose.
pub const MIN_SHRINK_SCALE: f32 = 0.55;
/// Radial segments of a cylinder footprint, matching the rendered mesh.
const CYLINDER_SEGMENTS: usize = 20;

/// Block shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Cuboid,
    Cylinder,
}

/// Travel axis for a round: +X or -Z in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Z,
}

impl Axis {
    /// Unit travel vector in the X/Z plane (`Vec2.y` is world Z).
    #[inline]
    pub fn unit(self) -> Vec2 {
        match self {
            Axis::X => Vec2::X,
            Axis::Z => Vec2::NEG_Y,
        }
    }
}

/// What the view layer needs to build a block mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub kind: BlockKind,
    pub x: f32,
    pub z: f32,
    pub width: f32,
}

/// A target block.
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    /// Footprint center in world X/Z.
    pub center: Vec2,
    pub width: f32,
    /// Visual vertical scale, 1.0 at rest.
    pub shrink_scale: AnimValue,
}

impl Block {
    pub fn new(kind: BlockKind, center: Vec2, width: f32) -> Self {
        Self {
            kind,
            center,
            width,
            shrink_scale: AnimValue::new(1.0),
        }
    }

    pub fn cuboid(x: f32, z: f32, width: f32) -> Self {
        Self::new(BlockKind::Cuboid, Vec2::new(x, z), width)
    }

    pub fn cylinder(x: f32, z: f32, width: f32) -> Self {
        Self::new(BlockKind::Cylinder, Vec2::new(x, z), width)
    }

    /// Footprint polygon in world X/Z: four corners for a cuboid, a
    /// [`CYLINDER_SEGMENTS`]-gon for a cylinder.
    pub fn vertices(&self) -> Vec<Vec2> {
        let half = self.width / 2.0;
        match self.kind {
            BlockKind::Cuboid => vec![
                self.center + Vec2::new(-half, -half),
                self.center + Vec2::new(half, -half),
                self.center + Vec2::new(half, half),
                self.center + Vec2::new(-half, half),
            ],
            BlockKind::Cylinder => (0..CYLINDER_SEGMENTS)
                .map(|i| {
                    let theta = std::f32::consts::TAU * i as f32 / CYLINDER_SEGMENTS as f32;
                    self.center + half * Vec2::new(theta.cos(), theta.sin())
                })
                .collect(),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.center
    }

    /// One charging frame of visual squash.
    pub fn shrink_step(&self) {
        self.shrink_scale
            .set((self.shrink_scale.get() - SHRINK_DELTA).max(MIN_SHRINK_SCALE));
    }

    /// Pop back to full height on launch.
    pub fn rebound(&self, scheduler: &mut Scheduler, now_ms: f64) {
        scheduler.drive(0.5, &self.shrink_scale, 1.0, Easing::BounceOut, 0.0, now_ms);
    }

    pub fn descriptor(&self) -> BlockDescriptor {
        BlockDescriptor {
            kind: self.kind,
            x: self.center.x,
            z: self.center.y,
            width: self.width,
        }
    }
}

/// A freshly spawned "next" block and the travel direction toward it.
#[derive(Debug, Clone)]
pub struct SpawnPlan {
    pub block: Block,
    pub direction: Axis,
}

/// Roll the next target: kind, travel direction, width and gap all come from
/// the seeded round RNG so runs replay deterministically.
pub fn spawn_next(rng: &mut Pcg32, base: &Block, tuning: &GameTuning) -> SpawnPlan {
    let kind = if rng.random::<f32>() > 0.3 {
        BlockKind::Cuboid
    } else {
        BlockKind::Cylinder
    };
    let direction = if rng.random_range(0..2u8) == 0 {
        Axis::X
    } else {
        Axis::Z
    };
    let width = (rng.random::<f32>() * tuning.block_width_span).round() + tuning.block_width_min;
    let gap = (rng.random::<f32>() * tuning.block_gap_span).round() + tuning.block_gap_min;

    let center = base.center + direction.unit() * gap;
    SpawnPlan {
        block: Block::new(kind, center, width),
        direction,
    }
}
