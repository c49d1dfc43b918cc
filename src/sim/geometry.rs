//! 2D polygon predicates for hit classification
//!
//! Block footprints are polygons in the world X/Z plane; `Vec2.x` is world X
//! and `Vec2.y` is world Z throughout.

use glam::Vec2;

/// Ray-crossing point-in-polygon test over the vertices in their given
/// winding order.
///
/// A point exactly on an edge is treated as *outside*. Ties resolve
/// conservatively so a landing that grazes a block edge never reads as a hit,
/// which keeps outcomes deterministic across platforms.
pub fn point_in_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let a = vertices[j];
        let b = vertices[i];

        if on_segment(point, a, b) {
            return false;
        }

        // Edge straddles the horizontal ray through the point
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// True if `p` lies exactly on the closed segment `a`-`b`.
fn on_segment(p: Vec2, a: Vec2, b: Vec2) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross != 0.0 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn unit_square() -> Vec<Vec2> {
        vec![
            Vec2::new(-1.0, -1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(-1.0, 1.0),
        ]
    }

    #[test]
    fn test_interior_point() {
        assert!(point_in_polygon(Vec2::ZERO, &unit_square()));
        assert!(point_in_polygon(Vec2::new(0.99, -0.99), &unit_square()));
    }

    #[test]
    fn test_exterior_point() {
        assert!(!point_in_polygon(Vec2::new(2.0, 0.0), &unit_square()));
        assert!(!point_in_polygon(Vec2::new(0.0, -50.0), &unit_square()));
    }

    #[test]
    fn test_boundary_is_outside() {
        // Documented tie-break: edge and corner points are not inside
        assert!(!point_in_polygon(Vec2::new(1.0, 0.0), &unit_square()));
        assert!(!point_in_polygon(Vec2::new(0.0, -1.0), &unit_square()));
        assert!(!point_in_polygon(Vec2::new(1.0, 1.0), &unit_square()));
    }

    #[test]
    fn test_concave_polygon() {
        // L-shape; the notch at (1.5, 1.5) is outside
        let poly = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        assert!(point_in_polygon(Vec2::new(0.5, 0.5), &poly));
        assert!(point_in_polygon(Vec2::new(0.5, 1.5), &poly));
        assert!(!point_in_polygon(Vec2::new(1.5, 1.5), &poly));
    }

    #[test]
    fn test_degenerate_polygon() {
        assert!(!point_in_polygon(Vec2::ZERO, &[]));
        assert!(!point_in_polygon(Vec2::ZERO, &[Vec2::ONE, Vec2::ZERO]));
    }

    proptest! {
        #[test]
        fn prop_rect_agrees_with_bounds(
            cx in -50.0f32..50.0, cz in -50.0f32..50.0,
            hw in 0.5f32..20.0, hh in 0.5f32..20.0,
            px in -100.0f32..100.0, pz in -100.0f32..100.0,
        ) {
            let rect = vec![
                Vec2::new(cx - hw, cz - hh),
                Vec2::new(cx + hw, cz - hh),
                Vec2::new(cx + hw, cz + hh),
                Vec2::new(cx - hw, cz + hh),
            ];
            let p = Vec2::new(px, pz);
            let strictly_inside =
                px > cx - hw && px < cx + hw && pz > cz - hh && pz < cz + hh;
            let strictly_outside =
                px < cx - hw || px > cx + hw || pz < cz - hh || pz > cz + hh;
            if strictly_inside {
                prop_assert!(point_in_polygon(p, &rect));
            } else if strictly_outside {
                prop_assert!(!point_in_polygon(p, &rect));
            }
            // Exactly-on-boundary samples are covered by the unit tests
        }

        #[test]
        fn prop_far_outside_bbox_is_false(
            px in 200.0f32..1000.0, pz in -1000.0f32..1000.0,
        ) {
            prop_assert!(!point_in_polygon(Vec2::new(px, pz), &unit_square()));
        }
    }
}
