//! Collision detection and response between balls
//!
//! Balls are treated as equal-mass circles regardless of radius: on contact
//! they swap the velocity components along the line of centers, grow, and
//! get pushed apart so they don't stick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Body, Bounds};

/// How colliding pairs are enumerated within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPass {
    /// Each unordered pair (i < j) is checked once per frame
    #[default]
    UniquePairs,
    /// Each pair is checked from both members' side, so a single contact can
    /// be resolved twice per frame (doubling growth and counter speed)
    BothPerspectives,
}

/// What a single resolution changed beyond the pair itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollisionOutcome {
    /// Which member of the pair (0 = first, 1 = second) reached the threshold
    pub crowned: Option<usize>,
}

/// Flip velocity components for any wall the body currently pokes through
///
/// Uses the pre-step position, so it must run before integration.
pub fn reflect_off_walls(body: &mut Body, bounds: &Bounds) {
    if bounds.outside_x(body.pos, body.radius) {
        body.vel.x = -body.vel.x;
    }
    if bounds.outside_y(body.pos, body.radius) {
        body.vel.y = -body.vel.y;
    }
}

/// Strict overlap test (touching circles do not collide)
#[inline]
pub fn bodies_collide(a: &Body, b: &Body) -> bool {
    a.pos.distance(b.pos) < a.radius + b.radius
}

/// Unit vector from `a` toward `b`
///
/// Coincident centers have no defined direction; angle 0 (+X) is used.
pub fn collision_normal(a: Vec2, b: Vec2) -> Vec2 {
    let delta = b - a;
    let angle = if delta.length_squared() > 0.0 {
        delta.y.atan2(delta.x)
    } else {
        0.0
    };
    Vec2::from_angle(angle)
}

/// Apply a full collision response to an overlapping pair
///
/// Grows both radii, bumps both counters, starts the flash cue, exchanges
/// the normal velocity components and separates the pair by the overlap.
/// `first` is checked against `threshold` before `second`.
pub fn resolve_collision(
    first: &mut Body,
    second: &mut Body,
    growth: f32,
    threshold: u32,
    flash_ticks: u32,
) -> CollisionOutcome {
    let distance = first.pos.distance(second.pos);

    first.radius += growth;
    second.radius += growth;
    first.collision_count += 1;
    second.collision_count += 1;

    let crowned = if first.collision_count >= threshold {
        Some(0)
    } else if second.collision_count >= threshold {
        Some(1)
    } else {
        None
    };

    first.flash_ticks = flash_ticks;
    second.flash_ticks = flash_ticks;

    // Rotate into the (normal, tangent) frame, swap normals, rotate back
    let normal = collision_normal(first.pos, second.pos);
    let tangent = normal.perp();

    let n1 = first.vel.dot(normal);
    let t1 = first.vel.dot(tangent);
    let n2 = second.vel.dot(normal);
    let t2 = second.vel.dot(tangent);

    first.vel = normal * n2 + tangent * t1;
    second.vel = normal * n1 + tangent * t2;

    // Each side takes half the overlap, measured with the grown radii
    let overlap = (first.radius + second.radius - distance) / 2.0;
    first.pos -= normal * overlap;
    second.pos += normal * overlap;

    CollisionOutcome { crowned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Color;

    fn body(x: f32, y: f32, vx: f32, vy: f32) -> Body {
        Body::new(Vec2::new(x, y), Vec2::new(vx, vy), 20.0, Color::Red)
    }

    #[test]
    fn test_reflect_right_wall() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut b = body(785.0, 300.0, 3.0, 1.0);
        reflect_off_walls(&mut b, &bounds);
        assert_eq!(b.vel, Vec2::new(-3.0, 1.0));
    }

    #[test]
    fn test_reflect_corner_flips_both() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut b = body(10.0, 595.0, -2.0, 2.0);
        reflect_off_walls(&mut b, &bounds);
        assert_eq!(b.vel, Vec2::new(2.0, -2.0));
    }

    #[test]
    fn test_no_reflect_inside() {
        let bounds = Bounds::new(800.0, 600.0);
        let mut b = body(400.0, 300.0, -2.0, 2.0);
        reflect_off_walls(&mut b, &bounds);
        assert_eq!(b.vel, Vec2::new(-2.0, 2.0));
    }

    #[test]
    fn test_collide_is_strict() {
        let a = body(100.0, 100.0, 0.0, 0.0);
        assert!(bodies_collide(&a, &body(139.0, 100.0, 0.0, 0.0)));
        assert!(!bodies_collide(&a, &body(140.0, 100.0, 0.0, 0.0)));
    }

    #[test]
    fn test_normal_points_from_first_to_second() {
        let n = collision_normal(Vec2::new(0.0, 0.0), Vec2::new(0.0, 5.0));
        assert!(n.x.abs() < 1e-6);
        assert!((n.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normal_coincident_centers() {
        let p = Vec2::new(50.0, 50.0);
        let n = collision_normal(p, p);
        assert!(n.is_finite());
        assert!((n.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlapping_pair_grows_and_separates() {
        let mut a = body(100.0, 100.0, 0.0, 0.0);
        let mut b = body(115.0, 100.0, 0.0, 0.0);

        let outcome = resolve_collision(&mut a, &mut b, 0.5, 50, 5);

        assert_eq!(outcome.crowned, None);
        assert_eq!(a.radius, 20.5);
        assert_eq!(b.radius, 20.5);
        assert_eq!(a.collision_count, 1);
        assert_eq!(b.collision_count, 1);
        assert_eq!(a.flash_ticks, 5);
        assert_eq!(b.flash_ticks, 5);
        assert!(a.pos.distance(b.pos) >= 41.0 - 1e-3);
        // Pushed apart symmetrically along X
        assert!((a.pos.x - 87.0).abs() < 1e-3);
        assert!((b.pos.x - 128.0).abs() < 1e-3);
    }

    #[test]
    fn test_head_on_exchanges_velocities() {
        let mut a = body(100.0, 100.0, 3.0, 0.0);
        let mut b = body(130.0, 100.0, -1.0, 0.0);
        resolve_collision(&mut a, &mut b, 0.5, 50, 5);
        assert!((a.vel.x - -1.0).abs() < 1e-5);
        assert!((b.vel.x - 3.0).abs() < 1e-5);
        assert!(a.vel.y.abs() < 1e-5 && b.vel.y.abs() < 1e-5);
    }

    #[test]
    fn test_tangential_component_kept() {
        // Centers aligned on X: Y velocity is purely tangential
        let mut a = body(100.0, 100.0, 2.0, 1.5);
        let mut b = body(130.0, 100.0, 0.0, -0.5);
        resolve_collision(&mut a, &mut b, 0.5, 50, 5);
        assert!((a.vel.y - 1.5).abs() < 1e-5);
        assert!((b.vel.y - -0.5).abs() < 1e-5);
        assert!(a.vel.x.abs() < 1e-5);
        assert!((b.vel.x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_coincident_pair_does_not_produce_nan() {
        let mut a = body(200.0, 200.0, 1.0, 1.0);
        let mut b = body(200.0, 200.0, -1.0, 0.0);
        resolve_collision(&mut a, &mut b, 0.5, 50, 5);
        assert!(a.pos.is_finite() && b.pos.is_finite());
        assert!(a.vel.is_finite() && b.vel.is_finite());
        assert!(a.pos.distance(b.pos) >= 41.0 - 1e-3);
    }

    #[test]
    fn test_threshold_prefers_first() {
        let mut a = body(100.0, 100.0, 0.0, 0.0);
        let mut b = body(110.0, 100.0, 0.0, 0.0);
        a.collision_count = 49;
        b.collision_count = 49;
        let outcome = resolve_collision(&mut a, &mut b, 0.5, 50, 5);
        assert_eq!(outcome.crowned, Some(0));
    }

    #[test]
    fn test_threshold_second_only() {
        let mut a = body(100.0, 100.0, 0.0, 0.0);
        let mut b = body(110.0, 100.0, 0.0, 0.0);
        b.collision_count = 49;
        let outcome = resolve_collision(&mut a, &mut b, 0.5, 50, 5);
        assert_eq!(outcome.crowned, Some(1));
    }
}
