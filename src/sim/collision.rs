//! Collision detection and response
//!
//! Breakout needs exactly one non-trivial test: a moving circle against an
//! axis-aligned rectangle. Everything else (walls) is a half-plane check.

use glam::Vec2;

use super::rect::Aabb;
use crate::consts::{ARENA_HALF_HEIGHT, ARENA_HALF_WIDTH};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a ball and an axis-aligned rectangle
///
/// Closest-point test: clamp the ball center to the box, then compare the
/// distance to that point against the ball radius. When the center is inside
/// the box (tunneling fallback), the normal is the axis of least penetration.
pub fn ball_rect_collision(ball_pos: Vec2, ball_radius: f32, rect: &Aabb) -> CollisionResult {
    let closest = rect.closest_point(ball_pos);
    let delta = ball_pos - closest;
    let dist_sq = delta.length_squared();

    if dist_sq > 0.0001 {
        // Center outside the box
        let dist = dist_sq.sqrt();
        if dist < ball_radius {
            return CollisionResult {
                hit: true,
                point: closest,
                normal: delta / dist,
                penetration: ball_radius - dist,
            };
        }
        return CollisionResult::miss();
    }

    // Center inside the box - shouldn't happen with proper substepping.
    // Push out along the face the center is nearest to.
    let to_left = ball_pos.x - rect.min.x;
    let to_right = rect.max.x - ball_pos.x;
    let to_bottom = ball_pos.y - rect.min.y;
    let to_top = rect.max.y - ball_pos.y;

    let min_depth = to_left.min(to_right).min(to_bottom).min(to_top);
    let normal = if min_depth == to_left {
        Vec2::new(-1.0, 0.0)
    } else if min_depth == to_right {
        Vec2::new(1.0, 0.0)
    } else if min_depth == to_bottom {
        Vec2::new(0.0, -1.0)
    } else {
        Vec2::new(0.0, 1.0)
    };

    CollisionResult {
        hit: true,
        point: ball_pos - normal * min_depth,
        normal,
        penetration: ball_radius + min_depth,
    }
}

/// Check collision with the left/right/top arena walls
///
/// The bottom edge is intentionally open - a ball crossing it is a lost
/// ball, not a bounce.
pub fn ball_wall_collision(ball_pos: Vec2, ball_radius: f32) -> CollisionResult {
    if ball_pos.x - ball_radius < -ARENA_HALF_WIDTH {
        return CollisionResult {
            hit: true,
            point: Vec2::new(-ARENA_HALF_WIDTH, ball_pos.y),
            normal: Vec2::new(1.0, 0.0),
            penetration: -ARENA_HALF_WIDTH - (ball_pos.x - ball_radius),
        };
    }
    if ball_pos.x + ball_radius > ARENA_HALF_WIDTH {
        return CollisionResult {
            hit: true,
            point: Vec2::new(ARENA_HALF_WIDTH, ball_pos.y),
            normal: Vec2::new(-1.0, 0.0),
            penetration: ball_pos.x + ball_radius - ARENA_HALF_WIDTH,
        };
    }
    if ball_pos.y + ball_radius > ARENA_HALF_HEIGHT {
        return CollisionResult {
            hit: true,
            point: Vec2::new(ball_pos.x, ARENA_HALF_HEIGHT),
            normal: Vec2::new(0.0, -1.0),
            penetration: ball_pos.y + ball_radius - ARENA_HALF_HEIGHT,
        };
    }

    CollisionResult::miss()
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ball_rect_collision_side() {
        let rect = Aabb::from_center_size(Vec2::ZERO, Vec2::new(80.0, 30.0));

        // Ball just left of the box, overlapping
        let result = ball_rect_collision(Vec2::new(-45.0, 0.0), 8.0, &rect);
        assert!(result.hit);
        assert!((result.normal.x - (-1.0)).abs() < 0.001);
        assert!(result.normal.y.abs() < 0.001);
        assert!((result.penetration - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_ball_rect_collision_top() {
        let rect = Aabb::from_center_size(Vec2::ZERO, Vec2::new(80.0, 30.0));

        // Ball above the box, overlapping
        let result = ball_rect_collision(Vec2::new(0.0, 20.0), 8.0, &rect);
        assert!(result.hit);
        assert!((result.normal.y - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_ball_rect_collision_corner() {
        let rect = Aabb::from_center_size(Vec2::ZERO, Vec2::new(80.0, 30.0));

        // Ball near the top-right corner, within radius of it
        let result = ball_rect_collision(Vec2::new(44.0, 19.0), 8.0, &rect);
        assert!(result.hit);
        // Normal points away from the corner, into the upper-right quadrant
        assert!(result.normal.x > 0.0 && result.normal.y > 0.0);
        // Corner normal is diagonal, not axis-aligned
        assert!(((result.normal.x / result.normal.y) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_ball_rect_collision_miss() {
        let rect = Aabb::from_center_size(Vec2::ZERO, Vec2::new(80.0, 30.0));
        let result = ball_rect_collision(Vec2::new(0.0, 40.0), 8.0, &rect);
        assert!(!result.hit);
    }

    #[test]
    fn test_ball_rect_collision_center_inside() {
        let rect = Aabb::from_center_size(Vec2::ZERO, Vec2::new(80.0, 30.0));

        // Center inside, nearest the top face
        let result = ball_rect_collision(Vec2::new(0.0, 12.0), 8.0, &rect);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, 1.0));
        assert!(result.penetration > 8.0);
    }

    #[test]
    fn test_wall_collision() {
        // Well inside - no collision
        assert!(!ball_wall_collision(Vec2::new(0.0, 0.0), 8.0).hit);

        // Left wall
        let result = ball_wall_collision(Vec2::new(-395.0, 0.0), 8.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(1.0, 0.0));

        // Top wall
        let result = ball_wall_collision(Vec2::new(0.0, 295.0), 8.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::new(0.0, -1.0));

        // Bottom edge is open
        assert!(!ball_wall_collision(Vec2::new(0.0, -295.0), 8.0).hit);
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    proptest! {
        #[test]
        fn reflect_preserves_speed(
            vx in -600.0_f32..600.0,
            vy in -600.0_f32..600.0,
            angle in 0.0_f32..std::f32::consts::TAU,
        ) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::new(angle.cos(), angle.sin());
            let r = reflect_velocity(v, n);
            prop_assert!((r.length() - v.length()).abs() < 0.01);
        }

        #[test]
        fn reflect_twice_is_identity(
            vx in -600.0_f32..600.0,
            vy in -600.0_f32..600.0,
            angle in 0.0_f32..std::f32::consts::TAU,
        ) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::new(angle.cos(), angle.sin());
            let r = reflect_velocity(reflect_velocity(v, n), n);
            prop_assert!((r - v).length() < 0.01);
        }

        #[test]
        fn rect_collision_normal_is_unit(
            px in -400.0_f32..400.0,
            py in -300.0_f32..300.0,
        ) {
            let rect = Aabb::from_center_size(Vec2::ZERO, Vec2::new(80.0, 30.0));
            let result = ball_rect_collision(Vec2::new(px, py), 10.0, &rect);
            if result.hit {
                prop_assert!((result.normal.length() - 1.0).abs() < 0.001);
                prop_assert!(result.penetration >= 0.0);
            }
        }
    }
}
