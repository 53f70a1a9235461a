//! Shape generation for 2D primitives and scene assembly

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::settings::Settings;
use crate::sim::state::TrailPoint;
use crate::sim::{Aabb, BallState, GameState};

/// Interpolate color based on velocity (slow=blue, medium=green, fast=red/orange)
fn velocity_color(speed: f32, alpha: f32) -> [f32; 4] {
    // Normalize speed to 0-1 range
    let t = ((speed - BALL_START_SPEED) / (BALL_MAX_SPEED - BALL_START_SPEED)).clamp(0.0, 1.0);

    // Color gradient: blue (slow) -> cyan -> green -> yellow -> orange -> red (fast)
    let (r, g, b) = if t < 0.25 {
        // Blue to cyan
        let u = t / 0.25;
        (0.2, 0.4 + 0.4 * u, 1.0)
    } else if t < 0.5 {
        // Cyan to green
        let u = (t - 0.25) / 0.25;
        (0.2, 0.8, 1.0 - 0.6 * u)
    } else if t < 0.75 {
        // Green to yellow
        let u = (t - 0.5) / 0.25;
        (0.2 + 0.8 * u, 0.8, 0.4 - 0.2 * u)
    } else {
        // Yellow to red/orange
        let u = (t - 0.75) / 0.25;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };

    [r, g, b, alpha]
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(aabb: &Aabb, color: [f32; 4]) -> Vec<Vertex> {
    let (min, max) = (aabb.min, aabb.max);
    vec![
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, max.y, color),
        Vertex::new(min.x, max.y, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a ball trail with velocity-based colors
pub fn ball_trail(trail: &[TrailPoint], ball_radius: f32) -> Vec<Vertex> {
    if trail.len() < 2 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity(trail.len() * 6);
    let trail_len = trail.len() as f32;

    for i in 0..trail.len() - 1 {
        let p1 = &trail[i];
        let p2 = &trail[i + 1];

        // Fade alpha and size along trail
        let t1 = i as f32 / trail_len;
        let t2 = (i + 1) as f32 / trail_len;

        let alpha1 = (1.0 - t1) * 0.8;
        let alpha2 = (1.0 - t2) * 0.8;

        let width1 = ball_radius * (1.0 - t1 * 0.7);
        let width2 = ball_radius * (1.0 - t2 * 0.7);

        let color1 = velocity_color(p1.speed, alpha1);
        let color2 = velocity_color(p2.speed, alpha2);

        // Direction from p1 to p2
        let dir = (p2.pos - p1.pos).normalize_or_zero();
        // Perpendicular for width
        let perp = Vec2::new(-dir.y, dir.x);

        // Quad corners
        let v1a = p1.pos + perp * width1;
        let v1b = p1.pos - perp * width1;
        let v2a = p2.pos + perp * width2;
        let v2b = p2.pos - perp * width2;

        // Two triangles
        vertices.push(Vertex::new(v1a.x, v1a.y, color1));
        vertices.push(Vertex::new(v1b.x, v1b.y, color1));
        vertices.push(Vertex::new(v2a.x, v2a.y, color2));

        vertices.push(Vertex::new(v2a.x, v2a.y, color2));
        vertices.push(Vertex::new(v1b.x, v1b.y, color1));
        vertices.push(Vertex::new(v2b.x, v2b.y, color2));
    }

    vertices
}

/// Thickness of the wall outline drawn just outside the arena
const WALL_THICKNESS: f32 = 6.0;

/// Build the full vertex list for one frame of the scene
pub fn scene(state: &GameState, settings: &Settings) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(2048);

    // Screen shake: small deterministic jitter scaled by the shake amount
    let shake = if settings.effective_screen_shake() {
        let t = state.time_ticks as u32;
        let hash = t.wrapping_mul(2654435761);
        let sx = ((hash % 1000) as f32 / 1000.0 - 0.5) * 10.0 * state.screen_shake;
        let sy = (((hash >> 12) % 1000) as f32 / 1000.0 - 0.5) * 10.0 * state.screen_shake;
        Vec2::new(sx, sy)
    } else {
        Vec2::ZERO
    };

    // Walls: left, right and ceiling; the bottom stays open
    let left = Aabb::new(
        Vec2::new(-ARENA_HALF_WIDTH - WALL_THICKNESS, -ARENA_HALF_HEIGHT),
        Vec2::new(-ARENA_HALF_WIDTH, ARENA_HALF_HEIGHT + WALL_THICKNESS),
    );
    let right = Aabb::new(
        Vec2::new(ARENA_HALF_WIDTH, -ARENA_HALF_HEIGHT),
        Vec2::new(ARENA_HALF_WIDTH + WALL_THICKNESS, ARENA_HALF_HEIGHT + WALL_THICKNESS),
    );
    let top = Aabb::new(
        Vec2::new(-ARENA_HALF_WIDTH, ARENA_HALF_HEIGHT),
        Vec2::new(ARENA_HALF_WIDTH, ARENA_HALF_HEIGHT + WALL_THICKNESS),
    );
    for wall in [&left, &right, &top] {
        vertices.extend(rect(&wall.translate(shake), colors::WALL));
    }

    // Blocks, colored by row
    for block in &state.blocks {
        vertices.extend(rect(
            &block.rect.translate(shake),
            colors::block_row(block.row),
        ));
    }

    // Paddle
    vertices.extend(rect(&state.paddle.rect().translate(shake), colors::PADDLE));

    // Ball trail behind the ball
    if settings.trails && matches!(state.ball.state, BallState::Free) {
        let quality = settings.quality.trail_quality();
        let keep = ((state.ball.trail.len() as f32 * quality) as usize).max(2);
        let trail = &state.ball.trail[..keep.min(state.ball.trail.len())];
        let mut trail_verts = ball_trail(trail, state.ball.radius);
        for v in &mut trail_verts {
            v.position[0] += shake.x;
            v.position[1] += shake.y;
        }
        vertices.extend(trail_verts);
    }

    // Ball
    vertices.extend(circle(
        state.ball.pos + shake,
        state.ball.radius,
        colors::BALL,
        24,
    ));

    // Debris particles
    if settings.particles {
        let cap = settings.max_particles();
        for particle in state.particles.iter().take(cap) {
            let color_base = colors::block_row(particle.color);
            let color = [
                color_base[0],
                color_base[1],
                color_base[2],
                particle.life.clamp(0.0, 1.0),
            ];
            let half = particle.size / 2.0;
            let quad = Aabb::from_center_size(particle.pos + shake, Vec2::splat(half * 2.0));
            vertices.extend(rect(&quad, color));
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameState, layout_blocks};

    #[test]
    fn test_rect_is_two_triangles() {
        let verts = rect(
            &Aabb::from_center_size(Vec2::ZERO, Vec2::new(10.0, 10.0)),
            [1.0; 4],
        );
        assert_eq!(verts.len(), 6);
    }

    #[test]
    fn test_circle_vertex_count() {
        let verts = circle(Vec2::ZERO, 5.0, [1.0; 4], 24);
        assert_eq!(verts.len(), 24 * 3);
    }

    #[test]
    fn test_scene_covers_all_blocks() {
        let mut state = GameState::new(1);
        layout_blocks(&mut state);
        let settings = Settings::default();

        let verts = scene(&state, &settings);
        // 3 walls + 40 blocks + paddle = 44 rects minimum, plus the ball fan
        assert!(verts.len() >= 44 * 6 + 24 * 3);
    }

    #[test]
    fn test_trail_needs_two_points() {
        assert!(ball_trail(&[], 8.0).is_empty());
        assert!(
            ball_trail(
                &[TrailPoint {
                    pos: Vec2::ZERO,
                    speed: 100.0
                }],
                8.0
            )
            .is_empty()
        );
    }
}
