//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, ball_rect_collision, ball_wall_collision};
pub use rect::Aabb;
pub use state::{
    Ball, BallState, Block, GameEvent, GameOutcome, GamePhase, GameState, Paddle, Particle,
};
pub use tick::{TickInput, layout_blocks, tick};
