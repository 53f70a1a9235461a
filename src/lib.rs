//! Brick Breaker - a classic Breakout arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Player preferences (LocalStorage-backed on web)
//! - `audio`: Procedural Web Audio sound effects (web only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions - origin at center, +y up
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    pub const ARENA_HALF_WIDTH: f32 = ARENA_WIDTH / 2.0;
    pub const ARENA_HALF_HEIGHT: f32 = ARENA_HEIGHT / 2.0;

    /// Paddle defaults - fixed height near the bottom edge
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_CENTER_Y: f32 = -ARENA_HALF_HEIGHT + 50.0;
    /// Horizontal speed while an arrow key is held (pixels/s)
    pub const PADDLE_KEY_SPEED: f32 = 420.0;
    /// Clamp on mouse tracking speed so the paddle can't teleport
    pub const PADDLE_TRACK_SPEED: f32 = 1600.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_SPEED: f32 = 300.0;
    /// Hard ceiling on ball speed after score speed-ups
    pub const BALL_MAX_SPEED: f32 = 640.0;
    /// Multiplicative speed-up applied every [`SPEED_UP_EVERY`] points
    pub const BALL_SPEED_UP: f32 = 1.1;
    pub const SPEED_UP_EVERY: u32 = 5;

    /// Block grid
    pub const BLOCK_WIDTH: f32 = 80.0;
    pub const BLOCK_HEIGHT: f32 = 30.0;
    pub const BLOCK_SPACING: f32 = 10.0;
    pub const BLOCK_ROWS: u32 = 5;
    pub const BLOCK_COLS: u32 = 8;
    /// Center y of the top block row
    pub const BLOCK_TOP_ROW_Y: f32 = ARENA_HALF_HEIGHT - 100.0;

    pub const STARTING_LIVES: u8 = 3;

    /// Fraction of ball speed added sideways at the paddle edge
    pub const PADDLE_DEFLECT: f32 = 0.6;
    /// Fraction of paddle velocity transferred to the ball ("english")
    pub const PADDLE_ENGLISH: f32 = 0.25;
}
