//! Game state and core simulation types
//!
//! Everything the tick function reads or writes lives here. The state is
//! deterministic: equal seeds and equal input sequences replay identically.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::rect::Aabb;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Ball attached to paddle, waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended
    GameOver,
}

/// How a finished run ended
///
/// `None` on the game-over screen means the player quit mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// Every block destroyed
    Won,
    /// All lives lost
    Lost,
}

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallState {
    /// Ball rides the paddle at the given x offset from paddle center
    Attached { offset: f32 },
    /// Ball is free-moving
    Free,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub speed: f32,
}

/// Maximum number of trail points to store
pub const TRAIL_LENGTH: usize = 20;

/// The ball
#[derive(Debug, Clone)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
    /// Cooldown ticks before paddle can be hit again (prevents sticking)
    pub paddle_cooldown: u32,
    /// Trail history for rendering (newest first)
    pub trail: Vec<TrailPoint>,
}

impl Ball {
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            state: BallState::Attached { offset: 0.0 },
            paddle_cooldown: 0,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Record current position to trail (call each tick when free)
    pub fn record_trail(&mut self) {
        let speed = self.vel.length();
        self.trail.insert(0, TrailPoint { pos: self.pos, speed });
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop();
        }
    }

    /// Clear trail (on respawn/attach)
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Update attached ball position based on paddle
    pub fn update_attached(&mut self, paddle: &Paddle) {
        if let BallState::Attached { offset } = self.state {
            // Sit just on top of the paddle
            self.pos = Vec2::new(
                paddle.x + offset,
                PADDLE_CENTER_Y + PADDLE_HEIGHT / 2.0 + self.radius + 2.0,
            );
        }
    }

    /// Launch the ball from attached state
    ///
    /// Fires upward with a small seeded jitter plus a kick from whatever
    /// horizontal speed the paddle had at launch.
    pub fn launch(&mut self, paddle: &Paddle, speed: f32, rng: &mut Pcg32) {
        if matches!(self.state, BallState::Attached { .. }) {
            let jitter: f32 = rng.random_range(-0.25..0.25);
            let english = (paddle.vel * PADDLE_ENGLISH / PADDLE_KEY_SPEED).clamp(-0.3, 0.3);
            let dir = Vec2::new(jitter + english, 1.0).normalize();

            self.vel = dir * speed;
            self.state = BallState::Free;
        }
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

/// The player's paddle
///
/// Moves horizontally along a fixed track near the bottom edge.
#[derive(Debug, Clone)]
pub struct Paddle {
    /// Center x position
    pub x: f32,
    /// Half of the paddle width
    pub half_width: f32,
    /// Horizontal velocity (for "english" on the ball)
    pub vel: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: 0.0,
            half_width: PADDLE_WIDTH / 2.0,
            vel: 0.0,
        }
    }
}

impl Paddle {
    /// Get the paddle as an Aabb for collision detection
    pub fn rect(&self) -> Aabb {
        Aabb::from_center_size(
            Vec2::new(self.x, PADDLE_CENTER_Y),
            Vec2::new(self.half_width * 2.0, PADDLE_HEIGHT),
        )
    }

    /// Move toward a target x (mouse control), clamped to max speed
    pub fn move_toward(&mut self, target_x: f32, dt: f32, max_speed: f32) {
        let max_delta = max_speed * dt;
        let delta = (target_x - self.x).clamp(-max_delta, max_delta);
        self.vel = delta / dt;
        self.x += delta;
        self.clamp_to_arena();
    }

    /// Move at key speed in the given direction (-1, 0 or 1)
    pub fn step_keys(&mut self, dir: f32, dt: f32) {
        self.vel = dir * PADDLE_KEY_SPEED;
        self.x += self.vel * dt;
        self.clamp_to_arena();
    }

    /// Keep the paddle fully inside the arena
    fn clamp_to_arena(&mut self) {
        let limit = ARENA_HALF_WIDTH - self.half_width;
        if self.x < -limit {
            self.x = -limit;
            self.vel = 0.0;
        } else if self.x > limit {
            self.x = limit;
            self.vel = 0.0;
        }
    }
}

/// A block in the grid
///
/// A block is alive as long as it is in `GameState::blocks`; destruction is
/// removal from the list.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: u32,
    /// Grid row, 0 at the top - picks the block's color
    pub row: u32,
    pub rect: Aabb,
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Row index of the destroyed block, for color lookup
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Things that happened during a tick that the shell reacts to
///
/// Drained each frame for audio and HUD side effects; never read back by
/// the simulation itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BallLaunched,
    WallHit,
    PaddleHit,
    BlockDestroyed { row: u32 },
    BallLost,
    GameWon,
    GameLost,
}

/// Complete game state (deterministic)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG (serve jitter)
    pub rng: Pcg32,
    /// Player lives
    pub lives: u8,
    /// Score - one point per destroyed block
    pub score: u32,
    /// How many x1.1 speed-ups have been applied
    pub speed_level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: GamePhase,
    /// Set when the run ends by win or loss (not by quit)
    pub outcome: Option<GameOutcome>,
    /// Player paddle
    pub paddle: Paddle,
    /// The ball
    pub ball: Ball,
    /// Live blocks (sorted by id for determinism)
    pub blocks: Vec<Block>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Screen shake amount (render-only, decays each tick)
    pub screen_shake: f32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    ///
    /// Blocks are laid out separately via [`super::tick::layout_blocks`],
    /// mirroring how the shell drives restarts.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: STARTING_LIVES,
            score: 0,
            speed_level: 0,
            time_ticks: 0,
            phase: GamePhase::Serve,
            outcome: None,
            paddle: Paddle::default(),
            ball: Ball::new(),
            blocks: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            screen_shake: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current target ball speed from score speed-ups
    pub fn ball_speed(&self) -> f32 {
        (BALL_START_SPEED * BALL_SPEED_UP.powi(self.speed_level as i32)).min(BALL_MAX_SPEED)
    }

    /// Attach a fresh ball to the paddle (serve)
    pub fn attach_ball(&mut self) {
        self.ball = Ball::new();
        self.ball.update_attached(&self.paddle);
    }

    /// Drain events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure blocks are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.blocks.sort_by_key(|b| b.id);
    }
}
