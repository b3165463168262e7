//! Dino Racer - endless runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (character physics, obstacles, collisions)
//! - `ai`: Feature vector and decision adapter for policy-driven lanes
//! - `session`: Game modes, lanes and the collaborator boundary
//! - `config`: Validated tuning values
//! - `highscores`: In-memory leaderboard fed by finished rounds

pub mod ai;
pub mod config;
pub mod error;
pub mod highscores;
pub mod session;
pub mod sim;

pub use config::{Config, Difficulty};
pub use error::{CollaboratorError, ConfigError};
pub use highscores::HighScores;
pub use session::{Collaborator, Controller, GameMode, NullCollaborator, Outcome, RoundSummary, Session};

/// Default tuning values (pixels and ticks at 60 Hz)
pub mod consts {
    /// Simulation rate the tick-based constants are tuned for
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Play field
    pub const FIELD_WIDTH: f32 = 1280.0;
    pub const GROUND_Y: f32 = 550.0;

    /// Two-lane layout (each lane is a 250 px strip)
    pub const LANE_GROUND_Y: f32 = 195.0;
    pub const LANE_CHARACTER_X: f32 = 80.0;

    /// Character
    pub const CHARACTER_X: f32 = 100.0;
    pub const CHARACTER_WIDTH: f32 = 80.0;
    pub const CHARACTER_HEIGHT: f32 = 80.0;
    pub const GRAVITY: f32 = 0.8;
    /// Gravity while the jump input is held (higher arc)
    pub const JUMP_HOLD_GRAVITY: f32 = 0.4;
    pub const JUMP_VELOCITY: f32 = -18.0;
    /// Upward speed is clamped to this on early release
    pub const JUMP_MIN_VELOCITY: f32 = -6.0;
    pub const COYOTE_TICKS: u32 = 8;
    pub const JUMP_BUFFER_TICKS: u32 = 10;
    pub const DUCK_HEIGHT_RATIO: f32 = 0.5;

    /// Ground obstacles (cactus)
    pub const GROUND_OBSTACLE_WIDTH: f32 = 45.0;
    pub const GROUND_OBSTACLE_HEIGHT_SHORT: f32 = 55.0;
    pub const GROUND_OBSTACLE_HEIGHT_TALL: f32 = 90.0;

    /// Airborne obstacles (bird)
    pub const AIRBORNE_OBSTACLE_WIDTH: f32 = 70.0;
    pub const AIRBORNE_OBSTACLE_HEIGHT: f32 = 45.0;
    /// Gap between the ground line and the bird's underside, per band
    pub const AIRBORNE_ALTITUDES: [f32; 3] = [50.0, 110.0, 170.0];
    pub const GROUND_OBSTACLE_PROBABILITY: f32 = 0.7;

    /// Speed ramp
    pub const OBSTACLE_SPEED_MIN: f32 = 7.0;
    pub const OBSTACLE_SPEED_MAX: f32 = 20.0;
    pub const SPEED_INCREASE_INTERVAL: u64 = 15;
    pub const SPEED_INCREASE_AMOUNT: f32 = 0.3;
    /// Time attack ramps faster
    pub const TIME_ATTACK_SPEED_INTERVAL: u64 = 10;

    /// Spawning
    pub const MIN_SPAWN_DISTANCE: f32 = 350.0;
    /// New obstacles appear this far past the right edge
    pub const SPAWN_OFFSET: f32 = 50.0;
    /// Obstacles further than this past the left edge are dropped
    pub const OFF_FIELD_MARGIN: f32 = 100.0;

    /// Collision forgiveness, per side
    pub const COLLISION_MARGIN: f32 = 6.0;
    pub const OBSTACLE_COLLISION_MARGIN: f32 = 3.0;

    /// Input speed modifier bounds (rewind / fast-forward)
    pub const SPEED_MODIFIER_MIN: f32 = 0.5;
    pub const SPEED_MODIFIER_MAX: f32 = 1.5;

    /// Scoring extras
    pub const MILESTONE_STEP: u64 = 100;
    pub const COMBO_OBSTACLES_PER_LEVEL: u32 = 10;
    pub const COMBO_MAX_MULTIPLIER: u32 = 4;

    /// AI feature normalisation
    pub const FEATURE_DISTANCE_REF: f32 = 500.0;
    pub const FEATURE_HEIGHT_REF: f32 = 100.0;
}
