//! Error types
//!
//! The simulation tick itself cannot fail. Errors only come from building a
//! configuration or from side-effecting collaborators around the tick.

use thiserror::Error;

/// A configuration value was rejected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("speed range is inverted: min {min} > max {max}")]
    SpeedRange { min: f32, max: f32 },
    #[error("jump velocity {jump} must be upward (negative) and below release velocity {release}")]
    JumpVelocity { jump: f32, release: f32 },
    #[error("duck ratio {0} must be within (0, 1]")]
    DuckRatio(f32),
    #[error("probability {name} = {value} must be within [0, 1]")]
    Probability { name: &'static str, value: f32 },
    #[error("speed modifier range [{min}, {max}] must be positive and ordered")]
    ModifierRange { min: f32, max: f32 },
    #[error("character ({height}) does not fit above ground line {ground_y}")]
    GroundLine { ground_y: f32, height: f32 },
    #[error("collision margin {margin} swallows a {extent} px hitbox")]
    MarginTooLarge { margin: f32, extent: f32 },
    #[error("speed increase interval must be non-zero")]
    ZeroInterval,
    #[error("invalid configuration json: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Json(err.to_string())
    }
}

/// A side-effecting collaborator (renderer, sound, score sink) failed.
///
/// The driver logs these and carries on; they never reach the round state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("render failed: {0}")]
    Render(String),
    #[error("sound failed: {0}")]
    Sound(String),
    #[error("score sink failed: {0}")]
    ScoreSink(String),
}
