//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod character;
pub mod collision;
pub mod obstacle;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;

pub use character::{BodyState, Character};
pub use collision::{check_collision, first_hit};
pub use obstacle::{AirBand, GroundSize, Obstacle, ObstacleKind};
pub use rect::Rect;
pub use spawner::{Spawner, speed_for_score};
pub use state::{EndReason, GameEvent, GamePhase, RoundRules, RoundState, Scoring};
pub use tick::{TickInput, tick};
