//! Obstacles: ground-fixed (cactus) and airborne (bird) hazards
//!
//! Obstacles only move left. Their stored speed is fixed at spawn time; a
//! per-tick modifier may scale the displacement without touching it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::config::Config;

/// Height class of a ground obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundSize {
    Short,
    Tall,
}

/// Altitude band of an airborne obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AirBand {
    /// Low enough to hit a standing runner; duck under it
    Low,
    Mid,
    High,
}

impl AirBand {
    pub const ALL: [AirBand; 3] = [AirBand::Low, AirBand::Mid, AirBand::High];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            AirBand::Low => 0,
            AirBand::Mid => 1,
            AirBand::High => 2,
        }
    }
}

/// Obstacle variant with its variant-specific data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Ground(GroundSize),
    Airborne(AirBand),
}

impl ObstacleKind {
    pub fn is_ground(&self) -> bool {
        matches!(self, ObstacleKind::Ground(_))
    }

    /// Roll a variant: ground with the configured probability, then a
    /// uniform size class or altitude band
    pub fn random(rng: &mut impl Rng, config: &Config) -> Self {
        if rng.random::<f32>() < config.ground_obstacle_probability {
            if rng.random_bool(0.5) {
                ObstacleKind::Ground(GroundSize::Tall)
            } else {
                ObstacleKind::Ground(GroundSize::Short)
            }
        } else {
            ObstacleKind::Airborne(AirBand::ALL[rng.random_range(0..AirBand::ALL.len())])
        }
    }
}

/// A single hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Left edge; decreases every tick
    pub x: f32,
    /// Top edge; fixed for the obstacle's lifetime
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per tick, always positive
    pub speed: f32,
    /// Already counted toward the score
    pub passed: bool,
}

impl Obstacle {
    /// Build an obstacle of `kind` at `x`, placed relative to the ground line
    pub fn new(id: u32, kind: ObstacleKind, x: f32, speed: f32, config: &Config) -> Self {
        debug_assert!(speed > 0.0, "obstacle speed must be positive");
        let (width, height, y) = match kind {
            ObstacleKind::Ground(size) => {
                let height = match size {
                    GroundSize::Short => config.ground_obstacle_height_short,
                    GroundSize::Tall => config.ground_obstacle_height_tall,
                };
                (config.ground_obstacle_width, height, config.ground_y - height)
            }
            ObstacleKind::Airborne(band) => {
                let height = config.airborne_obstacle_height;
                let clearance = config.airborne_altitudes[band.index()];
                (
                    config.airborne_obstacle_width,
                    height,
                    config.ground_y - clearance - height,
                )
            }
        };
        Self {
            id,
            kind,
            x,
            y,
            width,
            height,
            speed,
            passed: false,
        }
    }

    /// Move left by `speed * modifier`; the stored speed is untouched
    pub fn advance(&mut self, modifier: f32) {
        self.x -= self.speed * modifier;
    }

    /// Far enough past the left edge to be dropped
    #[inline]
    pub fn is_off_field(&self, margin: f32) -> bool {
        self.x < -margin
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Mark as scored; returns true only the first time
    pub fn mark_passed(&mut self) -> bool {
        if self.passed {
            return false;
        }
        self.passed = true;
        true
    }
}
