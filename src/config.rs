//! Game configuration
//!
//! One immutable value per session. Changing the layout (two-lane split,
//! resize) or the mode builds a new `Config` instead of mutating this one.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Time attack difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Time budget in seconds
    pub fn time_limit_secs(&self) -> u32 {
        match self {
            Difficulty::Easy => 120,
            Difficulty::Normal => 90,
            Difficulty::Hard => 60,
        }
    }

    /// Time budget in simulation ticks
    pub fn time_limit_ticks(&self) -> u64 {
        u64::from(self.time_limit_secs()) * u64::from(TICKS_PER_SECOND)
    }
}

/// All tuning values consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Field ===
    pub field_width: f32,
    /// Floor line; the character's feet rest here
    pub ground_y: f32,

    // === Character ===
    pub character_x: f32,
    pub character_width: f32,
    pub character_height: f32,
    pub gravity: f32,
    pub jump_hold_gravity: f32,
    pub jump_velocity: f32,
    pub jump_min_velocity: f32,
    pub coyote_ticks: u32,
    pub jump_buffer_ticks: u32,
    pub duck_height_ratio: f32,

    // === Obstacles ===
    pub ground_obstacle_width: f32,
    pub ground_obstacle_height_short: f32,
    pub ground_obstacle_height_tall: f32,
    pub airborne_obstacle_width: f32,
    pub airborne_obstacle_height: f32,
    /// Underside clearance above the ground for the low/mid/high bands
    pub airborne_altitudes: [f32; 3],
    pub ground_obstacle_probability: f32,

    // === Speed ramp ===
    pub speed_min: f32,
    pub speed_max: f32,
    pub speed_interval: u64,
    pub speed_increment: f32,

    // === Spawning ===
    pub min_spawn_distance: f32,
    pub spawn_offset: f32,
    pub off_field_margin: f32,

    // === Collision ===
    pub collision_margin: f32,
    pub obstacle_collision_margin: f32,

    // === Input ===
    pub speed_modifier_min: f32,
    pub speed_modifier_max: f32,

    // === Scoring ===
    pub milestone_step: u64,

    // === AI features ===
    pub feature_distance_ref: f32,
    pub feature_height_ref: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            ground_y: GROUND_Y,

            character_x: CHARACTER_X,
            character_width: CHARACTER_WIDTH,
            character_height: CHARACTER_HEIGHT,
            gravity: GRAVITY,
            jump_hold_gravity: JUMP_HOLD_GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            jump_min_velocity: JUMP_MIN_VELOCITY,
            coyote_ticks: COYOTE_TICKS,
            jump_buffer_ticks: JUMP_BUFFER_TICKS,
            duck_height_ratio: DUCK_HEIGHT_RATIO,

            ground_obstacle_width: GROUND_OBSTACLE_WIDTH,
            ground_obstacle_height_short: GROUND_OBSTACLE_HEIGHT_SHORT,
            ground_obstacle_height_tall: GROUND_OBSTACLE_HEIGHT_TALL,
            airborne_obstacle_width: AIRBORNE_OBSTACLE_WIDTH,
            airborne_obstacle_height: AIRBORNE_OBSTACLE_HEIGHT,
            airborne_altitudes: AIRBORNE_ALTITUDES,
            ground_obstacle_probability: GROUND_OBSTACLE_PROBABILITY,

            speed_min: OBSTACLE_SPEED_MIN,
            speed_max: OBSTACLE_SPEED_MAX,
            speed_interval: SPEED_INCREASE_INTERVAL,
            speed_increment: SPEED_INCREASE_AMOUNT,

            min_spawn_distance: MIN_SPAWN_DISTANCE,
            spawn_offset: SPAWN_OFFSET,
            off_field_margin: OFF_FIELD_MARGIN,

            collision_margin: COLLISION_MARGIN,
            obstacle_collision_margin: OBSTACLE_COLLISION_MARGIN,

            speed_modifier_min: SPEED_MODIFIER_MIN,
            speed_modifier_max: SPEED_MODIFIER_MAX,

            milestone_step: MILESTONE_STEP,

            feature_distance_ref: FEATURE_DISTANCE_REF,
            feature_height_ref: FEATURE_HEIGHT_REF,
        }
    }
}

impl Config {
    /// Parse from JSON (missing fields fall back to defaults) and validate
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Layout for one strip of the two-lane split screen.
    ///
    /// Bird bands are scaled down only as far as needed for the highest one
    /// to fit inside the strip. A straight `LANE_GROUND_Y / GROUND_Y` ratio
    /// would sink the low band into the ducking box.
    pub fn lane(&self) -> Self {
        let headroom = (LANE_GROUND_Y - self.airborne_obstacle_height).max(0.0);
        let highest = self.airborne_altitudes.iter().copied().fold(0.0, f32::max);
        let scale = if highest > headroom {
            headroom / highest
        } else {
            1.0
        };
        Self {
            ground_y: LANE_GROUND_Y,
            character_x: LANE_CHARACTER_X,
            airborne_altitudes: self.airborne_altitudes.map(|a| a * scale),
            ..self.clone()
        }
    }

    /// Same tuning with a different speed-ramp interval
    pub fn with_speed_interval(&self, interval: u64) -> Self {
        Self {
            speed_interval: interval,
            ..self.clone()
        }
    }

    /// Height of the character's box while ducking
    #[inline]
    pub fn duck_height(&self) -> f32 {
        self.character_height * self.duck_height_ratio
    }

    /// X at which new obstacles appear
    #[inline]
    pub fn spawn_x(&self) -> f32 {
        self.field_width + self.spawn_offset
    }

    /// Reject values that would break the simulation's invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("field_width", self.field_width),
            ("ground_y", self.ground_y),
            ("character_x", self.character_x),
            ("character_width", self.character_width),
            ("character_height", self.character_height),
            ("gravity", self.gravity),
            ("jump_hold_gravity", self.jump_hold_gravity),
            ("jump_velocity", self.jump_velocity),
            ("jump_min_velocity", self.jump_min_velocity),
            ("duck_height_ratio", self.duck_height_ratio),
            ("ground_obstacle_width", self.ground_obstacle_width),
            ("ground_obstacle_height_short", self.ground_obstacle_height_short),
            ("ground_obstacle_height_tall", self.ground_obstacle_height_tall),
            ("airborne_obstacle_width", self.airborne_obstacle_width),
            ("airborne_obstacle_height", self.airborne_obstacle_height),
            ("airborne_altitudes", self.airborne_altitudes[0]),
            ("airborne_altitudes", self.airborne_altitudes[1]),
            ("airborne_altitudes", self.airborne_altitudes[2]),
            ("ground_obstacle_probability", self.ground_obstacle_probability),
            ("speed_min", self.speed_min),
            ("speed_max", self.speed_max),
            ("speed_increment", self.speed_increment),
            ("min_spawn_distance", self.min_spawn_distance),
            ("spawn_offset", self.spawn_offset),
            ("off_field_margin", self.off_field_margin),
            ("collision_margin", self.collision_margin),
            ("obstacle_collision_margin", self.obstacle_collision_margin),
            ("speed_modifier_min", self.speed_modifier_min),
            ("speed_modifier_max", self.speed_modifier_max),
            ("feature_distance_ref", self.feature_distance_ref),
            ("feature_height_ref", self.feature_height_ref),
        ];
        // NaN and infinities slip past every ordered comparison below
        if let Some(&(name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { name, value });
        }

        let positive = [
            ("field_width", self.field_width),
            ("ground_y", self.ground_y),
            ("character_width", self.character_width),
            ("character_height", self.character_height),
            ("gravity", self.gravity),
            ("jump_hold_gravity", self.jump_hold_gravity),
            ("ground_obstacle_width", self.ground_obstacle_width),
            ("ground_obstacle_height_short", self.ground_obstacle_height_short),
            ("ground_obstacle_height_tall", self.ground_obstacle_height_tall),
            ("airborne_obstacle_width", self.airborne_obstacle_width),
            ("airborne_obstacle_height", self.airborne_obstacle_height),
            ("speed_min", self.speed_min),
            ("min_spawn_distance", self.min_spawn_distance),
            ("off_field_margin", self.off_field_margin),
            ("feature_distance_ref", self.feature_distance_ref),
            ("feature_height_ref", self.feature_height_ref),
        ];
        for (name, value) in positive {
            // NaN fails this too
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let non_negative = [
            ("character_x", self.character_x),
            ("spawn_offset", self.spawn_offset),
            ("speed_increment", self.speed_increment),
            ("collision_margin", self.collision_margin),
            ("obstacle_collision_margin", self.obstacle_collision_margin),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { name, value });
            }
        }
        for value in self.airborne_altitudes {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative {
                    name: "airborne_altitudes",
                    value,
                });
            }
        }

        if self.speed_max < self.speed_min {
            return Err(ConfigError::SpeedRange {
                min: self.speed_min,
                max: self.speed_max,
            });
        }
        if self.speed_interval == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if !(self.jump_velocity < 0.0 && self.jump_velocity <= self.jump_min_velocity) {
            return Err(ConfigError::JumpVelocity {
                jump: self.jump_velocity,
                release: self.jump_min_velocity,
            });
        }
        if !(self.duck_height_ratio > 0.0 && self.duck_height_ratio <= 1.0) {
            return Err(ConfigError::DuckRatio(self.duck_height_ratio));
        }
        if !(0.0..=1.0).contains(&self.ground_obstacle_probability) {
            return Err(ConfigError::Probability {
                name: "ground_obstacle_probability",
                value: self.ground_obstacle_probability,
            });
        }
        if !(self.speed_modifier_min > 0.0 && self.speed_modifier_min <= self.speed_modifier_max) {
            return Err(ConfigError::ModifierRange {
                min: self.speed_modifier_min,
                max: self.speed_modifier_max,
            });
        }
        if self.character_height >= self.ground_y {
            return Err(ConfigError::GroundLine {
                ground_y: self.ground_y,
                height: self.character_height,
            });
        }

        // A margin that eats the whole box would make collisions impossible
        let smallest_character = self.character_width.min(self.duck_height());
        if self.collision_margin * 2.0 >= smallest_character {
            return Err(ConfigError::MarginTooLarge {
                margin: self.collision_margin,
                extent: smallest_character,
            });
        }
        let smallest_obstacle = self
            .ground_obstacle_width
            .min(self.ground_obstacle_height_short)
            .min(self.airborne_obstacle_width)
            .min(self.airborne_obstacle_height);
        if self.obstacle_collision_margin * 2.0 >= smallest_obstacle {
            return Err(ConfigError::MarginTooLarge {
                margin: self.obstacle_collision_margin,
                extent: smallest_obstacle,
            });
        }

        Ok(())
    }
}
