//! AI decision adapter
//!
//! Turns a lane's state into a fixed-length normalized feature vector and
//! maps a policy's numeric outputs back onto a [`TickInput`]. The policy
//! itself (trained network, script, replay) sits behind the [`Policy`] trait.

use crate::config::Config;
use crate::sim::character::Character;
use crate::sim::obstacle::{Obstacle, ObstacleKind};
use crate::sim::state::RoundState;
use crate::sim::tick::TickInput;

/// Length of the feature vector
pub const FEATURE_COUNT: usize = 6;

/// Length of a policy's output; only the first two are read
pub const POLICY_OUTPUTS: usize = 3;

/// Outputs above this count as "pressed"
pub const DECISION_THRESHOLD: f32 = 0.5;

/// `[distance, kind, speed, height, jumping, ducking]`
pub type Features = [f32; FEATURE_COUNT];

/// Vector used when nothing is ahead of the character
pub const DEFAULT_FEATURES: Features = [1.0, 0.5, 0.0, 0.0, 0.0, 0.0];

/// Encoding of an obstacle variant: ground is 0.0, airborne bands blend
/// from 0.3 (low) up to 1.0 (high)
pub fn kind_feature(kind: ObstacleKind) -> f32 {
    match kind {
        ObstacleKind::Ground(_) => 0.0,
        ObstacleKind::Airborne(band) => 0.3 + 0.7 * band.index() as f32 / 2.0,
    }
}

/// Nearest obstacle whose left edge is still ahead of the character
pub fn nearest_ahead<'a>(character: &Character, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .filter(|o| o.x > character.x())
        .min_by(|a, b| a.x.total_cmp(&b.x))
}

/// Extract the feature vector. Pure: reads the state, never mutates it.
pub fn features(state: &RoundState) -> Features {
    let config = &state.config;
    let character = &state.character;
    let Some(nearest) = nearest_ahead(character, &state.obstacles) else {
        return DEFAULT_FEATURES;
    };

    let distance = ((nearest.x - character.x()) / config.feature_distance_ref).min(1.0);
    let range = config.speed_max - config.speed_min;
    let speed = if range > 0.0 {
        ((state.game_speed - config.speed_min) / range).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let height = (character.height_above_ground() / config.feature_height_ref).min(1.0);

    [
        distance,
        kind_feature(nearest.kind),
        speed,
        height,
        flag(character.is_jumping),
        flag(character.is_ducking),
    ]
}

#[inline]
fn flag(on: bool) -> f32 {
    if on { 1.0 } else { 0.0 }
}

/// Thresholded policy output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Decision {
    pub jump: bool,
    pub duck: bool,
}

impl Decision {
    /// Read the first two outputs; anything after them is ignored and
    /// missing ones count as released
    pub fn from_outputs(outputs: &[f32]) -> Self {
        let pressed = |i: usize| outputs.get(i).is_some_and(|&v| v > DECISION_THRESHOLD);
        Self {
            jump: pressed(0),
            duck: pressed(1),
        }
    }

    /// Convert the level-triggered decision into this tick's input edges.
    ///
    /// Jump is (re)pressed on every grounded tick it is wanted, so the
    /// character's own rules decide whether it takes off. Letting go while
    /// the jump is held releases it. Duck is passed through unchanged.
    pub fn to_input(self, character: &Character) -> TickInput {
        TickInput {
            jump_pressed: self.jump && !character.is_jumping,
            jump_released: !self.jump && character.jump_held,
            duck_held: self.duck,
            ..Default::default()
        }
    }
}

/// Anything that can drive a lane from features
pub trait Policy {
    /// Static identifier of the policy implementation
    fn kind(&self) -> &'static str;

    /// Evaluate outputs for the provided features
    fn decide(&mut self, features: &Features) -> [f32; POLICY_OUTPUTS];
}

/// Features → decision → input in one step
pub fn drive(policy: &mut dyn Policy, state: &RoundState) -> TickInput {
    let outputs = policy.decide(&features(state));
    Decision::from_outputs(&outputs).to_input(&state.character)
}

/// Policy that never presses anything
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl Policy for IdlePolicy {
    fn kind(&self) -> &'static str {
        "idle"
    }

    fn decide(&mut self, _features: &Features) -> [f32; POLICY_OUTPUTS] {
        [0.0; POLICY_OUTPUTS]
    }
}

/// Hand-tuned reflex policy.
///
/// Jumps ground obstacles and ducks low birds once they enter a reaction
/// window that widens with speed; mid and high birds are ignored since a
/// standing runner fits under them. The jump is held while the obstacle is
/// still ahead for a full-height arc.
#[derive(Debug, Clone)]
pub struct ScriptedPolicy {
    /// Reaction distance at zero speed, in pixels
    pub reaction_px: f32,
    /// Extra reaction distance per pixel-per-tick of speed
    pub lead_per_speed: f32,
    /// Ticks to keep ducking after a low bird drops out of view
    pub duck_linger_ticks: u32,
    distance_ref: f32,
    speed_min: f32,
    speed_max: f32,
    duck_linger: u32,
}

impl ScriptedPolicy {
    pub fn new(config: &Config) -> Self {
        Self {
            reaction_px: 120.0,
            lead_per_speed: 8.0,
            duck_linger_ticks: 12,
            distance_ref: config.feature_distance_ref,
            speed_min: config.speed_min,
            speed_max: config.speed_max,
            duck_linger: 0,
        }
    }

    fn window(&self, speed_feature: f32) -> f32 {
        let speed = self.speed_min + speed_feature * (self.speed_max - self.speed_min);
        self.reaction_px + self.lead_per_speed * speed
    }
}

impl Policy for ScriptedPolicy {
    fn kind(&self) -> &'static str {
        "scripted"
    }

    fn decide(&mut self, features: &Features) -> [f32; POLICY_OUTPUTS] {
        let [distance, kind, speed, _height, jumping, _ducking] = *features;
        let in_window = distance < 1.0 && distance * self.distance_ref <= self.window(speed);
        let airborne = jumping > 0.5;

        let ground_threat = in_window && kind < 0.15;
        let low_bird = in_window && (0.15..0.5).contains(&kind);

        if low_bird && !airborne {
            self.duck_linger = self.duck_linger_ticks;
        }
        let duck = if self.duck_linger > 0 && !ground_threat {
            self.duck_linger -= 1;
            true
        } else {
            false
        };

        // Airborne: keep holding while anything is still close ahead
        let jump = if airborne { in_window } else { ground_threat };

        [flag(jump), flag(duck), 0.0]
    }
}
