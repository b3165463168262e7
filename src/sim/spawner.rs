//! Distance-gated spawning and the score-driven speed ramp

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::obstacle::{Obstacle, ObstacleKind};
use crate::config::Config;

/// Scroll speed for a given score.
///
/// Pure function of the score: `min(min + floor(score / interval) * inc, max)`.
pub fn speed_for_score(score: u64, config: &Config) -> f32 {
    let steps = (score / config.speed_interval) as f32;
    (config.speed_min + steps * config.speed_increment).clamp(config.speed_min, config.speed_max)
}

/// Tracks the rightmost obstacle and decides when the next one appears
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// X of the newest obstacle, or the rightmost live one
    pub last_spawn_x: f32,
}

impl Default for Spawner {
    fn default() -> Self {
        // Far enough left that the first tick spawns immediately
        Self { last_spawn_x: 0.0 }
    }
}

impl Spawner {
    /// True once the gap behind the last obstacle is wide enough
    pub fn should_spawn(&self, config: &Config) -> bool {
        self.last_spawn_x - config.field_width < -config.min_spawn_distance
    }

    /// Spawn one obstacle just past the right edge if the gap allows
    pub fn try_spawn(
        &mut self,
        id: u32,
        game_speed: f32,
        rng: &mut impl Rng,
        config: &Config,
    ) -> Option<Obstacle> {
        if !self.should_spawn(config) {
            return None;
        }
        let kind = ObstacleKind::random(rng, config);
        let speed = game_speed.min(config.speed_max);
        let obstacle = Obstacle::new(id, kind, config.spawn_x(), speed, config);
        self.last_spawn_x = obstacle.x;
        log::debug!("spawn #{} {:?} at speed {:.1}", id, kind, speed);
        Some(obstacle)
    }

    /// Re-anchor on the rightmost live obstacle; keeps the last value when
    /// the field is empty
    pub fn sync(&mut self, obstacles: &[Obstacle]) {
        if let Some(max_x) = obstacles.iter().map(|o| o.x).reduce(f32::max) {
            self.last_spawn_x = max_x;
        }
    }
}
