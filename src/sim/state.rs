//! Round state and core simulation types
//!
//! Everything one lane needs to replay a run lives here: configuration,
//! seeded RNG, the character, live obstacles and the score.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::character::Character;
use super::obstacle::{Obstacle, ObstacleKind};
use super::spawner::{Spawner, speed_for_score};
use crate::config::Config;
use crate::consts::{COMBO_MAX_MULTIPLIER, COMBO_OBSTACLES_PER_LEVEL};
use crate::error::ConfigError;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen: no physics, spawning, scoring or collision
    Paused,
    /// Run ended; only a reset leaves this phase
    GameOver,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Collision { obstacle_id: u32 },
    /// Time attack budget ran out
    TimeUp,
}

/// Things that happened during a tick, for sound/UI/scoring collaborators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// `buffered` when a queued press fired on landing
    Jumped { buffered: bool },
    ObstacleSpawned { id: u32, kind: ObstacleKind },
    ObstaclePassed { id: u32, score: u64 },
    Milestone { score: u64 },
    SpeedUp { speed: f32 },
    /// Emitted exactly once per round
    GameOver { score: u64, reason: EndReason },
}

/// How passing an obstacle is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Scoring {
    /// +1 per obstacle
    #[default]
    Standard,
    /// Consecutive passes raise a multiplier, capped
    Combo { per_level: u32, max_multiplier: u32 },
}

impl Scoring {
    pub fn endless() -> Self {
        Scoring::Combo {
            per_level: COMBO_OBSTACLES_PER_LEVEL,
            max_multiplier: COMBO_MAX_MULTIPLIER,
        }
    }

    /// Multiplier applied to the `combo_count`-th consecutive pass
    pub fn multiplier(&self, combo_count: u32) -> u32 {
        match *self {
            Scoring::Standard => 1,
            Scoring::Combo {
                per_level,
                max_multiplier,
            } => (1 + combo_count / per_level.max(1)).min(max_multiplier.max(1)),
        }
    }
}

/// Mode-specific rules layered on top of the shared physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoundRules {
    pub scoring: Scoring,
    /// Round ends with `TimeUp` after this many ticks
    pub time_limit_ticks: Option<u64>,
}

/// Complete state of one lane (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub config: Config,
    pub rules: RoundRules,
    /// Seed the round was created with
    pub seed: u64,
    rng: Pcg32,
    pub character: Character,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub spawner: Spawner,
    /// Never decreases within a round
    pub score: u64,
    /// Obstacles passed, regardless of multiplier
    pub obstacles_passed: u64,
    pub combo_count: u32,
    pub combo_multiplier: u32,
    /// Derived from `score` every tick
    pub game_speed: f32,
    pub phase: GamePhase,
    pub end_reason: Option<EndReason>,
    /// Ticks simulated while running
    pub time_ticks: u64,
    /// Last milestone announced
    pub last_milestone: u64,
    /// Events recorded since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl RoundState {
    /// Validate `config` and start a fresh round
    pub fn new(config: Config, rules: RoundRules, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let character = Character::new(&config);
        let game_speed = speed_for_score(0, &config);
        Ok(Self {
            config,
            rules,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            character,
            obstacles: Vec::new(),
            spawner: Spawner::default(),
            score: 0,
            obstacles_passed: 0,
            combo_count: 0,
            combo_multiplier: 1,
            game_speed,
            phase: GamePhase::Running,
            end_reason: None,
            time_ticks: 0,
            last_milestone: 0,
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Start over with the same config and rules. The RNG keeps running,
    /// so the next round sees different obstacles.
    pub fn reset(&mut self) {
        self.character = Character::new(&self.config);
        self.obstacles.clear();
        self.spawner = Spawner::default();
        self.score = 0;
        self.obstacles_passed = 0;
        self.combo_count = 0;
        self.combo_multiplier = 1;
        self.game_speed = speed_for_score(0, &self.config);
        self.phase = GamePhase::Running;
        self.end_reason = None;
        self.time_ticks = 0;
        self.last_milestone = 0;
        self.events.clear();
        self.next_id = 1;
        log::info!("round reset (seed {})", self.seed);
    }

    /// Reset and reseed, reproducing a fresh `RoundState::new` exactly
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.reset();
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a new obstacle if the spawner's gap allows one
    pub fn spawn_if_due(&mut self) -> Option<u32> {
        if !self.spawner.should_spawn(&self.config) {
            return None;
        }
        let id = self.next_entity_id();
        let obstacle = self
            .spawner
            .try_spawn(id, self.game_speed, &mut self.rng, &self.config)?;
        self.events.push(GameEvent::ObstacleSpawned {
            id,
            kind: obstacle.kind,
        });
        self.obstacles.push(obstacle);
        Some(id)
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Freeze the round. Repeated calls are no-ops; finished rounds stay over.
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
        }
    }

    /// Ticks left in a timed round
    pub fn time_remaining_ticks(&self) -> Option<u64> {
        self.rules
            .time_limit_ticks
            .map(|limit| limit.saturating_sub(self.time_ticks))
    }

    /// Score one passed obstacle under the round's scoring rule
    pub fn award_pass(&mut self, id: u32) {
        self.obstacles_passed += 1;
        self.combo_count += 1;
        self.combo_multiplier = self.rules.scoring.multiplier(self.combo_count);
        self.score += u64::from(self.combo_multiplier);
        self.events.push(GameEvent::ObstaclePassed {
            id,
            score: self.score,
        });

        let step = self.config.milestone_step.max(1);
        let milestone = self.score / step * step;
        if milestone > self.last_milestone {
            self.last_milestone = milestone;
            self.events.push(GameEvent::Milestone { score: milestone });
        }
    }

    /// One-way transition into `GameOver`
    pub fn end(&mut self, reason: EndReason) {
        if self.is_over() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.combo_count = 0;
        self.combo_multiplier = 1;
        self.events.push(GameEvent::GameOver {
            score: self.score,
            reason,
        });
        log::info!(
            "game over after {} ticks: score {} ({:?})",
            self.time_ticks,
            self.score,
            reason
        );
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
