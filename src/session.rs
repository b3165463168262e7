//! Game modes and the multi-lane driver
//!
//! A session owns one independent round per lane and steps them all once
//! per frame. Each lane is fed either by the human input mapper or by the
//! AI adapter, and everything that happens is forwarded to side-effecting
//! collaborators whose failures are logged and otherwise ignored.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::ai::{Policy, drive};
use crate::config::{Config, Difficulty};
use crate::consts::TIME_ATTACK_SPEED_INTERVAL;
use crate::error::{CollaboratorError, ConfigError};
use crate::sim::state::{EndReason, GameEvent, RoundRules, RoundState, Scoring};
use crate::sim::tick::{TickInput, tick};

/// Playable modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// One lane, +1 per obstacle
    Solo,
    /// One lane, combo multiplier
    Endless,
    /// One lane against the clock
    TimeAttack(Difficulty),
    /// Human (top) against AI (bottom)
    Pve,
    /// Two humans, split screen
    Pvp,
}

impl GameMode {
    /// Stable key, used to file high scores per mode
    pub fn key(&self) -> &'static str {
        match self {
            GameMode::Solo => "solo",
            GameMode::Endless => "endless",
            GameMode::TimeAttack(Difficulty::Easy) => "time_attack_easy",
            GameMode::TimeAttack(Difficulty::Normal) => "time_attack_normal",
            GameMode::TimeAttack(Difficulty::Hard) => "time_attack_hard",
            GameMode::Pve => "pve",
            GameMode::Pvp => "pvp",
        }
    }

    /// Who drives each lane, top to bottom
    pub fn controllers(&self) -> &'static [(&'static str, Controller)] {
        match self {
            GameMode::Solo | GameMode::Endless | GameMode::TimeAttack(_) => {
                &[("PLAYER", Controller::Human)]
            }
            GameMode::Pve => &[("PLAYER", Controller::Human), ("AI", Controller::Ai)],
            GameMode::Pvp => &[("P1", Controller::Human), ("P2", Controller::Human)],
        }
    }

    pub fn is_split_screen(&self) -> bool {
        self.controllers().len() > 1
    }

    /// Per-round rules layered on the shared physics
    pub fn rules(&self) -> RoundRules {
        match self {
            GameMode::Endless => RoundRules {
                scoring: Scoring::endless(),
                time_limit_ticks: None,
            },
            GameMode::TimeAttack(difficulty) => RoundRules {
                scoring: Scoring::Standard,
                time_limit_ticks: Some(difficulty.time_limit_ticks()),
            },
            _ => RoundRules::default(),
        }
    }

    /// Derive this mode's configuration from the base one
    pub fn config(&self, base: &Config) -> Config {
        match self {
            GameMode::TimeAttack(_) => base.with_speed_interval(TIME_ATTACK_SPEED_INTERVAL),
            GameMode::Pve | GameMode::Pvp => base.lane(),
            GameMode::Solo | GameMode::Endless => base.clone(),
        }
    }
}

/// Source of a lane's input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Controller {
    Human,
    Ai,
}

impl Controller {
    pub fn as_str(&self) -> &'static str {
        match self {
            Controller::Human => "human",
            Controller::Ai => "ai",
        }
    }
}

/// One player's strip of the screen
#[derive(Debug, Clone)]
pub struct Lane {
    pub label: &'static str,
    pub controller: Controller,
    pub state: RoundState,
    /// Final score already handed to collaborators
    reported: bool,
}

/// What collaborators learn when a lane's round ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub mode: GameMode,
    pub lane: usize,
    pub controller: Controller,
    pub score: u64,
    pub reason: EndReason,
    pub ticks: u64,
}

/// Result of a finished split-screen session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(usize),
    Tie,
}

/// Side-effecting boundary: renderer, sound, score sink.
///
/// Every hook defaults to a no-op. Errors are logged by the session and
/// never alter the simulation.
pub trait Collaborator {
    fn on_event(&mut self, _lane: usize, _event: &GameEvent) -> Result<(), CollaboratorError> {
        Ok(())
    }

    /// Called exactly once per finished round
    fn on_game_over(&mut self, _summary: &RoundSummary) -> Result<(), CollaboratorError> {
        Ok(())
    }

    /// Called once per frame with every lane, after all of them stepped
    fn render(&mut self, _lanes: &[Lane]) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Collaborator that does nothing, for headless runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCollaborator;

impl Collaborator for NullCollaborator {}

impl<A: Collaborator, B: Collaborator> Collaborator for (A, B) {
    fn on_event(&mut self, lane: usize, event: &GameEvent) -> Result<(), CollaboratorError> {
        let first = self.0.on_event(lane, event);
        let second = self.1.on_event(lane, event);
        first.and(second)
    }

    fn on_game_over(&mut self, summary: &RoundSummary) -> Result<(), CollaboratorError> {
        let first = self.0.on_game_over(summary);
        let second = self.1.on_game_over(summary);
        first.and(second)
    }

    fn render(&mut self, lanes: &[Lane]) -> Result<(), CollaboratorError> {
        let first = self.0.render(lanes);
        let second = self.1.render(lanes);
        first.and(second)
    }
}

fn isolate(hook: &str, result: Result<(), CollaboratorError>) {
    if let Err(err) = result {
        log::warn!("collaborator {hook} failed: {err}");
    }
}

/// A running game: one mode, one config, one round per lane
#[derive(Debug, Clone)]
pub struct Session {
    mode: GameMode,
    seed: u64,
    lanes: Vec<Lane>,
    frames: u64,
}

impl Session {
    /// Build the lanes for `mode`. Each lane gets its own seed derived from
    /// `seed`, so lanes never share random state.
    pub fn new(mode: GameMode, base: &Config, seed: u64) -> Result<Self, ConfigError> {
        let config = mode.config(base);
        let rules = mode.rules();
        let mut seeder = Pcg32::seed_from_u64(seed);
        let lanes = mode
            .controllers()
            .iter()
            .map(|&(label, controller)| -> Result<Lane, ConfigError> {
                let state = RoundState::new(config.clone(), rules, seeder.random())?;
                Ok(Lane {
                    label,
                    controller,
                    state,
                    reported: false,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        log::info!("session {} started with {} lane(s), seed {}", mode.key(), lanes.len(), seed);
        Ok(Self {
            mode,
            seed,
            lanes,
            frames: 0,
        })
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, index: usize) -> Option<&Lane> {
        self.lanes.get(index)
    }

    /// Frames stepped since creation or the last reset
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance every lane by one tick.
    ///
    /// `human` holds one input per human lane, in lane order; missing ones
    /// count as idle. A pause toggle on any human input pauses or resumes
    /// the whole session.
    pub fn step(
        &mut self,
        human: &[TickInput],
        policy: &mut dyn Policy,
        collaborator: &mut dyn Collaborator,
    ) {
        if human.iter().any(|input| input.pause) {
            if self.is_paused() {
                self.resume();
            } else {
                self.pause();
            }
        }

        let mut humans = human.iter();
        for (index, lane) in self.lanes.iter_mut().enumerate() {
            let mut input = match lane.controller {
                Controller::Human => humans.next().copied().unwrap_or_default(),
                Controller::Ai => drive(policy, &lane.state),
            };
            input.pause = false;
            tick(&mut lane.state, &input);

            for event in lane.state.drain_events() {
                isolate("on_event", collaborator.on_event(index, &event));
                if let GameEvent::GameOver { score, reason } = event {
                    if lane.reported {
                        continue;
                    }
                    lane.reported = true;
                    let summary = RoundSummary {
                        mode: self.mode,
                        lane: index,
                        controller: lane.controller,
                        score,
                        reason,
                        ticks: lane.state.time_ticks,
                    };
                    isolate("on_game_over", collaborator.on_game_over(&summary));
                }
            }
        }

        self.frames += 1;
        isolate("render", collaborator.render(&self.lanes));
    }

    /// Pause every running lane; repeated calls are no-ops
    pub fn pause(&mut self) {
        for lane in &mut self.lanes {
            lane.state.pause();
        }
    }

    pub fn resume(&mut self) {
        for lane in &mut self.lanes {
            lane.state.resume();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.lanes.iter().any(|lane| lane.state.is_paused())
    }

    /// True once every lane's round has ended
    pub fn is_over(&self) -> bool {
        self.lanes.iter().all(|lane| lane.state.is_over())
    }

    /// Start every lane over; always succeeds
    pub fn reset(&mut self) {
        for lane in &mut self.lanes {
            lane.state.reset();
            lane.reported = false;
        }
        self.frames = 0;
    }

    /// Higher score wins a finished split-screen session
    pub fn winner(&self) -> Option<Outcome> {
        if !self.is_over() || !self.mode.is_split_screen() {
            return None;
        }
        let best = self.lanes.iter().map(|lane| lane.state.score).max()?;
        let mut leaders = self
            .lanes
            .iter()
            .enumerate()
            .filter(|(_, lane)| lane.state.score == best);
        match (leaders.next(), leaders.next()) {
            (Some((index, _)), None) => Some(Outcome::Winner(index)),
            _ => Some(Outcome::Tie),
        }
    }
}
