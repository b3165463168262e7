//! High score leaderboard system
//!
//! Top 10 per game mode, tagged with who played. Storage is the caller's
//! business: the board only converts itself to and from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;
use crate::session::{Collaborator, Controller, GameMode, RoundSummary};

/// Maximum number of high scores to keep per mode
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Human or AI run
    pub controller: Controller,
    /// Length of the run in ticks
    pub ticks: u64,
}

/// High score leaderboard, one table per mode key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub boards: BTreeMap<String, Vec<HighScoreEntry>>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries for `mode`, best first
    pub fn entries(&self, mode: GameMode) -> &[HighScoreEntry] {
        self.boards.get(mode.key()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, mode: GameMode, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        let entries = self.entries(mode);
        if entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, mode: GameMode, score: u64) -> Option<usize> {
        if !self.qualifies(mode, score) {
            return None;
        }
        let entries = self.entries(mode);
        let rank = entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(
        &mut self,
        mode: GameMode,
        score: u64,
        controller: Controller,
        ticks: u64,
    ) -> Option<usize> {
        if !self.qualifies(mode, score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            controller,
            ticks,
        };

        // Ties keep the older entry ahead
        let entries = self.boards.entry(mode.key().to_string()).or_default();
        let pos = entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                entries.insert(i, entry);
                i + 1
            }
            None => {
                entries.push(entry);
                entries.len()
            }
        };

        entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if every board is empty
    pub fn is_empty(&self) -> bool {
        self.boards.values().all(Vec::is_empty)
    }

    /// Get the top score for `mode` (if any)
    pub fn top_score(&self, mode: GameMode) -> Option<u64> {
        self.entries(mode).first().map(|e| e.score)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        for entries in scores.boards.values_mut() {
            entries.sort_by(|a, b| b.score.cmp(&a.score));
            entries.truncate(MAX_HIGH_SCORES);
        }
        log::info!("Loaded {} high score board(s)", scores.boards.len());
        Ok(scores)
    }
}

impl Collaborator for HighScores {
    fn on_game_over(&mut self, summary: &RoundSummary) -> Result<(), CollaboratorError> {
        if let Some(rank) = self.add_score(
            summary.mode,
            summary.score,
            summary.controller,
            summary.ticks,
        ) {
            log::info!(
                "{} high score #{} for {}: {}",
                summary.controller.as_str(),
                rank,
                summary.mode.key(),
                summary.score
            );
        }
        Ok(())
    }
}
