//! Dino Racer headless runner
//!
//! Plays one session with scripted policies on every lane and logs what
//! happens. Usage: `dino-racer [MODE] [--difficulty D] [--seed N] [--config FILE]`.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dino_racer::ai::{ScriptedPolicy, drive};
use dino_racer::consts::TICKS_PER_SECOND;
use dino_racer::session::Controller;
use dino_racer::sim::{GameEvent, TickInput};
use dino_racer::{Collaborator, CollaboratorError, Config, Difficulty, GameMode, HighScores, Session};
use std::fs;
use std::path::{Path, PathBuf};

/// Ten minutes of game time
const MAX_FRAMES: u64 = 10 * 60 * TICKS_PER_SECOND as u64;

#[derive(Parser, Debug)]
#[command(name = "dino-racer")]
#[command(about = "Headless endless-runner session with scripted players on every lane")]
struct Cli {
    /// Game mode to play
    #[arg(value_enum, default_value_t = CliMode::Pve)]
    mode: CliMode,
    /// Time budget for time-attack
    #[arg(long, value_enum, default_value_t = CliDifficulty::Normal)]
    difficulty: CliDifficulty,
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    /// JSON file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = MAX_FRAMES)]
    max_frames: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliMode {
    Solo,
    Endless,
    TimeAttack,
    Pve,
    Pvp,
}

impl CliMode {
    fn into_mode(self, difficulty: Difficulty) -> GameMode {
        match self {
            CliMode::Solo => GameMode::Solo,
            CliMode::Endless => GameMode::Endless,
            CliMode::TimeAttack => GameMode::TimeAttack(difficulty),
            CliMode::Pve => GameMode::Pve,
            CliMode::Pvp => GameMode::Pvp,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliDifficulty {
    Easy,
    Normal,
    Hard,
}

impl From<CliDifficulty> for Difficulty {
    fn from(value: CliDifficulty) -> Self {
        match value {
            CliDifficulty::Easy => Difficulty::Easy,
            CliDifficulty::Normal => Difficulty::Normal,
            CliDifficulty::Hard => Difficulty::Hard,
        }
    }
}

/// Stands in for the sound and HUD layers
struct EventLog;

impl Collaborator for EventLog {
    fn on_event(&mut self, lane: usize, event: &GameEvent) -> Result<(), CollaboratorError> {
        match event {
            GameEvent::Jumped { buffered } => log::debug!("lane {lane}: jump (buffered: {buffered})"),
            GameEvent::Milestone { score } => log::info!("lane {lane}: reached {score}"),
            GameEvent::SpeedUp { speed } => log::debug!("lane {lane}: speed {speed:.1}"),
            GameEvent::GameOver { score, reason } => {
                log::info!("lane {lane}: game over at {score} ({reason:?})")
            }
            GameEvent::ObstacleSpawned { .. } | GameEvent::ObstaclePassed { .. } => {}
        }
        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = Config::from_json(&json)
        .with_context(|| format!("invalid config {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Dino Racer (headless) starting...");

    let cli = Cli::parse();
    let mode = cli.mode.into_mode(cli.difficulty.into());
    let config = load_config(cli.config.as_deref())?;
    let mut session = Session::new(mode, &config, cli.seed).context("starting session")?;

    // Human lanes get their own scripted stand-in
    let mut stand_ins: Vec<ScriptedPolicy> = session
        .lanes()
        .iter()
        .filter(|lane| lane.controller == Controller::Human)
        .map(|lane| ScriptedPolicy::new(&lane.state.config))
        .collect();
    let mut ai = ScriptedPolicy::new(&mode.config(&config));
    let mut collaborators = (EventLog, HighScores::new());

    while !session.is_over() && session.frames() < cli.max_frames {
        let humans: Vec<TickInput> = session
            .lanes()
            .iter()
            .filter(|lane| lane.controller == Controller::Human)
            .zip(stand_ins.iter_mut())
            .map(|(lane, policy)| drive(policy, &lane.state))
            .collect();
        session.step(&humans, &mut ai, &mut collaborators);
    }

    println!(
        "\n{} finished after {} frames",
        mode.key(),
        session.frames()
    );
    for lane in session.lanes() {
        println!(
            "  {:<6} score {:>5}  passed {:>4}  speed {:>4.1}  {:?}",
            lane.label,
            lane.state.score,
            lane.state.obstacles_passed,
            lane.state.game_speed,
            lane.state.end_reason
        );
    }
    if let Some(outcome) = session.winner() {
        println!("  outcome: {outcome:?}");
    }
    let json = collaborators.1.to_json().context("serializing high scores")?;
    println!("  high scores: {json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("dino-racer-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dino-racer"]).unwrap();
        assert_eq!(cli.mode, CliMode::Pve);
        assert_eq!(cli.seed, 12345);
        assert!(cli.config.is_none());
        assert_eq!(cli.max_frames, MAX_FRAMES);
    }

    #[test]
    fn test_time_attack_takes_difficulty() {
        let cli = Cli::try_parse_from(["dino-racer", "time-attack", "--difficulty", "hard", "--seed", "7"])
            .unwrap();
        assert_eq!(
            cli.mode.into_mode(cli.difficulty.into()),
            GameMode::TimeAttack(Difficulty::Hard)
        );
        assert_eq!(cli.seed, 7);
    }

    #[test]
    fn test_bad_arguments_rejected() {
        assert!(Cli::try_parse_from(["dino-racer", "marathon"]).is_err());
        assert!(Cli::try_parse_from(["dino-racer", "solo", "--seed", "abc"]).is_err());
        assert!(Cli::try_parse_from(["dino-racer", "solo", "--difficulty", "brutal"]).is_err());
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let path = std::env::temp_dir().join("dino-racer-no-such-config.json");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("reading config"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let path = temp_file("bad-range.json", r#"{ "speed_min": 12.0, "speed_max": 9.0 }"#);
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
        fs::remove_file(&path).unwrap();

        let path = temp_file("not-json.json", "speed_min = 3");
        assert!(load_config(Some(&path)).is_err());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_valid_config_loads() {
        let path = temp_file("ok.json", r#"{ "speed_min": 9.0, "speed_max": 12.0 }"#);
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.speed_min, 9.0);
        fs::remove_file(&path).unwrap();
        assert_eq!(load_config(None).unwrap(), Config::default());
    }
}
