//! End-to-end runs through the session driver

use dino_racer::ai::{IdlePolicy, Policy, ScriptedPolicy, drive};
use dino_racer::session::Lane;
use dino_racer::sim::{GameEvent, TickInput};
use dino_racer::{
    Collaborator, CollaboratorError, Config, Controller, Difficulty, GameMode, HighScores,
    NullCollaborator, Session,
};

const MAX_FRAMES: usize = 20_000;

/// Records everything it is told
#[derive(Default)]
struct Recorder {
    events: Vec<(usize, GameEvent)>,
    frames_rendered: usize,
    lanes_seen: usize,
}

impl Collaborator for Recorder {
    fn on_event(&mut self, lane: usize, event: &GameEvent) -> Result<(), CollaboratorError> {
        self.events.push((lane, *event));
        Ok(())
    }

    fn render(&mut self, lanes: &[Lane]) -> Result<(), CollaboratorError> {
        self.frames_rendered += 1;
        self.lanes_seen = lanes.len();
        Ok(())
    }
}

fn play(session: &mut Session, policy: &mut dyn Policy, collaborator: &mut dyn Collaborator) {
    for _ in 0..MAX_FRAMES {
        if session.is_over() {
            break;
        }
        session.step(&[], policy, collaborator);
    }
}

#[test]
fn pve_records_both_lanes_in_high_scores() {
    let config = Config::default();
    let mut session = Session::new(GameMode::Pve, &config, 2024).unwrap();
    let mut collaborators = (Recorder::default(), HighScores::new());

    play(&mut session, &mut IdlePolicy, &mut collaborators);
    assert!(session.is_over());

    let (recorder, scores) = collaborators;
    assert_eq!(recorder.lanes_seen, 2);
    assert_eq!(recorder.frames_rendered as u64, session.frames());

    let game_overs: Vec<usize> = recorder
        .events
        .iter()
        .filter(|(_, e)| matches!(e, GameEvent::GameOver { .. }))
        .map(|(lane, _)| *lane)
        .collect();
    assert_eq!(game_overs.len(), 2);
    assert!(game_overs.contains(&0) && game_overs.contains(&1));

    // Zero scores never qualify, so only count lanes that scored
    let scored = session.lanes().iter().filter(|l| l.state.score > 0).count();
    assert_eq!(scores.entries(GameMode::Pve).len(), scored);
    for entry in scores.entries(GameMode::Pve) {
        assert!(matches!(entry.controller, Controller::Human | Controller::Ai));
    }
}

#[test]
fn sessions_replay_identically() {
    let run = || {
        let config = Config::default();
        let mut session = Session::new(GameMode::Pvp, &config, 77).unwrap();
        let mut p1 = ScriptedPolicy::new(&config.lane());
        let mut p2 = ScriptedPolicy::new(&config.lane());
        for _ in 0..3_000 {
            if session.is_over() {
                break;
            }
            let inputs: Vec<TickInput> = vec![
                drive(&mut p1, &session.lanes()[0].state),
                drive(&mut p2, &session.lanes()[1].state),
            ];
            session.step(&inputs, &mut IdlePolicy, &mut NullCollaborator);
        }
        session
            .lanes()
            .iter()
            .map(|l| (l.state.score, l.state.time_ticks, l.state.end_reason))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn endless_combo_scores_at_least_obstacles_passed() {
    let config = Config::default();
    let mut session = Session::new(GameMode::Endless, &config, 5).unwrap();
    let mut stand_in = ScriptedPolicy::new(&config);
    for _ in 0..3_000 {
        if session.is_over() {
            break;
        }
        let input = drive(&mut stand_in, &session.lanes()[0].state);
        session.step(&[input], &mut IdlePolicy, &mut NullCollaborator);
    }
    // Stop playing until the run ends
    play(&mut session, &mut IdlePolicy, &mut NullCollaborator);
    assert!(session.is_over());
    let state = &session.lanes()[0].state;
    assert!(state.score >= state.obstacles_passed);
    assert_eq!(state.combo_count, 0, "combo resets on game over");
}

#[test]
fn time_attack_respects_budget() {
    let config = Config::default();
    let mode = GameMode::TimeAttack(Difficulty::Hard);
    let mut session = Session::new(mode, &config, 9).unwrap();
    let budget = Difficulty::Hard.time_limit_ticks();
    let mut stand_in = ScriptedPolicy::new(&mode.config(&config));
    for _ in 0..budget + 10 {
        let input = drive(&mut stand_in, &session.lanes()[0].state);
        session.step(&[input], &mut IdlePolicy, &mut NullCollaborator);
    }
    let state = &session.lanes()[0].state;
    assert!(state.is_over());
    assert!(state.time_ticks <= budget);
}

#[test]
fn config_from_json_drives_a_session() {
    let config = Config::from_json(r#"{ "speed_min": 9.0, "speed_max": 12.0 }"#).unwrap();
    let mut session = Session::new(GameMode::Solo, &config, 1).unwrap();
    let mut recorder = Recorder::default();
    play(&mut session, &mut IdlePolicy, &mut recorder);

    let speeds: Vec<f32> = recorder
        .events
        .iter()
        .filter_map(|(_, e)| match e {
            GameEvent::SpeedUp { speed } => Some(*speed),
            _ => None,
        })
        .collect();
    assert!(speeds.iter().all(|s| (9.0..=12.0).contains(s)));
    assert!(session.lanes()[0].state.game_speed >= 9.0);
}
