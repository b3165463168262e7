//! Fixed-rate simulation tick
//!
//! One call advances one lane by one frame. The order of the steps is part
//! of the game's behaviour:
//!
//! 1. apply input to the character
//! 2. character physics
//! 3. spawn
//! 4. move obstacles, score the ones that crossed the character
//! 5. drop off-field obstacles, re-anchor the spawner
//! 6. recompute speed from score
//! 7. collision check

use serde::{Deserialize, Serialize};

use super::collision::first_hit;
use super::spawner::speed_for_score;
use super::state::{EndReason, GameEvent, GamePhase, RoundState};

/// Input intent for a single tick, from a human mapper or the AI adapter
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Jump input went down this tick
    pub jump_pressed: bool,
    /// Jump input went up this tick
    pub jump_released: bool,
    /// Duck input is down
    pub duck_held: bool,
    /// Rewind / fast-forward scale for obstacle motion, clamped to the
    /// configured range
    pub speed_modifier: Option<f32>,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Default::default()
        }
    }

    pub fn duck() -> Self {
        Self {
            duck_held: true,
            ..Default::default()
        }
    }
}

/// Advance one lane by one tick
pub fn tick(state: &mut RoundState, input: &TickInput) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Running => state.pause(),
            GamePhase::Paused => state.resume(),
            GamePhase::GameOver => {}
        }
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Running {
        return;
    }

    if state
        .time_remaining_ticks()
        .is_some_and(|remaining| remaining == 0)
    {
        state.end(EndReason::TimeUp);
        return;
    }

    state.time_ticks += 1;

    // 1. Input
    if input.jump_pressed && state.character.press_jump(&state.config) {
        state.events.push(GameEvent::Jumped { buffered: false });
    }
    if input.jump_released {
        state.character.release_jump(&state.config);
    }
    state.character.set_duck(input.duck_held);

    // 2. Character physics
    if state.character.tick(&state.config) {
        state.events.push(GameEvent::Jumped { buffered: true });
    }

    // 3. Spawn
    state.spawn_if_due();

    // 4. Move and score; a non-finite modifier counts as absent
    let modifier = input
        .speed_modifier
        .filter(|m| m.is_finite())
        .map(|m| m.clamp(state.config.speed_modifier_min, state.config.speed_modifier_max))
        .unwrap_or(1.0);
    let character_x = state.character.x();
    let mut passed = Vec::new();
    for obstacle in &mut state.obstacles {
        obstacle.advance(modifier);
        if obstacle.x < character_x && obstacle.mark_passed() {
            passed.push(obstacle.id);
        }
    }
    for id in passed {
        state.award_pass(id);
    }

    // 5. Prune
    let margin = state.config.off_field_margin;
    state.obstacles.retain(|o| !o.is_off_field(margin));
    state.spawner.sync(&state.obstacles);

    // 6. Speed
    let speed = speed_for_score(state.score, &state.config);
    if speed > state.game_speed {
        state.events.push(GameEvent::SpeedUp { speed });
    }
    state.game_speed = speed;

    // 7. Collision
    if let Some(obstacle_id) = first_hit(&state.character, &state.obstacles, &state.config) {
        state.end(EndReason::Collision { obstacle_id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::obstacle::{AirBand, GroundSize, Obstacle, ObstacleKind};
    use crate::sim::state::RoundRules;

    fn round(seed: u64) -> RoundState {
        RoundState::new(Config::default(), RoundRules::default(), seed).unwrap()
    }

    /// A round whose spawner will not fire on the first tick
    fn quiet_round() -> RoundState {
        let mut state = round(1);
        state.spawner.last_spawn_x = state.config.spawn_x();
        state
    }

    fn place(state: &mut RoundState, kind: ObstacleKind, x: f32, speed: f32) -> u32 {
        let id = state.next_entity_id();
        let obstacle = Obstacle::new(id, kind, x, speed, &state.config);
        state.obstacles.push(obstacle);
        id
    }

    #[test]
    fn test_first_tick_spawns_and_moves() {
        let mut state = round(12345);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, 1330.0 - 7.0);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_tick_pause() {
        let mut state = round(12345);
        tick(&mut state, &TickInput::default());

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.clone();
        for _ in 0..30 {
            tick(&mut state, &TickInput::jump());
        }
        assert_eq!(state, frozen);

        tick(&mut state, &pause);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_determinism() {
        let mut state1 = round(99999);
        let mut state2 = round(99999);

        let inputs = [
            TickInput::jump(),
            TickInput::default(),
            TickInput {
                jump_released: true,
                ..Default::default()
            },
            TickInput::duck(),
            TickInput {
                speed_modifier: Some(1.3),
                ..Default::default()
            },
        ];

        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input);
            tick(&mut state2, input);
        }

        assert_eq!(state1, state2);
    }

    #[test]
    fn test_obstacle_scored_once() {
        let mut state = quiet_round();
        let id = place(&mut state, ObstacleKind::Airborne(AirBand::High), 103.0, 7.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
        assert!(state.obstacles.iter().any(|o| o.id == id && o.passed));
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_off_field_obstacle_removed() {
        let mut state = quiet_round();
        let spawn_x = state.config.spawn_x();
        let id = place(&mut state, ObstacleKind::Airborne(AirBand::High), spawn_x, 10.0);

        for _ in 0..143 {
            tick(&mut state, &TickInput::default());
        }
        let obstacle = state.obstacles.iter().find(|o| o.id == id).unwrap();
        assert_eq!(obstacle.x, -100.0);

        tick(&mut state, &TickInput::default());
        assert!(state.obstacles.iter().all(|o| o.id != id));
        assert!(!state.is_over());
    }

    #[test]
    fn test_collision_ends_round() {
        let mut state = quiet_round();
        let id = place(&mut state, ObstacleKind::Ground(GroundSize::Tall), 200.0, 7.0);

        for _ in 0..50 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.is_over());
        assert_eq!(state.end_reason, Some(EndReason::Collision { obstacle_id: id }));

        let overs = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);

        // Terminal: nothing moves, pause cannot revive it
        let frozen = state.clone();
        tick(&mut state, &TickInput {
            pause: true,
            ..Default::default()
        });
        tick(&mut state, &TickInput::jump());
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_duck_under_low_bird() {
        let mut state = quiet_round();
        place(&mut state, ObstacleKind::Airborne(AirBand::Low), 300.0, 7.0);
        for _ in 0..40 {
            tick(&mut state, &TickInput::duck());
        }
        assert!(!state.is_over());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_standing_hits_low_bird() {
        let mut state = quiet_round();
        place(&mut state, ObstacleKind::Airborne(AirBand::Low), 300.0, 7.0);
        for _ in 0..40 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.is_over());
    }

    #[test]
    fn test_jump_over_cactus() {
        let mut state = quiet_round();
        state.spawner.last_spawn_x = 400.0;
        place(&mut state, ObstacleKind::Ground(GroundSize::Tall), 400.0, 7.0);

        tick(&mut state, &TickInput::jump());
        for _ in 0..59 {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.is_over());
        assert_eq!(state.score, 1);
        assert!(matches!(
            state.events.first(),
            Some(GameEvent::Jumped { buffered: false })
        ));
    }

    #[test]
    fn test_speed_modifier_scales_motion() {
        let mut state = quiet_round();
        place(&mut state, ObstacleKind::Airborne(AirBand::High), 1000.0, 10.0);

        tick(&mut state, &TickInput {
            speed_modifier: Some(1.5),
            ..Default::default()
        });
        assert_eq!(state.obstacles[0].x, 985.0);

        // Out-of-range modifiers are clamped
        tick(&mut state, &TickInput {
            speed_modifier: Some(3.0),
            ..Default::default()
        });
        assert_eq!(state.obstacles[0].x, 970.0);

        tick(&mut state, &TickInput {
            speed_modifier: Some(0.1),
            ..Default::default()
        });
        assert_eq!(state.obstacles[0].x, 965.0);
        assert_eq!(state.obstacles[0].speed, 10.0);
    }

    #[test]
    fn test_non_finite_speed_modifier_ignored() {
        let mut state = quiet_round();
        let id = place(&mut state, ObstacleKind::Airborne(AirBand::High), 1000.0, 10.0);

        for modifier in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            tick(&mut state, &TickInput {
                speed_modifier: Some(modifier),
                ..Default::default()
            });
        }
        assert_eq!(state.obstacles[0].x, 970.0);

        // Still scrolls off and gets pruned
        state.obstacles[0].x = -95.0;
        tick(&mut state, &TickInput {
            speed_modifier: Some(f32::NAN),
            ..Default::default()
        });
        assert!(state.obstacles.iter().all(|o| o.id != id));
        assert!(state.obstacles.iter().all(|o| o.x.is_finite()));
    }

    #[test]
    fn test_duck_held_into_landing_beats_buffered_jump() {
        let mut state = quiet_round();
        tick(&mut state, &TickInput {
            jump_pressed: true,
            jump_released: true,
            ..Default::default()
        });
        while state.character.vel_y < 0.0 || state.character.height_above_ground() > 10.0 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.character.is_jumping);

        // Jump and duck together just before touching down
        tick(&mut state, &TickInput {
            jump_pressed: true,
            duck_held: true,
            ..Default::default()
        });
        for _ in 0..20 {
            tick(&mut state, &TickInput::duck());
        }

        let c = &state.character;
        assert!(!c.is_jumping);
        assert!(c.is_ducking);
        assert_eq!(c.jump_buffer_timer, 0);
        assert!(
            !state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Jumped { buffered: true }))
        );
        assert!(!state.is_over());
    }

    #[test]
    fn test_speed_recomputed_from_score() {
        let mut state = quiet_round();
        state.score = 14;
        place(&mut state, ObstacleKind::Airborne(AirBand::High), 103.0, 7.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 15);
        assert!((state.game_speed - 7.3).abs() < 1e-5);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::SpeedUp { .. }))
        );
    }

    #[test]
    fn test_time_up() {
        let rules = RoundRules {
            time_limit_ticks: Some(5),
            ..RoundRules::default()
        };
        let mut state = RoundState::new(Config::default(), rules, 3).unwrap();
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        assert!(!state.is_over());
        tick(&mut state, &TickInput::default());
        assert!(state.is_over());
        assert_eq!(state.end_reason, Some(EndReason::TimeUp));
        assert_eq!(state.time_ticks, 5);
    }

    #[test]
    fn test_endless_combo_scoring() {
        let rules = RoundRules {
            scoring: crate::sim::state::Scoring::endless(),
            ..RoundRules::default()
        };
        let mut state = RoundState::new(Config::default(), rules, 3).unwrap();
        state.spawner.last_spawn_x = state.config.spawn_x();
        for i in 0..12 {
            place(
                &mut state,
                ObstacleKind::Airborne(AirBand::High),
                101.0 + i as f32 * 0.5,
                7.0,
            );
        }
        tick(&mut state, &TickInput::default());
        // 9 passes at x1, then x2 from the tenth on
        assert_eq!(state.obstacles_passed, 12);
        assert_eq!(state.score, 9 + 3 * 2);
        assert_eq!(state.combo_multiplier, 2);
    }
}
