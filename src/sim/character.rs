//! The runner: vertical kinematics and the jump/duck state machine
//!
//! Only `y` moves. The body is either resting on its ground line (possibly
//! ducking) or airborne under gravity. Two grace windows soften input timing:
//! coyote time after touching down and a jump buffer that queues an early
//! press and fires it on landing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::config::Config;

/// Coarse body state, derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyState {
    Grounded,
    Ducking,
    /// Rising while `vel_y < 0`, falling otherwise
    Airborne,
}

/// The player- or policy-controlled runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top-left corner of the standing box; x never changes
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity, negative is up
    pub vel_y: f32,
    pub is_jumping: bool,
    pub is_ducking: bool,
    pub is_on_ground: bool,
    /// Duck input currently held, even mid-air where it cannot take effect
    pub duck_held: bool,
    /// Jump input currently held (lower gravity, full-height arc)
    pub jump_held: bool,
    /// Ticks left in which a jump still counts as grounded
    pub coyote_timer: u32,
    /// Ticks left on a queued jump request
    pub jump_buffer_timer: u32,
    /// Floor line for this lane
    pub ground_y: f32,
    duck_ratio: f32,
}

impl Character {
    /// A character standing on the ground at the configured x
    pub fn new(config: &Config) -> Self {
        Self {
            pos: Vec2::new(config.character_x, config.ground_y - config.character_height),
            width: config.character_width,
            height: config.character_height,
            vel_y: 0.0,
            is_jumping: false,
            is_ducking: false,
            is_on_ground: true,
            duck_held: false,
            jump_held: false,
            coyote_timer: 0,
            jump_buffer_timer: 0,
            ground_y: config.ground_y,
            duck_ratio: config.duck_height_ratio,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos.y
    }

    /// Top-left y when standing on the ground
    #[inline]
    pub fn rest_y(&self) -> f32 {
        self.ground_y - self.height
    }

    /// Distance between the feet and the ground line
    #[inline]
    pub fn height_above_ground(&self) -> f32 {
        (self.rest_y() - self.pos.y).max(0.0)
    }

    pub fn state(&self) -> BodyState {
        if self.is_jumping {
            BodyState::Airborne
        } else if self.is_ducking {
            BodyState::Ducking
        } else {
            BodyState::Grounded
        }
    }

    /// Whether a jump pressed right now would take off.
    ///
    /// The coyote timer only starts on landing, when the body is already on
    /// the ground, so on a flat floor it never opens a window of its own. It
    /// matters only if something clears `is_on_ground` without a take-off.
    pub fn can_jump(&self) -> bool {
        !self.is_ducking && (self.is_on_ground || (self.coyote_timer > 0 && !self.is_jumping))
    }

    /// Jump input went down. Returns true if the character took off.
    ///
    /// Airborne presses only arm the jump buffer. Presses while ducking are
    /// ignored outright.
    pub fn press_jump(&mut self, config: &Config) -> bool {
        self.jump_held = true;
        if self.can_jump() {
            self.take_off(config);
            return true;
        }
        if self.is_jumping {
            self.jump_buffer_timer = config.jump_buffer_ticks;
        }
        false
    }

    /// Jump input went up: cut the rise short for a lower hop
    pub fn release_jump(&mut self, config: &Config) {
        self.jump_held = false;
        if self.is_jumping && self.vel_y < config.jump_min_velocity {
            self.vel_y = config.jump_min_velocity;
        }
    }

    /// Ducking is only possible on the ground. A duck held through a jump
    /// takes effect on landing.
    pub fn set_duck(&mut self, ducking: bool) {
        self.duck_held = ducking;
        if !self.is_jumping {
            self.is_ducking = ducking;
        }
    }

    /// Advance one tick. Returns true if a buffered jump fired.
    pub fn tick(&mut self, config: &Config) -> bool {
        let fired = if self.is_jumping {
            self.tick_airborne(config)
        } else {
            self.tick_grounded(config)
        };

        debug_assert!(self.pos.y <= self.rest_y(), "character sank below ground");
        debug_assert!(!(self.is_ducking && self.is_jumping), "ducking mid-air");
        fired
    }

    fn tick_airborne(&mut self, config: &Config) -> bool {
        let gravity = if self.jump_held {
            config.jump_hold_gravity
        } else {
            config.gravity
        };
        self.vel_y += gravity;
        self.pos.y += self.vel_y;

        // >= so a body exactly on the line lands this tick instead of next
        if self.pos.y >= self.rest_y() {
            self.land(config);
            if self.jump_buffer_timer > 0 && !self.is_ducking {
                self.take_off(config);
                return true;
            }
            self.jump_buffer_timer = 0;
        } else {
            self.jump_buffer_timer = self.jump_buffer_timer.saturating_sub(1);
        }
        false
    }

    fn tick_grounded(&mut self, config: &Config) -> bool {
        self.coyote_timer = self.coyote_timer.saturating_sub(1);
        if self.jump_buffer_timer > 0 {
            // Holding duck lets a queued jump expire
            if !self.is_ducking {
                self.take_off(config);
                return true;
            }
            self.jump_buffer_timer -= 1;
        }
        false
    }

    fn take_off(&mut self, config: &Config) {
        self.vel_y = config.jump_velocity;
        self.is_jumping = true;
        self.is_on_ground = false;
        self.is_ducking = false;
        self.coyote_timer = 0;
        self.jump_buffer_timer = 0;
        log::trace!("take off at y={:.1}", self.pos.y);
    }

    fn land(&mut self, config: &Config) {
        self.pos.y = self.rest_y();
        self.vel_y = 0.0;
        self.is_jumping = false;
        self.is_on_ground = true;
        self.is_ducking = self.duck_held;
        self.coyote_timer = config.coyote_ticks;
    }

    /// Box used for collisions; ducking lowers the top, feet stay put
    pub fn hitbox(&self) -> Rect {
        let h = if self.is_ducking {
            self.height * self.duck_ratio
        } else {
            self.height
        };
        Rect::new(self.pos.x, self.pos.y + (self.height - h), self.width, h)
    }
}
