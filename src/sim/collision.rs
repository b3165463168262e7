//! Collision resolver
//!
//! Both boxes are shrunk before the overlap test so that grazing a corner
//! by a few pixels is forgiven. Collision is instant death; there is no
//! partial damage.

use super::character::Character;
use super::obstacle::Obstacle;
use super::rect::Rect;
use crate::config::Config;

/// Character box after the forgiveness margin
#[inline]
pub fn character_hitbox(character: &Character, config: &Config) -> Rect {
    character.hitbox().shrink(config.collision_margin)
}

/// Obstacle box after the forgiveness margin
#[inline]
pub fn obstacle_hitbox(obstacle: &Obstacle, config: &Config) -> Rect {
    obstacle.hitbox().shrink(config.obstacle_collision_margin)
}

/// Id of the first live obstacle touching the character, if any.
///
/// Obstacles whose left edge is already past the character's right edge
/// are skipped without building their box.
pub fn first_hit(character: &Character, obstacles: &[Obstacle], config: &Config) -> Option<u32> {
    let body = character_hitbox(character, config);
    obstacles
        .iter()
        .filter(|o| !o.is_off_field(config.off_field_margin))
        .filter(|o| o.x < body.right())
        .find(|o| body.intersects(&obstacle_hitbox(o, config)))
        .map(|o| o.id)
}

/// True if the character touches any live obstacle
#[inline]
pub fn check_collision(character: &Character, obstacles: &[Obstacle], config: &Config) -> bool {
    first_hit(character, obstacles, config).is_some()
}
