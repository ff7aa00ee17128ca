//! Idle/demo mode player
//!
//! Aims for a line just above the lower gate of the next obstacle and flaps
//! whenever the sprite is falling and about to drop below it.

use super::state::{GameState, Obstacle};

/// Distance kept between the sprite's bottom edge and the lower gate
const FLOOR_MARGIN: f32 = 12.0;

/// The obstacle the sprite still has to get through
pub fn next_obstacle(state: &GameState) -> Option<&Obstacle> {
    state
        .obstacles
        .iter()
        .find(|o| o.right() >= state.sprite.x)
}

/// Line (in field coordinates) the sprite's bottom edge should stay above
pub fn target_line(state: &GameState) -> f32 {
    match next_obstacle(state) {
        Some(obstacle) => obstacle.bottom_y - FLOOR_MARGIN,
        // Open field: hover just below the middle
        None => state.tuning.field_height / 2.0 + state.sprite.height,
    }
}

/// Whether to flap this tick
pub fn should_flap(state: &GameState) -> bool {
    let sprite = &state.sprite;
    // Only flap on the way down; repeated flaps while rising overshoot
    if sprite.velocity < 0.0 {
        return false;
    }
    let next_bottom = sprite.bottom() + sprite.velocity + state.tuning.gravity;
    next_bottom > target_line(state)
}
