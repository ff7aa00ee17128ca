//! Score tracking
//!
//! An obstacle counts once its right edge is strictly left of the sprite's
//! left edge. The `passed` flag makes the update idempotent per obstacle.

use super::state::{Obstacle, Sprite};

/// Mark newly cleared obstacles and return how many were cleared this call
pub fn update(sprite: &Sprite, obstacles: &mut [Obstacle]) -> u64 {
    let mut cleared = 0;
    for obstacle in obstacles.iter_mut().filter(|o| !o.passed) {
        if obstacle.right() < sprite.x {
            obstacle.passed = true;
            cleared += 1;
        }
    }
    cleared
}
