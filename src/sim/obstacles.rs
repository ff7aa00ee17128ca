//! Obstacle field: scroll, prune, spawn
//!
//! Spawning is driven by position, not time: a new obstacle appears at the
//! right edge once the newest one has moved `spawn_interval` into the field.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameState, Obstacle};
use crate::tuning::Tuning;

/// Move every obstacle left by `speed`
pub fn scroll(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles {
        obstacle.x -= speed;
    }
}

/// Drop obstacles whose right edge is at or past the left field edge
///
/// Survivors keep their relative order. Returns how many were removed.
pub fn prune(obstacles: &mut Vec<Obstacle>) -> usize {
    let before = obstacles.len();
    obstacles.retain(|o| o.right() > 0.0);
    before - obstacles.len()
}

/// Whether the spawn policy calls for a new obstacle this tick
pub fn should_spawn(obstacles: &[Obstacle], tuning: &Tuning) -> bool {
    match obstacles.last() {
        None => true,
        Some(newest) => newest.x < tuning.field_width - tuning.spawn_interval,
    }
}

/// Pick a top-gate height uniformly from `[0, field_height / 2)`
pub fn random_top_height(rng: &mut Pcg32, field_height: f32) -> f32 {
    rng.random_range(0.0..field_height / 2.0)
}

/// Append one obstacle at the right edge of the field
pub fn spawn(state: &mut GameState) -> Obstacle {
    let id = state.next_obstacle_id();
    let top_height = random_top_height(&mut state.rng, state.tuning.field_height);
    let obstacle = Obstacle::new(
        id,
        state.tuning.field_width,
        state.tuning.obstacle_width,
        top_height,
        state.tuning.gap,
    );
    state.obstacles.push(obstacle);
    state.spawned += 1;

    log::debug!(
        "Spawned obstacle {} (gap {:.1}..{:.1})",
        id,
        obstacle.top_height,
        obstacle.bottom_y
    );
    obstacle
}

/// One tick of obstacle management: scroll, prune, then spawn if due
pub fn update(state: &mut GameState) {
    scroll(&mut state.obstacles, state.tuning.scroll_speed);
    prune(&mut state.obstacles);
    if should_spawn(&state.obstacles, &state.tuning) {
        spawn(state);
    }
}
