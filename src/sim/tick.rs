//! Per-frame simulation tick
//!
//! Core game loop step. Order within a tick is fixed:
//! physics, obstacles, score, collision. Score is updated before the
//! collision check, so an obstacle cleared on the fatal tick still counts.

use serde::{Deserialize, Serialize};

use super::autopilot;
use super::collision::{self, Collision};
use super::obstacles;
use super::physics;
use super::score;
use super::state::{GamePhase, GameState, Snapshot};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap (space/click/tap) since the previous tick
    pub flap: bool,
    /// Idle/demo mode - autopilot decides when to flap
    pub autopilot: bool,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Flap accepted
    Flapped,
    /// One or more obstacles cleared; `score` is the new total
    Scored { score: u64 },
    /// Run ended; emitted once, on the tick that entered `Over`
    GameOver { final_score: u64, cause: Collision },
}

/// Result of a tick: events plus the state to draw
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub events: Vec<GameEvent>,
    pub snapshot: Snapshot,
}

impl TickOutput {
    /// Final score if this tick ended the run
    pub fn game_over(&self) -> Option<u64> {
        self.events.iter().find_map(|e| match e {
            GameEvent::GameOver { final_score, .. } => Some(*final_score),
            _ => None,
        })
    }
}

/// Advance the game by one tick
///
/// Outside `Running` this is a no-op (input included) that still returns a
/// snapshot for drawing.
pub fn tick(state: &mut GameState, input: &TickInput) -> TickOutput {
    let mut events = Vec::new();

    if state.phase != GamePhase::Running {
        if input.flap {
            log::debug!("Flap ignored in {:?}", state.phase);
        }
        return TickOutput {
            events,
            snapshot: state.snapshot(),
        };
    }

    state.time_ticks += 1;

    let flap = input.flap || (input.autopilot && autopilot::should_flap(state));
    if flap {
        events.push(GameEvent::Flapped);
    }
    let impulse = flap.then_some(state.tuning.flap_impulse);
    physics::integrate(&mut state.sprite, state.tuning.gravity, impulse);

    obstacles::update(state);

    let cleared = score::update(&state.sprite, &mut state.obstacles);
    if cleared > 0 {
        state.score += cleared;
        events.push(GameEvent::Scored { score: state.score });
    }

    if let Some(cause) = collision::detect(&state.sprite, &state.obstacles, state.tuning.field_height)
    {
        state.phase = GamePhase::Over;
        log::info!(
            "Game over after {} ticks: score {} ({:?})",
            state.time_ticks,
            state.score,
            cause
        );
        events.push(GameEvent::GameOver {
            final_score: state.score,
            cause,
        });
    }

    TickOutput {
        events,
        snapshot: state.snapshot(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use crate::tuning::Tuning;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(Tuning::default(), seed);
        state.start_run();
        state
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut state = GameState::new(Tuning::default(), 1);
        let before = state.sprite;
        let out = tick(
            &mut state,
            &TickInput {
                flap: true,
                ..Default::default()
            },
        );
        assert!(out.events.is_empty());
        assert_eq!(state.sprite, before);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(out.snapshot.phase, GamePhase::Idle);
    }

    #[test]
    fn test_first_tick() {
        let mut state = running(1);
        let out = tick(&mut state, &TickInput::default());
        assert_eq!(state.sprite.velocity, 0.5);
        assert_eq!(state.sprite.y, 300.5);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(out.snapshot.obstacles.len(), 1);
        assert!(out.events.is_empty());
    }

    #[test]
    fn test_flap_tick() {
        let mut state = running(1);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        let out = tick(
            &mut state,
            &TickInput {
                flap: true,
                ..Default::default()
            },
        );
        assert_eq!(state.sprite.velocity, -8.0);
        assert_eq!(out.events, vec![GameEvent::Flapped]);
    }

    #[test]
    fn test_free_fall_hits_floor() {
        let mut state = running(9);
        let mut over = None;
        for _ in 0..200 {
            let out = tick(&mut state, &TickInput::default());
            if let Some(score) = out.game_over() {
                over = Some(score);
                break;
            }
        }
        assert_eq!(over, Some(0));
        assert_eq!(state.phase, GamePhase::Over);
        assert!(state.sprite.bottom() >= 600.0);

        // Further ticks change nothing
        let frozen = state.clone();
        let out = tick(&mut state, &TickInput::default());
        assert!(out.events.is_empty());
        assert_eq!(state.sprite, frozen.sprite);
        assert_eq!(state.score, frozen.score);
    }

    #[test]
    fn test_score_counts_on_fatal_tick() {
        let mut state = running(1);
        // One obstacle about to be cleared, sprite about to hit the floor
        state.sprite.y = 570.0;
        state.sprite.velocity = 0.0;
        // Right edge at the sprite's x; one scroll step clears it
        let id = state.next_obstacle_id();
        state
            .obstacles
            .push(Obstacle::new(id, 0.0, 50.0, 100.0, 150.0));

        let out = tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 1);
        assert_eq!(
            out.events,
            vec![
                GameEvent::Scored { score: 1 },
                GameEvent::GameOver {
                    final_score: 1,
                    cause: Collision::Floor
                },
            ]
        );
    }

    #[test]
    fn test_determinism() {
        // Same seed and inputs produce identical runs
        let mut a = running(99999);
        let mut b = running(99999);
        for i in 0..400 {
            let input = TickInput {
                flap: i % 17 == 0,
                autopilot: true,
            };
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.sprite, b.sprite);
        assert_eq!(a.score, b.score);
    }
}
