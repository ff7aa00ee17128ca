//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per host frame, fixed per-tick constants
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod game_loop;
pub mod obstacles;
pub mod physics;
pub mod score;
pub mod state;
pub mod tick;

pub use collision::{Collision, Gate, collides, detect};
pub use game_loop::{
    FrameScheduler, FrameToken, GameLoop, GameOverNotifier, ManualScheduler, RenderSink,
};
pub use state::{GamePhase, GameState, Obstacle, Snapshot, Sprite};
pub use tick::{GameEvent, TickInput, TickOutput, tick};
