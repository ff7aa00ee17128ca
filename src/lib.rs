//! Gatefall - A side-scrolling gate-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scoring)
//! - `tuning`: Data-driven game balance
//! - `renderer`: WebGPU rendering of simulation snapshots

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Classic game constants (the defaults for [`Tuning`])
pub mod consts {
    /// Visible field dimensions (pixels)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Sprite spawn position and size
    pub const SPRITE_X: f32 = 50.0;
    pub const SPRITE_Y: f32 = 300.0;
    pub const SPRITE_WIDTH: f32 = 40.0;
    pub const SPRITE_HEIGHT: f32 = 30.0;

    /// Downward acceleration per tick
    pub const GRAVITY: f32 = 0.5;
    /// Velocity set by a flap (negative = upward)
    pub const FLAP_IMPULSE: f32 = -8.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 50.0;
    pub const OBSTACLE_GAP: f32 = 150.0;
    /// Leftward scroll per tick
    pub const SCROLL_SPEED: f32 = 3.0;
    /// Horizontal distance the newest obstacle must travel before the next spawn
    pub const SPAWN_INTERVAL: f32 = 200.0;
}
