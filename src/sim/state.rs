//! Game state and core simulation types
//!
//! The run state is an explicit value owned by the game loop; nothing lives
//! at process scope, so independent runs can coexist (e.g. parallel tests).

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start; sprite shown but static
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Run ended by a collision; score frozen
    Over,
}

/// The player-controlled falling sprite
///
/// `x` never changes during a run; the world scrolls past it instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (positive = down)
    pub velocity: f32,
}

impl Sprite {
    /// Sprite at its spawn position with zero velocity
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            x: tuning.sprite_x,
            y: tuning.sprite_y,
            width: tuning.sprite_width,
            height: tuning.sprite_height,
            velocity: 0.0,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point (render space)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// A gated obstacle: a top gate and a bottom gate with a gap between them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    pub width: f32,
    /// Top gate spans `0..top_height`
    pub top_height: f32,
    /// Bottom gate spans `bottom_y..field_height`; always `top_height + gap`
    pub bottom_y: f32,
    /// Set once the sprite has cleared this obstacle
    pub passed: bool,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, width: f32, top_height: f32, gap: f32) -> Self {
        Self {
            id,
            x,
            width,
            top_height,
            bottom_y: top_height + gap,
            passed: false,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Height of the opening
    #[inline]
    pub fn gap(&self) -> f32 {
        self.bottom_y - self.top_height
    }

    /// Vertical center of the opening
    pub fn gap_center(&self) -> f32 {
        (self.top_height + self.bottom_y) / 2.0
    }
}

/// Complete state of one game instance
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance parameters this instance runs with
    pub tuning: Tuning,
    /// Seed the gap RNG was created from
    pub seed: u64,
    /// Gap placement RNG (reseeded per run from `seed` and `runs`)
    pub rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// The falling sprite
    pub sprite: Sprite,
    /// Active obstacles in spawn order (= left to right)
    pub obstacles: Vec<Obstacle>,
    /// Obstacles cleared this run
    pub score: u64,
    /// Ticks simulated this run
    pub time_ticks: u64,
    /// Obstacles spawned this run (including pruned ones)
    pub spawned: u64,
    /// Runs started on this instance
    pub runs: u32,
    /// Next obstacle ID
    next_id: u32,
}

impl GameState {
    /// Create an idle game with the given tuning and seed
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self {
            sprite: Sprite::spawn(&tuning),
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            obstacles: Vec::new(),
            score: 0,
            time_ticks: 0,
            spawned: 0,
            runs: 0,
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset everything run-scoped and enter `Running`
    ///
    /// Valid from `Idle` (start) and `Over` (retry). Returns false and leaves
    /// the state untouched while a run is already in progress.
    pub fn start_run(&mut self) -> bool {
        if self.phase == GamePhase::Running {
            log::debug!("Start ignored: run already in progress");
            return false;
        }

        self.sprite = Sprite::spawn(&self.tuning);
        self.obstacles.clear();
        self.score = 0;
        self.time_ticks = 0;
        self.spawned = 0;
        self.runs += 1;
        // Each run gets its own gap sequence, reproducible from the seed
        self.rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.runs as u64));
        self.phase = GamePhase::Running;

        log::info!("Run {} started (seed {})", self.runs, self.seed);
        true
    }

    /// Same transition as [`GameState::start_run`], named for the `Over` screen
    pub fn retry(&mut self) -> bool {
        self.start_run()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Read-only view for a render sink
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            field: Vec2::new(self.tuning.field_width, self.tuning.field_height),
            sprite: self.sprite,
            sprite_visible: true,
            obstacles: self.obstacles.clone(),
            score: self.score,
            phase: self.phase,
        }
    }
}

/// Everything a render sink needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Field width/height
    pub field: Vec2,
    pub sprite: Sprite,
    pub sprite_visible: bool,
    pub obstacles: Vec<Obstacle>,
    pub score: u64,
    pub phase: GamePhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(Tuning::default(), 7);
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.sprite.x, 50.0);
        assert_eq!(state.sprite.y, 300.0);
        assert_eq!(state.sprite.velocity, 0.0);
    }

    #[test]
    fn test_obstacle_gap_invariant() {
        let o = Obstacle::new(1, 400.0, 50.0, 100.0, 150.0);
        assert_eq!(o.bottom_y, 250.0);
        assert_eq!(o.gap(), 150.0);
        assert_eq!(o.gap_center(), 175.0);
        assert!(!o.passed);
    }

    #[test]
    fn test_start_resets_run() {
        let mut state = GameState::new(Tuning::default(), 7);
        assert!(state.start_run());

        state.score = 5;
        state.sprite.y = 10.0;
        state.sprite.velocity = 4.0;
        let id = state.next_obstacle_id();
        let mut o = Obstacle::new(id, 20.0, 50.0, 10.0, 150.0);
        o.passed = true;
        state.obstacles.push(o);
        state.phase = GamePhase::Over;

        assert!(state.retry());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.sprite, Sprite::spawn(&state.tuning));
        assert_eq!(state.runs, 2);
    }

    #[test]
    fn test_start_while_running_is_ignored() {
        let mut state = GameState::new(Tuning::default(), 7);
        assert!(state.start_run());
        state.score = 3;
        assert!(!state.start_run());
        assert_eq!(state.score, 3);
        assert_eq!(state.runs, 1);
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(Tuning::default(), 7);
        state.start_run();
        state.score = 2;
        let snap = state.snapshot();
        assert_eq!(snap.score, 2);
        assert_eq!(snap.phase, GamePhase::Running);
        assert_eq!(snap.field, Vec2::new(400.0, 600.0));
        assert!(snap.sprite_visible);
    }
}
