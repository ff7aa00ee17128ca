//! Frame-driven game loop controller
//!
//! Owns the run state and drives [`tick`] once per host frame. Every frame
//! request carries the epoch of the run that asked for it; starting a run or
//! ending one bumps the epoch, so a frame queued for a superseded run is
//! dropped instead of mutating the new state.

use super::state::{GamePhase, GameState, Snapshot};
use super::tick::{TickInput, TickOutput, tick};
use crate::tuning::Tuning;

/// Identifies which run a scheduled frame belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken {
    epoch: u64,
}

impl FrameToken {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Host primitive that calls back once per display frame
pub trait FrameScheduler {
    /// Ask for `on_frame(token)` to be called at the next frame
    fn request_frame(&mut self, token: FrameToken);
    /// Withdraw any outstanding request
    fn cancel(&mut self);
}

/// Receives the final score when a run ends
pub trait GameOverNotifier {
    fn game_over(&mut self, final_score: u64);
}

impl<F: FnMut(u64)> GameOverNotifier for F {
    fn game_over(&mut self, final_score: u64) {
        self(final_score)
    }
}

/// Draws a snapshot; owned by the host
pub trait RenderSink {
    fn draw(&mut self, snapshot: &Snapshot);
}

impl<F: FnMut(&Snapshot)> RenderSink for F {
    fn draw(&mut self, snapshot: &Snapshot) {
        self(snapshot)
    }
}

/// Scheduler that just remembers the last request (headless hosts, tests)
#[derive(Debug, Default)]
pub struct ManualScheduler {
    queued: Option<FrameToken>,
    /// Number of `cancel` calls seen
    pub cancels: u32,
}

impl ManualScheduler {
    /// Take the pending frame, if any
    pub fn take(&mut self) -> Option<FrameToken> {
        self.queued.take()
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.queued
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self, token: FrameToken) {
        self.queued = Some(token);
    }

    fn cancel(&mut self) {
        self.queued = None;
        self.cancels += 1;
    }
}

/// The game loop controller
pub struct GameLoop<S: FrameScheduler, N: GameOverNotifier> {
    state: GameState,
    scheduler: S,
    notifier: N,
    epoch: u64,
    /// Input latched since the last frame
    input: TickInput,
}

impl<S: FrameScheduler, N: GameOverNotifier> GameLoop<S, N> {
    pub fn new(tuning: Tuning, seed: u64, scheduler: S, notifier: N) -> Self {
        Self {
            state: GameState::new(tuning, seed),
            scheduler,
            notifier,
            epoch: 0,
            input: TickInput::default(),
        }
    }

    fn token(&self) -> FrameToken {
        FrameToken { epoch: self.epoch }
    }

    /// Start a run (`Idle → Running` or `Over → Running`)
    ///
    /// Ignored while a run is in progress.
    pub fn start(&mut self) -> bool {
        if !self.state.start_run() {
            return false;
        }
        // Drop anything still queued for an earlier run
        self.scheduler.cancel();
        self.epoch += 1;
        self.input.flap = false;
        self.scheduler.request_frame(self.token());
        true
    }

    /// Retry after game over; same transition as [`GameLoop::start`]
    pub fn retry(&mut self) -> bool {
        self.start()
    }

    /// Latch a flap for the next frame (ignored unless running)
    pub fn flap(&mut self) {
        if self.state.is_running() {
            self.input.flap = true;
        } else {
            log::debug!("Flap ignored in {:?}", self.state.phase);
        }
    }

    /// Toggle idle/demo mode
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }

    /// Frame callback from the scheduler
    ///
    /// Runs one tick, hands the snapshot to `sink`, then either schedules the
    /// next frame or ends the run. Returns `None` for stale frames.
    pub fn on_frame(&mut self, token: FrameToken, sink: &mut impl RenderSink) -> Option<TickOutput> {
        if token.epoch != self.epoch || self.state.phase != GamePhase::Running {
            log::debug!(
                "Dropping stale frame (epoch {}, current {})",
                token.epoch,
                self.epoch
            );
            return None;
        }

        let out = tick(&mut self.state, &self.input);
        self.input.flap = false;
        sink.draw(&out.snapshot);

        match out.game_over() {
            Some(final_score) => {
                self.scheduler.cancel();
                self.epoch += 1;
                self.notifier.game_over(final_score);
            }
            None => self.scheduler.request_frame(self.token()),
        }

        Some(out)
    }

    /// Draw the current state without ticking (idle and game-over screens)
    pub fn present(&self, sink: &mut impl RenderSink) {
        sink.draw(&self.state.snapshot());
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }
}
