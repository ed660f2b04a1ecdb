//! Playback state machine.
//!
//! Replays a solution's step sequence one index at a time. The controller never
//! sleeps: it hands out a [`TimerToken`] while playing and the owner of the
//! clock calls [`PlaybackController::tick`] on that cadence.

use super::overlay::OverlayFrame;
use crate::error::ReplayError;
use crate::model::{Maze, Solution, SolutionResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No solution loaded.
    Idle,
    Paused,
    Playing,
    /// Terminal step reached by playing; the final path is revealed.
    Finished,
}

/// Identity of the single periodic timer that may drive `tick` right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing changed.
    Ignored,
    Advanced(usize),
    Finished(usize),
}

/// Read-only view of the playback state handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    pub current_index: usize,
    pub len: usize,
    pub is_playing: bool,
    pub show_final_path: bool,
}

impl PlaybackSnapshot {
    pub const IDLE: PlaybackSnapshot = PlaybackSnapshot {
        status: PlaybackStatus::Idle,
        current_index: 0,
        len: 0,
        is_playing: false,
        show_final_path: false,
    };

    /// Overlay inputs for this instant. A snapshot that does not match the
    /// solution's length yields a frame without a step.
    pub fn frame<'a>(&self, maze: &'a Maze, solution: Option<&'a Solution>) -> OverlayFrame<'a> {
        let solution = solution.filter(|_| self.status != PlaybackStatus::Idle);
        OverlayFrame {
            maze,
            step: solution.and_then(|s| s.steps.get(self.current_index)),
            path: solution.map(|s| &s.path_set),
            show_final_path: self.show_final_path,
        }
    }
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self::IDLE
    }
}

#[derive(Debug)]
pub struct PlaybackController {
    solution: Option<Arc<Solution>>,
    current_index: usize,
    status: PlaybackStatus,
    show_final_path: bool,
    timer: Option<TimerToken>,
    next_timer: u64,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackController {
    pub fn new() -> Self {
        Self {
            solution: None,
            current_index: 0,
            status: PlaybackStatus::Idle,
            show_final_path: false,
            timer: None,
            next_timer: 0,
        }
    }

    /// Validate a provider solution and install it. On error the current state
    /// is left exactly as it was.
    pub fn load_solution(
        &mut self,
        response: SolutionResponse,
    ) -> Result<Arc<Solution>, ReplayError> {
        let solution = Arc::new(Solution::try_from(response)?);
        self.install(solution.clone());
        Ok(solution)
    }

    /// Install an already validated solution: `Paused` at index 0.
    pub fn install(&mut self, solution: Arc<Solution>) {
        self.cancel_timer();
        self.solution = Some(solution);
        self.current_index = 0;
        self.show_final_path = false;
        self.status = PlaybackStatus::Paused;
    }

    /// Drop the solution, e.g. because the maze changed.
    pub fn unload(&mut self) {
        self.cancel_timer();
        self.solution = None;
        self.current_index = 0;
        self.show_final_path = false;
        self.status = PlaybackStatus::Idle;
    }

    pub fn play(&mut self) -> bool {
        if self.status != PlaybackStatus::Paused {
            return false;
        }
        self.status = PlaybackStatus::Playing;
        self.next_timer += 1;
        self.timer = Some(TimerToken(self.next_timer));
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.status != PlaybackStatus::Playing {
            return false;
        }
        self.cancel_timer();
        self.status = PlaybackStatus::Paused;
        true
    }

    pub fn toggle(&mut self) -> bool {
        match self.status {
            PlaybackStatus::Playing => self.pause(),
            _ => self.play(),
        }
    }

    /// Back to index 0 with the path hidden. Without a solution this stays `Idle`.
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.current_index = 0;
        self.show_final_path = false;
        if self.solution.is_some() {
            self.status = PlaybackStatus::Paused;
        }
    }

    pub fn step_forward(&mut self) -> bool {
        if self.status != PlaybackStatus::Paused {
            return false;
        }
        let before = self.current_index;
        self.set_index(before + 1);
        self.current_index != before
    }

    /// Advance one step while playing. Reaching the terminal index finishes
    /// playback and cancels the timer.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != PlaybackStatus::Playing {
            return TickOutcome::Ignored;
        }
        let Some(last) = self.terminal_index() else {
            return TickOutcome::Ignored;
        };
        if self.current_index < last {
            self.set_index(self.current_index + 1);
        }
        if self.current_index >= last {
            self.cancel_timer();
            self.status = PlaybackStatus::Finished;
            self.show_final_path = true;
            return TickOutcome::Finished(self.current_index);
        }
        TickOutcome::Advanced(self.current_index)
    }

    /// Token of the live timer; `Some` exactly while playing.
    pub fn timer(&self) -> Option<TimerToken> {
        self.timer
    }

    pub fn solution(&self) -> Option<&Arc<Solution>> {
        self.solution.as_ref()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: self.status,
            current_index: self.current_index,
            len: self.solution.as_ref().map(|s| s.steps.len()).unwrap_or(0),
            is_playing: self.status == PlaybackStatus::Playing,
            show_final_path: self.show_final_path,
        }
    }

    fn terminal_index(&self) -> Option<usize> {
        self.solution.as_ref().map(|s| s.steps.terminal_index())
    }

    fn set_index(&mut self, index: usize) {
        self.current_index = index.min(self.terminal_index().unwrap_or(0));
    }

    fn cancel_timer(&mut self) {
        self.timer = None;
    }
}

#[cfg(test)]
#[path = "tests/playback_tests.rs"]
mod tests;
