use crate::engine::{OverlayFrame, PlaybackSnapshot};
use crate::model::{
    GenerateRequest, GenerationAlgorithm, Maze, PathfindingAlgorithm, RequestKind,
    SessionConfig, SessionEvent, Solution,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Size range the maze service accepts.
pub const MIN_SIZE: u32 = 5;
pub const MAX_SIZE: u32 = 100;

pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub auto_save: bool,
    /// Skip auto-save for the next loaded solution (it came from disk).
    pub skip_next_auto_save: bool,
    pub busy: Option<RequestKind>,

    pub maze: Option<Arc<Maze>>,
    pub solution: Option<Arc<Solution>>,
    pub playback: PlaybackSnapshot,

    // Controls for the next generate/solve request
    pub width: u32,
    pub height: u32,
    pub generator: GenerationAlgorithm,
    pub solver: PathfindingAlgorithm,

    pub last_saved_path: Option<PathBuf>,
}

impl UiState {
    pub fn new(cfg: &SessionConfig, auto_save: bool) -> Self {
        Self {
            tab: 0,
            info: String::new(),
            auto_save,
            skip_next_auto_save: false,
            busy: None,
            maze: None,
            solution: None,
            playback: PlaybackSnapshot::IDLE,
            width: cfg.width.clamp(MIN_SIZE, MAX_SIZE),
            height: cfg.height.clamp(MIN_SIZE, MAX_SIZE),
            generator: cfg.generator,
            solver: cfg.solver,
            last_saved_path: None,
        }
    }

    /// Fold one session event into the view. Returns the solution when one was
    /// just loaded so the caller can run post-solve processing.
    pub fn apply_event(&mut self, ev: SessionEvent) -> Option<Arc<Solution>> {
        match ev {
            SessionEvent::MazeLoaded(maze) => {
                self.info = format!(
                    "Maze #{} loaded ({}x{})",
                    maze.id, maze.width, maze.height
                );
                self.width = maze.width.clamp(MIN_SIZE, MAX_SIZE);
                self.height = maze.height.clamp(MIN_SIZE, MAX_SIZE);
                if let Some(alg) = maze.algorithm {
                    self.generator = alg;
                }
                self.maze = Some(maze);
                self.solution = None;
                self.playback = PlaybackSnapshot::IDLE;
                None
            }
            SessionEvent::SolutionLoaded(solution) => {
                self.info = format!(
                    "Solved with {}: {} steps (space to play)",
                    solution.algorithm.display_name(),
                    solution.steps.len()
                );
                self.solver = solution.algorithm;
                self.solution = Some(solution.clone());
                Some(solution)
            }
            SessionEvent::Playback(snap) => {
                self.playback = snap;
                None
            }
            SessionEvent::Busy(kind) => {
                self.busy = kind;
                if let Some(k) = kind {
                    self.info = k.label().to_string();
                }
                None
            }
            SessionEvent::Info(info) => {
                self.info = info.to_message();
                None
            }
        }
    }

    /// Overlay inputs for the frame about to be drawn.
    pub fn frame(&self) -> Option<OverlayFrame<'_>> {
        let maze = self.maze.as_deref()?;
        Some(self.playback.frame(maze, self.solution.as_deref()))
    }

    /// Visited and frontier sizes at the shown step.
    pub fn exploration_counts(&self) -> Option<(usize, usize)> {
        let step = self.frame()?.step?;
        Some((step.visited.len(), step.frontier.len()))
    }

    pub fn resize(&mut self, delta: i32) {
        let apply = |v: u32| (v as i64 + delta as i64).clamp(MIN_SIZE as i64, MAX_SIZE as i64) as u32;
        self.width = apply(self.width);
        self.height = apply(self.height);
        self.info = format!("Next maze: {}x{}", self.width, self.height);
    }

    pub fn cycle_generator(&mut self) {
        self.generator = self.generator.next();
        self.info = format!("Generator: {}", self.generator.display_name());
    }

    pub fn cycle_solver(&mut self) {
        self.solver = self.solver.next();
        self.info = format!("Solver: {}", self.solver.display_name());
    }

    /// File name of the most recent save, for the controls panel.
    pub fn last_saved_name(&self) -> Option<String> {
        let path = self.last_saved_path.as_deref()?;
        let name = path.file_name().unwrap_or(path.as_os_str());
        Some(name.to_string_lossy().into_owned())
    }

    pub fn generate_request(&self) -> GenerateRequest {
        GenerateRequest {
            width: self.width,
            height: self.height,
            algorithm: self.generator,
        }
    }
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
