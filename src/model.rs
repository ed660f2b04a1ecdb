use crate::engine::{PlaybackSnapshot, Step, StepSequence};
use crate::error::ReplayError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub base_url: String,
    pub width: u32,
    pub height: u32,
    pub generator: GenerationAlgorithm,
    pub solver: PathfindingAlgorithm,
    #[serde(with = "humantime_serde")]
    pub step_interval: Duration,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub user_agent: String,
    #[serde(default)]
    pub maze_id: Option<i64>,
    pub solve_on_launch: bool,
}

/// Grid position. `x` is the column and `y` the row, serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Packed set key: `x` in the high half, `y` in the low half.
    pub fn key(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    pub fn from_key(key: u64) -> Self {
        Self {
            x: (key >> 32) as u32 as i32,
            y: key as u32 as i32,
        }
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl From<Coord> for (i32, i32) {
    fn from(c: Coord) -> Self {
        (c.x, c.y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Coordinate set keyed by [`Coord::key`]. Serialized as a sorted coordinate list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Coord>", into = "Vec<Coord>")]
pub struct CellSet {
    keys: HashSet<u64>,
}

impl CellSet {
    pub fn contains(&self, c: Coord) -> bool {
        self.keys.contains(&c.key())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.keys.iter().copied().map(Coord::from_key)
    }
}

impl FromIterator<Coord> for CellSet {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Coord::key).collect(),
        }
    }
}

impl From<Vec<Coord>> for CellSet {
    fn from(v: Vec<Coord>) -> Self {
        v.into_iter().collect()
    }
}

impl From<CellSet> for Vec<Coord> {
    fn from(set: CellSet) -> Self {
        let mut out: Vec<Coord> = set.iter().collect();
        out.sort_by_key(|c| (c.y, c.x));
        out
    }
}

/// Grid cell. The provider encodes floor as `0` and wall as `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CellKind {
    Floor,
    Wall,
}

impl TryFrom<u8> for CellKind {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(CellKind::Floor),
            1 => Ok(CellKind::Wall),
            other => Err(format!("unknown cell kind {other}")),
        }
    }
}

impl From<CellKind> for u8 {
    fn from(k: CellKind) -> Self {
        match k {
            CellKind::Floor => 0,
            CellKind::Wall => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GenerationAlgorithm {
    RecursiveBacktracking,
    Prims,
    Kruskals,
}

impl GenerationAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationAlgorithm::RecursiveBacktracking => "recursive_backtracking",
            GenerationAlgorithm::Prims => "prims",
            GenerationAlgorithm::Kruskals => "kruskals",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GenerationAlgorithm::RecursiveBacktracking => "Recursive Backtracking",
            GenerationAlgorithm::Prims => "Prim's Algorithm",
            GenerationAlgorithm::Kruskals => "Kruskal's Algorithm",
        }
    }

    pub fn next(self) -> Self {
        match self {
            GenerationAlgorithm::RecursiveBacktracking => GenerationAlgorithm::Prims,
            GenerationAlgorithm::Prims => GenerationAlgorithm::Kruskals,
            GenerationAlgorithm::Kruskals => GenerationAlgorithm::RecursiveBacktracking,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PathfindingAlgorithm {
    Bfs,
    Dfs,
    Astar,
}

impl PathfindingAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            PathfindingAlgorithm::Bfs => "bfs",
            PathfindingAlgorithm::Dfs => "dfs",
            PathfindingAlgorithm::Astar => "astar",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PathfindingAlgorithm::Bfs => "BFS (Breadth-First Search)",
            PathfindingAlgorithm::Dfs => "DFS (Depth-First Search)",
            PathfindingAlgorithm::Astar => "A* Algorithm",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PathfindingAlgorithm::Bfs => {
                "BFS guarantees the shortest path by exploring all nodes at the same distance first."
            }
            PathfindingAlgorithm::Dfs => {
                "DFS follows a branch to its end before backtracking; it can be fast but is not optimal."
            }
            PathfindingAlgorithm::Astar => {
                "A* uses a heuristic to steer the search toward the goal while keeping the path optimal."
            }
        }
    }

    pub fn next(self) -> Self {
        match self {
            PathfindingAlgorithm::Bfs => PathfindingAlgorithm::Dfs,
            PathfindingAlgorithm::Dfs => PathfindingAlgorithm::Astar,
            PathfindingAlgorithm::Astar => PathfindingAlgorithm::Bfs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maze {
    pub id: i64,
    pub width: u32,
    pub height: u32,
    pub grid: Vec<Vec<CellKind>>,
    pub start: Coord,
    pub end: Coord,
    #[serde(default)]
    pub algorithm: Option<GenerationAlgorithm>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Maze {
    pub fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.y >= 0 && (c.x as u32) < self.width && (c.y as u32) < self.height
    }

    pub fn cell(&self, c: Coord) -> Option<CellKind> {
        if !self.contains(c) {
            return None;
        }
        self.grid
            .get(c.y as usize)
            .and_then(|row| row.get(c.x as usize))
            .copied()
    }

    /// Check the shape invariants a provider response must satisfy.
    pub fn validate(&self) -> Result<(), ReplayError> {
        if self.width == 0 || self.height == 0 {
            return Err(ReplayError::ProviderFailure(format!(
                "maze {} has empty dimensions {}x{}",
                self.id, self.width, self.height
            )));
        }
        if self.grid.len() != self.height as usize
            || self.grid.iter().any(|row| row.len() != self.width as usize)
        {
            return Err(ReplayError::ProviderFailure(format!(
                "maze {} grid does not match {}x{}",
                self.id, self.width, self.height
            )));
        }
        for (label, c) in [("start", self.start), ("end", self.end)] {
            if !self.contains(c) {
                return Err(ReplayError::ProviderFailure(format!(
                    "maze {} {label} {c} is outside the grid",
                    self.id
                )));
            }
        }
        if self.start == self.end {
            return Err(ReplayError::ProviderFailure(format!(
                "maze {} start and end coincide at {}",
                self.id, self.start
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolutionStats {
    pub nodes_explored: u64,
    pub path_length: u64,
    pub execution_time: f64,
}

/// Solution as sent by the provider, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionResponse {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub maze_id: Option<i64>,
    pub algorithm: PathfindingAlgorithm,
    #[serde(default)]
    pub path: Vec<Coord>,
    #[serde(default)]
    pub steps: Vec<Step>,
    pub stats: SolutionStats,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Validated solve result. Always carries at least one step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SolutionResponse", into = "SolutionResponse")]
pub struct Solution {
    pub id: Option<i64>,
    pub maze_id: Option<i64>,
    pub algorithm: PathfindingAlgorithm,
    pub path: Vec<Coord>,
    pub path_set: CellSet,
    pub steps: StepSequence,
    pub stats: SolutionStats,
    pub created_at: Option<String>,
}

impl TryFrom<SolutionResponse> for Solution {
    type Error = ReplayError;

    fn try_from(r: SolutionResponse) -> Result<Self, Self::Error> {
        let steps = StepSequence::new(r.steps)?;
        let path_set = r.path.iter().copied().collect();
        let mut stats = r.stats;
        if !stats.execution_time.is_finite() || stats.execution_time < 0.0 {
            stats.execution_time = 0.0;
        }
        Ok(Self {
            id: r.id,
            maze_id: r.maze_id,
            algorithm: r.algorithm,
            path: r.path,
            path_set,
            steps,
            stats,
            created_at: r.created_at,
        })
    }
}

impl From<Solution> for SolutionResponse {
    fn from(s: Solution) -> Self {
        Self {
            id: s.id,
            maze_id: s.maze_id,
            algorithm: s.algorithm,
            path: s.path,
            steps: s.steps.into_steps(),
            stats: s.stats,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub width: u32,
    pub height: u32,
    pub algorithm: GenerationAlgorithm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeListResponse {
    pub items: Vec<Maze>,
    pub total: u64,
    pub page: u32,
    pub size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    Generate,
    LoadMaze,
    Solve,
}

impl RequestKind {
    pub fn label(self) -> &'static str {
        match self {
            RequestKind::Generate => "Generating maze…",
            RequestKind::LoadMaze => "Loading maze…",
            RequestKind::Solve => "Solving…",
        }
    }
}

/// Events emitted by the session and consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    MazeLoaded(Arc<Maze>),
    SolutionLoaded(Arc<Solution>),
    Playback(PlaybackSnapshot),
    Busy(Option<RequestKind>),
    Info(InfoEvent),
}

/// Structured info events emitted by the session and consumed by UI/CLI layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum InfoEvent {
    Message(String),
    RequestFailed { kind: RequestKind, message: String },
    RequestInFlight(RequestKind),
    NoMaze,
    PlaybackFinished { steps: usize, path_length: u64 },
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Message(msg) => msg.clone(),
            InfoEvent::RequestFailed { kind, message } => match kind {
                RequestKind::Generate => format!("Maze generation failed: {message}"),
                RequestKind::LoadMaze => format!("Loading maze failed: {message}"),
                RequestKind::Solve => format!("Pathfinding failed: {message}"),
            },
            InfoEvent::RequestInFlight(kind) => {
                format!("Busy: {}", kind.label().trim_end_matches('…'))
            }
            InfoEvent::NoMaze => "No maze loaded; generate one first".to_string(),
            InfoEvent::PlaybackFinished { steps, path_length } => {
                if *path_length == 0 {
                    format!("Replay finished after {steps} steps: end is unreachable")
                } else {
                    format!("Replay finished after {steps} steps: path of {path_length} cells")
                }
            }
        }
    }
}

/// Saved replay: the maze and the solution it was solved with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayRecord {
    pub saved_at: String,
    pub maze: Maze,
    pub solution: Solution,
}
