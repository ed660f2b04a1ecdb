//! Shared fixtures for unit tests.

use crate::engine::{Step, StepSequence};
use crate::model::{
    CellKind, Coord, GenerationAlgorithm, Maze, PathfindingAlgorithm, SessionConfig,
    SolutionResponse, SolutionStats,
};
use std::time::Duration;

pub(crate) fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

/// All-floor maze with start in the top-left and end in the bottom-right corner.
pub(crate) fn open_maze(width: u32, height: u32) -> Maze {
    Maze {
        id: 1,
        width,
        height,
        grid: vec![vec![CellKind::Floor; width as usize]; height as usize],
        start: c(0, 0),
        end: c(width as i32 - 1, height as i32 - 1),
        algorithm: Some(GenerationAlgorithm::RecursiveBacktracking),
        created_at: None,
    }
}

/// Terminal step of a sequence.
pub(crate) fn last_step(seq: &StepSequence) -> &Step {
    seq.get(seq.terminal_index()).expect("non-empty sequence")
}

pub(crate) fn step(current: (i32, i32), visited: &[(i32, i32)], frontier: &[(i32, i32)]) -> Step {
    Step {
        current: current.into(),
        visited: visited.iter().copied().map(Coord::from).collect(),
        frontier: frontier.iter().copied().map(Coord::from).collect(),
    }
}

pub(crate) fn response_with_steps(steps: Vec<Step>) -> SolutionResponse {
    SolutionResponse {
        id: Some(7),
        maze_id: Some(1),
        algorithm: PathfindingAlgorithm::Bfs,
        path: Vec::new(),
        steps,
        stats: SolutionStats {
            nodes_explored: 0,
            path_length: 0,
            execution_time: 0.0,
        },
        created_at: None,
    }
}

/// BFS over `open_maze(3, 3)`: five steps, path along the top row then down.
pub(crate) fn bfs_response() -> SolutionResponse {
    let steps = vec![
        step((0, 0), &[(0, 0)], &[(1, 0), (0, 1)]),
        step((1, 0), &[(0, 0), (1, 0)], &[(0, 1), (2, 0), (1, 1)]),
        step((0, 1), &[(0, 0), (1, 0), (0, 1)], &[(2, 0), (1, 1), (0, 2)]),
        step(
            (2, 0),
            &[(0, 0), (1, 0), (0, 1), (2, 0)],
            &[(1, 1), (0, 2), (2, 1)],
        ),
        step(
            (2, 1),
            &[(0, 0), (1, 0), (0, 1), (2, 0), (2, 1)],
            &[(1, 1), (0, 2), (2, 2)],
        ),
    ];
    SolutionResponse {
        path: vec![c(0, 0), c(1, 0), c(2, 0), c(2, 1), c(2, 2)],
        stats: SolutionStats {
            nodes_explored: 5,
            path_length: 5,
            execution_time: 0.0004,
        },
        ..response_with_steps(steps)
    }
}

/// Straight-line solution with `n` steps walking the top row.
pub(crate) fn linear_response(n: usize) -> SolutionResponse {
    let steps = (0..n as i32)
        .map(|i| {
            let visited: Vec<(i32, i32)> = (0..=i).map(|x| (x, 0)).collect();
            step((i, 0), &visited, &[(i + 1, 0)])
        })
        .collect();
    response_with_steps(steps)
}

pub(crate) fn test_config(base_url: &str) -> SessionConfig {
    SessionConfig {
        base_url: base_url.to_string(),
        width: 3,
        height: 3,
        generator: GenerationAlgorithm::Prims,
        solver: PathfindingAlgorithm::Bfs,
        step_interval: Duration::from_millis(100),
        request_timeout: Duration::from_secs(5),
        user_agent: "maze-replay-tests".into(),
        maze_id: None,
        solve_on_launch: false,
    }
}
