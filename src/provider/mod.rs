//! Maze/solve provider: the remote service that generates mazes and runs the
//! search algorithms. The replay engine only consumes its results.

mod http;

pub use http::HttpProvider;

use crate::error::ReplayError;
use crate::model::{GenerateRequest, Maze, PathfindingAlgorithm, SolutionResponse};
use async_trait::async_trait;

#[async_trait]
pub trait MazeProvider: Send + Sync {
    async fn generate(&self, req: &GenerateRequest) -> Result<Maze, ReplayError>;

    async fn get_maze(&self, id: i64) -> Result<Maze, ReplayError>;

    async fn solve(
        &self,
        maze_id: i64,
        algorithm: PathfindingAlgorithm,
    ) -> Result<SolutionResponse, ReplayError>;
}
