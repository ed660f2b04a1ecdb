use super::MazeProvider;
use crate::error::ReplayError;
use crate::model::{
    GenerateRequest, Maze, MazeListResponse, PathfindingAlgorithm, SessionConfig,
    SolutionResponse,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct SolveRequest {
    algorithm: PathfindingAlgorithm,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    message: String,
}

/// REST client for the maze service (`/api/maze/...`).
#[derive(Debug, Clone)]
pub struct HttpProvider {
    http: Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(cfg: &SessionConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.request_timeout)
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/maze{}", self.base_url, path)
    }

    pub async fn list_mazes(&self, page: u32, size: u32) -> Result<MazeListResponse, ReplayError> {
        let req = self
            .http
            .get(self.url("/"))
            .query(&[("page", page), ("size", size)]);
        send_json(req).await
    }

    /// Stored solutions for a maze. The service orders them newest first.
    pub async fn list_solutions(&self, maze_id: i64) -> Result<Vec<SolutionResponse>, ReplayError> {
        let req = self.http.get(self.url(&format!("/{maze_id}/solutions")));
        send_json(req).await
    }

    pub async fn delete_maze(&self, id: i64) -> Result<String, ReplayError> {
        let req = self.http.delete(self.url(&format!("/{id}")));
        let body: DeleteResponse = send_json(req).await?;
        Ok(body.message)
    }
}

#[async_trait]
impl MazeProvider for HttpProvider {
    async fn generate(&self, req: &GenerateRequest) -> Result<Maze, ReplayError> {
        debug!(
            width = req.width,
            height = req.height,
            algorithm = req.algorithm.as_str(),
            "requesting maze generation"
        );
        let maze: Maze = send_json(self.http.post(self.url("/generate")).json(req)).await?;
        maze.validate()?;
        Ok(maze)
    }

    async fn get_maze(&self, id: i64) -> Result<Maze, ReplayError> {
        let maze: Maze = send_json(self.http.get(self.url(&format!("/{id}")))).await?;
        maze.validate()?;
        Ok(maze)
    }

    async fn solve(
        &self,
        maze_id: i64,
        algorithm: PathfindingAlgorithm,
    ) -> Result<SolutionResponse, ReplayError> {
        debug!(maze_id, algorithm = algorithm.as_str(), "requesting solve");
        let req = self
            .http
            .post(self.url(&format!("/{maze_id}/solve")))
            .json(&SolveRequest { algorithm });
        send_json(req).await
    }
}

/// Send a request and decode a JSON body, turning every failure into a
/// human-readable `ProviderFailure`.
async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, ReplayError> {
    let resp = req.send().await.map_err(|e| {
        warn!(error = %e, "maze service request failed");
        ReplayError::provider(format!("could not reach maze service: {e}"))
    })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        warn!(%status, %message, "maze service returned an error");
        return Err(ReplayError::provider(message));
    }

    resp.json::<T>()
        .await
        .map_err(|e| ReplayError::provider(format!("malformed response from maze service: {e}")))
}

/// Prefer the service's `detail` field; fall back to the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .map(|d| match d {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });
    match detail {
        Some(d) if !d.trim().is_empty() => format!("{status}: {d}"),
        _ => format!("maze service returned {status}"),
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
