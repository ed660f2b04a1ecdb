use super::*;
use crate::model::{CellKind, Coord, GenerationAlgorithm, Solution};
use crate::test_support::test_config;
use axum::{
    extract::{Path, Query},
    http::StatusCode as AxumStatus,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::net::TcpListener;

fn maze_json(id: i64, width: u64, height: u64, algorithm: &str) -> Value {
    let grid: Vec<Vec<u8>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| u8::from(y == 1 && x == 1))
                .collect()
        })
        .collect();
    json!({
        "id": id,
        "width": width,
        "height": height,
        "grid": grid,
        "start": [0, 0],
        "end": [width - 1, height - 1],
        "algorithm": algorithm,
        "created_at": "2025-01-01T12:00:00"
    })
}

fn solution_json(maze_id: i64, algorithm: &str, with_steps: bool) -> Value {
    let steps = if with_steps {
        json!([
            {"current": [0, 0], "visited": [[0, 0]], "frontier": [[1, 0], [0, 1]]},
            {"current": [1, 0], "visited": [[0, 0], [1, 0]], "frontier": [[0, 1], [2, 0]]}
        ])
    } else {
        json!([])
    };
    json!({
        "id": 11,
        "maze_id": maze_id,
        "algorithm": algorithm,
        "path": [[0, 0], [1, 0], [2, 0], [2, 1], [2, 2]],
        "steps": steps,
        "stats": {"nodes_explored": 6, "path_length": 5, "execution_time": 0.0012},
        "created_at": "2025-01-01T12:00:01"
    })
}

async fn generate(Json(body): Json<Value>) -> Json<Value> {
    let width = body["width"].as_u64().unwrap_or(0);
    let height = body["height"].as_u64().unwrap_or(0);
    let algorithm = body["algorithm"].as_str().unwrap_or("").to_string();
    Json(maze_json(5, width, height, &algorithm))
}

async fn get_maze(Path(id): Path<i64>) -> (AxumStatus, Json<Value>) {
    match id {
        5 => (AxumStatus::OK, Json(maze_json(5, 3, 3, "prims"))),
        6 => {
            let mut bad = maze_json(6, 3, 3, "prims");
            bad["end"] = json!([0, 0]);
            (AxumStatus::OK, Json(bad))
        }
        _ => (
            AxumStatus::NOT_FOUND,
            Json(json!({"detail": "Maze not found"})),
        ),
    }
}

async fn solve(Path(id): Path<i64>, Json(body): Json<Value>) -> (AxumStatus, Json<Value>) {
    let algorithm = body["algorithm"].as_str().unwrap_or("").to_string();
    match id {
        5 => (AxumStatus::OK, Json(solution_json(id, &algorithm, true))),
        7 => (AxumStatus::OK, Json(solution_json(id, &algorithm, false))),
        _ => (
            AxumStatus::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "solver exploded"})),
        ),
    }
}

async fn list(Query(q): Query<HashMap<String, u32>>) -> Json<Value> {
    let page = q.get("page").copied().unwrap_or(1);
    let size = q.get("size").copied().unwrap_or(10);
    Json(json!({
        "items": [maze_json(5, 3, 3, "prims"), maze_json(8, 4, 4, "kruskals")],
        "total": 12,
        "page": page,
        "size": size
    }))
}

async fn solutions(Path(id): Path<i64>) -> Json<Value> {
    Json(json!([
        solution_json(id, "bfs", true),
        solution_json(id, "astar", true)
    ]))
}

async fn delete(Path(id): Path<i64>) -> (AxumStatus, Json<Value>) {
    if id == 5 {
        (AxumStatus::OK, Json(json!({"message": "Maze deleted"})))
    } else {
        (
            AxumStatus::NOT_FOUND,
            Json(json!({"detail": "Maze not found"})),
        )
    }
}

async fn spawn_service() -> String {
    let app = Router::new()
        .route("/api/maze/", get(list))
        .route("/api/maze/generate", post(generate))
        .route("/api/maze/:id", get(get_maze).delete(delete))
        .route("/api/maze/:id/solve", post(solve))
        .route("/api/maze/:id/solutions", get(solutions));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/")
}

async fn provider() -> HttpProvider {
    let base = spawn_service().await;
    HttpProvider::new(&test_config(&base)).expect("provider")
}

#[tokio::test]
async fn generate_posts_the_request_and_decodes_the_maze() {
    let p = provider().await;
    let maze = p
        .generate(&GenerateRequest {
            width: 4,
            height: 3,
            algorithm: GenerationAlgorithm::Kruskals,
        })
        .await
        .unwrap();

    assert_eq!(maze.id, 5);
    assert_eq!((maze.width, maze.height), (4, 3));
    assert_eq!(maze.algorithm, Some(GenerationAlgorithm::Kruskals));
    assert_eq!(maze.end, Coord::new(3, 2));
    assert_eq!(maze.cell(Coord::new(1, 1)), Some(CellKind::Wall));
    assert_eq!(maze.cell(Coord::new(2, 1)), Some(CellKind::Floor));
}

#[tokio::test]
async fn solve_sends_algorithm_and_returns_raw_solution() {
    let p = provider().await;
    let resp = p.solve(5, PathfindingAlgorithm::Astar).await.unwrap();

    assert_eq!(resp.algorithm, PathfindingAlgorithm::Astar);
    assert_eq!(resp.steps.len(), 2);
    assert_eq!(resp.stats.path_length, 5);

    let solution = Solution::try_from(resp).unwrap();
    assert!(solution.path_set.contains(Coord::new(2, 1)));
    let terminal = crate::test_support::last_step(&solution.steps);
    assert_eq!(terminal.current, Coord::new(1, 0));
}

#[tokio::test]
async fn empty_steps_decode_but_fail_validation() {
    let p = provider().await;
    let resp = p.solve(7, PathfindingAlgorithm::Dfs).await.unwrap();
    assert!(resp.steps.is_empty());
    assert!(matches!(
        Solution::try_from(resp),
        Err(ReplayError::InvalidSolution(_))
    ));
}

#[tokio::test]
async fn service_errors_surface_the_detail_message() {
    let p = provider().await;

    let err = p.solve(1, PathfindingAlgorithm::Bfs).await.unwrap_err();
    assert_eq!(
        err,
        ReplayError::ProviderFailure("500 Internal Server Error: solver exploded".into())
    );

    let err = p.get_maze(404).await.unwrap_err();
    assert!(err.to_string().contains("Maze not found"), "{err}");
}

#[tokio::test]
async fn malformed_maze_is_a_provider_failure() {
    let p = provider().await;
    let err = p.get_maze(6).await.unwrap_err();
    assert!(matches!(err, ReplayError::ProviderFailure(_)));
    assert!(err.to_string().contains("coincide"), "{err}");
}

#[tokio::test]
async fn unreachable_service_is_a_provider_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let p = HttpProvider::new(&test_config(&format!("http://{addr}"))).unwrap();
    let err = p.get_maze(5).await.unwrap_err();
    assert!(err.to_string().starts_with("could not reach maze service"), "{err}");
}

#[tokio::test]
async fn catalogue_operations() {
    let p = provider().await;

    let page = p.list_mazes(2, 5).await.unwrap();
    assert_eq!(page.total, 12);
    assert_eq!((page.page, page.size), (2, 5));
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].algorithm, Some(GenerationAlgorithm::Kruskals));

    let stored = p.list_solutions(5).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].algorithm, PathfindingAlgorithm::Astar);

    assert_eq!(p.delete_maze(5).await.unwrap(), "Maze deleted");
    assert!(p.delete_maze(9).await.is_err());
}

#[test]
fn error_message_falls_back_to_status() {
    assert_eq!(
        error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
        "maze service returned 502 Bad Gateway"
    );
    assert_eq!(
        error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"msg":"too small"}]}"#
        ),
        r#"422 Unprocessable Entity: [{"msg":"too small"}]"#
    );
}
