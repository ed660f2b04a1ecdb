use super::*;
use axum::{extract::Path, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

fn parse(extra: &[&str]) -> Cli {
    let mut argv = vec!["maze-replay"];
    argv.extend_from_slice(extra);
    Cli::try_parse_from(argv).expect("valid arguments")
}

#[test]
fn defaults_match_the_service_defaults() {
    let cfg = build_config(&parse(&["--base-url", "http://maze.test"]));
    assert_eq!(cfg.base_url, "http://maze.test");
    assert_eq!((cfg.width, cfg.height), (20, 20));
    assert_eq!(cfg.generator, GenerationAlgorithm::RecursiveBacktracking);
    assert_eq!(cfg.solver, PathfindingAlgorithm::Astar);
    assert_eq!(cfg.step_interval, Duration::from_millis(100));
    assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    assert!(cfg.solve_on_launch);
    assert!(cfg.user_agent.starts_with("maze-replay/"));
}

#[test]
fn size_flags_and_algorithms_parse() {
    let args = parse(&[
        "--size",
        "31",
        "--height",
        "9",
        "--generator",
        "kruskals",
        "--solver",
        "bfs",
        "--step-interval",
        "250ms",
        "--solve-on-launch",
        "false",
    ]);
    let cfg = build_config(&args);
    assert_eq!((cfg.width, cfg.height), (31, 9));
    assert_eq!(cfg.generator, GenerationAlgorithm::Kruskals);
    assert_eq!(cfg.solver, PathfindingAlgorithm::Bfs);
    assert_eq!(cfg.step_interval, Duration::from_millis(250));
    assert!(!cfg.solve_on_launch);
}

#[test]
fn out_of_range_sizes_are_rejected() {
    assert!(Cli::try_parse_from(["maze-replay", "--size", "4"]).is_err());
    assert!(Cli::try_parse_from(["maze-replay", "--width", "101"]).is_err());
    assert!(Cli::try_parse_from(["maze-replay", "--reuse-solution"]).is_err());
    assert!(Cli::try_parse_from([
        "maze-replay",
        "--replay-file",
        "x.json",
        "--maze-id",
        "3"
    ])
    .is_err());
}

#[test]
fn headless_and_catalogue_modes_are_not_interactive() {
    assert!(!parse(&["--text"]).is_interactive());
    assert!(!parse(&["--json"]).is_interactive());
    assert!(!parse(&["--list-mazes"]).is_interactive());
    assert!(!parse(&["--delete-maze", "4"]).is_interactive());
}

fn stored_solution(algorithm: &str, created_at: &str, current: [i32; 2]) -> Value {
    json!({
        "id": 1,
        "maze_id": 3,
        "algorithm": algorithm,
        "path": [[0, 0], [1, 0]],
        "steps": [{"current": current, "visited": [[0, 0]], "frontier": []}],
        "stats": {"nodes_explored": 2, "path_length": 2, "execution_time": 0.001},
        "created_at": created_at
    })
}

async fn get_maze(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({
        "id": id,
        "width": 2,
        "height": 2,
        "grid": [[0, 0], [1, 0]],
        "start": [0, 0],
        "end": [1, 1]
    }))
}

async fn solutions(Path(_id): Path<i64>) -> Json<Value> {
    Json(json!([
        stored_solution("bfs", "2025-01-03T00:00:00", [1, 0]),
        stored_solution("astar", "2025-01-02T00:00:00", [0, 0]),
        stored_solution("bfs", "2025-01-01T00:00:00", [0, 0])
    ]))
}

async fn provider() -> (HttpProvider, String) {
    let app = Router::new()
        .route("/api/maze/:id", get(get_maze))
        .route("/api/maze/:id/solutions", get(solutions));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let base = format!("http://{addr}");
    let p = HttpProvider::new(&crate::test_support::test_config(&base)).expect("provider");
    (p, base)
}

#[tokio::test]
async fn reuse_picks_newest_solution_for_the_solver() {
    let (p, _) = provider().await;
    let record = stored_replay(&p, 3, PathfindingAlgorithm::Bfs)
        .await
        .expect("fetch")
        .expect("stored bfs solution");
    assert_eq!(record.saved_at, "2025-01-03T00:00:00");
    assert_eq!(record.maze.id, 3);
    let terminal = crate::test_support::last_step(&record.solution.steps);
    assert_eq!(terminal.current, crate::model::Coord::new(1, 0));

    let none = stored_replay(&p, 3, PathfindingAlgorithm::Dfs)
        .await
        .expect("fetch");
    assert!(none.is_none());
}

#[tokio::test]
async fn startup_falls_back_to_solving_when_nothing_is_stored() {
    let (p, base) = provider().await;

    let args = parse(&[
        "--base-url",
        &base,
        "--maze-id",
        "3",
        "--reuse-solution",
        "--solver",
        "dfs",
    ]);
    let cfg = build_config(&args);
    match resolve_startup(&args, &cfg, &p).await.expect("startup") {
        Startup::Launch(plan) => {
            assert!(matches!(plan.maze, MazeSource::Existing(3)));
            assert_eq!(plan.solve, Some(PathfindingAlgorithm::Dfs));
        }
        Startup::Restore(_) => panic!("expected a launch plan"),
    }

    let args = parse(&["--base-url", &base, "--maze-id", "3", "--reuse-solution", "--solver", "bfs"]);
    let cfg = build_config(&args);
    let startup = resolve_startup(&args, &cfg, &p).await.expect("startup");
    assert!(matches!(startup, Startup::Restore(_)));
    assert!(startup.expects_solution());
}

#[tokio::test]
async fn startup_generates_by_default() {
    let (p, base) = provider().await;
    let args = parse(&["--base-url", &base, "--size", "12", "--solve-on-launch", "false"]);
    let cfg = build_config(&args);
    let startup = resolve_startup(&args, &cfg, &p).await.expect("startup");
    assert!(!startup.expects_solution());
    match startup {
        Startup::Launch(LaunchPlan {
            maze: MazeSource::Generate(req),
            solve: None,
        }) => {
            assert_eq!((req.width, req.height), (12, 12));
            assert_eq!(req.algorithm, GenerationAlgorithm::RecursiveBacktracking);
        }
        _ => panic!("expected a generate plan without solve"),
    }
}
