use crate::engine::{PlaybackSnapshot, PlaybackStatus};
use crate::model::{
    GenerateRequest, GenerationAlgorithm, InfoEvent, Maze, PathfindingAlgorithm, ReplayRecord,
    SessionConfig, SessionEvent, Solution,
};
use crate::orchestrator::{
    process_solution, run_session, LaunchPlan, MazeSource, SessionCommand, SessionOptions,
};
use crate::provider::{HttpProvider, MazeProvider};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

/// Mazes per page for `--list-mazes`.
const LIST_PAGE_SIZE: u32 = 20;

/// Output line routing for stdout/stderr writer.
enum OutputLine {
    Stdout(String),
    Stderr(String),
}

/// Spawn a blocking writer for stdout/stderr to avoid blocking async tasks.
fn spawn_output_writer() -> (
    mpsc::UnboundedSender<OutputLine>,
    tokio::task::JoinHandle<()>,
) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputLine>();
    let handle = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let stderr = std::io::stderr();
        let mut out = std::io::LineWriter::new(stdout.lock());
        let mut err = std::io::LineWriter::new(stderr.lock());

        while let Some(line) = rx.blocking_recv() {
            match line {
                OutputLine::Stdout(msg) => {
                    let _ = writeln!(out, "{}", msg);
                }
                OutputLine::Stderr(msg) => {
                    let _ = writeln!(err, "{}", msg);
                }
            }
        }

        let _ = out.flush();
        let _ = err.flush();
    });
    (tx, handle)
}

#[derive(Debug, Parser, Clone)]
#[command(
    name = "maze-replay",
    version,
    about = "Step-by-step replay of maze pathfinding searches"
)]
pub struct Cli {
    /// Base URL of the maze service
    #[arg(long, env = "MAZE_API_URL", default_value = "http://localhost:8000")]
    pub base_url: String,

    /// Side length of generated mazes (sets both width and height)
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u32).range(5..=100))]
    pub size: u32,

    /// Override the generated maze width
    #[arg(long, value_parser = clap::value_parser!(u32).range(5..=100))]
    pub width: Option<u32>,

    /// Override the generated maze height
    #[arg(long, value_parser = clap::value_parser!(u32).range(5..=100))]
    pub height: Option<u32>,

    /// Maze generation algorithm
    #[arg(long, value_enum, default_value_t = GenerationAlgorithm::RecursiveBacktracking)]
    pub generator: GenerationAlgorithm,

    /// Pathfinding algorithm
    #[arg(long, value_enum, default_value_t = PathfindingAlgorithm::Astar)]
    pub solver: PathfindingAlgorithm,

    /// Delay between replay steps
    #[arg(long, default_value = "100ms")]
    pub step_interval: humantime::Duration,

    /// Timeout for each request to the maze service
    #[arg(long, default_value = "30s")]
    pub request_timeout: humantime::Duration,

    /// Load a stored maze instead of generating one
    #[arg(long)]
    pub maze_id: Option<i64>,

    /// Replay the newest stored solution of --maze-id for the chosen solver
    #[arg(long, requires = "maze_id")]
    pub reuse_solution: bool,

    /// Replay a saved JSON record without contacting the maze service
    #[arg(long, conflicts_with = "maze_id")]
    pub replay_file: Option<PathBuf>,

    /// Print the maze and solution as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Replay in the terminal as plain text and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// Export the replay record as JSON
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Use --auto-save true or --auto-save false to override
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub auto_save: bool,

    /// Solve the maze as soon as it loads
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub solve_on_launch: bool,

    /// List mazes stored by the service and exit
    #[arg(long)]
    pub list_mazes: bool,

    /// Page to show with --list-mazes
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Delete a stored maze and exit
    #[arg(long)]
    pub delete_maze: Option<i64>,

    /// Write logs to this file (TUI mode logs nowhere otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Whether this invocation takes over the terminal.
    pub fn is_interactive(&self) -> bool {
        cfg!(feature = "tui")
            && !self.json
            && !self.text
            && !self.list_mazes
            && self.delete_maze.is_none()
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if let Some(id) = args.delete_maze {
        return run_delete(&args, id).await;
    }
    if args.list_mazes {
        return run_list(&args).await;
    }

    if !args.json && !args.text {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args).await;
        }
    }

    if args.json {
        return run_json(args).await;
    }

    run_text(args).await
}

/// Build a `SessionConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> SessionConfig {
    SessionConfig {
        base_url: args.base_url.clone(),
        width: args.width.unwrap_or(args.size),
        height: args.height.unwrap_or(args.size),
        generator: args.generator,
        solver: args.solver,
        step_interval: Duration::from(args.step_interval),
        request_timeout: Duration::from(args.request_timeout),
        user_agent: format!("maze-replay/{}", env!("CARGO_PKG_VERSION")),
        maze_id: args.maze_id,
        solve_on_launch: args.solve_on_launch,
    }
}

/// What a session should do first.
pub(crate) enum Startup {
    /// Install a finished replay; nothing to fetch.
    Restore(ReplayRecord),
    Launch(LaunchPlan),
}

impl Startup {
    pub(crate) fn expects_solution(&self) -> bool {
        match self {
            Startup::Restore(_) => true,
            Startup::Launch(plan) => plan.solve.is_some(),
        }
    }

    /// Queue the startup work: a restore becomes the first command, a launch
    /// plan goes into the session options.
    pub(crate) fn into_options(
        self,
        cfg: &SessionConfig,
        cmd_tx: &mpsc::UnboundedSender<SessionCommand>,
    ) -> SessionOptions {
        let launch = match self {
            Startup::Restore(record) => {
                let _ = cmd_tx.send(SessionCommand::Restore(Box::new(record)));
                None
            }
            Startup::Launch(plan) => Some(plan),
        };
        SessionOptions {
            step_interval: cfg.step_interval,
            launch,
        }
    }
}

pub(crate) fn generate_request(cfg: &SessionConfig) -> GenerateRequest {
    GenerateRequest {
        width: cfg.width,
        height: cfg.height,
        algorithm: cfg.generator,
    }
}

/// Resolve the command line into the first thing the session should do.
pub(crate) async fn resolve_startup(
    args: &Cli,
    cfg: &SessionConfig,
    provider: &HttpProvider,
) -> Result<Startup> {
    if let Some(path) = args.replay_file.as_deref() {
        let record = crate::storage::load_replay(path)?;
        return Ok(Startup::Restore(record));
    }

    if let (Some(id), true) = (cfg.maze_id, args.reuse_solution) {
        if let Some(record) = stored_replay(provider, id, cfg.solver).await? {
            return Ok(Startup::Restore(record));
        }
        info!(maze_id = id, solver = cfg.solver.as_str(), "no stored solution, solving");
        return Ok(Startup::Launch(LaunchPlan {
            maze: MazeSource::Existing(id),
            solve: Some(cfg.solver),
        }));
    }

    let maze = match cfg.maze_id {
        Some(id) => MazeSource::Existing(id),
        None => MazeSource::Generate(generate_request(cfg)),
    };
    Ok(Startup::Launch(LaunchPlan {
        maze,
        solve: cfg.solve_on_launch.then_some(cfg.solver),
    }))
}

/// Newest stored solution of `maze_id` for `algorithm`, paired with its maze.
pub(crate) async fn stored_replay(
    provider: &HttpProvider,
    maze_id: i64,
    algorithm: PathfindingAlgorithm,
) -> Result<Option<ReplayRecord>> {
    let stored = provider
        .list_solutions(maze_id)
        .await
        .context("list stored solutions")?;
    // The service lists newest first; pick by timestamp rather than position.
    let Some(latest) = stored
        .into_iter()
        .filter(|s| s.algorithm == algorithm)
        .reduce(|best, s| if s.created_at > best.created_at { s } else { best })
    else {
        return Ok(None);
    };
    let solution = Solution::try_from(latest).context("stored solution")?;
    let maze = provider.get_maze(maze_id).await.context("load maze")?;
    Ok(Some(ReplayRecord {
        saved_at: solution
            .created_at
            .clone()
            .unwrap_or_else(crate::storage::timestamp_utc),
        maze,
        solution,
    }))
}

async fn run_delete(args: &Cli, id: i64) -> Result<()> {
    let provider = HttpProvider::new(&build_config(args))?;
    let message = provider
        .delete_maze(id)
        .await
        .with_context(|| format!("delete maze {id}"))?;
    println!("{message}");
    Ok(())
}

async fn run_list(args: &Cli) -> Result<()> {
    let provider = HttpProvider::new(&build_config(args))?;
    let page = provider
        .list_mazes(args.page, LIST_PAGE_SIZE)
        .await
        .context("list mazes")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }
    for line in crate::text_summary::maze_list_lines(&page) {
        println!("{line}");
    }
    Ok(())
}

/// Fetch (or load) a maze and its solution without replaying, then print the
/// record.
async fn run_json(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let provider = HttpProvider::new(&cfg)?;
    let startup = resolve_startup(&args, &cfg, &provider).await?;
    let from_file = args.replay_file.is_some();

    let (maze, solution) = match startup {
        Startup::Restore(record) => (record.maze, record.solution),
        Startup::Launch(plan) => {
            let maze = match plan.maze {
                MazeSource::Generate(req) => provider.generate(&req).await,
                MazeSource::Existing(id) => provider.get_maze(id).await,
            }
            .context("load maze")?;
            let response = provider
                .solve(maze.id, plan.solve.unwrap_or(cfg.solver))
                .await
                .context("solve maze")?;
            let solution = Solution::try_from(response).context("solve maze")?;
            (maze, solution)
        }
    };

    let processed = process_solution(&args, args.auto_save && !from_file, &maze, &solution);
    println!("{}", serde_json::to_string_pretty(&processed.record)?);
    for msg in processed.export_messages {
        eprintln!("{msg}");
    }
    if let Some(p) = processed.auto_saved_path {
        eprintln!("Saved: {}", p.display());
    }
    Ok(())
}

async fn run_text(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let provider = Arc::new(HttpProvider::new(&cfg)?);
    let startup = resolve_startup(&args, &cfg, &provider).await?;
    let expects_solution = startup.expects_solution();
    let from_file = args.replay_file.is_some();

    let (out_tx, out_handle) = spawn_output_writer();
    let (evt_tx, mut evt_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<SessionCommand>();

    let opts = startup.into_options(&cfg, &cmd_tx);
    let handle = tokio::spawn(run_session(provider, opts, evt_tx, cmd_rx));

    let mut maze: Option<Arc<Maze>> = None;
    let mut solution: Option<Arc<Solution>> = None;
    let mut snapshot = PlaybackSnapshot::IDLE;
    let mut last_decile: Option<u8> = None;
    let mut failure: Option<String> = None;

    while let Some(ev) = evt_rx.recv().await {
        match ev {
            SessionEvent::MazeLoaded(m) => {
                let _ = out_tx.send(OutputLine::Stderr(format!(
                    "Maze #{}: {}x{} ({})",
                    m.id,
                    m.width,
                    m.height,
                    m.algorithm.map(|a| a.display_name()).unwrap_or("unknown")
                )));
                maze = Some(m);
                solution = None;
                if !expects_solution {
                    let _ = cmd_tx.send(SessionCommand::Quit);
                }
            }
            SessionEvent::SolutionLoaded(s) => {
                let _ = out_tx.send(OutputLine::Stderr(format!(
                    "Solved with {}: {} steps",
                    s.algorithm.display_name(),
                    s.steps.len()
                )));
                solution = Some(s);
                let _ = cmd_tx.send(SessionCommand::Play);
            }
            SessionEvent::Playback(snap) => {
                snapshot = snap;
                if snap.status == PlaybackStatus::Playing || snap.status == PlaybackStatus::Finished
                {
                    let pct = crate::metrics::progress_percent(snap.current_index, snap.len);
                    let decile = pct / 10;
                    if last_decile != Some(decile) || snap.status == PlaybackStatus::Finished {
                        last_decile = Some(decile);
                        let _ = out_tx.send(OutputLine::Stderr(format!(
                            "Progress {}",
                            crate::metrics::progress_label(snap.current_index, snap.len)
                        )));
                    }
                }
            }
            SessionEvent::Busy(Some(kind)) => {
                let _ = out_tx.send(OutputLine::Stderr(kind.label().to_string()));
            }
            SessionEvent::Busy(None) => {}
            SessionEvent::Info(info) => {
                let msg = info.to_message();
                let _ = out_tx.send(OutputLine::Stderr(msg.clone()));
                match info {
                    InfoEvent::RequestFailed { .. } => {
                        failure = Some(msg);
                        let _ = cmd_tx.send(SessionCommand::Quit);
                    }
                    InfoEvent::PlaybackFinished { .. } => {
                        let _ = cmd_tx.send(SessionCommand::Quit);
                    }
                    _ => {}
                }
            }
        }
    }

    handle.await.context("replay session task failed")??;

    if let Some(msg) = failure {
        drop(out_tx);
        let _ = out_handle.await;
        return Err(anyhow::anyhow!(msg));
    }

    if let Some(maze) = maze.as_deref() {
        let summary =
            crate::text_summary::build_text_summary(maze, solution.as_deref(), &snapshot);
        for line in summary.lines {
            let _ = out_tx.send(OutputLine::Stdout(line));
        }
        if let Some(solution) = solution.as_deref() {
            let processed =
                process_solution(&args, args.auto_save && !from_file, maze, solution);
            for msg in processed.export_messages {
                let _ = out_tx.send(OutputLine::Stderr(msg));
            }
            if let Some(p) = processed.auto_saved_path {
                let _ = out_tx.send(OutputLine::Stderr(format!("Saved: {}", p.display())));
            }
        }
    }

    drop(out_tx);
    let _ = out_handle.await;
    Ok(())
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
