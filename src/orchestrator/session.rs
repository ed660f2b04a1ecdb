//! Replay session lifecycle.
//!
//! Owns the current maze, the playback controller and at most one in-flight
//! provider request. Presentation layers talk to it through commands and get
//! events back.

use crate::engine::{PlaybackController, TickOutcome, TimerToken};
use crate::error::ReplayError;
use crate::model::{
    GenerateRequest, InfoEvent, Maze, PathfindingAlgorithm, ReplayRecord, RequestKind,
    SessionEvent, SolutionResponse,
};
use crate::provider::MazeProvider;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Commands emitted by UI layers to drive the session.
#[derive(Debug, Clone)]
pub(crate) enum SessionCommand {
    Generate(GenerateRequest),
    LoadMaze(i64),
    Solve(PathfindingAlgorithm),
    /// Install a saved maze and solution without contacting the provider.
    Restore(Box<ReplayRecord>),
    Play,
    Pause,
    TogglePlay,
    StepForward,
    Reset,
    Quit,
}

#[derive(Debug, Clone)]
pub(crate) enum MazeSource {
    Generate(GenerateRequest),
    Existing(i64),
}

/// Work to start as soon as the session comes up.
#[derive(Debug, Clone)]
pub(crate) struct LaunchPlan {
    pub maze: MazeSource,
    /// Solve once the maze has loaded.
    pub solve: Option<PathfindingAlgorithm>,
}

#[derive(Debug, Clone)]
pub(crate) struct SessionOptions {
    pub step_interval: Duration,
    pub launch: Option<LaunchPlan>,
}

enum RequestOutcome {
    Maze(Result<Maze, ReplayError>),
    Solution(Result<SolutionResponse, ReplayError>),
}

/// Internal handle for a provider call running on its own task.
struct InFlight {
    kind: RequestKind,
    handle: JoinHandle<RequestOutcome>,
}

/// The one periodic timer, bound to the controller token that armed it.
struct Ticker {
    token: TimerToken,
    interval: Interval,
}

struct Session {
    provider: Arc<dyn MazeProvider>,
    event_tx: UnboundedSender<SessionEvent>,
    maze: Option<Arc<Maze>>,
    playback: PlaybackController,
    in_flight: Option<InFlight>,
    pending_solve: Option<PathfindingAlgorithm>,
}

impl Session {
    fn emit(&self, ev: SessionEvent) {
        let _ = self.event_tx.send(ev);
    }

    fn info(&self, ev: InfoEvent) {
        self.emit(SessionEvent::Info(ev));
    }

    fn emit_playback(&self) {
        self.emit(SessionEvent::Playback(self.playback.snapshot()));
    }

    fn handle(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Generate(req) => {
                let provider = self.provider.clone();
                self.start_request(RequestKind::Generate, async move {
                    RequestOutcome::Maze(provider.generate(&req).await)
                });
            }
            SessionCommand::LoadMaze(id) => {
                let provider = self.provider.clone();
                self.start_request(RequestKind::LoadMaze, async move {
                    RequestOutcome::Maze(provider.get_maze(id).await)
                });
            }
            SessionCommand::Solve(algorithm) => self.solve(algorithm),
            SessionCommand::Restore(record) => self.restore(*record),
            SessionCommand::Play | SessionCommand::TogglePlay
                if self.in_flight.is_some() && !self.playback.snapshot().is_playing =>
            {
                if let Some(f) = &self.in_flight {
                    self.info(InfoEvent::RequestInFlight(f.kind));
                }
            }
            SessionCommand::Play => {
                if self.playback.play() {
                    self.emit_playback();
                }
            }
            SessionCommand::Pause => {
                if self.playback.pause() {
                    self.emit_playback();
                }
            }
            SessionCommand::TogglePlay => {
                if self.playback.toggle() {
                    self.emit_playback();
                }
            }
            SessionCommand::StepForward => {
                if self.playback.step_forward() {
                    self.emit_playback();
                }
            }
            SessionCommand::Reset => {
                self.playback.reset();
                self.emit_playback();
            }
            // Handled by the loop.
            SessionCommand::Quit => {}
        }
    }

    fn solve(&mut self, algorithm: PathfindingAlgorithm) {
        let Some(maze) = self.maze.clone() else {
            self.info(InfoEvent::NoMaze);
            return;
        };
        let provider = self.provider.clone();
        self.start_request(RequestKind::Solve, async move {
            RequestOutcome::Solution(provider.solve(maze.id, algorithm).await)
        });
    }

    fn restore(&mut self, record: ReplayRecord) {
        if let Err(e) = record.maze.validate() {
            self.info(InfoEvent::Message(format!("Saved replay is unusable: {e}")));
            return;
        }
        let maze = Arc::new(record.maze);
        let solution = Arc::new(record.solution);
        self.maze = Some(maze.clone());
        self.playback.install(solution.clone());
        info!(maze_id = maze.id, steps = solution.steps.len(), "restored saved replay");
        self.emit(SessionEvent::MazeLoaded(maze));
        self.emit(SessionEvent::SolutionLoaded(solution));
        self.emit_playback();
    }

    /// Start a provider call unless one is already running. Playback is paused
    /// first so no tick lands while the request is outstanding.
    fn start_request<F>(&mut self, kind: RequestKind, fut: F)
    where
        F: std::future::Future<Output = RequestOutcome> + Send + 'static,
    {
        if let Some(f) = &self.in_flight {
            self.info(InfoEvent::RequestInFlight(f.kind));
            return;
        }
        if self.playback.pause() {
            self.emit_playback();
        }
        debug!(?kind, "starting provider request");
        self.in_flight = Some(InFlight {
            kind,
            handle: tokio::spawn(fut),
        });
        self.emit(SessionEvent::Busy(Some(kind)));
    }

    fn finish_request(
        &mut self,
        kind: RequestKind,
        joined: Result<RequestOutcome, tokio::task::JoinError>,
    ) {
        self.in_flight = None;
        self.emit(SessionEvent::Busy(None));

        let outcome = match joined {
            Ok(o) => o,
            Err(e) => {
                warn!(?kind, error = %e, "provider task failed");
                self.pending_solve = None;
                self.info(InfoEvent::RequestFailed {
                    kind,
                    message: format!("request task failed: {e}"),
                });
                return;
            }
        };

        match outcome {
            RequestOutcome::Maze(Ok(maze)) => {
                info!(
                    maze_id = maze.id,
                    width = maze.width,
                    height = maze.height,
                    "maze loaded"
                );
                let maze = Arc::new(maze);
                self.maze = Some(maze.clone());
                self.playback.unload();
                self.emit(SessionEvent::MazeLoaded(maze));
                self.emit_playback();
                if let Some(algorithm) = self.pending_solve.take() {
                    self.solve(algorithm);
                }
            }
            RequestOutcome::Solution(Ok(response)) => match self.playback.load_solution(response) {
                Ok(solution) => {
                    info!(
                        algorithm = solution.algorithm.as_str(),
                        steps = solution.steps.len(),
                        path_length = solution.stats.path_length,
                        "solution loaded"
                    );
                    self.emit(SessionEvent::SolutionLoaded(solution));
                    self.emit_playback();
                }
                Err(e) => {
                    warn!(error = %e, "rejected solution");
                    self.info(InfoEvent::RequestFailed {
                        kind,
                        message: e.to_string(),
                    });
                }
            },
            RequestOutcome::Maze(Err(e)) | RequestOutcome::Solution(Err(e)) => {
                warn!(?kind, error = %e, "provider request failed");
                self.pending_solve = None;
                self.info(InfoEvent::RequestFailed {
                    kind,
                    message: e.to_string(),
                });
            }
        }
    }

    fn tick(&mut self) {
        match self.playback.tick() {
            TickOutcome::Ignored => {}
            TickOutcome::Advanced(_) => self.emit_playback(),
            TickOutcome::Finished(index) => {
                self.emit_playback();
                let path_length = self
                    .playback
                    .solution()
                    .map(|s| s.stats.path_length)
                    .unwrap_or(0);
                debug!(index, "playback finished");
                self.info(InfoEvent::PlaybackFinished {
                    steps: index + 1,
                    path_length,
                });
            }
        }
    }
}

/// Keep the interval in step with the controller: one live interval per
/// token, none when the controller holds no token.
fn sync_ticker(ticker: &mut Option<Ticker>, token: Option<TimerToken>, period: Duration) {
    match (token, ticker.as_ref()) {
        (None, _) => *ticker = None,
        (Some(t), Some(live)) if live.token == t => {}
        (Some(t), _) => {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(Ticker { token: t, interval });
        }
    }
}

/// Run the session until `Quit` or until every command sender is dropped.
pub(crate) async fn run_session(
    provider: Arc<dyn MazeProvider>,
    opts: SessionOptions,
    event_tx: UnboundedSender<SessionEvent>,
    mut cmd_rx: UnboundedReceiver<SessionCommand>,
) -> Result<()> {
    let period = opts.step_interval.max(Duration::from_millis(1));
    let mut session = Session {
        provider,
        event_tx,
        maze: None,
        playback: PlaybackController::new(),
        in_flight: None,
        pending_solve: None,
    };
    let mut ticker: Option<Ticker> = None;

    if let Some(plan) = opts.launch {
        session.pending_solve = plan.solve;
        match plan.maze {
            MazeSource::Generate(req) => session.handle(SessionCommand::Generate(req)),
            MazeSource::Existing(id) => session.handle(SessionCommand::LoadMaze(id)),
        }
    }

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SessionCommand::Quit) | None => break,
                    Some(cmd) => session.handle(cmd),
                }
            }
            // Do not take the JoinHandle before this branch wins; the future is
            // dropped whenever another branch is chosen.
            joined = async {
                match session.in_flight.as_mut() {
                    Some(f) => (f.kind, (&mut f.handle).await),
                    None => futures::future::pending().await,
                }
            } => {
                let (kind, res) = joined;
                session.finish_request(kind, res);
            }
            _ = async {
                match ticker.as_mut() {
                    Some(t) => {
                        t.interval.tick().await;
                    }
                    None => futures::future::pending::<()>().await,
                }
            } => {
                session.tick();
            }
        }
        // Runs before the next await: a transition out of `Playing` drops the
        // interval here, so no tick can fire for it.
        sync_ticker(&mut ticker, session.playback.timer(), period);
    }

    if let Some(f) = session.in_flight.take() {
        f.handle.abort();
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
