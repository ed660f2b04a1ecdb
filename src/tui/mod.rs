mod export;
mod grid;
mod help;
mod state;

use crate::cli::{self, Cli};
use crate::model::{SessionConfig, SessionEvent};
use crate::orchestrator::{self, SessionCommand};
use crate::provider::HttpProvider;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Terminal,
};
use state::UiState;
use std::{io, sync::Arc, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli) -> Result<()> {
    let cfg = cli::build_config(&args);
    let provider = Arc::new(HttpProvider::new(&cfg)?);
    let startup = cli::resolve_startup(&args, &cfg, &provider).await?;

    // Unbounded channels keep the UI thread from ever blocking on the session.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<SessionCommand>();
    let opts = startup.into_options(&cfg, &cmd_tx);

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_args = args.clone();
    let ui_handle = std::thread::spawn(move || run_threaded(ui_args, cfg, event_rx, cmd_tx));

    let res = orchestrator::run_session(provider, opts, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res
}

/// Run the TUI loop on a dedicated thread.
pub fn run_threaded(
    args: Cli,
    cfg: SessionConfig,
    mut event_rx: UnboundedReceiver<SessionEvent>,
    cmd_tx: UnboundedSender<SessionCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; no cross-thread mutation.
    let mut state = UiState::new(&cfg, args.auto_save);
    state.skip_next_auto_save = args.replay_file.is_some();
    state.info = format!("Maze service: {}", cfg.base_url);

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            if let Some(solution) = state.apply_event(ev) {
                export::handle_solution_loaded(&args, &mut state, solution);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if event::poll(Duration::from_millis(10)).unwrap_or(false) {
            if let Ok(Event::Key(k)) = event::read() {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                match (k.modifiers, k.code) {
                    (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                        let _ = cmd_tx.send(SessionCommand::Quit);
                        break Ok(());
                    }
                    (_, KeyCode::Char('g')) => {
                        let _ = cmd_tx.send(SessionCommand::Generate(state.generate_request()));
                    }
                    (_, KeyCode::Char('s')) => {
                        let _ = cmd_tx.send(SessionCommand::Solve(state.solver));
                    }
                    (_, KeyCode::Char(' ')) => {
                        if state.solution.is_some() {
                            let _ = cmd_tx.send(SessionCommand::TogglePlay);
                        } else {
                            state.info = "Nothing to play yet; press s to solve.".into();
                        }
                    }
                    (_, KeyCode::Char('p')) => {
                        let _ = cmd_tx.send(SessionCommand::Pause);
                    }
                    (_, KeyCode::Char('n')) | (_, KeyCode::Right) => {
                        let _ = cmd_tx.send(SessionCommand::StepForward);
                    }
                    (_, KeyCode::Char('r')) => {
                        let _ = cmd_tx.send(SessionCommand::Reset);
                    }
                    (_, KeyCode::Char('+')) | (_, KeyCode::Char('=')) => state.resize(1),
                    (_, KeyCode::Char('-')) => state.resize(-1),
                    (_, KeyCode::Char('m')) => state.cycle_generator(),
                    (_, KeyCode::Char('f')) => state.cycle_solver(),
                    (_, KeyCode::Char('w')) => {
                        if state.solution.is_some() {
                            export::save_and_show_path(&mut state);
                        } else {
                            state.info = "No solved maze to save yet.".into();
                        }
                    }
                    (_, KeyCode::Char('a')) => {
                        state.auto_save = !state.auto_save;
                        state.info = if state.auto_save {
                            "Auto-save enabled".into()
                        } else {
                            "Auto-save disabled".into()
                        };
                    }
                    (_, KeyCode::Tab) => {
                        state.tab = (state.tab + 1) % 2;
                    }
                    (_, KeyCode::Char('?')) => {
                        state.tab = 1;
                    }
                    _ => {}
                }
            }
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    let tabs = Tabs::new(vec![Line::from("Replay"), Line::from("Help")])
        .select(state.tab)
        .block(Block::default().borders(Borders::ALL).title("maze-replay"))
        .highlight_style(Style::default().fg(Color::Yellow));
    f.render_widget(tabs, chunks[0]);

    match state.tab {
        0 => draw_replay(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }

    let status_style = if state.busy.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let status = Paragraph::new(state.info.as_str())
        .style(status_style)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[2]);
}

fn draw_replay(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    // Narrow terminal: maze on top, stats below, no legend or controls.
    if area.width < 80 {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(10)].as_ref())
            .split(area);
        grid::draw_maze(rows[0], f, state);
        grid::draw_stats(rows[1], f, state);
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(44)].as_ref())
        .split(area);
    grid::draw_maze(cols[0], f, state);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Min(10),
                Constraint::Length(10),
                Constraint::Length(9),
            ]
            .as_ref(),
        )
        .split(cols[1]);
    grid::draw_stats(side[0], f, state);
    grid::draw_legend(side[1], f);
    grid::draw_controls(side[2], f, state);
}
