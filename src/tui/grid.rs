use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::state::UiState;
use crate::engine::{Overlay, OverlayFrame, PlaybackStatus};
use crate::metrics;

pub fn overlay_color(o: Overlay) -> Color {
    match o {
        Overlay::Start => Color::Green,
        Overlay::End => Color::Red,
        Overlay::Path => Color::Blue,
        Overlay::Current => Color::Yellow,
        Overlay::Frontier => Color::Magenta,
        Overlay::Visited => Color::LightCyan,
        Overlay::Wall => Color::DarkGray,
        Overlay::Floor => Color::White,
    }
}

/// Colored cells for every visible row. Cells are `cell_width` columns wide;
/// rows and columns past `max_cols`/`max_rows` are cut off.
pub fn maze_lines(
    frame: &OverlayFrame<'_>,
    cell_width: usize,
    max_cols: usize,
    max_rows: usize,
) -> Vec<Line<'static>> {
    let blank = " ".repeat(cell_width.max(1));
    frame
        .classify_grid()
        .into_iter()
        .take(max_rows)
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .take(max_cols)
                .map(|o| Span::styled(blank.clone(), Style::default().bg(overlay_color(o))))
                .collect();
            Line::from(spans)
        })
        .collect()
}

pub fn draw_maze(area: Rect, f: &mut Frame, state: &UiState) {
    let Some(frame) = state.frame() else {
        let p = Paragraph::new(vec![
            Line::from(""),
            Line::from(state.busy.map(|k| k.label()).unwrap_or("No maze loaded.")),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("g", Style::default().fg(Color::Magenta)),
                Span::raw(" to generate one."),
            ]),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Maze"));
        f.render_widget(p, area);
        return;
    };

    let maze = frame.maze;
    let title = format!(
        "Maze #{} ({}x{}, {})",
        maze.id,
        maze.width,
        maze.height,
        maze.algorithm.map(|a| a.display_name()).unwrap_or("unknown")
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Double-width cells look square; fall back to single width on narrow terminals.
    let cell_width = if (maze.width as usize) * 2 <= inner.width as usize {
        2
    } else {
        1
    };
    let max_cols = inner.width as usize / cell_width;
    let lines = maze_lines(&frame, cell_width, max_cols, inner.height as usize);

    let used = Rect {
        x: inner.x + inner.width.saturating_sub((maze.width as usize * cell_width) as u16) / 2,
        y: inner.y,
        width: inner.width.min((maze.width as usize * cell_width) as u16),
        height: inner.height,
    };
    f.render_widget(Paragraph::new(lines), used);
}

pub fn draw_legend(area: Rect, f: &mut Frame) {
    let lines: Vec<Line> = Overlay::ALL
        .iter()
        .map(|o| {
            Line::from(vec![
                Span::styled("  ", Style::default().bg(overlay_color(*o))),
                Span::raw(format!(" {}", o.label())),
            ])
        })
        .collect();
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Legend"));
    f.render_widget(p, area);
}

pub fn draw_stats(area: Rect, f: &mut Frame, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title("Statistics");
    let Some(solution) = state.solution.as_deref() else {
        let p = Paragraph::new("Solve the maze to see statistics.").block(block);
        f.render_widget(p, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)].as_ref())
        .split(inner);

    let snap = state.playback;
    let pct = metrics::progress_percent(snap.current_index, snap.len);
    let status = match snap.status {
        PlaybackStatus::Idle => "idle",
        PlaybackStatus::Paused => "paused",
        PlaybackStatus::Playing => "playing",
        PlaybackStatus::Finished => "finished",
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                solution.algorithm.display_name(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  [{status}]")),
        ])),
        rows[0],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .percent(u16::from(pct))
            .label(metrics::progress_label(snap.current_index, snap.len)),
        rows[1],
    );

    let stats = &solution.stats;
    let path_value = if stats.path_length == 0 {
        Span::styled("none (unreachable)", Style::default().fg(Color::Red))
    } else {
        Span::styled(stats.path_length.to_string(), Style::default().fg(Color::Green))
    };
    let efficiency = metrics::efficiency_percent(stats).unwrap_or(0);
    let (visited, frontier) = state.exploration_counts().unwrap_or((0, 0));
    let lines = vec![
        Line::from(vec![
            Span::raw("Nodes explored: "),
            Span::styled(stats.nodes_explored.to_string(), Style::default().fg(Color::Blue)),
        ]),
        Line::from(vec![Span::raw("Path length:    "), path_value]),
        Line::from(vec![
            Span::raw("This step:      "),
            Span::styled(
                format!("{visited} visited, {frontier} queued"),
                Style::default().fg(Color::LightCyan),
            ),
        ]),
        Line::from(vec![
            Span::raw("Execution time: "),
            Span::styled(
                metrics::format_execution_time(stats),
                Style::default().fg(Color::Magenta),
            ),
        ]),
        Line::from(vec![
            Span::raw("Efficiency:     "),
            Span::styled(format!("{efficiency}%"), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            solution.algorithm.description(),
            Style::default().fg(Color::Gray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), rows[2]);
}

pub fn draw_controls(area: Rect, f: &mut Frame, state: &UiState) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Magenta));
    let lines = vec![
        Line::from(vec![
            key("+/-"),
            Span::raw(format!("  Size: {}x{}", state.width, state.height)),
        ]),
        Line::from(vec![
            key("m"),
            Span::raw(format!("    Generator: {}", state.generator.display_name())),
        ]),
        Line::from(vec![
            key("f"),
            Span::raw(format!("    Solver: {}", state.solver.display_name())),
        ]),
        Line::from(vec![
            key("a"),
            Span::raw(format!(
                "    Auto-save: {}",
                if state.auto_save { "on" } else { "off" }
            )),
        ]),
        Line::from(Span::styled(
            format!(
                "Last save: {}",
                state.last_saved_name().as_deref().unwrap_or("none")
            ),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            key("g"),
            Span::raw(" generate  "),
            key("s"),
            Span::raw(" solve  "),
            key("space"),
            Span::raw(" play  "),
            key("p"),
            Span::raw(" pause"),
        ]),
        Line::from(vec![
            key("n"),
            Span::raw(" step  "),
            key("r"),
            Span::raw(" reset  "),
            key("w"),
            Span::raw(" save  "),
            key("q"),
            Span::raw(" quit"),
        ]),
    ];
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Controls"));
    f.render_widget(p, area);
}
