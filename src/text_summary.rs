//! Text summary builder for CLI output.
//!
//! Formats the classified grid, the legend and solve statistics for text mode.

use crate::engine::{Overlay, OverlayFrame, PlaybackSnapshot};
use crate::metrics;
use crate::model::{Maze, MazeListResponse, Solution};

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

/// Build a text summary for the maze as it stands at `snapshot`.
pub(crate) fn build_text_summary(
    maze: &Maze,
    solution: Option<&Solution>,
    snapshot: &PlaybackSnapshot,
) -> TextSummary {
    let mut lines = Vec::new();

    let generator = maze
        .algorithm
        .map(|a| a.display_name())
        .unwrap_or("unknown generator");
    lines.push(format!(
        "Maze #{}: {}x{} ({generator})",
        maze.id, maze.width, maze.height
    ));

    let frame = match solution {
        Some(s) => snapshot.frame(maze, Some(s)),
        None => OverlayFrame::bare(maze),
    };
    lines.extend(render_grid(&frame));
    lines.push(legend_line());

    if let Some(solution) = solution {
        lines.push(String::new());
        lines.extend(stats_lines(solution, snapshot));
    }

    TextSummary { lines }
}

/// One line per maze row, one glyph per cell.
pub(crate) fn render_grid(frame: &OverlayFrame<'_>) -> Vec<String> {
    frame
        .classify_grid()
        .into_iter()
        .map(|row| row.into_iter().map(Overlay::glyph).collect())
        .collect()
}

pub(crate) fn legend_line() -> String {
    let entries: Vec<String> = Overlay::ALL
        .iter()
        .map(|o| format!("'{}' {}", o.glyph(), o.label()))
        .collect();
    format!("Legend: {}", entries.join("  "))
}

pub(crate) fn stats_lines(solution: &Solution, snapshot: &PlaybackSnapshot) -> Vec<String> {
    let stats = &solution.stats;
    let mut lines = vec![
        format!("Algorithm:      {}", solution.algorithm.display_name()),
        format!(
            "Progress:       {}",
            metrics::progress_label(snapshot.current_index, solution.steps.len())
        ),
        format!("Nodes explored: {}", stats.nodes_explored),
    ];
    if stats.path_length == 0 {
        lines.push("Path length:    none (end unreachable)".into());
    } else {
        lines.push(format!("Path length:    {}", stats.path_length));
    }
    lines.push(format!(
        "Execution time: {}",
        metrics::format_execution_time(stats)
    ));
    let efficiency = metrics::efficiency_percent(stats).unwrap_or(0);
    lines.push(format!("Efficiency:     {efficiency}%"));
    lines
}

pub(crate) fn maze_list_lines(page: &MazeListResponse) -> Vec<String> {
    if page.items.is_empty() {
        return vec![format!("No mazes on page {} ({} stored)", page.page, page.total)];
    }
    let first = (page.page.saturating_sub(1) as u64) * page.size as u64 + 1;
    let last = first + page.items.len() as u64 - 1;
    let mut lines = vec![format!("Mazes {first}-{last} of {}", page.total)];
    for m in &page.items {
        lines.push(format!(
            "#{:<6} {:>3}x{:<3}  {:<24} {}",
            m.id,
            m.width,
            m.height,
            m.algorithm.map(|a| a.display_name()).unwrap_or("-"),
            m.created_at.as_deref().unwrap_or("")
        ));
    }
    lines
}

#[cfg(test)]
#[path = "tests/text_summary_tests.rs"]
mod tests;
