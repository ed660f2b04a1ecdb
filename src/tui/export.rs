use crate::cli::Cli;
use crate::model::Solution;
use crate::storage;
use anyhow::{Context, Result};
use std::sync::Arc;

use super::state::UiState;

/// Save the loaded replay to the default location.
pub fn save_replay(state: &UiState) -> Result<std::path::PathBuf> {
    let maze = state.maze.as_deref().context("no maze loaded")?;
    let solution = state.solution.as_deref().context("no solution loaded")?;
    storage::save_replay(&storage::new_record(maze, solution))
}

/// Save the replay and report the outcome on the status line.
pub fn save_and_show_path(state: &mut UiState) {
    match save_replay(state) {
        Ok(path) => {
            state.info = format!("Saved: {}", path.display());
            state.last_saved_path = Some(path);
        }
        Err(e) => {
            state.info = format!("Save failed: {e:#}");
        }
    }
}

/// Auto-save and export a solution the session just loaded.
pub fn handle_solution_loaded(args: &Cli, state: &mut UiState, solution: Arc<Solution>) {
    let Some(maze) = state.maze.clone() else {
        return;
    };
    let from_disk = std::mem::take(&mut state.skip_next_auto_save);
    let auto_save = state.auto_save && !from_disk;
    let processed = crate::orchestrator::process_solution(args, auto_save, &maze, &solution);

    let mut notes = processed.export_messages;
    if let Some(p) = processed.auto_saved_path {
        notes.push(format!("Saved: {}", p.display()));
        state.last_saved_path = Some(p);
    }
    if !notes.is_empty() {
        state.info = format!("{} | {}", state.info, notes.join(" | "));
    }
}
