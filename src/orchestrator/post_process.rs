//! Post-solve processing utilities.
//!
//! Handles auto-save and exports once a solution has been loaded.

use crate::cli::Cli;
use crate::model::{Maze, ReplayRecord, Solution};
use crate::storage;
use tracing::warn;

/// Result of post-solve processing, ready for presentation layers.
pub(crate) struct ProcessedReplay {
    pub record: ReplayRecord,
    pub export_messages: Vec<String>,
    pub auto_saved_path: Option<std::path::PathBuf>,
}

/// Build the replay record for a freshly loaded solution, auto-save it and run
/// any requested exports.
pub(crate) fn process_solution(
    args: &Cli,
    auto_save: bool,
    maze: &Maze,
    solution: &Solution,
) -> ProcessedReplay {
    let record = storage::new_record(maze, solution);

    let auto_saved_path = if auto_save {
        match storage::save_replay(&record) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(error = %format!("{e:#}"), "auto-save failed");
                None
            }
        }
    } else {
        None
    };

    let mut export_messages = Vec::new();
    if let Some(export_path) = args.export_json.as_deref() {
        match storage::export_json(export_path, &record) {
            Ok(_) => export_messages.push(format!("Exported JSON: {}", export_path.display())),
            Err(e) => export_messages.push(format!("Export JSON failed: {e:#}")),
        }
    }

    ProcessedReplay {
        record,
        export_messages,
        auto_saved_path,
    }
}
