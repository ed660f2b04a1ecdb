//! Saved replays on local disk.

use crate::model::{Maze, ReplayRecord, Solution};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Root directory for everything this tool writes.
pub fn base_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir().context("could not determine local data directory")?;
    Ok(base.join("maze-replay"))
}

pub fn replays_dir() -> Result<PathBuf> {
    Ok(base_dir()?.join("replays"))
}

pub fn timestamp_utc() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into())
}

pub fn new_record(maze: &Maze, solution: &Solution) -> ReplayRecord {
    ReplayRecord {
        saved_at: timestamp_utc(),
        maze: maze.clone(),
        solution: solution.clone(),
    }
}

fn file_name(record: &ReplayRecord) -> String {
    let stamp: String = record
        .saved_at
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '-' })
        .collect();
    format!(
        "maze-{}-{}-{}.json",
        record.maze.id,
        record.solution.algorithm.as_str(),
        stamp
    )
}

/// Save a replay under the default data directory.
pub fn save_replay(record: &ReplayRecord) -> Result<PathBuf> {
    save_replay_in(&replays_dir()?, record)
}

pub(crate) fn save_replay_in(dir: &Path, record: &ReplayRecord) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(file_name(record));
    export_json(&path, record)?;
    Ok(path)
}

pub fn export_json(path: &Path, record: &ReplayRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("serialize replay")?;
    std::fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Read a saved replay. The solution is validated while decoding.
pub fn load_replay(path: &Path) -> Result<ReplayRecord> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let record: ReplayRecord =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    record
        .maze
        .validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(record)
}

#[cfg(test)]
#[path = "tests/storage_tests.rs"]
mod tests;
