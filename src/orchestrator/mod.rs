//! Application-level orchestration.
//!
//! This module owns the replay session (maze and solution lifecycle, playback
//! timing) and post-solve processing such as auto-save and exports. UI/CLI
//! layers call into this module to keep responsibilities separated.

mod post_process;
mod session;

pub(crate) use post_process::process_solution;
pub(crate) use session::{run_session, LaunchPlan, MazeSource, SessionCommand, SessionOptions};
