//! Replay engine: step sequences, the playback state machine and overlay
//! classification. Nothing here performs I/O or keeps time.

mod overlay;
mod playback;
mod steps;

pub use overlay::{Overlay, OverlayFrame};
pub use playback::{PlaybackController, PlaybackSnapshot, PlaybackStatus, TickOutcome, TimerToken};
pub use steps::{Step, StepSequence};
