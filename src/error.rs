use thiserror::Error;

/// Failures surfaced by the replay engine and the maze provider.
///
/// An out-of-range step index is not represented here: index writes are clamped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    #[error("invalid solution: {0}")]
    InvalidSolution(String),
    #[error("{0}")]
    ProviderFailure(String),
}

impl ReplayError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::ProviderFailure(message.into())
    }
}
