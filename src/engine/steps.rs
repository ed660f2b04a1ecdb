use crate::error::ReplayError;
use crate::model::{CellSet, Coord};
use serde::{Deserialize, Serialize};

/// One exploration snapshot of a search run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub current: Coord,
    #[serde(default)]
    pub visited: CellSet,
    #[serde(default)]
    pub frontier: CellSet,
}

/// Immutable, non-empty sequence of steps produced by one solve call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSequence {
    steps: Vec<Step>,
}

impl StepSequence {
    pub fn new(steps: Vec<Step>) -> Result<Self, ReplayError> {
        if steps.is_empty() {
            return Err(ReplayError::InvalidSolution("empty step sequence".into()));
        }
        Ok(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Index of the terminal exploration state.
    pub fn terminal_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    pub(crate) fn into_steps(self) -> Vec<Step> {
        self.steps
    }
}

#[cfg(test)]
#[path = "tests/steps_tests.rs"]
mod tests;
