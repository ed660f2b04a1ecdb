//! Per-cell overlay classification.
//!
//! Decides which single visual category a grid cell belongs to at a given
//! playback instant. Rules are checked in declaration order of [`Overlay`] and
//! the first match wins.

use super::steps::Step;
use crate::model::{CellKind, CellSet, Coord, Maze};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Start,
    End,
    Path,
    Current,
    Frontier,
    Visited,
    Wall,
    Floor,
}

impl Overlay {
    /// All categories in precedence order.
    pub const ALL: [Overlay; 8] = [
        Overlay::Start,
        Overlay::End,
        Overlay::Path,
        Overlay::Current,
        Overlay::Frontier,
        Overlay::Visited,
        Overlay::Wall,
        Overlay::Floor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Overlay::Start => "Start",
            Overlay::End => "End",
            Overlay::Path => "Path",
            Overlay::Current => "Current",
            Overlay::Frontier => "Frontier",
            Overlay::Visited => "Visited",
            Overlay::Wall => "Wall",
            Overlay::Floor => "Floor",
        }
    }

    /// Single-character form for plain text output.
    pub fn glyph(self) -> char {
        match self {
            Overlay::Start => 'S',
            Overlay::End => 'E',
            Overlay::Path => '*',
            Overlay::Current => '@',
            Overlay::Frontier => '+',
            Overlay::Visited => '.',
            Overlay::Wall => '#',
            Overlay::Floor => ' ',
        }
    }
}

/// Everything the classifier reads for one frame.
#[derive(Debug, Clone, Copy)]
pub struct OverlayFrame<'a> {
    pub maze: &'a Maze,
    pub step: Option<&'a Step>,
    pub path: Option<&'a CellSet>,
    pub show_final_path: bool,
}

impl<'a> OverlayFrame<'a> {
    /// Frame for a maze with no solution loaded.
    pub fn bare(maze: &'a Maze) -> Self {
        Self {
            maze,
            step: None,
            path: None,
            show_final_path: false,
        }
    }

    /// Category of `c`; the first matching rule wins.
    pub fn classify(&self, c: Coord) -> Overlay {
        let maze = self.maze;
        if c == maze.start {
            return Overlay::Start;
        }
        if c == maze.end {
            return Overlay::End;
        }
        if self.show_final_path && self.path.is_some_and(|p| p.contains(c)) {
            return Overlay::Path;
        }
        if let Some(step) = self.step {
            if c == step.current {
                return Overlay::Current;
            }
            if step.frontier.contains(c) {
                return Overlay::Frontier;
            }
            if step.visited.contains(c) {
                return Overlay::Visited;
            }
        }
        match maze.cell(c) {
            Some(CellKind::Wall) => Overlay::Wall,
            _ => Overlay::Floor,
        }
    }

    /// Classify every cell, row-major.
    pub fn classify_grid(&self) -> Vec<Vec<Overlay>> {
        (0..self.maze.height as i32)
            .map(|y| {
                (0..self.maze.width as i32)
                    .map(|x| self.classify(Coord::new(x, y)))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/overlay_tests.rs"]
mod tests;
