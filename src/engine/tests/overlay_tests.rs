use super::*;
use crate::test_support::{c, open_maze, step};

fn path_of(coords: &[(i32, i32)]) -> CellSet {
    coords.iter().copied().map(Coord::from).collect()
}

#[test]
fn start_wins_over_every_other_rule() {
    let maze = open_maze(3, 3);
    let s = step((0, 0), &[(0, 0)], &[(0, 0)]);
    let path = path_of(&[(0, 0), (1, 0)]);
    let frame = OverlayFrame {
        maze: &maze,
        step: Some(&s),
        path: Some(&path),
        show_final_path: true,
    };
    assert_eq!(frame.classify(c(0, 0)), Overlay::Start);
}

#[test]
fn end_on_revealed_path_stays_end() {
    let maze = open_maze(3, 3);
    let s = step((2, 2), &[(2, 2)], &[]);
    let path = path_of(&[(0, 0), (2, 2)]);
    let frame = OverlayFrame {
        maze: &maze,
        step: Some(&s),
        path: Some(&path),
        show_final_path: true,
    };
    assert_eq!(frame.classify(c(2, 2)), Overlay::End);
}

#[test]
fn path_only_shows_once_revealed() {
    let maze = open_maze(3, 3);
    let s = step((1, 0), &[(0, 0), (1, 0)], &[(2, 0)]);
    let path = path_of(&[(0, 0), (1, 0), (2, 0)]);
    let mut frame = OverlayFrame {
        maze: &maze,
        step: Some(&s),
        path: Some(&path),
        show_final_path: false,
    };
    assert_eq!(frame.classify(c(1, 0)), Overlay::Current);
    assert_eq!(frame.classify(c(2, 0)), Overlay::Frontier);

    frame.show_final_path = true;
    assert_eq!(frame.classify(c(1, 0)), Overlay::Path);
    assert_eq!(frame.classify(c(2, 0)), Overlay::Path);
}

#[test]
fn current_then_frontier_then_visited() {
    let maze = open_maze(4, 4);
    let s = step((1, 1), &[(1, 1), (2, 1), (3, 1)], &[(2, 1)]);
    let frame = OverlayFrame {
        maze: &maze,
        step: Some(&s),
        path: None,
        show_final_path: false,
    };
    assert_eq!(frame.classify(c(1, 1)), Overlay::Current);
    assert_eq!(frame.classify(c(2, 1)), Overlay::Frontier);
    assert_eq!(frame.classify(c(3, 1)), Overlay::Visited);
    assert_eq!(frame.classify(c(0, 2)), Overlay::Floor);
}

#[test]
fn falls_back_to_static_cell_kind() {
    let mut maze = open_maze(3, 3);
    maze.grid[1][2] = CellKind::Wall;
    let frame = OverlayFrame::bare(&maze);

    assert_eq!(frame.classify(c(2, 1)), Overlay::Wall);
    assert_eq!(frame.classify(c(1, 2)), Overlay::Floor);
}

#[test]
fn without_a_step_there_is_no_exploration_overlay() {
    let maze = open_maze(3, 3);
    let path = path_of(&[(1, 0)]);
    let frame = OverlayFrame {
        maze: &maze,
        step: None,
        path: Some(&path),
        show_final_path: false,
    };
    assert_eq!(frame.classify(c(1, 0)), Overlay::Floor);
}

#[test]
fn classify_grid_is_row_major() {
    let mut maze = open_maze(3, 2);
    maze.grid[0][1] = CellKind::Wall;
    let grid = OverlayFrame::bare(&maze).classify_grid();

    assert_eq!(grid.len(), 2);
    assert_eq!(grid[0].len(), 3);
    assert_eq!(
        grid[0],
        vec![Overlay::Start, Overlay::Wall, Overlay::Floor]
    );
    assert_eq!(grid[1][2], Overlay::End);
}

#[test]
fn precedence_order_is_declared_order() {
    assert_eq!(Overlay::ALL.first(), Some(&Overlay::Start));
    assert_eq!(Overlay::ALL.last(), Some(&Overlay::Floor));
    let glyphs: std::collections::HashSet<char> = Overlay::ALL.iter().map(|o| o.glyph()).collect();
    assert_eq!(glyphs.len(), Overlay::ALL.len());
}
