//! One-hop visibility oracle.
//!
//! A cell is visible when it is the player's own cell, or one of the player's
//! four orthogonal neighbors with no wall between them on the player's side.
//! Cells further away are never visible, however open the corridor and however
//! large the radius. The radius only hides cells outright when it is smaller
//! than one.

use labyrinth_core::{CellCoord, Direction, GridView, VisionMode};

/// Reports whether `cell` is observable by a player standing on `player`.
#[must_use]
pub fn is_visible(view: GridView<'_>, player: CellCoord, cell: CellCoord, radius: u32) -> bool {
    if player.manhattan_distance(cell) > radius {
        return false;
    }
    if cell == player {
        return view.contains(cell);
    }

    match Direction::between(player, cell) {
        Some(direction) => !view.has_wall(player, direction),
        None => false,
    }
}

/// Row-major visibility flags for every cell.
///
/// [`VisionMode::Full`] bypasses the oracle and reveals the whole grid.
#[must_use]
pub fn visibility_mask(
    view: GridView<'_>,
    player: CellCoord,
    radius: u32,
    mode: VisionMode,
) -> Vec<bool> {
    match mode {
        VisionMode::Full => vec![true; view.len()],
        VisionMode::Limited => view
            .cells()
            .iter()
            .map(|cell| is_visible(view, player, cell.coord(), radius))
            .collect(),
    }
}
