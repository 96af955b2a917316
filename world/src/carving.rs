//! Player-driven wall carving against a limited action budget.

use labyrinth_core::{CarveError, CellCoord, CellGrid, Direction};

/// Opens the wall on `cell` facing `direction`, spending one carve action.
///
/// Returns the remaining action count. Rejections leave the grid and the
/// counter untouched. Outward boundary walls are never carved.
pub(crate) fn carve(
    grid: &mut CellGrid,
    cell: CellCoord,
    direction: Direction,
    actions: &mut u32,
) -> Result<u32, CarveError> {
    if *actions == 0 {
        return Err(CarveError::NoActionsLeft);
    }
    if !grid.view().has_wall(cell, direction) {
        return Err(CarveError::NoWall);
    }
    if !grid.open_passage(cell, direction) {
        return Err(CarveError::OutOfBounds);
    }

    *actions -= 1;
    Ok(*actions)
}
