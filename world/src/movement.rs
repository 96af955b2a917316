//! Legality checks for single orthogonal player steps.

use labyrinth_core::{CellCoord, Direction, GridView};

/// Reports whether a step from `cell` in `direction` is allowed.
///
/// A step is refused exactly when the wall on `cell` facing `direction` is
/// present. Generation never opens an outward boundary wall, so an allowed
/// step always lands inside the grid.
#[must_use]
pub fn can_move(view: GridView<'_>, cell: CellCoord, direction: Direction) -> bool {
    !view.has_wall(cell, direction)
}

/// Delta-based variant of [`can_move`]; non-cardinal deltas are refused.
#[must_use]
pub fn can_step(view: GridView<'_>, cell: CellCoord, d_row: i32, d_column: i32) -> bool {
    Direction::from_delta(d_row, d_column).map_or(false, |direction| can_move(view, cell, direction))
}

#[cfg(test)]
mod tests {
    use labyrinth_core::CellGrid;

    use super::*;

    #[test]
    fn can_move_mirrors_wall_flags() {
        let mut grid = CellGrid::new(2, 2);
        let origin = CellCoord::new(0, 0);
        assert!(grid.open_passage(origin, Direction::South));

        let view = grid.view();
        for direction in Direction::ALL {
            assert_eq!(
                can_move(view, origin, direction),
                !view.has_wall(origin, direction)
            );
        }
        assert!(can_move(view, origin, Direction::South));
        assert!(!can_move(view, origin, Direction::East));
    }

    #[test]
    fn can_step_rejects_non_cardinal_deltas() {
        let mut grid = CellGrid::new(2, 2);
        let origin = CellCoord::new(0, 0);
        assert!(grid.open_passage(origin, Direction::East));
        assert!(grid.open_passage(origin, Direction::South));

        let view = grid.view();
        assert!(can_step(view, origin, 0, 1));
        assert!(can_step(view, origin, 1, 0));
        assert!(!can_step(view, origin, 1, 1));
        assert!(!can_step(view, origin, 0, 0));
        assert!(!can_step(view, origin, 0, 2));
    }
}
