//! Fear ghost encounters and one-shot photo collection.

use labyrinth_core::{CellCoord, CellGrid, CellKind, GridView, PhotoContent};

/// First fear ghost reachable from `cell` through an open wall, scanning in
/// [`labyrinth_core::Direction::ALL`] order.
pub(crate) fn adjacent_ghost(view: GridView<'_>, cell: CellCoord) -> Option<CellCoord> {
    view.open_neighbors(cell)
        .map(|(_, neighbor)| neighbor)
        .find(|neighbor| {
            view.cell(*neighbor)
                .map_or(false, |candidate| candidate.kind() == CellKind::FearGhost)
        })
}

/// Detaches the content of a photo cell and turns it back into a normal cell.
///
/// Photo cells without content are decoration and yield nothing.
pub(crate) fn collect_photo(grid: &mut CellGrid, cell: CellCoord) -> Option<PhotoContent> {
    let target = grid.cell_mut(cell)?;
    if target.kind() != CellKind::Photo {
        return None;
    }

    let content = target.take_content()?;
    target.set_kind(CellKind::Normal);
    Some(content)
}
