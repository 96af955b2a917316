//! Dense cell storage and the read-only view handed to systems and adapters.

use std::collections::VecDeque;

use crate::{CellCoord, CellKind, Direction, PhotoContent, Tint, Walls};

/// Single maze cell: identity, wall topology, classification and display state.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    coord: CellCoord,
    walls: Walls,
    kind: CellKind,
    content: Option<PhotoContent>,
    tint: Option<Tint>,
}

impl Cell {
    /// Creates a normal cell with all four walls standing.
    #[must_use]
    pub const fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            walls: Walls::CLOSED,
            kind: CellKind::Normal,
            content: None,
            tint: None,
        }
    }

    /// Coordinate identifying the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Wall flags of the cell.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    /// Classification of the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Content attached to the cell, if any.
    #[must_use]
    pub const fn content(&self) -> Option<PhotoContent> {
        self.content
    }

    /// Display tint written by the color diffuser, if any.
    #[must_use]
    pub const fn tint(&self) -> Option<Tint> {
        self.tint
    }

    /// Reclassifies the cell.
    pub fn set_kind(&mut self, kind: CellKind) {
        self.kind = kind;
    }

    /// Attaches resolved content to the cell.
    pub fn attach_content(&mut self, content: PhotoContent) {
        self.content = Some(content);
    }

    /// Detaches and returns the cell's content.
    pub fn take_content(&mut self) -> Option<PhotoContent> {
        self.content.take()
    }

    /// Replaces the display tint.
    pub fn set_tint(&mut self, tint: Option<Tint>) {
        self.tint = tint;
    }
}

/// Rectangular array of cells and their wall topology, stored row-major.
///
/// Walls are only ever removed in pairs through [`CellGrid::open_passage`], so
/// the grid keeps wall symmetry between neighbors and never opens a wall that
/// points off-grid.
#[derive(Clone, Debug, PartialEq)]
pub struct CellGrid {
    rows: u32,
    columns: u32,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Creates a fully walled grid of normal cells.
    #[must_use]
    pub fn new(rows: u32, columns: u32) -> Self {
        let capacity_u64 = u64::from(rows) * u64::from(columns);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut cells = Vec::with_capacity(capacity);
        for row in 0..rows {
            for column in 0..columns {
                cells.push(Cell::new(CellCoord::new(row, column)));
            }
        }

        Self {
            rows,
            columns,
            cells,
        }
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        coord.row() < self.rows && coord.column() < self.columns
    }

    /// Cell stored at the provided coordinate.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.index(coord).and_then(|index| self.cells.get(index))
    }

    /// Mutable access to the cell stored at the provided coordinate.
    pub fn cell_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.index(coord).and_then(|index| self.cells.get_mut(index))
    }

    /// Iterator over every cell in row-major order allowing mutation.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Neighbor of `coord` in `direction`, if it lies inside the grid.
    #[must_use]
    pub fn neighbor(&self, coord: CellCoord, direction: Direction) -> Option<CellCoord> {
        if !self.contains(coord) {
            return None;
        }
        coord.step(direction, self.rows, self.columns)
    }

    /// Removes the wall between `coord` and its neighbor in `direction`.
    ///
    /// Both sides of the wall are cleared together. Returns `false` without
    /// mutating anything when the neighbor lies off-grid or the passage is
    /// already open.
    pub fn open_passage(&mut self, coord: CellCoord, direction: Direction) -> bool {
        let Some(neighbor) = self.neighbor(coord, direction) else {
            return false;
        };
        let (Some(from), Some(to)) = (self.index(coord), self.index(neighbor)) else {
            return false;
        };
        if !self.cells[from].walls.has(direction) {
            return false;
        }

        self.cells[from].walls.remove(direction);
        self.cells[to].walls.remove(direction.opposite());
        true
    }

    /// Captures a read-only view of the grid.
    #[must_use]
    pub const fn view(&self) -> GridView<'_> {
        GridView { grid: self }
    }

    fn index(&self, coord: CellCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let row = usize::try_from(coord.row()).ok()?;
        let column = usize::try_from(coord.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}

/// Read-only view into a [`CellGrid`].
#[derive(Clone, Copy, Debug)]
pub struct GridView<'a> {
    grid: &'a CellGrid,
}

impl<'a> GridView<'a> {
    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.grid.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.grid.columns
    }

    /// Number of cells in the grid.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grid.cells.len()
    }

    /// Reports whether the grid has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grid.cells.is_empty()
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: CellCoord) -> bool {
        self.grid.contains(coord)
    }

    /// Cell stored at the provided coordinate.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&'a Cell> {
        self.grid.cell(coord)
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &'a [Cell] {
        &self.grid.cells
    }

    /// Dense row-major index of the coordinate.
    #[must_use]
    pub fn index(&self, coord: CellCoord) -> Option<usize> {
        self.grid.index(coord)
    }

    /// Neighbor of `coord` in `direction`, if it lies inside the grid.
    #[must_use]
    pub fn neighbor(&self, coord: CellCoord, direction: Direction) -> Option<CellCoord> {
        self.grid.neighbor(coord, direction)
    }

    /// Reports whether the wall on `coord` facing `direction` is present.
    ///
    /// Coordinates outside the grid are treated as fully walled.
    #[must_use]
    pub fn has_wall(&self, coord: CellCoord, direction: Direction) -> bool {
        self.cell(coord)
            .map_or(true, |cell| cell.walls().has(direction))
    }

    /// Neighbor reachable from `coord` through an open wall in `direction`.
    #[must_use]
    pub fn passage(&self, coord: CellCoord, direction: Direction) -> Option<CellCoord> {
        if self.has_wall(coord, direction) {
            return None;
        }
        self.neighbor(coord, direction)
    }

    /// Neighbors reachable through open walls, in [`Direction::ALL`] order.
    pub fn open_neighbors(
        &self,
        coord: CellCoord,
    ) -> impl Iterator<Item = (Direction, CellCoord)> + 'a {
        let view = *self;
        Direction::ALL.into_iter().filter_map(move |direction| {
            view.passage(coord, direction)
                .map(|neighbor| (direction, neighbor))
        })
    }

    /// Cells carrying the provided classification, in row-major order.
    pub fn cells_of_kind(&self, kind: CellKind) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells().iter().filter(move |cell| cell.kind() == kind)
    }

    /// Number of open wall pairs between neighboring cells.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.cells()
            .iter()
            .map(|cell| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|direction| self.passage(cell.coord(), *direction).is_some())
                    .count()
            })
            .sum()
    }

    /// Number of cells reachable from `start` through open passages.
    #[must_use]
    pub fn reachable_count(&self, start: CellCoord) -> usize {
        let Some(start_index) = self.index(start) else {
            return 0;
        };

        let mut visited = vec![false; self.len()];
        let mut queue = VecDeque::new();
        visited[start_index] = true;
        queue.push_back(start);
        let mut count = 0;

        while let Some(coord) = queue.pop_front() {
            count += 1;
            for (_, neighbor) in self.open_neighbors(coord) {
                let Some(index) = self.index(neighbor) else {
                    continue;
                };
                if visited[index] {
                    continue;
                }
                visited[index] = true;
                queue.push_back(neighbor);
            }
        }

        count
    }

    /// Reports whether every wall agrees with its neighbor's mirrored wall and
    /// every outward-facing wall on the boundary is still standing.
    #[must_use]
    pub fn walls_are_symmetric(&self) -> bool {
        self.cells().iter().all(|cell| {
            Direction::ALL.into_iter().all(|direction| {
                match self.neighbor(cell.coord(), direction) {
                    Some(neighbor) => {
                        cell.walls().has(direction)
                            == self.has_wall(neighbor, direction.opposite())
                    }
                    None => cell.walls().has(direction),
                }
            })
        })
    }
}
