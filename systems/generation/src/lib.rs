#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic maze generation system.
//!
//! Mazes are carved with a randomised depth-first traversal driven by an
//! explicit stack, which yields a perfect maze: the open-wall adjacency graph
//! is a spanning tree over every cell. Afterwards the center cell becomes the
//! exit and every other cell is independently rolled into a special
//! classification. All randomness flows through the caller-provided [`Rng`],
//! so a fixed seed reproduces the same maze.

use labyrinth_core::{CellCoord, CellGrid, CellKind, Direction};
use log::debug;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Probability knobs applied while classifying cells after carving.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationTuning {
    /// Chance that a non-exit cell becomes a special cell candidate.
    pub special_probability: f64,
    /// Chance that a special candidate becomes a photo cell rather than a fear ghost.
    pub photo_probability: f64,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            special_probability: 0.05,
            photo_probability: 0.75,
        }
    }
}

/// Pure system that builds fully connected mazes.
#[derive(Clone, Debug, Default)]
pub struct MazeGenerator {
    tuning: GenerationTuning,
}

impl MazeGenerator {
    /// Creates a generator using the supplied tuning.
    #[must_use]
    pub const fn new(tuning: GenerationTuning) -> Self {
        Self { tuning }
    }

    /// Generates a maze using a ChaCha generator seeded from `seed`.
    #[must_use]
    pub fn generate_from_seed(&self, rows: u32, columns: u32, seed: u64) -> CellGrid {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(rows, columns, &mut rng)
    }

    /// Generates a `rows` x `columns` maze drawing randomness from `rng`.
    ///
    /// A grid with no cells is returned untouched. A 1x1 grid performs no
    /// carving and its single cell becomes the exit.
    pub fn generate<R>(&self, rows: u32, columns: u32, rng: &mut R) -> CellGrid
    where
        R: Rng + ?Sized,
    {
        let mut grid = CellGrid::new(rows, columns);
        if grid.view().is_empty() {
            return grid;
        }

        let carved = carve_passages(&mut grid, rng);
        let census = classify_cells(&mut grid, exit_cell(rows, columns), &self.tuning, rng);

        debug!(
            "generated {rows}x{columns} maze: {carved} passages, {} photo cells, {} fear ghosts",
            census.photos, census.ghosts
        );
        grid
    }
}

/// Cell that is unconditionally classified as the exit.
#[must_use]
pub const fn exit_cell(rows: u32, columns: u32) -> CellCoord {
    CellCoord::new(rows / 2, columns / 2)
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: CellCoord,
    order: [Direction; 4],
    next: usize,
}

impl Frame {
    fn enter<R>(cell: CellCoord, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut order = Direction::ALL;
        order.shuffle(rng);
        Self {
            cell,
            order,
            next: 0,
        }
    }
}

/// Carves passages from the top-left corner, returning the number of wall
/// pairs removed.
///
/// Each frame shuffles its four directions once on entry and then tries them
/// in that order, descending into every unvisited in-bounds neighbor before
/// moving on. This matches a recursive backtracker exactly while keeping the
/// call depth constant.
fn carve_passages<R>(grid: &mut CellGrid, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let start = CellCoord::new(0, 0);
    let mut visited = vec![false; grid.view().len()];
    let Some(start_index) = grid.view().index(start) else {
        return 0;
    };
    visited[start_index] = true;

    let mut stack = vec![Frame::enter(start, rng)];
    let mut carved = 0;

    while let Some(frame) = stack.last_mut() {
        let Some(direction) = frame.order.get(frame.next).copied() else {
            let _ = stack.pop();
            continue;
        };
        frame.next += 1;
        let cell = frame.cell;

        let Some(neighbor) = grid.neighbor(cell, direction) else {
            continue;
        };
        let Some(index) = grid.view().index(neighbor) else {
            continue;
        };
        if visited[index] {
            continue;
        }

        visited[index] = true;
        if grid.open_passage(cell, direction) {
            carved += 1;
        }
        stack.push(Frame::enter(neighbor, rng));
    }

    carved
}

#[derive(Clone, Copy, Debug, Default)]
struct Census {
    photos: usize,
    ghosts: usize,
}

fn classify_cells<R>(
    grid: &mut CellGrid,
    exit: CellCoord,
    tuning: &GenerationTuning,
    rng: &mut R,
) -> Census
where
    R: Rng + ?Sized,
{
    let special = probability(tuning.special_probability);
    let photo = probability(tuning.photo_probability);
    let mut census = Census::default();

    for cell in grid.cells_mut() {
        if cell.coord() == exit {
            cell.set_kind(CellKind::Exit);
            continue;
        }

        if !rng.gen_bool(special) {
            continue;
        }

        if rng.gen_bool(photo) {
            cell.set_kind(CellKind::Photo);
            census.photos += 1;
        } else {
            cell.set_kind(CellKind::FearGhost);
            census.ghosts += 1;
        }
    }

    census
}

fn probability(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_clamps_out_of_range_values() {
        assert_eq!(probability(-0.5), 0.0);
        assert_eq!(probability(1.5), 1.0);
        assert_eq!(probability(f64::NAN), 0.0);
        assert_eq!(probability(0.25), 0.25);
    }

    #[test]
    fn exit_cell_uses_floored_center() {
        assert_eq!(exit_cell(19, 19), CellCoord::new(9, 9));
        assert_eq!(exit_cell(4, 6), CellCoord::new(2, 3));
        assert_eq!(exit_cell(1, 1), CellCoord::new(0, 0));
    }

    #[test]
    fn carve_passages_visits_every_cell_once() {
        let mut grid = CellGrid::new(6, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let carved = carve_passages(&mut grid, &mut rng);

        assert_eq!(carved, 29);
        assert_eq!(grid.view().passage_count(), 29);
    }
}
