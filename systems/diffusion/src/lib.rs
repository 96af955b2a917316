#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fair multi-source color diffusion over the maze's open passages.
//!
//! Every source owns a breadth-first frontier. Expansion happens in global
//! rounds: within a round the sources take turns in their original order, and
//! each one pushes its whole frontier out by exactly one hop. The first source
//! to reach a cell claims it; claimed cells are never recolored. The outcome
//! therefore depends only on the source order and the wall topology.

use labyrinth_core::{CellCoord, GridView, Rgb, Tint};
use log::debug;
use serde::{Deserialize, Serialize};

/// Knobs controlling how far and how strongly colors spread.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiffusionTuning {
    /// Maximum number of expansion rounds, i.e. the furthest hop distance colored.
    pub max_rounds: u32,
    /// Alpha lost per hop away from the source.
    pub falloff_per_round: f32,
    /// Lower clamp applied before the saturation factor.
    pub minimum_alpha: f32,
    /// Factor applied to fully desaturated colors; saturated colors use 1.0.
    pub minimum_saturation_factor: f32,
}

impl Default for DiffusionTuning {
    fn default() -> Self {
        Self {
            max_rounds: 8,
            falloff_per_round: 0.12,
            minimum_alpha: 0.1,
            minimum_saturation_factor: 0.5,
        }
    }
}

/// Photo cell acting as an independent diffusion source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DiffusionSource {
    /// Cell the color spreads from.
    pub cell: CellCoord,
    /// Color being spread.
    pub color: Rgb,
}

impl DiffusionSource {
    /// Creates a new diffusion source.
    #[must_use]
    pub const fn new(cell: CellCoord, color: Rgb) -> Self {
        Self { cell, color }
    }
}

/// Dense row-major tint assignment produced by a diffusion pass.
#[derive(Clone, Debug, PartialEq)]
pub struct DiffusionField {
    rows: u32,
    columns: u32,
    tints: Vec<Option<Tint>>,
    rounds: u32,
    sources: usize,
}

impl DiffusionField {
    /// Tint assigned to the provided cell, if any.
    #[must_use]
    pub fn tint(&self, cell: CellCoord) -> Option<Tint> {
        if cell.row() >= self.rows || cell.column() >= self.columns {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.tints.get(row * width + column).copied().flatten()
    }

    /// Tints for every cell in row-major order.
    #[must_use]
    pub fn tints(&self) -> &[Option<Tint>] {
        &self.tints
    }

    /// Number of cells that received a tint, sources included.
    #[must_use]
    pub fn colored_count(&self) -> usize {
        self.tints.iter().filter(|tint| tint.is_some()).count()
    }

    /// Number of rounds in which at least one frontier grew.
    #[must_use]
    pub const fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Number of sources that claimed their own cell.
    #[must_use]
    pub const fn sources(&self) -> usize {
        self.sources
    }
}

/// Pure system that computes diffusion fields.
#[derive(Clone, Debug, Default)]
pub struct ColorDiffuser {
    tuning: DiffusionTuning,
}

impl ColorDiffuser {
    /// Creates a diffuser using the supplied tuning.
    #[must_use]
    pub const fn new(tuning: DiffusionTuning) -> Self {
        Self { tuning }
    }

    /// Spreads every source's color through open passages.
    ///
    /// Sources are colored at full alpha before the first round. A source whose
    /// cell lies outside the grid, or was already claimed by an earlier source,
    /// takes no part. The pass stops after `max_rounds` or as soon as a round
    /// grows no frontier.
    #[must_use]
    pub fn propagate(&self, view: GridView<'_>, sources: &[DiffusionSource]) -> DiffusionField {
        let mut tints: Vec<Option<Tint>> = vec![None; view.len()];
        let mut frontiers: Vec<Vec<CellCoord>> = Vec::with_capacity(sources.len());
        let mut active_sources = 0;

        for source in sources {
            let claimed = view
                .index(source.cell)
                .filter(|index| tints[*index].is_none());
            match claimed {
                Some(index) => {
                    tints[index] = Some(Tint::new(source.color, 1.0));
                    frontiers.push(vec![source.cell]);
                    active_sources += 1;
                }
                None => frontiers.push(Vec::new()),
            }
        }

        let mut rounds = 0;
        for distance in 1..=self.tuning.max_rounds {
            let mut grew = false;

            for (source, frontier) in sources.iter().zip(frontiers.iter_mut()) {
                if frontier.is_empty() {
                    continue;
                }

                let tint = Tint::new(source.color, self.alpha_for(distance, source.color));
                let mut next = Vec::new();
                for &cell in frontier.iter() {
                    for (_, neighbor) in view.open_neighbors(cell) {
                        let Some(index) = view.index(neighbor) else {
                            continue;
                        };
                        if tints[index].is_some() {
                            continue;
                        }
                        tints[index] = Some(tint);
                        next.push(neighbor);
                    }
                }

                grew |= !next.is_empty();
                *frontier = next;
            }

            if !grew {
                break;
            }
            rounds = distance;
        }

        let field = DiffusionField {
            rows: view.rows(),
            columns: view.columns(),
            tints,
            rounds,
            sources: active_sources,
        };
        debug!(
            "diffused {} sources over {} rounds, {} cells colored",
            field.sources,
            field.rounds,
            field.colored_count()
        );
        field
    }

    /// Alpha assigned to a cell reached `distance` hops away from a source.
    #[must_use]
    pub fn alpha_for(&self, distance: u32, color: Rgb) -> f32 {
        let faded = 1.0 - distance as f32 * self.tuning.falloff_per_round;
        faded.max(self.tuning.minimum_alpha) * self.saturation_factor(color)
    }

    /// Scale in `minimum_saturation_factor..=1.0` favouring saturated colors.
    #[must_use]
    pub fn saturation_factor(&self, color: Rgb) -> f32 {
        let floor = self.tuning.minimum_saturation_factor.clamp(0.0, 1.0);
        floor + (1.0 - floor) * color.saturation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::from_rgb(255, 0, 0);
    const GRAY: Rgb = Rgb::from_rgb(128, 128, 128);

    #[test]
    fn alpha_falls_off_per_round_and_clamps() {
        let diffuser = ColorDiffuser::default();

        assert!((diffuser.alpha_for(1, RED) - 0.88).abs() < 1e-6);
        assert!((diffuser.alpha_for(5, RED) - 0.40).abs() < 1e-6);
        assert!((diffuser.alpha_for(8, RED) - 0.10).abs() < 1e-6);
        assert!((diffuser.alpha_for(20, RED) - 0.10).abs() < 1e-6);
    }

    #[test]
    fn gray_sources_contribute_half_strength() {
        let diffuser = ColorDiffuser::default();

        assert!((diffuser.saturation_factor(GRAY) - 0.5).abs() < 1e-6);
        assert!((diffuser.saturation_factor(RED) - 1.0).abs() < 1e-6);
        assert!((diffuser.alpha_for(1, GRAY) - 0.44).abs() < 1e-6);
    }

    #[test]
    fn field_lookup_ignores_out_of_bounds_cells() {
        let field = DiffusionField {
            rows: 1,
            columns: 2,
            tints: vec![Some(Tint::new(RED, 1.0)), None],
            rounds: 0,
            sources: 1,
        };

        assert_eq!(field.tint(CellCoord::new(0, 0)), Some(Tint::new(RED, 1.0)));
        assert_eq!(field.tint(CellCoord::new(0, 1)), None);
        assert_eq!(field.tint(CellCoord::new(1, 0)), None);
        assert_eq!(field.colored_count(), 1);
    }
}
