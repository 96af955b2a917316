use std::collections::VecDeque;

use labyrinth_core::{CellCoord, CellGrid, Direction, GridView, Rgb};
use labyrinth_system_diffusion::{ColorDiffuser, DiffusionSource, DiffusionTuning};
use labyrinth_system_generation::MazeGenerator;

const RED: Rgb = Rgb::from_rgb(0xc8, 0x2a, 0x36);
const BLUE: Rgb = Rgb::from_rgb(0x58, 0x47, 0xff);

fn corridor(length: u32) -> CellGrid {
    let mut grid = CellGrid::new(1, length);
    for column in 0..length.saturating_sub(1) {
        assert!(grid.open_passage(CellCoord::new(0, column), Direction::East));
    }
    grid
}

fn bfs_distances(view: GridView<'_>, start: CellCoord) -> Vec<Option<u32>> {
    let mut distances = vec![None; view.len()];
    let mut queue = VecDeque::new();
    let start_index = view.index(start).expect("start inside grid");
    distances[start_index] = Some(0);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let distance = distances[view.index(cell).expect("cell inside grid")].expect("visited");
        for (_, neighbor) in view.open_neighbors(cell) {
            let index = view.index(neighbor).expect("neighbor inside grid");
            if distances[index].is_none() {
                distances[index] = Some(distance + 1);
                queue.push_back(neighbor);
            }
        }
    }

    distances
}

#[test]
fn single_source_colors_cells_within_eight_hops() {
    let grid = MazeGenerator::default().generate_from_seed(15, 15, 0xabcd);
    let view = grid.view();
    let source = CellCoord::new(7, 7);
    let field = ColorDiffuser::default().propagate(view, &[DiffusionSource::new(source, RED)]);
    let distances = bfs_distances(view, source);

    for cell in view.cells() {
        let index = view.index(cell.coord()).expect("cell inside grid");
        let distance = distances[index].expect("perfect maze is connected");
        let tint = field.tint(cell.coord());
        if distance <= 8 {
            let tint = tint.expect("cells within eight hops are colored");
            assert_eq!(tint.color, RED);
        } else {
            assert!(tint.is_none(), "{:?} is {distance} hops away", cell.coord());
        }
    }
}

#[test]
fn single_source_alpha_never_increases_with_distance() {
    let grid = MazeGenerator::default().generate_from_seed(11, 11, 77);
    let view = grid.view();
    let source = CellCoord::new(0, 0);
    let field = ColorDiffuser::default().propagate(view, &[DiffusionSource::new(source, BLUE)]);
    let distances = bfs_distances(view, source);

    let mut by_distance: Vec<(u32, f32)> = view
        .cells()
        .iter()
        .filter_map(|cell| {
            let index = view.index(cell.coord())?;
            let tint = field.tint(cell.coord())?;
            Some((distances[index]?, tint.alpha))
        })
        .collect();
    by_distance.sort_by_key(|(distance, _)| *distance);

    assert_eq!(by_distance.first().map(|(_, alpha)| *alpha), Some(1.0));
    for pair in by_distance.windows(2) {
        assert!(
            pair[1].1 <= pair[0].1,
            "alpha rose from {} to {} between hops {} and {}",
            pair[0].1,
            pair[1].1,
            pair[0].0,
            pair[1].0
        );
    }
}

#[test]
fn walls_stop_diffusion() {
    let mut grid = CellGrid::new(1, 4);
    assert!(grid.open_passage(CellCoord::new(0, 0), Direction::East));
    assert!(grid.open_passage(CellCoord::new(0, 2), Direction::East));

    let field = ColorDiffuser::default().propagate(
        grid.view(),
        &[DiffusionSource::new(CellCoord::new(0, 0), RED)],
    );

    assert!(field.tint(CellCoord::new(0, 1)).is_some());
    assert!(field.tint(CellCoord::new(0, 2)).is_none());
    assert!(field.tint(CellCoord::new(0, 3)).is_none());
    assert_eq!(field.rounds(), 1);
}

#[test]
fn nearer_source_claims_shared_midpoint() {
    // Source A sits two hops from the midpoint, source B six hops.
    let grid = corridor(9);
    let midpoint = CellCoord::new(0, 2);
    let sources = [
        DiffusionSource::new(CellCoord::new(0, 0), RED),
        DiffusionSource::new(CellCoord::new(0, 8), BLUE),
    ];

    let field = ColorDiffuser::default().propagate(grid.view(), &sources);

    let tint = field.tint(midpoint).expect("midpoint colored");
    assert_eq!(tint.color, RED);
    for column in 0..=4 {
        assert_eq!(
            field.tint(CellCoord::new(0, column)).map(|tint| tint.color),
            Some(RED)
        );
    }
    for column in 5..=8 {
        assert_eq!(
            field.tint(CellCoord::new(0, column)).map(|tint| tint.color),
            Some(BLUE)
        );
    }
}

#[test]
fn earlier_source_wins_ties_within_a_round() {
    let grid = corridor(3);
    let sources = [
        DiffusionSource::new(CellCoord::new(0, 2), BLUE),
        DiffusionSource::new(CellCoord::new(0, 0), RED),
    ];

    let field = ColorDiffuser::default().propagate(grid.view(), &sources);

    assert_eq!(
        field.tint(CellCoord::new(0, 1)).map(|tint| tint.color),
        Some(BLUE)
    );
    assert_eq!(
        field.tint(CellCoord::new(0, 0)).map(|tint| tint.color),
        Some(RED)
    );
}

#[test]
fn sources_keep_full_alpha() {
    let grid = corridor(5);
    let sources = [
        DiffusionSource::new(CellCoord::new(0, 0), RED),
        DiffusionSource::new(CellCoord::new(0, 1), BLUE),
    ];

    let field = ColorDiffuser::default().propagate(grid.view(), &sources);

    assert_eq!(field.tint(CellCoord::new(0, 0)).map(|tint| tint.alpha), Some(1.0));
    assert_eq!(field.tint(CellCoord::new(0, 1)).map(|tint| tint.alpha), Some(1.0));
    assert_eq!(
        field.tint(CellCoord::new(0, 1)).map(|tint| tint.color),
        Some(BLUE)
    );
}

#[test]
fn pass_halts_when_no_frontier_grows() {
    let grid = corridor(4);
    let field = ColorDiffuser::default().propagate(
        grid.view(),
        &[DiffusionSource::new(CellCoord::new(0, 0), RED)],
    );

    assert_eq!(field.rounds(), 3);
    assert_eq!(field.colored_count(), 4);
}

#[test]
fn round_cap_limits_reach() {
    let grid = corridor(20);
    let diffuser = ColorDiffuser::new(DiffusionTuning {
        max_rounds: 3,
        ..DiffusionTuning::default()
    });

    let field = diffuser.propagate(grid.view(), &[DiffusionSource::new(CellCoord::new(0, 0), RED)]);

    assert_eq!(field.colored_count(), 4);
    assert_eq!(field.rounds(), 3);
}

#[test]
fn invalid_and_duplicate_sources_are_ignored() {
    let grid = corridor(3);
    let sources = [
        DiffusionSource::new(CellCoord::new(4, 4), BLUE),
        DiffusionSource::new(CellCoord::new(0, 0), RED),
        DiffusionSource::new(CellCoord::new(0, 0), BLUE),
    ];

    let field = ColorDiffuser::default().propagate(grid.view(), &sources);

    assert_eq!(field.sources(), 1);
    assert_eq!(field.colored_count(), 3);
    assert!(field
        .tints()
        .iter()
        .flatten()
        .all(|tint| tint.color == RED));
}

#[test]
fn no_sources_produce_an_empty_field() {
    let grid = corridor(5);
    let field = ColorDiffuser::default().propagate(grid.view(), &[]);

    assert_eq!(field.colored_count(), 0);
    assert_eq!(field.rounds(), 0);
}
