//! Plain-text presenter writing scenes to a terminal.

use std::io::Write;

use anyhow::Result as AnyResult;
use labyrinth_core::{Direction, Event};
use labyrinth_rendering::{Marker, Presentation, Presenter, Scene, SceneCell};

/// Presenter that draws scenes as ASCII art, optionally with 24-bit ANSI fills.
pub(crate) struct TerminalPresenter<W> {
    out: W,
    color: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub(crate) fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        let scene = &presentation.scene;
        writeln!(self.out, "{}", presentation.title)?;
        write!(self.out, "{}", render_ascii(scene, self.color))?;
        writeln!(
            self.out,
            "position ({}, {}), {} carves left, {} cells visible",
            scene.player.cell.row(),
            scene.player.cell.column(),
            scene.player.carve_actions,
            scene.visible_count()
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Renders the scene with `+`, `-` and `|` walls and a two-character body per cell.
pub(crate) fn render_ascii(scene: &Scene, color: bool) -> String {
    let mut out = String::new();
    let rows: Vec<&[SceneCell]> = scene
        .cells
        .chunks(scene.columns.max(1) as usize)
        .collect();

    for row in &rows {
        push_horizontal(&mut out, row, Direction::North);
        for cell in row.iter() {
            out.push(if cell.walls.has(Direction::West) { '|' } else { ' ' });
            out.push_str(&body(cell, color));
        }
        if let Some(last) = row.last() {
            out.push(if last.walls.has(Direction::East) { '|' } else { ' ' });
        }
        out.push('\n');
    }
    if let Some(last_row) = rows.last() {
        push_horizontal(&mut out, last_row, Direction::South);
    }

    out
}

fn push_horizontal(out: &mut String, row: &[SceneCell], side: Direction) {
    for cell in row {
        out.push('+');
        out.push_str(if cell.walls.has(side) { "--" } else { "  " });
    }
    out.push_str("+\n");
}

fn body(cell: &SceneCell, color: bool) -> String {
    let text = match (cell.marker, cell.visible) {
        (Some(marker), _) => format!("{} ", glyph(marker)),
        (None, false) => "##".to_owned(),
        (None, true) => "  ".to_owned(),
    };

    if !color || !cell.visible {
        return text;
    }
    let (red, green, blue) = cell.fill.to_rgb_u8();
    format!("\x1b[48;2;{red};{green};{blue}m\x1b[30m{text}\x1b[0m")
}

const fn glyph(marker: Marker) -> char {
    match marker {
        Marker::Player => 'P',
        Marker::Exit => 'X',
        Marker::Photo => '*',
        Marker::Ghost => 'G',
    }
}

/// Human readable line describing a world event.
pub(crate) fn describe(event: &Event) -> String {
    match event {
        Event::PlayerMoved { to, direction, .. } => {
            format!("moved {direction:?} to ({}, {})", to.row(), to.column())
        }
        Event::MoveBlocked { direction } => format!("a wall blocks the way {direction:?}"),
        Event::EncounterTriggered { ghost } => format!(
            "a fear ghost at ({}, {}) freezes you in place",
            ghost.row(),
            ghost.column()
        ),
        Event::PhotoCollected { photo, .. } => format!("collected photo #{}", photo.get()),
        Event::ExitReached { .. } => "you found the exit".to_owned(),
        Event::WallCarved {
            direction,
            remaining,
            ..
        } => format!("carved through the {direction:?} wall, {remaining} carves left"),
        Event::CarveRejected { direction, reason } => {
            format!("cannot carve {direction:?}: {reason:?}")
        }
        Event::ContentAttached { cell, photo } => format!(
            "photo #{} hung at ({}, {})",
            photo.get(),
            cell.row(),
            cell.column()
        ),
        Event::ContentRejected { cell, reason } => format!(
            "photo rejected at ({}, {}): {reason:?}",
            cell.row(),
            cell.column()
        ),
        Event::ColorsPropagated {
            sources,
            colored,
            rounds,
        } => format!("{sources} photos tinted {colored} cells over {rounds} rounds"),
        Event::VisionModeChanged { mode } => format!("vision is now {mode:?}"),
    }
}

#[cfg(test)]
mod tests {
    use labyrinth_core::{CellCoord, CellGrid, CellKind, PlayerSnapshot};
    use labyrinth_rendering::Palette;

    use super::*;

    fn scene(grid: &CellGrid, visibility: &[bool]) -> Scene {
        let player = PlayerSnapshot {
            cell: CellCoord::new(0, 0),
            last_direction: None,
            carve_actions: 2,
        };
        Scene::build(grid.view(), player, visibility, &Palette::default()).expect("scene")
    }

    #[test]
    fn corridor_renders_open_walls_and_markers() {
        let mut grid = CellGrid::new(2, 2);
        assert!(grid.open_passage(CellCoord::new(0, 0), Direction::East));
        assert!(grid.open_passage(CellCoord::new(0, 1), Direction::South));
        grid.cell_mut(CellCoord::new(1, 1))
            .expect("cell")
            .set_kind(CellKind::Exit);

        let rendered = render_ascii(&scene(&grid, &[true; 4]), false);

        assert_eq!(
            rendered,
            "+--+--+\n\
             |P    |\n\
             +--+  +\n\
             |  |X |\n\
             +--+--+\n"
        );
    }

    #[test]
    fn hidden_cells_are_drawn_dark() {
        let mut grid = CellGrid::new(1, 2);
        grid.cell_mut(CellCoord::new(0, 1))
            .expect("cell")
            .set_kind(CellKind::FearGhost);

        let rendered = render_ascii(&scene(&grid, &[true, false]), false);

        assert_eq!(rendered, "+--+--+\n|P |##|\n+--+--+\n");
    }

    #[test]
    fn presenter_writes_title_and_status() {
        let grid = CellGrid::new(1, 1);
        let presentation = Presentation::new(
            "Welcome",
            Palette::default().background,
            scene(&grid, &[true]),
        );
        let mut buffer = Vec::new();

        TerminalPresenter::new(&mut buffer, false)
            .present(&presentation)
            .expect("in-memory write");

        let text = String::from_utf8(buffer).expect("utf-8");
        assert!(text.starts_with("Welcome\n+--+\n|P |\n+--+\n"));
        assert!(text.ends_with("position (0, 0), 2 carves left, 1 cells visible\n"));
    }

    #[test]
    fn events_have_readable_descriptions() {
        assert_eq!(
            describe(&Event::MoveBlocked {
                direction: Direction::North
            }),
            "a wall blocks the way North"
        );
        assert_eq!(
            describe(&Event::ExitReached {
                cell: CellCoord::new(1, 1)
            }),
            "you found the exit"
        );
    }
}
