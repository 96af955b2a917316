#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Labyrinth adapters.

use anyhow::Result as AnyResult;
use labyrinth_core::{CellCoord, CellKind, GridView, PlayerSnapshot, Rgb, Walls};
use std::{error::Error, fmt};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from a maze color.
    #[must_use]
    pub const fn from_rgb(color: Rgb) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }

    /// Blends `other` over this color with the provided opacity.
    #[must_use]
    pub fn mix(self, other: Self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: mix_channel(self.red, other.red, amount),
            green: mix_channel(self.green, other.green, amount),
            blue: mix_channel(self.blue, other.blue, amount),
            alpha: self.alpha,
        }
    }

    /// Byte RGB channels, rounded to the nearest value.
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.red), channel(self.green), channel(self.blue))
    }
}

fn mix_channel(channel: f32, target: f32, amount: f32) -> f32 {
    channel + (target - channel) * amount
}

/// Colors applied while building a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Background used to clear each frame.
    pub background: Color,
    /// Fill of visible cells without a tint.
    pub floor: Color,
    /// Fill of cells the player cannot see.
    pub hidden: Color,
    /// Wall color.
    pub wall: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x10, 0x10, 0x14),
            floor: Color::from_rgb_u8(0xe8, 0xe4, 0xda),
            hidden: Color::from_rgb_u8(0x1c, 0x1c, 0x22),
            wall: Color::from_rgb_u8(0x30, 0x2c, 0x28),
        }
    }
}

/// Occupant drawn on top of a cell's fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// The player's current position.
    Player,
    /// The maze exit.
    Exit,
    /// A photo waiting to be collected, or a decorative photo cell.
    Photo,
    /// A fear ghost.
    Ghost,
}

/// Presentation of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCell {
    /// Location of the cell.
    pub coord: CellCoord,
    /// Walls surrounding the cell.
    pub walls: Walls,
    /// Whether the player can currently see the cell.
    pub visible: bool,
    /// Fill color, already blended with any diffusion tint.
    pub fill: Color,
    /// Occupant to draw, if any.
    pub marker: Option<Marker>,
}

/// Scene description of the maze as seen by the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of rows in the maze.
    pub rows: u32,
    /// Number of columns in the maze.
    pub columns: u32,
    /// Cells in row-major order.
    pub cells: Vec<SceneCell>,
    /// Snapshot of the player driving the scene.
    pub player: PlayerSnapshot,
    /// Wall color.
    pub wall: Color,
}

impl Scene {
    /// Builds a scene from a grid view, the player and a row-major visibility mask.
    ///
    /// Hidden cells lose their markers and tint. The player's own marker is
    /// always drawn.
    pub fn build(
        view: GridView<'_>,
        player: PlayerSnapshot,
        visibility: &[bool],
        palette: &Palette,
    ) -> Result<Self, RenderingError> {
        if visibility.len() != view.len() {
            return Err(RenderingError::VisibilityMismatch {
                expected: view.len(),
                received: visibility.len(),
            });
        }

        let cells = view
            .cells()
            .iter()
            .zip(visibility)
            .map(|(cell, &visible)| {
                let is_player = cell.coord() == player.cell;
                let fill = match (visible, cell.tint()) {
                    (false, _) => palette.hidden,
                    (true, Some(tint)) => palette.floor.mix(Color::from_rgb(tint.color), tint.alpha),
                    (true, None) => palette.floor,
                };
                let marker = if is_player {
                    Some(Marker::Player)
                } else if visible {
                    marker_for(cell.kind())
                } else {
                    None
                };

                SceneCell {
                    coord: cell.coord(),
                    walls: cell.walls(),
                    visible,
                    fill,
                    marker,
                }
            })
            .collect();

        Ok(Self {
            rows: view.rows(),
            columns: view.columns(),
            cells,
            player,
            wall: palette.wall,
        })
    }

    /// Presentation of the requested cell, if it lies inside the scene.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&SceneCell> {
        if coord.row() >= self.rows || coord.column() >= self.columns {
            return None;
        }
        let index = usize::try_from(coord.row()).ok()? * usize::try_from(self.columns).ok()?
            + usize::try_from(coord.column()).ok()?;
        self.cells.get(index)
    }

    /// Number of cells currently visible.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.visible).count()
    }
}

fn marker_for(kind: CellKind) -> Option<Marker> {
    match kind {
        CellKind::Normal => None,
        CellKind::Exit => Some(Marker::Exit),
        CellKind::Photo => Some(Marker::Photo),
        CellKind::FearGhost => Some(Marker::Ghost),
    }
}

/// Presentation descriptor consumed by presenters.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title shown above the scene.
    pub title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            clear_color,
            scene,
        }
    }
}

/// Output surface capable of presenting Labyrinth scenes.
pub trait Presenter {
    /// Presents a single frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Eq)]
pub enum RenderingError {
    /// The visibility mask does not cover every cell exactly once.
    VisibilityMismatch {
        /// Number of cells in the maze.
        expected: usize,
        /// Number of visibility flags supplied.
        received: usize,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VisibilityMismatch { expected, received } => {
                write!(
                    f,
                    "visibility mask must have {expected} entries (received {received})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
