#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Labyrinth engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! collaborators to react to. Systems read the maze exclusively through the
//! borrowed [`GridView`] and respond with new command batches.

mod grid;

pub use grid::{Cell, CellGrid, GridView};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when a session boots.
pub const WELCOME_BANNER: &str = "Welcome to the Labyrinth.";

/// Cardinal directions a player can step, look or carve toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices (the cell's top wall).
    North,
    /// Toward increasing column indices (the cell's right wall).
    East,
    /// Toward increasing row indices (the cell's bottom wall).
    South,
    /// Toward decreasing column indices (the cell's left wall).
    West,
}

impl Direction {
    /// Every direction in the fixed order used for deterministic scans.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing back toward the origin of a step.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Row and column offsets of a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (-1, 0),
            Self::East => (0, 1),
            Self::South => (1, 0),
            Self::West => (0, -1),
        }
    }

    /// Resolves a row/column delta into a direction.
    ///
    /// Only the four unit deltas are cardinal; anything else (diagonals, zero,
    /// multi-cell jumps) yields `None` so callers can reject the input without
    /// touching state.
    #[must_use]
    pub const fn from_delta(d_row: i32, d_column: i32) -> Option<Self> {
        match (d_row, d_column) {
            (-1, 0) => Some(Self::North),
            (0, 1) => Some(Self::East),
            (1, 0) => Some(Self::South),
            (0, -1) => Some(Self::West),
            _ => None,
        }
    }

    /// Direction of a single step from `from` to `to`, if they are neighbors.
    #[must_use]
    pub fn between(from: CellCoord, to: CellCoord) -> Option<Self> {
        if !from.is_neighbor_of(to) {
            return None;
        }

        if to.row() < from.row() {
            Some(Self::North)
        } else if to.row() > from.row() {
            Some(Self::South)
        } else if to.column() > from.column() {
            Some(Self::East)
        } else {
            Some(Self::West)
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

/// Location of a single maze cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    ///
    /// Saturates at `u32::MAX` for coordinates at opposite ends of the range.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.row
            .abs_diff(other.row)
            .saturating_add(self.column.abs_diff(other.column))
    }

    /// Reports whether `other` is one orthogonal step away.
    #[must_use]
    pub fn is_neighbor_of(self, other: CellCoord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Cell reached by stepping once in `direction`, bounded by the grid size.
    #[must_use]
    pub fn step(self, direction: Direction, rows: u32, columns: u32) -> Option<CellCoord> {
        let (row, column) = match direction {
            Direction::North => (self.row.checked_sub(1)?, self.column),
            Direction::South => (self.row.checked_add(1)?, self.column),
            Direction::West => (self.row, self.column.checked_sub(1)?),
            Direction::East => (self.row, self.column.checked_add(1)?),
        };

        if row < rows && column < columns {
            Some(CellCoord::new(row, column))
        } else {
            None
        }
    }
}

/// Presence flags for the four walls surrounding a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Walls {
    closed: [bool; 4],
}

impl Walls {
    /// All four walls standing.
    pub const CLOSED: Walls = Walls { closed: [true; 4] };

    /// Reports whether the wall facing `direction` is present.
    #[must_use]
    pub const fn has(&self, direction: Direction) -> bool {
        self.closed[direction.index()]
    }

    /// Removes the wall facing `direction`.
    pub fn remove(&mut self, direction: Direction) {
        self.closed[direction.index()] = false;
    }

    /// Directions whose wall has been removed, in [`Direction::ALL`] order.
    pub fn open_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| !self.has(*direction))
    }
}

impl Default for Walls {
    fn default() -> Self {
        Self::CLOSED
    }
}

/// Classification assigned to a cell after generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Plain corridor cell.
    #[default]
    Normal,
    /// The unconditional exit at the grid center.
    Exit,
    /// Cell that may hold a collectible photo.
    Photo,
    /// Cell haunted by a fear ghost; open adjacency blocks movement.
    FearGhost,
}

/// Unique identifier of a photo owned by the content collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhotoId(u64);

impl PhotoId {
    /// Creates a new photo identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Unique identifier of the user exploring the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    /// Creates a new user identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Byte RGB color, typically a photo's representative color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Parses a `#RRGGBB` string; the leading `#` is optional.
    pub fn from_hex(value: &str) -> Result<Self, ColorParseError> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorParseError::InvalidLength(value.to_owned()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorParseError::InvalidDigit(value.to_owned()))
        };

        Ok(Self::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats the color as an upper-case `#RRGGBB` string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// HSV saturation in the range `0.0..=1.0`; black and grays are `0.0`.
    #[must_use]
    pub fn saturation(&self) -> f32 {
        let max = self.red.max(self.green).max(self.blue);
        let min = self.red.min(self.green).min(self.blue);
        if max == 0 {
            return 0.0;
        }
        f32::from(max - min) / f32::from(max)
    }

    /// Relative luminance using Rec. 709 weights, in the range `0.0..=255.0`.
    #[must_use]
    pub fn luminance(&self) -> f32 {
        0.2126 * f32::from(self.red) + 0.7152 * f32::from(self.green) + 0.0722 * f32::from(self.blue)
    }
}

/// Reasons a hex color string could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The string did not contain exactly six hex digits.
    #[error("color '{0}' must be formatted as #RRGGBB")]
    InvalidLength(String),
    /// One of the channels contained a non-hex digit.
    #[error("color '{0}' contains a non-hexadecimal digit")]
    InvalidDigit(String),
}

/// Display color written onto a cell by the color diffuser.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tint {
    /// Source color being blended across the grid.
    pub color: Rgb,
    /// Opacity in the range `0.0..=1.0`.
    pub alpha: f32,
}

impl Tint {
    /// Creates a new tint.
    #[must_use]
    pub const fn new(color: Rgb, alpha: f32) -> Self {
        Self { color, alpha }
    }
}

/// Content resolved by the external provider and attached to a photo cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoContent {
    /// Identifier of the photo.
    pub photo: PhotoId,
    /// Representative color of the photo.
    pub color: Rgb,
}

impl PhotoContent {
    /// Creates a new content reference.
    #[must_use]
    pub const fn new(photo: PhotoId, color: Rgb) -> Self {
        Self { photo, color }
    }
}

/// How adapters decide which cells to reveal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisionMode {
    /// Every cell is visible; the visibility oracle is bypassed.
    #[default]
    Full,
    /// Only cells accepted by the visibility oracle are visible.
    Limited,
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Direction of the last successful step, if any.
    pub last_direction: Option<Direction>,
    /// Number of carve actions the player may still spend.
    pub carve_actions: u32,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Requests that the player step once in the provided direction.
    AttemptMove {
        /// Direction of the attempted step.
        direction: Direction,
    },
    /// Requests that the player carve through the wall in the provided direction.
    AttemptCarve {
        /// Side of the player's cell to carve.
        direction: Direction,
    },
    /// Attaches externally resolved content to a photo cell.
    AttachContent {
        /// Photo cell receiving the content.
        cell: CellCoord,
        /// Resolved photo reference.
        content: PhotoContent,
    },
    /// Runs the color diffusion pass over all attached content.
    PropagateColors,
    /// Switches between full and limited vision.
    SetVisionMode {
        /// Mode the world should activate.
        mode: VisionMode,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that the player stepped between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
        /// Direction of the step.
        direction: Direction,
    },
    /// Reports that a wall prevented the requested step.
    MoveBlocked {
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Reports that a fear ghost next to the player rejected a move.
    EncounterTriggered {
        /// Ghost cell responsible for the encounter.
        ghost: CellCoord,
    },
    /// Announces that the player collected a photo.
    PhotoCollected {
        /// Identifier of the collected photo.
        photo: PhotoId,
        /// User credited with the collection.
        user: UserId,
        /// Cell the photo was collected from.
        cell: CellCoord,
    },
    /// Announces that the player stepped onto the exit.
    ExitReached {
        /// Exit cell.
        cell: CellCoord,
    },
    /// Confirms that a wall pair was removed by the player.
    WallCarved {
        /// Cell the player carved from.
        cell: CellCoord,
        /// Side of the cell that was opened.
        direction: Direction,
        /// Carve actions left after this carve.
        remaining: u32,
    },
    /// Reports that a carve request was rejected without changing state.
    CarveRejected {
        /// Side of the cell the player tried to carve.
        direction: Direction,
        /// Specific reason the carve failed.
        reason: CarveError,
    },
    /// Confirms that content was attached to a photo cell.
    ContentAttached {
        /// Photo cell holding the content.
        cell: CellCoord,
        /// Identifier of the attached photo.
        photo: PhotoId,
    },
    /// Reports that a content attachment was rejected.
    ContentRejected {
        /// Cell targeted by the attachment.
        cell: CellCoord,
        /// Specific reason the attachment failed.
        reason: AttachError,
    },
    /// Summarises a completed color diffusion pass.
    ColorsPropagated {
        /// Number of diffusion sources that took part.
        sources: usize,
        /// Number of cells carrying a tint after the pass.
        colored: usize,
        /// Number of expansion rounds that grew at least one frontier.
        rounds: u32,
    },
    /// Announces that the world entered a new vision mode.
    VisionModeChanged {
        /// Mode that became active.
        mode: VisionMode,
    },
}

/// Reasons a carve request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarveError {
    /// The player has no carve actions left.
    NoActionsLeft,
    /// The requested side of the cell is already open.
    NoWall,
    /// The requested wall faces outside the grid.
    OutOfBounds,
}

/// Reasons a content attachment may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttachError {
    /// The target cell lies outside the grid.
    OutOfBounds,
    /// The target cell is not classified as a photo cell.
    NotPhotoCell,
    /// The target cell already holds content.
    AlreadyAttached,
}

#[cfg(test)]
mod tests {
    use super::{
        AttachError, CarveError, CellCoord, CellKind, ColorParseError, Direction, PhotoContent,
        PhotoId, Rgb, VisionMode, Walls,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(3, 4);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn manhattan_distance_saturates_at_range_extremes() {
        let origin = CellCoord::new(0, 0);
        let far = CellCoord::new(u32::MAX, u32::MAX);

        assert_eq!(origin.manhattan_distance(far), u32::MAX);
        assert!(!origin.is_neighbor_of(far));
        assert_eq!(Direction::between(origin, far), None);
    }

    #[test]
    fn from_delta_accepts_only_cardinal_steps() {
        for direction in Direction::ALL {
            let (d_row, d_column) = direction.delta();
            assert_eq!(Direction::from_delta(d_row, d_column), Some(direction));
        }

        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
        assert_eq!(Direction::from_delta(-2, 0), None);
    }

    #[test]
    fn between_resolves_neighbors_only() {
        let origin = CellCoord::new(2, 2);
        assert_eq!(
            Direction::between(origin, CellCoord::new(1, 2)),
            Some(Direction::North)
        );
        assert_eq!(
            Direction::between(origin, CellCoord::new(2, 1)),
            Some(Direction::West)
        );
        assert_eq!(Direction::between(origin, CellCoord::new(3, 3)), None);
        assert_eq!(Direction::between(origin, origin), None);
    }

    #[test]
    fn step_stays_inside_grid() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::North, 3, 3), None);
        assert_eq!(corner.step(Direction::West, 3, 3), None);
        assert_eq!(
            corner.step(Direction::East, 3, 3),
            Some(CellCoord::new(0, 1))
        );
        assert_eq!(CellCoord::new(2, 2).step(Direction::South, 3, 3), None);
    }

    #[test]
    fn walls_report_open_directions_in_fixed_order() {
        let mut walls = Walls::CLOSED;
        walls.remove(Direction::West);
        walls.remove(Direction::North);

        let open: Vec<Direction> = walls.open_directions().collect();
        assert_eq!(open, vec![Direction::North, Direction::West]);
        assert!(walls.has(Direction::East));
    }

    #[test]
    fn hex_colors_parse_and_format() {
        let color = Rgb::from_hex("#ff5733").expect("valid hex");
        assert_eq!(color, Rgb::from_rgb(0xff, 0x57, 0x33));
        assert_eq!(color.to_hex(), "#FF5733");
        assert_eq!(Rgb::from_hex("00ff00"), Ok(Rgb::from_rgb(0, 0xff, 0)));
    }

    #[test]
    fn hex_colors_reject_malformed_input() {
        assert!(matches!(
            Rgb::from_hex("#12345"),
            Err(ColorParseError::InvalidLength(_))
        ));
        assert!(matches!(
            Rgb::from_hex("#12345G"),
            Err(ColorParseError::InvalidDigit(_))
        ));
    }

    #[test]
    fn saturation_is_zero_for_grays() {
        assert_eq!(Rgb::from_rgb(0, 0, 0).saturation(), 0.0);
        assert_eq!(Rgb::from_rgb(128, 128, 128).saturation(), 0.0);
        assert!((Rgb::from_rgb(255, 0, 0).saturation() - 1.0).abs() < f32::EPSILON);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn photo_content_round_trips_through_bincode() {
        assert_round_trip(&PhotoContent::new(
            PhotoId::new(42),
            Rgb::from_rgb(10, 20, 30),
        ));
    }

    #[test]
    fn cell_kind_round_trips_through_bincode() {
        assert_round_trip(&CellKind::FearGhost);
    }

    #[test]
    fn rejection_reasons_round_trip_through_bincode() {
        assert_round_trip(&CarveError::OutOfBounds);
        assert_round_trip(&AttachError::AlreadyAttached);
        assert_round_trip(&VisionMode::Limited);
    }
}
