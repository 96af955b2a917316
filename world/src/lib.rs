#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state for a Labyrinth session.
//!
//! The [`World`] exclusively owns the maze grid and the player. Every mutation
//! goes through [`apply`], which reports its outcome as [`Event`] values;
//! everything else reads the maze through the borrowed views in [`query`].

mod carving;
mod encounter;
pub mod movement;
pub mod visibility;

use labyrinth_core::{
    AttachError, CellCoord, CellGrid, CellKind, Command, Direction, Event, PhotoContent, UserId,
    VisionMode, WELCOME_BANNER,
};
use labyrinth_system_diffusion::{ColorDiffuser, DiffusionSource, DiffusionTuning};
use labyrinth_system_generation::{GenerationTuning, MazeGenerator};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session parameters used to build a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of maze rows.
    pub rows: u32,
    /// Number of maze columns.
    pub columns: u32,
    /// Seed feeding maze generation and classification.
    pub seed: u64,
    /// Carve actions granted to the player at session start.
    pub carve_actions: u32,
    /// Manhattan radius beyond which the visibility oracle hides every cell.
    pub vision_radius: u32,
    /// Vision mode active at session start.
    pub vision_mode: VisionMode,
    /// User credited with photo collections.
    pub user: UserId,
    /// Classification probabilities used during generation.
    pub generation: GenerationTuning,
    /// Reach and strength of the color diffusion pass.
    pub diffusion: DiffusionTuning,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 19,
            columns: 19,
            seed: 0,
            carve_actions: 3,
            vision_radius: 4,
            vision_mode: VisionMode::Full,
            user: UserId::new(1),
            generation: GenerationTuning::default(),
            diffusion: DiffusionTuning::default(),
        }
    }
}

impl Config {
    /// Checks that the configuration describes a playable maze.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        Ok(())
    }
}

/// Reasons a world could not be constructed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The maze would contain no cells.
    #[error("maze dimensions must be positive (received {rows}x{columns})")]
    EmptyGrid {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
}

/// Represents the authoritative Labyrinth session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    config: Config,
    grid: CellGrid,
    player: Player,
    sources: Vec<CellCoord>,
    vision_mode: VisionMode,
    diffuser: ColorDiffuser,
}

impl World {
    /// Generates a fresh maze from the configuration and places the player at
    /// the top-left corner.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = MazeGenerator::new(config.generation);
        let grid = generator.generate_from_seed(config.rows, config.columns, config.seed);
        info!(
            "generated {}x{} labyrinth from seed {:#x}",
            config.rows, config.columns, config.seed
        );
        Self::with_grid(grid, config)
    }

    /// Builds a world around an existing grid.
    ///
    /// The configuration's dimensions are replaced by the grid's own.
    pub fn with_grid(grid: CellGrid, mut config: Config) -> Result<Self, ConfigError> {
        config.rows = grid.rows();
        config.columns = grid.columns();
        config.validate()?;

        Ok(Self {
            banner: WELCOME_BANNER,
            player: Player::new(config.carve_actions),
            vision_mode: config.vision_mode,
            diffuser: ColorDiffuser::new(config.diffusion),
            sources: Vec::new(),
            grid,
            config,
        })
    }

    fn attempt_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let from = self.player.cell;
        let view = self.grid.view();

        if let Some(ghost) = encounter::adjacent_ghost(view, from) {
            debug!("fear ghost at {ghost:?} blocks movement from {from:?}");
            out_events.push(Event::EncounterTriggered { ghost });
            return;
        }

        if !movement::can_move(view, from, direction) {
            out_events.push(Event::MoveBlocked { direction });
            return;
        }

        let Some(to) = view.neighbor(from, direction) else {
            error!("open wall on {from:?} facing {direction:?} leads outside the grid");
            debug_assert!(view.walls_are_symmetric(), "boundary wall opened");
            out_events.push(Event::MoveBlocked { direction });
            return;
        };

        self.player.cell = to;
        self.player.last_direction = Some(direction);
        out_events.push(Event::PlayerMoved {
            from,
            to,
            direction,
        });

        if let Some(content) = encounter::collect_photo(&mut self.grid, to) {
            self.sources.retain(|source| *source != to);
            info!("photo {} collected at {to:?}", content.photo.get());
            out_events.push(Event::PhotoCollected {
                photo: content.photo,
                user: self.config.user,
                cell: to,
            });
        }

        if self.grid.cell(to).map(|cell| cell.kind()) == Some(CellKind::Exit) {
            out_events.push(Event::ExitReached { cell: to });
        }
    }

    fn attempt_carve(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let cell = self.player.cell;
        match carving::carve(&mut self.grid, cell, direction, &mut self.player.carve_actions) {
            Ok(remaining) => {
                debug!("carved {direction:?} from {cell:?}, {remaining} carves left");
                out_events.push(Event::WallCarved {
                    cell,
                    direction,
                    remaining,
                });
            }
            Err(reason) => out_events.push(Event::CarveRejected { direction, reason }),
        }
    }

    fn attach_content(
        &mut self,
        cell: CellCoord,
        content: PhotoContent,
        out_events: &mut Vec<Event>,
    ) {
        let outcome = match self.grid.cell_mut(cell) {
            None => Err(AttachError::OutOfBounds),
            Some(target) if target.kind() != CellKind::Photo => Err(AttachError::NotPhotoCell),
            Some(target) if target.content().is_some() => Err(AttachError::AlreadyAttached),
            Some(target) => {
                target.attach_content(content);
                Ok(())
            }
        };

        match outcome {
            Ok(()) => {
                self.sources.push(cell);
                out_events.push(Event::ContentAttached {
                    cell,
                    photo: content.photo,
                });
            }
            Err(reason) => out_events.push(Event::ContentRejected { cell, reason }),
        }
    }

    fn propagate_colors(&mut self, out_events: &mut Vec<Event>) {
        let sources: Vec<DiffusionSource> = self
            .sources
            .iter()
            .filter_map(|cell| {
                let content = self.grid.cell(*cell)?.content()?;
                Some(DiffusionSource::new(*cell, content.color))
            })
            .collect();

        let field = self.diffuser.propagate(self.grid.view(), &sources);
        for cell in self.grid.cells_mut() {
            cell.set_tint(field.tint(cell.coord()));
        }

        out_events.push(Event::ColorsPropagated {
            sources: field.sources(),
            colored: field.colored_count(),
            rounds: field.rounds(),
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AttemptMove { direction } => world.attempt_move(direction, out_events),
        Command::AttemptCarve { direction } => world.attempt_carve(direction, out_events),
        Command::AttachContent { cell, content } => {
            world.attach_content(cell, content, out_events);
        }
        Command::PropagateColors => world.propagate_colors(out_events),
        Command::SetVisionMode { mode } => {
            world.vision_mode = mode;
            out_events.push(Event::VisionModeChanged { mode });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use labyrinth_core::{CellCoord, CellKind, Direction, GridView, PlayerSnapshot, VisionMode};

    use super::{movement, visibility, Config, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Configuration the world was built from.
    #[must_use]
    pub fn config(world: &World) -> &Config {
        &world.config
    }

    /// Provides read-only access to the maze grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        world.grid.view()
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            last_direction: world.player.last_direction,
            carve_actions: world.player.carve_actions,
        }
    }

    /// Vision mode currently in effect.
    #[must_use]
    pub fn vision_mode(world: &World) -> VisionMode {
        world.vision_mode
    }

    /// Location of the exit cell, if the maze has one.
    #[must_use]
    pub fn exit(world: &World) -> Option<CellCoord> {
        world
            .grid
            .view()
            .cells_of_kind(CellKind::Exit)
            .map(|cell| cell.coord())
            .next()
    }

    /// Photo cells currently acting as diffusion sources, in attachment order.
    #[must_use]
    pub fn diffusion_sources(world: &World) -> &[CellCoord] {
        &world.sources
    }

    /// Reports whether the cell is visible under the active vision mode.
    #[must_use]
    pub fn is_visible(world: &World, cell: CellCoord) -> bool {
        match world.vision_mode {
            VisionMode::Full => world.grid.contains(cell),
            VisionMode::Limited => visibility::is_visible(
                world.grid.view(),
                world.player.cell,
                cell,
                world.config.vision_radius,
            ),
        }
    }

    /// Row-major visibility flags for every cell under the active vision mode.
    #[must_use]
    pub fn visibility_mask(world: &World) -> Vec<bool> {
        visibility::visibility_mask(
            world.grid.view(),
            world.player.cell,
            world.config.vision_radius,
            world.vision_mode,
        )
    }

    /// Reports whether the player could step in `direction`.
    #[must_use]
    pub fn can_move(world: &World, direction: Direction) -> bool {
        movement::can_move(world.grid.view(), world.player.cell, direction)
    }

    /// Reports whether the player could step by the provided delta.
    ///
    /// Non-cardinal deltas are always rejected.
    #[must_use]
    pub fn can_step(world: &World, d_row: i32, d_column: i32) -> bool {
        movement::can_step(world.grid.view(), world.player.cell, d_row, d_column)
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    cell: CellCoord,
    last_direction: Option<Direction>,
    carve_actions: u32,
}

impl Player {
    const fn new(carve_actions: u32) -> Self {
        Self {
            cell: CellCoord::new(0, 0),
            last_direction: None,
            carve_actions,
        }
    }
}
