#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Photo content plumbing between the maze and an external photo catalogue.
//!
//! The catalogue is reached through two narrow ports: a [`ContentProvider`]
//! that hands out photos a user has not collected yet, and a
//! [`CollectionSink`] that records collections. [`ContentAssignment`] turns
//! provider answers into `AttachContent` commands; [`CollectionRelay`] forwards
//! `PhotoCollected` events to the sink.

mod library;
pub mod palette;

pub use library::PhotoLibrary;

use labyrinth_core::{CellCoord, CellKind, Command, Event, GridView, PhotoContent, PhotoId, UserId};
use log::{debug, warn};
use thiserror::Error;

/// Failures reported by content ports.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The backing catalogue could not be reached.
    #[error("content provider unavailable: {0}")]
    Unavailable(String),
    /// The photo is not known to the catalogue.
    #[error("photo {} is not in the catalogue", .0.get())]
    UnknownPhoto(PhotoId),
    /// A photo was submitted without any pixel data.
    #[error("image contains no pixels")]
    EmptyImage,
}

/// Supplies photos for a maze's photo cells.
pub trait ContentProvider {
    /// Returns a photo `user` has not collected that is not in `excluded`, if any.
    fn next_unseen_photo(
        &mut self,
        user: UserId,
        excluded: &[PhotoId],
    ) -> Result<Option<PhotoContent>, ProviderError>;
}

/// Durable record of a collected photo.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollectionRecord {
    /// User credited with the collection.
    pub user: UserId,
    /// Collected photo.
    pub photo: PhotoId,
    /// Cell the photo was collected from.
    pub cell: CellCoord,
}

impl CollectionRecord {
    /// Creates a new collection record.
    #[must_use]
    pub const fn new(user: UserId, photo: PhotoId, cell: CellCoord) -> Self {
        Self { user, photo, cell }
    }
}

/// Stores collection records.
pub trait CollectionSink {
    /// Persists a single collection.
    fn record(&mut self, record: CollectionRecord) -> Result<(), ProviderError>;
}

/// Pure system that requests content for every empty photo cell.
#[derive(Debug, Default)]
pub struct ContentAssignment {
    excluded: Vec<PhotoId>,
}

impl ContentAssignment {
    /// Creates a new assignment system.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            excluded: Vec::new(),
        }
    }

    /// Emits one `AttachContent` command per photo cell the provider can fill.
    ///
    /// Cells are visited in row-major order and each assigned photo is
    /// excluded from later requests, so a maze never shows the same photo
    /// twice. Cells the provider cannot fill stay decoration. Returns the
    /// number of commands emitted.
    pub fn handle<P>(
        &mut self,
        view: GridView<'_>,
        user: UserId,
        provider: &mut P,
        out: &mut Vec<Command>,
    ) -> usize
    where
        P: ContentProvider + ?Sized,
    {
        self.excluded.clear();
        let mut assigned = 0;

        for cell in view.cells_of_kind(CellKind::Photo) {
            if cell.content().is_some() {
                continue;
            }

            let content = match provider.next_unseen_photo(user, &self.excluded) {
                Ok(Some(content)) => content,
                Ok(None) => {
                    debug!("no unseen photo left for {:?}", cell.coord());
                    continue;
                }
                Err(error) => {
                    warn!("photo cell {:?} left empty: {error}", cell.coord());
                    continue;
                }
            };

            self.excluded.push(content.photo);
            out.push(Command::AttachContent {
                cell: cell.coord(),
                content,
            });
            assigned += 1;
        }

        assigned
    }
}

/// Forwards collection events to a [`CollectionSink`].
#[derive(Debug, Default)]
pub struct CollectionRelay {
    recorded: usize,
    failed: usize,
}

impl CollectionRelay {
    /// Creates a relay with zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            recorded: 0,
            failed: 0,
        }
    }

    /// Records every `PhotoCollected` event; sink failures are logged and skipped.
    pub fn handle<S>(&mut self, events: &[Event], sink: &mut S)
    where
        S: CollectionSink + ?Sized,
    {
        for event in events {
            let Event::PhotoCollected { photo, user, cell } = *event else {
                continue;
            };
            match sink.record(CollectionRecord::new(user, photo, cell)) {
                Ok(()) => self.recorded += 1,
                Err(error) => {
                    warn!("collection of photo {} not recorded: {error}", photo.get());
                    self.failed += 1;
                }
            }
        }
    }

    /// Number of collections accepted by the sink.
    #[must_use]
    pub const fn recorded(&self) -> usize {
        self.recorded
    }

    /// Number of collections the sink rejected.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use labyrinth_core::{CellGrid, Rgb};

    use super::*;

    struct Offline;

    impl ContentProvider for Offline {
        fn next_unseen_photo(
            &mut self,
            _user: UserId,
            _excluded: &[PhotoId],
        ) -> Result<Option<PhotoContent>, ProviderError> {
            Err(ProviderError::Unavailable("connection refused".to_owned()))
        }
    }

    fn photo_grid(cells: &[CellCoord]) -> CellGrid {
        let mut grid = CellGrid::new(3, 3);
        for cell in cells {
            grid.cell_mut(*cell).expect("cell").set_kind(CellKind::Photo);
        }
        grid
    }

    #[test]
    fn assignment_walks_photo_cells_in_row_major_order() {
        let grid = photo_grid(&[CellCoord::new(2, 0), CellCoord::new(0, 2)]);
        let mut library = PhotoLibrary::new();
        let first = library.add(Rgb::from_rgb(1, 1, 1));
        let second = library.add(Rgb::from_rgb(2, 2, 2));
        let mut commands = Vec::new();

        let assigned =
            ContentAssignment::new().handle(grid.view(), UserId::new(1), &mut library, &mut commands);

        assert_eq!(assigned, 2);
        let targets: Vec<(CellCoord, PhotoId)> = commands
            .iter()
            .filter_map(|command| match command {
                Command::AttachContent { cell, content } => Some((*cell, content.photo)),
                _ => None,
            })
            .collect();
        assert_eq!(
            targets,
            vec![(CellCoord::new(0, 2), first), (CellCoord::new(2, 0), second)]
        );
    }

    #[test]
    fn exhausted_library_leaves_remaining_cells_empty() {
        let grid = photo_grid(&[CellCoord::new(0, 1), CellCoord::new(1, 1)]);
        let mut library = PhotoLibrary::new();
        let _ = library.add(Rgb::from_rgb(9, 9, 9));
        let mut commands = Vec::new();

        let assigned =
            ContentAssignment::new().handle(grid.view(), UserId::new(1), &mut library, &mut commands);

        assert_eq!(assigned, 1);
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn provider_failure_is_not_fatal() {
        let grid = photo_grid(&[CellCoord::new(0, 0)]);
        let mut commands = Vec::new();

        let assigned =
            ContentAssignment::new().handle(grid.view(), UserId::new(1), &mut Offline, &mut commands);

        assert_eq!(assigned, 0);
        assert!(commands.is_empty());
    }

    #[test]
    fn relay_records_collections_and_counts_failures() {
        let mut library = PhotoLibrary::new();
        let known = library.add(Rgb::from_rgb(5, 5, 5));
        let user = UserId::new(3);
        let events = [
            Event::PhotoCollected {
                photo: known,
                user,
                cell: CellCoord::new(1, 1),
            },
            Event::ExitReached {
                cell: CellCoord::new(1, 1),
            },
            Event::PhotoCollected {
                photo: PhotoId::new(77),
                user,
                cell: CellCoord::new(2, 2),
            },
        ];
        let mut relay = CollectionRelay::new();

        relay.handle(&events, &mut library);

        assert_eq!(relay.recorded(), 1);
        assert_eq!(relay.failed(), 1);
        assert!(library.has_collected(user, known));
    }
}
