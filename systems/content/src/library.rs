use std::collections::{BTreeMap, BTreeSet};

use labyrinth_core::{PhotoContent, PhotoId, Rgb, UserId};
use log::debug;

use crate::{palette, CollectionRecord, CollectionSink, ContentProvider, ProviderError};

/// In-memory photo catalogue that also remembers who collected what.
///
/// Photos are offered in insertion order. A photo a user has collected is
/// never offered to that user again.
#[derive(Clone, Debug, Default)]
pub struct PhotoLibrary {
    photos: Vec<PhotoContent>,
    collected: BTreeMap<UserId, BTreeSet<PhotoId>>,
    next_id: u64,
}

impl PhotoLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a photo with a known representative color.
    pub fn add(&mut self, color: Rgb) -> PhotoId {
        let photo = PhotoId::new(self.next_id);
        self.next_id += 1;
        self.photos.push(PhotoContent::new(photo, color));
        photo
    }

    /// Registers a photo, deriving its representative color from pixel data.
    pub fn add_image(&mut self, pixels: &[Rgb]) -> Result<PhotoId, ProviderError> {
        let color = palette::dominant_color(pixels).ok_or(ProviderError::EmptyImage)?;
        let photo = self.add(color);
        debug!("photo {} registered with color {}", photo.get(), color.to_hex());
        Ok(photo)
    }

    /// Number of photos in the library.
    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// Reports whether the library holds no photos.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Content registered under the provided identifier.
    #[must_use]
    pub fn photo(&self, photo: PhotoId) -> Option<PhotoContent> {
        self.photos
            .iter()
            .find(|content| content.photo == photo)
            .copied()
    }

    /// Reports whether `user` has already collected `photo`.
    #[must_use]
    pub fn has_collected(&self, user: UserId, photo: PhotoId) -> bool {
        self.collected
            .get(&user)
            .map_or(false, |photos| photos.contains(&photo))
    }

    /// Photos collected by `user`, in identifier order.
    pub fn collected_by(&self, user: UserId) -> impl Iterator<Item = PhotoId> + '_ {
        self.collected.get(&user).into_iter().flatten().copied()
    }
}

impl ContentProvider for PhotoLibrary {
    fn next_unseen_photo(
        &mut self,
        user: UserId,
        excluded: &[PhotoId],
    ) -> Result<Option<PhotoContent>, ProviderError> {
        Ok(self
            .photos
            .iter()
            .find(|content| {
                !excluded.contains(&content.photo) && !self.has_collected(user, content.photo)
            })
            .copied())
    }
}

impl CollectionSink for PhotoLibrary {
    fn record(&mut self, record: CollectionRecord) -> Result<(), ProviderError> {
        if self.photo(record.photo).is_none() {
            return Err(ProviderError::UnknownPhoto(record.photo));
        }
        let _ = self
            .collected
            .entry(record.user)
            .or_default()
            .insert(record.photo);
        Ok(())
    }
}
