//! Validated, ordered collection of grid-aligned images.
//!
//! Overview
//! - Images are keyed by frequency, then by Stokes label; each key holds an
//!   ordered list whose position `i` is bootstrap replica `i`.
//! - Frequencies iterate in ascending order; Stokes labels in insertion order.
//! - Every image in a collection shares one [`PixelGrid`]; `add_image`
//!   rejects a mismatching grid before touching the collection.
//! - Cubes are rebuilt from the stored images on every request, so they can
//!   never be stale with respect to a later `add_image`.
//!
//! Modules
//! - `derived` – per-replica angle / flux / fractional-polarization images.
//! - `error_image` – bootstrap HDI error maps over the replica axis.
//! - `rotm` – per-replica rotation-measure maps.
//! - `pixels` – profiles, region reductions and in-place pixelwise updates.

mod derived;
mod error_image;
mod pixels;
mod rotm;

pub use error_image::{ErrorImageParams, DEFAULT_CREDIBLE_MASS};
pub use pixels::{Reduce, Region};
pub use rotm::RotmOptions;

use crate::error::{Result, RmError};
use crate::grid::PixelGrid;
use crate::image::{Cube, StokesImage};
use crate::types::{FrequencyKey, ImageVariant, Stokes};
use std::collections::BTreeMap;

/// Optional frequency / Stokes choice. Omitted parts must be unambiguous.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    pub frequency: Option<FrequencyKey>,
    pub stokes: Option<Stokes>,
}

impl Selection {
    /// Let the collection pick the only frequency and Stokes label it holds.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn at(frequency: impl Into<FrequencyKey>, stokes: Stokes) -> Self {
        Self {
            frequency: Some(frequency.into()),
            stokes: Some(stokes),
        }
    }

    pub fn frequency(mut self, frequency: impl Into<FrequencyKey>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    pub fn stokes(mut self, stokes: Stokes) -> Self {
        self.stokes = Some(stokes);
        self
    }
}

#[derive(Clone, Debug)]
struct StokesEntry {
    stokes: Stokes,
    images: Vec<StokesImage>,
}

/// Two-level ordered map `frequency → Stokes → replicas`.
#[derive(Clone, Debug, Default)]
pub struct ImageCollection {
    grid: Option<PixelGrid>,
    entries: BTreeMap<FrequencyKey, Vec<StokesEntry>>,
    len: usize,
}

impl ImageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `image` after the images already stored at its key.
    ///
    /// Fails with [`RmError::GridMismatch`] if its grid differs from the
    /// collection's; the collection is unchanged in that case.
    pub fn add_image(&mut self, image: StokesImage) -> Result<()> {
        self.check_grid(&image.grid)?;
        self.grid.get_or_insert(image.grid);
        let stokes_entries = self.entries.entry(image.frequency.clone()).or_default();
        match stokes_entries.iter_mut().find(|e| e.stokes == image.stokes) {
            Some(entry) => entry.images.push(image),
            None => stokes_entries.push(StokesEntry {
                stokes: image.stokes,
                images: vec![image],
            }),
        }
        self.len += 1;
        Ok(())
    }

    /// Add images in order after checking that at least `min_count` were
    /// supplied and that all of them share the collection grid. Nothing is
    /// added if any check fails.
    pub fn add_images<I>(&mut self, images: I, min_count: usize) -> Result<()>
    where
        I: IntoIterator<Item = StokesImage>,
    {
        let images: Vec<StokesImage> = images.into_iter().collect();
        if images.len() < min_count {
            return Err(RmError::InsufficientInput {
                what: "images",
                required: min_count,
                actual: images.len(),
            });
        }
        let mut baseline = self.grid;
        for image in &images {
            match baseline {
                Some(grid) if grid != image.grid => {
                    return Err(RmError::GridMismatch {
                        expected: grid,
                        found: image.grid,
                    })
                }
                _ => baseline = Some(image.grid),
            }
        }
        for image in images {
            self.add_image(image)?;
        }
        Ok(())
    }

    fn check_grid(&self, grid: &PixelGrid) -> Result<()> {
        match self.grid {
            Some(expected) if expected != *grid => Err(RmError::GridMismatch {
                expected,
                found: *grid,
            }),
            _ => Ok(()),
        }
    }

    /// Grid shared by every stored image, `None` while empty.
    pub fn grid(&self) -> Option<&PixelGrid> {
        self.grid.as_ref()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Frequencies in ascending order.
    pub fn frequencies(&self) -> Vec<&FrequencyKey> {
        self.entries.keys().collect()
    }

    /// Stokes labels stored at `frequency`, in insertion order.
    pub fn stokes_at(&self, frequency: &FrequencyKey) -> Vec<Stokes> {
        self.entries
            .get(frequency)
            .map(|entries| entries.iter().map(|e| e.stokes).collect())
            .unwrap_or_default()
    }

    /// Replicas stored at `(frequency, stokes)`, empty if the key is absent.
    pub fn images_at(&self, frequency: &FrequencyKey, stokes: Stokes) -> &[StokesImage] {
        self.entries
            .get(frequency)
            .and_then(|entries| entries.iter().find(|e| e.stokes == stokes))
            .map(|e| e.images.as_slice())
            .unwrap_or(&[])
    }

    /// All images, by ascending frequency, then Stokes insertion order, then replica.
    pub fn images(&self) -> impl Iterator<Item = &StokesImage> + '_ {
        self.entries
            .values()
            .flat_map(|entries| entries.iter().flat_map(|e| e.images.iter()))
    }

    fn images_at_mut(&mut self, frequency: &FrequencyKey, stokes: Stokes) -> &mut [StokesImage] {
        self.entries
            .get_mut(frequency)
            .and_then(|entries| entries.iter_mut().find(|e| e.stokes == stokes))
            .map(|e| e.images.as_mut_slice())
            .unwrap_or(&mut [])
    }

    /// Resolve a frequency, defaulting to the only one present.
    pub(crate) fn resolve_frequency(&self, frequency: Option<&FrequencyKey>) -> Result<FrequencyKey> {
        if let Some(f) = frequency {
            return Ok(f.clone());
        }
        let mut keys = self.entries.keys();
        match (keys.next(), self.entries.len()) {
            (None, _) => Err(RmError::EmptyCollection {
                frequency: None,
                stokes: None,
            }),
            (Some(only), 1) => Ok(only.clone()),
            (Some(_), n) => Err(RmError::AmbiguousSelection {
                what: "frequency",
                candidates: n,
            }),
        }
    }

    /// Resolve `selection` to a concrete non-empty key.
    pub(crate) fn resolve(&self, selection: &Selection) -> Result<(FrequencyKey, Stokes)> {
        let frequency = self.resolve_frequency(selection.frequency.as_ref())?;
        let empty = || RmError::EmptyCollection {
            frequency: Some(frequency.clone()),
            stokes: selection.stokes,
        };
        let entries = self.entries.get(&frequency).ok_or_else(empty)?;
        let stokes = match selection.stokes {
            Some(s) => s,
            None => match entries.as_slice() {
                [] => return Err(empty()),
                [only] => only.stokes,
                many => {
                    return Err(RmError::AmbiguousSelection {
                        what: "stokes",
                        candidates: many.len(),
                    })
                }
            },
        };
        if self.images_at(&frequency, stokes).is_empty() {
            return Err(RmError::EmptyCollection {
                frequency: Some(frequency),
                stokes: Some(stokes),
            });
        }
        Ok((frequency, stokes))
    }

    /// Stack the replicas at the selected key, in insertion order.
    pub fn build_cube(&self, selection: &Selection, variant: ImageVariant) -> Result<Cube> {
        let (frequency, stokes) = self.resolve(selection)?;
        Cube::from_planes(
            self.images_at(&frequency, stokes)
                .iter()
                .map(|img| img.values(variant)),
        )
    }
}
