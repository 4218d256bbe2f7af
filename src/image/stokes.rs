//! Grid-bound image of one Stokes parameter (or derived product) at one
//! frequency.
use super::{ensure_shape, ImageF64};
use crate::error::Result;
use crate::grid::PixelGrid;
use crate::types::{FrequencyKey, ImageVariant, Stokes};

/// Image as stored in an [`ImageCollection`](crate::ImageCollection).
///
/// The restored (beam-convolved) array and the optional raw model array are
/// kept as two separate fields; operations pick one with [`ImageVariant`].
#[derive(Clone, Debug, PartialEq)]
pub struct StokesImage {
    pub grid: PixelGrid,
    pub frequency: FrequencyKey,
    pub stokes: Stokes,
    restored: ImageF64,
    raw: Option<ImageF64>,
}

impl StokesImage {
    /// Bind a restored array to a grid, checking its shape.
    pub fn new(
        grid: PixelGrid,
        frequency: impl Into<FrequencyKey>,
        stokes: Stokes,
        restored: ImageF64,
    ) -> Result<Self> {
        ensure_shape("restored image", &restored, grid.image_size)?;
        Ok(Self {
            grid,
            frequency: frequency.into(),
            stokes,
            restored,
            raw: None,
        })
    }

    /// Attach the raw (unconvolved) model array.
    pub fn with_raw(mut self, raw: ImageF64) -> Result<Self> {
        ensure_shape("raw image", &raw, self.grid.image_size)?;
        self.raw = Some(raw);
        Ok(self)
    }

    pub fn restored(&self) -> &ImageF64 {
        &self.restored
    }

    pub fn raw(&self) -> Option<&ImageF64> {
        self.raw.as_ref()
    }

    /// Array for `variant`. A missing raw array falls back to the restored one.
    pub fn values(&self, variant: ImageVariant) -> &ImageF64 {
        match variant {
            ImageVariant::Restored => &self.restored,
            ImageVariant::Raw => self.raw.as_ref().unwrap_or(&self.restored),
        }
    }

    /// Replace the restored array in place; only the owning collection does this.
    pub(crate) fn replace_restored(&mut self, restored: ImageF64) -> Result<()> {
        ensure_shape("restored image", &restored, self.grid.image_size)?;
        self.restored = restored;
        Ok(())
    }
}
