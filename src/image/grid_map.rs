//! Grid-aligned output map (RM estimate, RM uncertainty, bootstrap error).
use super::{ImageF64, StokesImage};
use crate::error::Result;
use crate::grid::PixelGrid;
use crate::types::{FrequencyKey, Stokes};

/// A value array bound to the grid it was computed on. NaN marks pixels that
/// were masked, failed, or had no usable replicas.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMap {
    pub grid: PixelGrid,
    pub values: ImageF64,
}

/// Rotation measure map (rad/m²).
pub type RmEstimate = GridMap;
/// Per-pixel uncertainty map, in the units of the quantity it describes.
pub type ErrorMap = GridMap;

impl GridMap {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values.get(x, y)
    }

    /// Wrap as a collection image so it can be stacked with other replicas.
    pub fn into_stokes_image(
        self,
        frequency: impl Into<FrequencyKey>,
        stokes: Stokes,
    ) -> Result<StokesImage> {
        StokesImage::new(self.grid, frequency, stokes, self.values)
    }
}
