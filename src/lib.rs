#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod collection;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod image;
pub mod polarization;
pub mod rm;
pub mod stats;
pub mod types;

// Run configuration and report output for tools.
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

// Main entry points: the collection and the per-pixel engines behind it.
pub use crate::collection::{ImageCollection, RotmOptions, Selection};
pub use crate::error::{Result, RmError};
pub use crate::grid::PixelGrid;
pub use crate::image::{ErrorMap, GridMap, RmEstimate, StokesImage};
pub use crate::rm::{fit_rm, RmFit, RmFitParams, RmMapBuilder, RmMapParams, RmMaps, UnwrapMode};
pub use crate::stats::{hdi_width, hdi_width_map};

// Diagnostics returned alongside RM maps.
pub use crate::diagnostics::{RmMapReport, TimingBreakdown};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use rm_bootstrap::prelude::*;
///
/// # fn main() -> rm_bootstrap::Result<()> {
/// let grid = PixelGrid::new(64, 64);
/// let mut images = ImageCollection::new();
/// for hz in [4.6e9, 5.0e9, 8.1e9, 8.4e9] {
///     for stokes in [Stokes::Q, Stokes::U] {
///         let plane = ImageF64::filled(64, 64, 0.1);
///         images.add_image(StokesImage::new(grid, hz, stokes, plane)?)?;
///     }
/// }
///
/// let (rm, rm_error) = images.create_rotm_image(&RotmOptions::default(), 0)?;
/// println!("rm[32,32]={:.2} ± {:.2}", rm.get(32, 32), rm_error.get(32, 32));
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{ImageF64, Mask};
    pub use crate::types::{FrequencyKey, ImageVariant, Stokes};
    pub use crate::{
        ImageCollection, PixelGrid, RmError, RmMapBuilder, RotmOptions, Selection, StokesImage,
    };
}
