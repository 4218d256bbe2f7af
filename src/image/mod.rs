//! Pixel buffers: real and complex planes, masks, stacked cubes and the
//! grid-bound [`StokesImage`] the collection stores.
pub mod complex;
pub mod cube;
pub mod f64;
pub mod grid_map;
pub mod mask;
pub mod stokes;
pub mod traits;

pub use self::complex::ImageC64;
pub use self::cube::Cube;
pub use self::f64::ImageF64;
pub use self::grid_map::{ErrorMap, GridMap, RmEstimate};
pub use self::mask::Mask;
pub use self::stokes::StokesImage;
pub use self::traits::{ImageView, ImageViewMut, Rows};

use crate::error::{Result, RmError};

/// Fail with [`RmError::ShapeMismatch`] unless `image` is `expected` in size.
pub(crate) fn ensure_shape<I: ImageView>(
    what: &'static str,
    image: &I,
    expected: (usize, usize),
) -> Result<()> {
    if image.shape() == expected {
        Ok(())
    } else {
        Err(RmError::ShapeMismatch {
            what,
            expected,
            found: image.shape(),
        })
    }
}
