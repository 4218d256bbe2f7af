//! Bootstrap error maps: HDI width along the replica axis of any stacked
//! quantity (RM, flux, intensity, ...).
use super::{ImageCollection, Selection};
use crate::error::{Result, RmError};
use crate::image::{ensure_shape, ErrorMap, GridMap, Mask};
use crate::stats::hdi::hdi_width_cube;
use crate::types::ImageVariant;
use log::debug;
use serde::Deserialize;

/// Credible mass used when none is given (one-sigma equivalent).
pub const DEFAULT_CREDIBLE_MASS: f64 = 0.68;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ErrorImageParams {
    pub credible_mass: f64,
    pub variant: ImageVariant,
}

impl Default for ErrorImageParams {
    fn default() -> Self {
        Self {
            credible_mass: DEFAULT_CREDIBLE_MASS,
            variant: ImageVariant::Restored,
        }
    }
}

impl ImageCollection {
    /// HDI width per pixel over the replicas at `selection`.
    ///
    /// Masked pixels and pixels without a finite replica value are NaN.
    pub fn create_error_image(
        &self,
        selection: &Selection,
        credible_mass: f64,
        mask: Option<&Mask>,
    ) -> Result<ErrorMap> {
        self.create_error_image_with(
            selection,
            &ErrorImageParams {
                credible_mass,
                ..Default::default()
            },
            mask,
        )
    }

    pub fn create_error_image_with(
        &self,
        selection: &Selection,
        params: &ErrorImageParams,
        mask: Option<&Mask>,
    ) -> Result<ErrorMap> {
        let (frequency, stokes) = self.resolve(selection)?;
        let grid = *self.grid().ok_or(RmError::EmptyCollection {
            frequency: None,
            stokes: None,
        })?;
        if let Some(mask) = mask {
            ensure_shape("mask", mask, grid.image_size)?;
        }
        let cube = self.build_cube(
            &Selection::at(frequency.clone(), stokes),
            params.variant,
        )?;
        let values = hdi_width_cube(&cube, params.credible_mass, mask)?;
        debug!(
            "error image at {frequency} / {stokes}: {} replicas, mass {:.3}, {} finite px",
            cube.depth,
            params.credible_mass,
            values.count_finite()
        );
        Ok(GridMap { grid, values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::PixelGrid;
    use crate::image::{ImageF64, StokesImage};
    use crate::types::Stokes;

    fn collection_with(values: &[f64]) -> ImageCollection {
        let grid = PixelGrid::new(3, 2);
        let mut images = ImageCollection::new();
        for &v in values {
            let img = StokesImage::new(grid, 5e9, Stokes::PolFlux, ImageF64::filled(3, 2, v)).unwrap();
            images.add_image(img).unwrap();
        }
        images
    }

    #[test]
    fn single_replica_gives_zero_error() {
        let images = collection_with(&[1.25]);
        for mass in [0.1, 0.68, 1.0] {
            let err = images.create_error_image(&Selection::any(), mass, None).unwrap();
            assert!(err.values.data.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn full_mass_is_the_replica_range() {
        let images = collection_with(&[2.0, -1.0, 0.5, 4.0]);
        let err = images.create_error_image(&Selection::any(), 1.0, None).unwrap();
        assert_eq!(err.get(2, 1), 5.0);
        assert_eq!(err.grid, PixelGrid::new(3, 2));
    }

    #[test]
    fn masked_pixels_are_nan() {
        let images = collection_with(&[0.0, 1.0, 2.0]);
        let mut mask = Mask::none(3, 2);
        mask.set(0, 0, true);
        let err = images
            .create_error_image(&Selection::any(), DEFAULT_CREDIBLE_MASS, Some(&mask))
            .unwrap();
        assert!(err.get(0, 0).is_nan());
        assert_eq!(err.values.count_finite(), 5);

        let wrong = Mask::none(2, 2);
        assert!(matches!(
            images.create_error_image(&Selection::any(), 0.68, Some(&wrong)),
            Err(RmError::ShapeMismatch { .. })
        ));
    }
}
