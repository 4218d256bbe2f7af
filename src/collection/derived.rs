//! Per-replica polarization products (angle, polarized flux, fractional
//! polarization) as new images that can go back into a collection.
use super::ImageCollection;
use crate::error::{Result, RmError};
use crate::image::{ImageF64, Mask, StokesImage};
use crate::polarization::{angle_map, flux_map, fractional_pol_map};
use crate::types::{FrequencyKey, ImageVariant, Stokes};

impl ImageCollection {
    /// Polarization angle map per replica of Q/U at `frequency`.
    pub fn create_pang_images(
        &self,
        frequency: Option<&FrequencyKey>,
        mask: Option<&Mask>,
        variant: ImageVariant,
    ) -> Result<Vec<StokesImage>> {
        self.derive(frequency, &[Stokes::Q, Stokes::U], Stokes::PolAngle, |planes| {
            angle_map(planes[0].values(variant), planes[1].values(variant), mask)
        })
    }

    /// Polarized flux map per replica of Q/U at `frequency`.
    pub fn create_pol_images(
        &self,
        frequency: Option<&FrequencyKey>,
        mask: Option<&Mask>,
        variant: ImageVariant,
    ) -> Result<Vec<StokesImage>> {
        self.derive(frequency, &[Stokes::Q, Stokes::U], Stokes::PolFlux, |planes| {
            flux_map(planes[0].values(variant), planes[1].values(variant), mask)
        })
    }

    /// Fractional polarization map per replica of I/Q/U at `frequency`.
    pub fn create_fpol_images(
        &self,
        frequency: Option<&FrequencyKey>,
        mask: Option<&Mask>,
        variant: ImageVariant,
    ) -> Result<Vec<StokesImage>> {
        self.derive(
            frequency,
            &[Stokes::Q, Stokes::U, Stokes::I],
            Stokes::FracPol,
            |planes| {
                fractional_pol_map(
                    planes[0].values(variant),
                    planes[1].values(variant),
                    planes[2].values(variant),
                    mask,
                )
            },
        )
    }

    /// Zip the replicas of `required` at one frequency and map each tuple.
    fn derive<F>(
        &self,
        frequency: Option<&FrequencyKey>,
        required: &[Stokes],
        product: Stokes,
        mut compute: F,
    ) -> Result<Vec<StokesImage>>
    where
        F: FnMut(&[&StokesImage]) -> Result<ImageF64>,
    {
        let frequency = self.resolve_frequency(frequency)?;
        let mut lists = Vec::with_capacity(required.len());
        for &stokes in required {
            let images = self.images_at(&frequency, stokes);
            if images.is_empty() {
                return Err(RmError::MissingStokes {
                    frequency: frequency.clone(),
                    stokes,
                });
            }
            lists.push(images);
        }
        let count = lists[0].len();
        for (stokes, list) in required.iter().zip(&lists).skip(1) {
            if list.len() != count {
                return Err(RmError::CountMismatch {
                    context: format!("{} vs {stokes} at {frequency}", required[0]),
                    left: count,
                    right: list.len(),
                });
            }
        }
        let mut out = Vec::with_capacity(count);
        let mut tuple = Vec::with_capacity(required.len());
        for replica in 0..count {
            tuple.clear();
            tuple.extend(lists.iter().map(|list| &list[replica]));
            let values = compute(&tuple)?;
            out.push(StokesImage::new(
                tuple[0].grid,
                frequency.clone(),
                product,
                values,
            )?);
        }
        Ok(out)
    }
}
