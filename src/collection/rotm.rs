//! Per-replica rotation-measure maps built from the Q/U images of several
//! frequencies.
use super::ImageCollection;
use crate::error::{Result, RmError};
use crate::grid::PixelGrid;
use crate::image::{ErrorMap, GridMap, ImageF64, Mask, RmEstimate, StokesImage};
use crate::polarization::angle_map;
use crate::rm::{RmMapBuilder, RmMapParams, RmMaps};
use crate::types::{Frequency, FrequencyKey, ImageVariant, Stokes};
use log::debug;

/// Inputs of [`ImageCollection::create_rotm_image`] beyond the replica index.
#[derive(Clone, Debug, Default)]
pub struct RotmOptions<'a> {
    /// Frequencies (Hz) to fit; all single-frequency keys when `None`.
    pub frequencies: Option<&'a [f64]>,
    /// One angle-uncertainty map (rad) per fitted frequency, in the same order.
    pub angle_uncertainties: Option<&'a [ImageF64]>,
    pub mask: Option<&'a Mask>,
    pub variant: ImageVariant,
    pub params: RmMapParams,
}

impl<'a> RotmOptions<'a> {
    pub fn frequencies(mut self, frequencies: &'a [f64]) -> Self {
        self.frequencies = Some(frequencies);
        self
    }

    pub fn angle_uncertainties(mut self, maps: &'a [ImageF64]) -> Self {
        self.angle_uncertainties = Some(maps);
        self
    }

    pub fn mask(mut self, mask: &'a Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn variant(mut self, variant: ImageVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn params(mut self, params: RmMapParams) -> Self {
        self.params = params;
        self
    }
}

/// Validated Q/U replica lists for one fit.
struct RotmInputs<'c> {
    grid: PixelGrid,
    hz: Vec<f64>,
    q: Vec<&'c [StokesImage]>,
    u: Vec<&'c [StokesImage]>,
}

impl RotmInputs<'_> {
    fn replica_count(&self) -> usize {
        self.q.first().map_or(0, |q| q.len())
    }
}

impl ImageCollection {
    /// Fit one RM map from replica `replica` of every frequency's Q and U.
    ///
    /// Returns the RM map and its formal 1σ uncertainty map.
    pub fn create_rotm_image(
        &self,
        options: &RotmOptions<'_>,
        replica: usize,
    ) -> Result<(RmEstimate, ErrorMap)> {
        let inputs = self.rotm_inputs(options)?;
        let count = inputs.replica_count();
        if replica >= count {
            return Err(RmError::ReplicaOutOfRange {
                index: replica,
                count,
            });
        }
        let maps = fit_replica(&inputs, options, replica)?;
        Ok((
            GridMap {
                grid: inputs.grid,
                values: maps.rm,
            },
            GridMap {
                grid: inputs.grid,
                values: maps.rm_error,
            },
        ))
    }

    /// Fit every replica and collect the RM maps into a new collection keyed
    /// by the fitted frequency tuple and [`Stokes::RotationMeasure`].
    ///
    /// Every frequency must hold the same number of replicas.
    pub fn create_rotm_images(&self, options: &RotmOptions<'_>) -> Result<ImageCollection> {
        let inputs = self.rotm_inputs(options)?;
        let count = inputs.replica_count();
        for (hz, q) in inputs.hz.iter().zip(&inputs.q) {
            if q.len() != count {
                return Err(RmError::CountMismatch {
                    context: format!("replicas at {} vs {}", Frequency(*hz), Frequency(inputs.hz[0])),
                    left: q.len(),
                    right: count,
                });
            }
        }
        let key = FrequencyKey::Composite(inputs.hz.iter().copied().map(Frequency).collect());
        let mut out = ImageCollection::new();
        for replica in 0..count {
            let maps = fit_replica(&inputs, options, replica)?;
            debug!(
                "RM replica {}/{}: fitted={} failed={} masked={}",
                replica + 1,
                count,
                maps.report.fitted,
                maps.report.failed,
                maps.report.masked
            );
            out.add_image(StokesImage::new(
                inputs.grid,
                key.clone(),
                Stokes::RotationMeasure,
                maps.rm,
            )?)?;
        }
        Ok(out)
    }

    fn rotm_inputs(&self, options: &RotmOptions<'_>) -> Result<RotmInputs<'_>> {
        let hz: Vec<f64> = match options.frequencies {
            Some(freqs) => freqs.to_vec(),
            None => self
                .frequencies()
                .into_iter()
                .filter_map(FrequencyKey::as_single)
                .map(Frequency::hz)
                .collect(),
        };
        if hz.len() < 2 {
            return Err(RmError::InsufficientInput {
                what: "frequencies for RM map",
                required: 2,
                actual: hz.len(),
            });
        }
        if let Some(sigmas) = options.angle_uncertainties {
            if sigmas.len() != hz.len() {
                return Err(RmError::CountMismatch {
                    context: "angle uncertainty maps vs frequencies".to_string(),
                    left: sigmas.len(),
                    right: hz.len(),
                });
            }
        }
        let mut q = Vec::with_capacity(hz.len());
        let mut u = Vec::with_capacity(hz.len());
        for &f in &hz {
            let key = FrequencyKey::single(f);
            let q_images = self.images_at(&key, Stokes::Q);
            let u_images = self.images_at(&key, Stokes::U);
            for (images, stokes) in [(q_images, Stokes::Q), (u_images, Stokes::U)] {
                if images.is_empty() {
                    return Err(RmError::MissingStokes {
                        frequency: key.clone(),
                        stokes,
                    });
                }
            }
            if q_images.len() != u_images.len() {
                return Err(RmError::CountMismatch {
                    context: format!("Q vs U at {key}"),
                    left: q_images.len(),
                    right: u_images.len(),
                });
            }
            q.push(q_images);
            u.push(u_images);
        }
        let grid = *self.grid().ok_or(RmError::EmptyCollection {
            frequency: None,
            stokes: None,
        })?;
        Ok(RotmInputs { grid, hz, q, u })
    }
}

fn fit_replica(inputs: &RotmInputs<'_>, options: &RotmOptions<'_>, replica: usize) -> Result<RmMaps> {
    let mut angles = Vec::with_capacity(inputs.hz.len());
    for (q, u) in inputs.q.iter().zip(&inputs.u) {
        let (Some(q), Some(u)) = (q.get(replica), u.get(replica)) else {
            return Err(RmError::ReplicaOutOfRange {
                index: replica,
                count: q.len().min(u.len()),
            });
        };
        angles.push(angle_map(
            q.values(options.variant),
            u.values(options.variant),
            options.mask,
        )?);
    }
    RmMapBuilder::new(options.params.clone()).build_from_maps(
        &inputs.hz,
        &angles,
        options.angle_uncertainties,
        options.mask,
    )
}
