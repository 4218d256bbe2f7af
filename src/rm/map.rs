//! Pixelwise RM map construction over a frequency-stacked angle cube.
//!
//! Every unmasked pixel is fitted independently from its angle (and optional
//! uncertainty) vector. A failed fit only blanks its own pixel. With the
//! `parallel` feature the pixels fan out over rayon; the cubes are built
//! before dispatch and only read afterwards, so results are merged by index
//! without locking.
use super::fit::fit_rm;
use super::params::RmMapParams;
use crate::diagnostics::RmMapReport;
use crate::error::{Result, RmError};
use crate::image::{ensure_shape, Cube, ImageF64, Mask};
use log::{debug, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// RM value, RM uncertainty and intercept maps with the run report.
#[derive(Clone, Debug)]
pub struct RmMaps {
    /// Rotation measure (rad/m²); NaN where masked or failed.
    pub rm: ImageF64,
    /// `sqrt(cov[0,0])`; additionally NaN where the covariance is undefined.
    pub rm_error: ImageF64,
    /// Angle at zero wavelength (rad).
    pub chi0: ImageF64,
    pub report: RmMapReport,
}

enum PixelOutcome {
    Masked,
    Fitted {
        rm: f64,
        chi0: f64,
        rm_error: Option<f64>,
    },
    Failed,
    Skipped,
}

/// Runs the RM fitter over a masked grid.
#[derive(Clone, Debug, Default)]
pub struct RmMapBuilder {
    params: RmMapParams,
}

impl RmMapBuilder {
    pub fn new(params: RmMapParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RmMapParams {
        &self.params
    }

    /// Fit every pixel of `angles` (one plane per entry of `frequencies`).
    pub fn build(
        &self,
        frequencies: &[f64],
        angles: &Cube,
        uncertainties: Option<&Cube>,
        mask: Option<&Mask>,
    ) -> Result<RmMaps> {
        let never = AtomicBool::new(false);
        self.build_with_cancel(frequencies, angles, uncertainties, mask, &never)
    }

    /// Stack per-frequency angle maps (and uncertainty maps) and fit them.
    pub fn build_from_maps(
        &self,
        frequencies: &[f64],
        angle_maps: &[ImageF64],
        uncertainty_maps: Option<&[ImageF64]>,
        mask: Option<&Mask>,
    ) -> Result<RmMaps> {
        let angles = Cube::from_planes(angle_maps)?;
        let uncertainties = uncertainty_maps
            .map(|maps| Cube::from_planes(maps))
            .transpose()?;
        self.build(frequencies, &angles, uncertainties.as_ref(), mask)
    }

    /// Like [`build`](Self::build) but stops dispatching new pixels once
    /// `cancel` is set.
    ///
    /// A cancelled run fails with [`RmError::Cancelled`] unless
    /// `best_effort` is enabled, in which case the partial maps are returned
    /// with `report.cancelled` set.
    pub fn build_with_cancel(
        &self,
        frequencies: &[f64],
        angles: &Cube,
        uncertainties: Option<&Cube>,
        mask: Option<&Mask>,
        cancel: &AtomicBool,
    ) -> Result<RmMaps> {
        validate_inputs(frequencies, angles, uncertainties, mask)?;
        let start = Instant::now();
        let fit_params = &self.params.fit;
        let total = angles.pixel_count();

        let fit_pixel = |pix: usize| -> PixelOutcome {
            if cancel.load(Ordering::Relaxed) {
                return PixelOutcome::Skipped;
            }
            if mask.is_some_and(|m| m.data[pix]) {
                return PixelOutcome::Masked;
            }
            let sigmas = uncertainties.map(|c| c.sample_at(pix));
            match fit_rm(frequencies, angles.sample_at(pix), sigmas, fit_params) {
                Ok(fit) => PixelOutcome::Fitted {
                    rm: fit.rm,
                    chi0: fit.chi0,
                    rm_error: fit.rm_error(),
                },
                Err(err) => {
                    trace!("RM fit failed at pixel {pix}: {err}");
                    PixelOutcome::Failed
                }
            }
        };

        #[cfg(feature = "parallel")]
        let outcomes: Vec<PixelOutcome> = (0..total).into_par_iter().map(fit_pixel).collect();
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<PixelOutcome> = (0..total).map(fit_pixel).collect();

        let (w, h) = angles.shape();
        let mut rm = ImageF64::filled(w, h, f64::NAN);
        let mut rm_error = ImageF64::filled(w, h, f64::NAN);
        let mut chi0 = ImageF64::filled(w, h, f64::NAN);
        let mut report = RmMapReport {
            width: w,
            height: h,
            frequencies: frequencies.len(),
            total_pixels: total,
            ..Default::default()
        };
        for (pix, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                PixelOutcome::Masked => report.masked += 1,
                PixelOutcome::Failed => report.failed += 1,
                PixelOutcome::Skipped => report.skipped += 1,
                PixelOutcome::Fitted {
                    rm: value,
                    chi0: intercept,
                    rm_error: sigma,
                } => {
                    report.fitted += 1;
                    rm.data[pix] = value;
                    chi0.data[pix] = intercept;
                    match sigma {
                        Some(s) => rm_error.data[pix] = s,
                        None => report.undefined_covariance += 1,
                    }
                }
            }
        }
        report.cancelled = report.skipped > 0;
        report.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "RmMapBuilder: {}x{} px, {} freqs: fitted={} masked={} failed={} undefined_cov={} skipped={} in {:.2} ms",
            w,
            h,
            frequencies.len(),
            report.fitted,
            report.masked,
            report.failed,
            report.undefined_covariance,
            report.skipped,
            report.elapsed_ms
        );

        if report.cancelled && !self.params.best_effort {
            return Err(RmError::Cancelled {
                completed: total - report.skipped,
                total,
            });
        }
        Ok(RmMaps {
            rm,
            rm_error,
            chi0,
            report,
        })
    }
}

fn validate_inputs(
    frequencies: &[f64],
    angles: &Cube,
    uncertainties: Option<&Cube>,
    mask: Option<&Mask>,
) -> Result<()> {
    if frequencies.len() < 2 {
        return Err(RmError::InsufficientInput {
            what: "frequencies for RM fit",
            required: 2,
            actual: frequencies.len(),
        });
    }
    if angles.depth != frequencies.len() {
        return Err(RmError::CountMismatch {
            context: "angle planes vs frequencies".to_string(),
            left: angles.depth,
            right: frequencies.len(),
        });
    }
    if let Some(sigma) = uncertainties {
        if sigma.shape() != angles.shape() {
            return Err(RmError::ShapeMismatch {
                what: "angle uncertainty cube",
                expected: angles.shape(),
                found: sigma.shape(),
            });
        }
        if sigma.depth != angles.depth {
            return Err(RmError::CountMismatch {
                context: "angle uncertainty planes vs frequencies".to_string(),
                left: sigma.depth,
                right: angles.depth,
            });
        }
    }
    if let Some(mask) = mask {
        ensure_shape("mask", mask, angles.shape())?;
    }
    Ok(())
}
