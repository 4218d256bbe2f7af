//! Closed-form weighted least-squares fit of `chi(λ²) = RM·λ² + chi0`.
//!
//! The normal equations are accumulated around the initial guess and solved
//! once; for this linear model that single Gauss–Newton step is the exact
//! least-squares optimum. Residuals are weighted by `1/σ` when uncertainties
//! are given (normal-equation weights `1/σ²`).
use super::params::{RmFitParams, UnwrapMode};
use super::unwrap::unwrap_in_place;
use crate::error::{Result, RmError};
use crate::types::Frequency;
use nalgebra::{Matrix2, Vector2};
use serde::Serialize;

// Relative determinant floor below which λ² values are treated as degenerate.
const SINGULAR_EPS: f64 = 1e-12;

/// Result of a single-pixel RM fit.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RmFit {
    /// Rotation measure (rad/m²).
    pub rm: f64,
    /// Angle at zero wavelength (rad).
    pub chi0: f64,
    /// Covariance of `(rm, chi0)`; `None` when there are no spare degrees of freedom.
    pub covariance: Option<Matrix2<f64>>,
    /// Weighted sum of squared residuals.
    pub residual_sum_sq: f64,
    pub samples: usize,
}

impl RmFit {
    /// One-sigma RM uncertainty `sqrt(cov[0,0])`.
    pub fn rm_error(&self) -> Option<f64> {
        self.covariance.map(|c| c[(0, 0)].sqrt())
    }

    pub fn chi0_error(&self) -> Option<f64> {
        self.covariance.map(|c| c[(1, 1)].sqrt())
    }

    /// Model angle at frequency `hz`.
    pub fn predict(&self, hz: f64) -> f64 {
        self.rm * Frequency(hz).lambda_sq() + self.chi0
    }
}

#[derive(Default)]
struct NormalEquationAccum {
    a11: f64,
    a12: f64,
    a22: f64,
    b1: f64,
    b2: f64,
}

impl NormalEquationAccum {
    #[inline]
    fn accumulate(&mut self, x: f64, r: f64, w: f64) {
        self.a11 += w * x * x;
        self.a12 += w * x;
        self.a22 += w;
        self.b1 += w * x * r;
        self.b2 += w * r;
    }

    fn matrix(&self) -> Matrix2<f64> {
        Matrix2::new(self.a11, self.a12, self.a12, self.a22)
    }

    fn rhs(&self) -> Vector2<f64> {
        Vector2::new(self.b1, self.b2)
    }

    fn is_degenerate(&self) -> bool {
        let det = self.a11 * self.a22 - self.a12 * self.a12;
        !(det > SINGULAR_EPS * self.a11 * self.a22)
    }
}

/// Fit RM and chi0 to one pixel's angles.
///
/// `frequencies` (Hz), `angles` (rad) and optional `sigmas` (rad) are aligned
/// by index in the caller's order. Any malformed input or a singular system
/// yields [`RmError::FitConvergence`].
pub fn fit_rm(
    frequencies: &[f64],
    angles: &[f64],
    sigmas: Option<&[f64]>,
    params: &RmFitParams,
) -> Result<RmFit> {
    let n = angles.len();
    if frequencies.len() != n {
        return Err(RmError::fit(format!(
            "{} frequencies for {n} angles",
            frequencies.len()
        )));
    }
    if let Some(s) = sigmas {
        if s.len() != n {
            return Err(RmError::fit(format!("{} uncertainties for {n} angles", s.len())));
        }
    }
    if n < 2 {
        return Err(RmError::fit(format!("{n} samples for 2 parameters")));
    }
    if let Some(bad) = frequencies.iter().find(|f| !(f.is_finite() && **f > 0.0)) {
        return Err(RmError::fit(format!("invalid frequency {bad}")));
    }
    if angles.iter().any(|a| !a.is_finite()) {
        return Err(RmError::fit("non-finite angle"));
    }

    let weights: Vec<f64> = match sigmas {
        Some(s) => {
            if let Some(bad) = s.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
                return Err(RmError::fit(format!("invalid angle uncertainty {bad}")));
            }
            s.iter().map(|v| 1.0 / (v * v)).collect()
        }
        None => vec![1.0; n],
    };

    let mut chis = angles.to_vec();
    if params.unwrap == UnwrapMode::Greedy {
        unwrap_in_place(&mut chis);
    }
    let lambda_sq: Vec<f64> = frequencies.iter().map(|&f| Frequency(f).lambda_sq()).collect();

    let (rm0, chi0_0) = params.initial_guess;
    let mut accum = NormalEquationAccum::default();
    for i in 0..n {
        let r = chis[i] - (rm0 * lambda_sq[i] + chi0_0);
        accum.accumulate(lambda_sq[i], r, weights[i]);
    }
    if accum.is_degenerate() {
        return Err(RmError::fit("singular normal equations (degenerate wavelengths)"));
    }
    let normal_inv = accum
        .matrix()
        .try_inverse()
        .ok_or_else(|| RmError::fit("normal matrix not invertible"))?;
    let step = normal_inv * accum.rhs();
    let rm = rm0 + step[0];
    let chi0 = chi0_0 + step[1];

    let residual_sum_sq: f64 = (0..n)
        .map(|i| {
            let r = chis[i] - (rm * lambda_sq[i] + chi0);
            weights[i] * r * r
        })
        .sum();
    if !(rm.is_finite() && chi0.is_finite() && residual_sum_sq.is_finite()) {
        return Err(RmError::fit("non-finite solution"));
    }

    let covariance = if n > 2 {
        let scale_by_residuals = sigmas.is_none() || params.scale_weighted_covariance;
        let scale = if scale_by_residuals {
            residual_sum_sq / (n - 2) as f64
        } else {
            1.0
        };
        Some(normal_inv * scale)
    } else {
        None
    };

    Ok(RmFit {
        rm,
        chi0,
        covariance,
        residual_sum_sq,
        samples: n,
    })
}
