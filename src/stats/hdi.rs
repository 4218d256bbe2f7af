//! Highest-density-interval estimation from small samples.
//!
//! For a sample of `N` replica values and credible mass `m`, the HDI is the
//! shortest window of the sorted sample holding `ceil(m·N)` values. Its width
//! is the per-pixel bootstrap uncertainty.
use crate::error::{Result, RmError};
use crate::image::{ensure_shape, Cube, ImageF64, Mask};

// Absorbs products like 0.7 * 10 = 7.000000000000001 before the ceiling.
const MASS_EPS: f64 = 1e-9;

fn check_mass(mass: f64) -> Result<()> {
    if mass > 0.0 && mass <= 1.0 {
        Ok(())
    } else {
        Err(RmError::InvalidCredibleMass(mass))
    }
}

/// Number of sorted values an interval of credible mass `mass` must span.
#[inline]
fn window_len(mass: f64, n: usize) -> usize {
    let k = (mass * n as f64 - MASS_EPS).ceil() as usize;
    k.clamp(1, n)
}

/// `(low, high)` of the shortest interval holding `ceil(mass·N)` values.
///
/// Non-finite values are ignored; `None` when no finite value remains.
pub fn hdi_interval(sample: &[f64], mass: f64) -> Result<Option<(f64, f64)>> {
    check_mass(mass)?;
    let mut sorted: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
    Ok(interval_of_finite(&mut sorted, mass))
}

/// Width of the highest density interval, NaN when the sample has no finite values.
pub fn hdi_width(sample: &[f64], mass: f64) -> Result<f64> {
    Ok(hdi_interval(sample, mass)?
        .map(|(lo, hi)| hi - lo)
        .unwrap_or(f64::NAN))
}

fn interval_of_finite(values: &mut [f64], mass: f64) -> Option<(f64, f64)> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let k = window_len(mass, n);
    let mut best = (values[0], values[k - 1]);
    for i in 1..=n - k {
        let (lo, hi) = (values[i], values[i + k - 1]);
        if hi - lo < best.1 - best.0 {
            best = (lo, hi);
        }
    }
    Some(best)
}

/// Apply [`hdi_width`] along the trailing axis of `cube`.
pub(crate) fn hdi_width_cube(cube: &Cube, mass: f64, mask: Option<&Mask>) -> Result<ImageF64> {
    check_mass(mass)?;
    if let Some(mask) = mask {
        ensure_shape("mask", mask, cube.shape())?;
    }
    let mut out = ImageF64::filled(cube.w, cube.h, f64::NAN);
    let mut scratch = Vec::with_capacity(cube.depth);
    for pix in 0..cube.pixel_count() {
        if mask.is_some_and(|m| m.data[pix]) {
            continue;
        }
        scratch.clear();
        scratch.extend(cube.sample_at(pix).iter().copied().filter(|v| v.is_finite()));
        if let Some((lo, hi)) = interval_of_finite(&mut scratch, mass) {
            out.data[pix] = hi - lo;
        }
    }
    Ok(out)
}

/// HDI width per pixel over a list of equally shaped replica arrays.
pub fn hdi_width_map(replicas: &[ImageF64], mass: f64, mask: Option<&Mask>) -> Result<ImageF64> {
    let cube = Cube::from_planes(replicas)?;
    hdi_width_cube(&cube, mass, mask)
}
