//! Elementwise polarization products derived from Stokes Q, U and I planes.
//!
//! All map functions take an optional grid-aligned [`Mask`]; masked pixels
//! come out NaN rather than zero. Inputs must share one shape.
use crate::error::Result;
use crate::image::{ensure_shape, ImageC64, ImageF64, ImageView, Mask};
use num_complex::Complex64;

/// Polarization position angle `0.5·atan2(U, Q)` in radians.
#[inline]
pub fn angle(q: f64, u: f64) -> f64 {
    0.5 * u.atan2(q)
}

/// Polarized flux `|Q + iU|`.
#[inline]
pub fn flux(q: f64, u: f64) -> f64 {
    Complex64::new(q, u).norm()
}

/// Fractional polarization `|Q + iU| / I`; NaN when `I == 0`.
#[inline]
pub fn fractional_pol(q: f64, u: f64, i: f64) -> f64 {
    if i == 0.0 {
        return f64::NAN;
    }
    flux(q, u) / i
}

pub fn angle_map(q: &ImageF64, u: &ImageF64, mask: Option<&Mask>) -> Result<ImageF64> {
    map2(q, u, mask, angle)
}

/// Complex polarization `Q + iU`; masked pixels are `NaN + iNaN`.
pub fn complex_pol_map(q: &ImageF64, u: &ImageF64, mask: Option<&Mask>) -> Result<ImageC64> {
    check_inputs(&[q, u], mask)?;
    let data = q
        .data
        .iter()
        .zip(&u.data)
        .enumerate()
        .map(|(pix, (&qv, &uv))| {
            if is_masked(mask, pix) {
                Complex64::new(f64::NAN, f64::NAN)
            } else {
                Complex64::new(qv, uv)
            }
        })
        .collect();
    Ok(ImageC64 {
        w: q.w,
        h: q.h,
        data,
    })
}

pub fn flux_map(q: &ImageF64, u: &ImageF64, mask: Option<&Mask>) -> Result<ImageF64> {
    Ok(complex_pol_map(q, u, mask)?.norm())
}

pub fn fractional_pol_map(
    q: &ImageF64,
    u: &ImageF64,
    i: &ImageF64,
    mask: Option<&Mask>,
) -> Result<ImageF64> {
    check_inputs(&[q, u, i], mask)?;
    let data = (0..q.data.len())
        .map(|pix| {
            if is_masked(mask, pix) {
                f64::NAN
            } else {
                fractional_pol(q.data[pix], u.data[pix], i.data[pix])
            }
        })
        .collect();
    Ok(ImageF64 {
        w: q.w,
        h: q.h,
        data,
    })
}

fn map2(
    a: &ImageF64,
    b: &ImageF64,
    mask: Option<&Mask>,
    f: impl Fn(f64, f64) -> f64,
) -> Result<ImageF64> {
    check_inputs(&[a, b], mask)?;
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .enumerate()
        .map(|(pix, (&av, &bv))| {
            if is_masked(mask, pix) {
                f64::NAN
            } else {
                f(av, bv)
            }
        })
        .collect();
    Ok(ImageF64 {
        w: a.w,
        h: a.h,
        data,
    })
}

fn check_inputs(planes: &[&ImageF64], mask: Option<&Mask>) -> Result<()> {
    let Some(first) = planes.first() else {
        return Ok(());
    };
    let shape = first.shape();
    for plane in &planes[1..] {
        ensure_shape("Stokes plane", *plane, shape)?;
    }
    if let Some(mask) = mask {
        ensure_shape("mask", mask, shape)?;
    }
    Ok(())
}

#[inline]
fn is_masked(mask: Option<&Mask>, pix: usize) -> bool {
    mask.is_some_and(|m| m.data[pix])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RmError;
    use std::f64::consts::FRAC_PI_4;

    #[test]
    fn angle_is_half_the_qu_phase() {
        assert!((angle(1.0, 1.0) - FRAC_PI_4 / 2.0).abs() < 1e-12);
        assert!((angle(0.0, 1.0) - FRAC_PI_4).abs() < 1e-12);
        assert!((angle(-1.0, 0.0) - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn fractional_pol_with_zero_intensity_is_nan() {
        assert!(fractional_pol(1.0, 0.0, 0.0).is_nan());
        assert!((fractional_pol(3.0, 4.0, 10.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn masked_pixels_are_nan_not_zero() {
        let q = ImageF64::filled(2, 2, 3.0);
        let u = ImageF64::filled(2, 2, 4.0);
        let mut mask = Mask::none(2, 2);
        mask.set(1, 0, true);

        let pol = flux_map(&q, &u, Some(&mask)).unwrap();
        assert!(pol.get(1, 0).is_nan());
        assert!((pol.get(0, 0) - 5.0).abs() < 1e-12);

        let pang = angle_map(&q, &u, Some(&mask)).unwrap();
        assert!(pang.get(1, 0).is_nan());
        assert_eq!(pang.count_finite(), 3);

        let i = ImageF64::filled(2, 2, 10.0);
        let fpol = fractional_pol_map(&q, &u, &i, Some(&mask)).unwrap();
        assert!(fpol.get(1, 0).is_nan());
        assert!((fpol.get(1, 1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn complex_pol_keeps_components() {
        let q = ImageF64::filled(1, 1, 2.0);
        let u = ImageF64::filled(1, 1, -1.0);
        let cpol = complex_pol_map(&q, &u, None).unwrap();
        assert_eq!(cpol.get(0, 0), Complex64::new(2.0, -1.0));
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let q = ImageF64::new(2, 2);
        let u = ImageF64::new(2, 3);
        assert!(matches!(
            angle_map(&q, &u, None),
            Err(RmError::ShapeMismatch { .. })
        ));
        let mask = Mask::none(3, 3);
        assert!(flux_map(&q, &q, Some(&mask)).is_err());
    }
}
