//! Boolean exclusion mask co-registered with a pixel grid.
//!
//! `true` excludes a pixel from every computation; outputs at excluded pixels
//! are NaN.
use super::traits::{ImageView, ImageViewMut};
use super::{ensure_shape, ImageF64};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub w: usize,
    pub h: usize,
    pub data: Vec<bool>,
}

impl Mask {
    /// Mask that excludes nothing.
    pub fn none(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![false; w * h],
        }
    }

    /// Mask that excludes every pixel.
    pub fn all(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![true; w * h],
        }
    }

    /// Exclude pixels where `values < threshold`, e.g. flux below its error map.
    /// NaN in either input also excludes the pixel.
    pub fn below(values: &ImageF64, threshold: &ImageF64) -> Result<Self> {
        ensure_shape("threshold", threshold, values.shape())?;
        let data = values
            .data
            .iter()
            .zip(&threshold.data)
            .map(|(&v, &t)| !(v >= t))
            .collect();
        Ok(Self {
            w: values.w,
            h: values.h,
            data,
        })
    }

    #[inline]
    pub fn is_masked(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, masked: bool) {
        self.data[y * self.w + x] = masked;
    }

    /// Pixelwise OR with another mask of the same shape.
    pub fn union(&self, other: &Mask) -> Result<Mask> {
        ensure_shape("mask", other, self.shape())?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(&a, &b)| a || b)
            .collect();
        Ok(Mask {
            w: self.w,
            h: self.h,
            data,
        })
    }

    pub fn count_masked(&self) -> usize {
        self.data.iter().filter(|&&m| m).count()
    }
}

impl ImageView for Mask {
    type Pixel = bool;

    fn width(&self) -> usize {
        self.w
    }
    fn height(&self) -> usize {
        self.h
    }
    fn as_slice(&self) -> &[bool] {
        &self.data
    }
}

impl ImageViewMut for Mask {
    fn as_mut_slice(&mut self) -> &mut [bool] {
        &mut self.data
    }
}
