//! Owned complex-valued image, used for complex polarization `Q + iU`.
use super::traits::ImageView;
use super::ImageF64;
use num_complex::Complex64;

#[derive(Clone, Debug, PartialEq)]
pub struct ImageC64 {
    pub w: usize,
    pub h: usize,
    pub data: Vec<Complex64>,
}

impl ImageC64 {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Complex64 {
        self.data[y * self.w + x]
    }

    /// Elementwise modulus.
    pub fn norm(&self) -> ImageF64 {
        self.map_real(|z| z.norm())
    }

    fn map_real(&self, f: impl Fn(Complex64) -> f64) -> ImageF64 {
        ImageF64 {
            w: self.w,
            h: self.h,
            data: self.data.iter().map(|&z| f(z)).collect(),
        }
    }
}

impl ImageView for ImageC64 {
    type Pixel = Complex64;

    fn width(&self) -> usize {
        self.w
    }
    fn height(&self) -> usize {
        self.h
    }
    fn as_slice(&self) -> &[Complex64] {
        &self.data
    }
}
