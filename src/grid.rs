//! Pixel grid geometry shared by every image of a dataset.
use serde::{Deserialize, Serialize};

/// Immutable description of an image's pixel grid.
///
/// Two images may be stacked only when their grids compare equal component by
/// component (sizes, reference pixel, reference value and pixel scale).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelGrid {
    /// `(width, height)` in pixels.
    pub image_size: (usize, usize),
    /// Reference pixel `(x, y)`.
    pub pixel_reference: (f64, f64),
    /// Sky coordinate at the reference pixel.
    pub pixel_reference_value: (f64, f64),
    /// Pixel increment `(dx, dy)`.
    pub pixel_scale: (f64, f64),
}

impl PixelGrid {
    /// Grid of `width × height` pixels referenced at its centre with unit scale.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image_size: (width, height),
            pixel_reference: (width as f64 / 2.0, height as f64 / 2.0),
            pixel_reference_value: (0.0, 0.0),
            pixel_scale: (1.0, 1.0),
        }
    }

    pub fn with_pixel_scale(mut self, dx: f64, dy: f64) -> Self {
        self.pixel_scale = (dx, dy);
        self
    }

    pub fn with_reference(mut self, pixel: (f64, f64), value: (f64, f64)) -> Self {
        self.pixel_reference = pixel;
        self.pixel_reference_value = value;
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.image_size.0
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.image_size.1
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.image_size.0 * self.image_size.1
    }

    /// Sky coordinate of pixel `(x, y)` from the linear reference solution.
    pub fn world(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.pixel_reference_value.0 + (x - self.pixel_reference.0) * self.pixel_scale.0,
            self.pixel_reference_value.1 + (y - self.pixel_reference.1) * self.pixel_scale.1,
        )
    }
}
