//! Stack of equally shaped planes with the stacking axis trailing.
//!
//! Layout is pixel-major: the `depth` values of one pixel are contiguous, so
//! per-pixel estimators (RM fit, HDI) read a plain slice. A cube is a
//! throwaway view of its source planes; it is never written back implicitly.
use super::traits::ImageView;
use super::ImageF64;
use crate::error::{Result, RmError};

#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    pub w: usize,
    pub h: usize,
    pub depth: usize,
    pub data: Vec<f64>,
}

impl Cube {
    /// Stack planes in order along the trailing axis.
    pub fn from_planes<'a, I>(planes: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ImageF64>,
    {
        let planes: Vec<&ImageF64> = planes.into_iter().collect();
        let Some(first) = planes.first() else {
            return Err(RmError::InsufficientInput {
                what: "cube planes",
                required: 1,
                actual: 0,
            });
        };
        let (w, h) = first.shape();
        for plane in &planes[1..] {
            if plane.shape() != (w, h) {
                return Err(RmError::ShapeMismatch {
                    what: "cube plane",
                    expected: (w, h),
                    found: plane.shape(),
                });
            }
        }
        let depth = planes.len();
        let mut data = vec![0.0; w * h * depth];
        for (k, plane) in planes.iter().enumerate() {
            for (pix, &v) in plane.data.iter().enumerate() {
                data[pix * depth + k] = v;
            }
        }
        Ok(Self { w, h, depth, data })
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.w * self.h
    }

    /// Values of pixel `(x, y)` across the stack.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> &[f64] {
        self.sample_at(y * self.w + x)
    }

    /// Values of the pixel with linear index `pix` across the stack.
    #[inline]
    pub fn sample_at(&self, pix: usize) -> &[f64] {
        &self.data[pix * self.depth..(pix + 1) * self.depth]
    }

    #[inline]
    pub fn sample_at_mut(&mut self, pix: usize) -> &mut [f64] {
        &mut self.data[pix * self.depth..(pix + 1) * self.depth]
    }

    /// Extract plane `k` as an owned image.
    pub fn plane(&self, k: usize) -> ImageF64 {
        let data = (0..self.pixel_count())
            .map(|pix| self.data[pix * self.depth + k])
            .collect();
        ImageF64 {
            w: self.w,
            h: self.h,
            data,
        }
    }

    /// Split back into planes in stacking order.
    pub fn into_planes(self) -> Vec<ImageF64> {
        (0..self.depth).map(|k| self.plane(k)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stacking_keeps_per_pixel_samples_contiguous() {
        let a = ImageF64::from_fn(2, 2, |x, y| (x + 2 * y) as f64);
        let b = ImageF64::from_fn(2, 2, |x, y| 10.0 + (x + 2 * y) as f64);
        let cube = Cube::from_planes([&a, &b]).unwrap();
        assert_eq!(cube.depth, 2);
        assert_eq!(cube.sample(1, 1), &[3.0, 13.0]);
        assert_eq!(cube.plane(1), b);
        assert_eq!(cube.into_planes(), vec![a, b]);
    }

    #[test]
    fn stacking_rejects_mismatched_shapes() {
        let a = ImageF64::new(2, 2);
        let b = ImageF64::new(3, 2);
        assert!(matches!(
            Cube::from_planes([&a, &b]),
            Err(RmError::ShapeMismatch { .. })
        ));
    }
}
