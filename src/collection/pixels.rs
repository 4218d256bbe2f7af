//! Pixel-level access across replicas: line profiles, region reductions and
//! in-place pixelwise rewrites.
use super::{ImageCollection, Selection};
use crate::error::{Result, RmError};
use crate::grid::PixelGrid;
use crate::image::{ensure_shape, Mask};
use crate::types::ImageVariant;

/// Pixels a region reduction runs over.
#[derive(Clone, Debug, PartialEq)]
pub enum Region {
    All,
    /// Inclusive box between bottom-left and top-right corners `(x, y)`.
    Box {
        blc: (usize, usize),
        trc: (usize, usize),
    },
    /// Pixels whose centre lies within `radius` of `center`.
    Circle { center: (f64, f64), radius: f64 },
    /// Pixels the mask does not exclude.
    Mask(Mask),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reduce {
    #[default]
    Mean,
    Sum,
}

impl Region {
    fn selector(&self, grid: &PixelGrid) -> Result<Vec<bool>> {
        let (w, h) = grid.image_size;
        let mut selected = vec![false; w * h];
        match self {
            Region::All => selected.fill(true),
            Region::Box { blc, trc } => {
                check_in_grid(*blc, grid)?;
                check_in_grid(*trc, grid)?;
                let (x0, x1) = (blc.0.min(trc.0), blc.0.max(trc.0));
                let (y0, y1) = (blc.1.min(trc.1), blc.1.max(trc.1));
                for y in y0..=y1 {
                    selected[y * w + x0..=y * w + x1].fill(true);
                }
            }
            Region::Circle { center, radius } => {
                let r2 = radius * radius;
                for y in 0..h {
                    for x in 0..w {
                        let dx = x as f64 - center.0;
                        let dy = y as f64 - center.1;
                        selected[y * w + x] = dx * dx + dy * dy <= r2;
                    }
                }
            }
            Region::Mask(mask) => {
                ensure_shape("region mask", mask, grid.image_size)?;
                for (sel, &excluded) in selected.iter_mut().zip(&mask.data) {
                    *sel = !excluded;
                }
            }
        }
        Ok(selected)
    }
}

fn check_in_grid((x, y): (usize, usize), grid: &PixelGrid) -> Result<()> {
    let (width, height) = grid.image_size;
    if x < width && y < height {
        Ok(())
    } else {
        Err(RmError::OutOfBounds {
            x,
            y,
            width,
            height,
        })
    }
}

/// Integer pixel positions from `from` to `to` inclusive,
/// `max(|dx|, |dy|) + 1` of them.
fn line_pixels(from: (usize, usize), to: (usize, usize)) -> Vec<(usize, usize)> {
    let dx = to.0 as f64 - from.0 as f64;
    let dy = to.1 as f64 - from.1 as f64;
    let steps = dx.abs().max(dy.abs()) as usize;
    if steps == 0 {
        return vec![from];
    }
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            (
                (from.0 as f64 + t * dx).round() as usize,
                (from.1 as f64 + t * dy).round() as usize,
            )
        })
        .collect()
}

impl ImageCollection {
    /// Replica values sampled along the pixel line `from → to`.
    ///
    /// Result is indexed `[sample][replica]`.
    pub fn profile(
        &self,
        from: (usize, usize),
        to: (usize, usize),
        selection: &Selection,
    ) -> Result<Vec<Vec<f64>>> {
        let cube = self.build_cube(selection, ImageVariant::Restored)?;
        let grid = PixelGrid::new(cube.w, cube.h);
        check_in_grid(from, &grid)?;
        check_in_grid(to, &grid)?;
        Ok(line_pixels(from, to)
            .into_iter()
            .map(|(x, y)| cube.sample(x, y).to_vec())
            .collect())
    }

    /// Rewrite the replica vector of every pixel at `selection` in place.
    ///
    /// `f` gets the restored values of one pixel across all replicas, in
    /// replica order; whatever it leaves in the slice is stored back.
    pub fn apply_pixelwise<F>(&mut self, selection: &Selection, mut f: F) -> Result<()>
    where
        F: FnMut(&mut [f64]),
    {
        let (frequency, stokes) = self.resolve(selection)?;
        let mut cube = self.build_cube(
            &Selection::at(frequency.clone(), stokes),
            ImageVariant::Restored,
        )?;
        for pix in 0..cube.pixel_count() {
            f(cube.sample_at_mut(pix));
        }
        let images = self.images_at_mut(&frequency, stokes);
        for (image, plane) in images.iter_mut().zip(cube.into_planes()) {
            image.replace_restored(plane)?;
        }
        Ok(())
    }

    /// One reduced value per replica over the pixels of `region`.
    ///
    /// Non-finite pixels are skipped; a replica with no finite pixel in the
    /// region reduces to NaN.
    pub fn region_samples(
        &self,
        selection: &Selection,
        region: &Region,
        reduce: Reduce,
    ) -> Result<Vec<f64>> {
        let (frequency, stokes) = self.resolve(selection)?;
        let images = self.images_at(&frequency, stokes);
        let selected = match images.first() {
            Some(first) => region.selector(&first.grid)?,
            None => return Ok(Vec::new()),
        };
        Ok(images
            .iter()
            .map(|image| {
                let (sum, n) = image
                    .restored()
                    .data
                    .iter()
                    .zip(&selected)
                    .filter(|&(v, &sel)| sel && v.is_finite())
                    .fold((0.0, 0usize), |(s, n), (v, _)| (s + v, n + 1));
                match (n, reduce) {
                    (0, _) => f64::NAN,
                    (_, Reduce::Sum) => sum,
                    (_, Reduce::Mean) => sum / n as f64,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageF64, StokesImage};
    use crate::types::Stokes;

    fn ramp_collection(replicas: usize) -> ImageCollection {
        let grid = PixelGrid::new(5, 4);
        let mut images = ImageCollection::new();
        for r in 0..replicas {
            let plane = ImageF64::from_fn(5, 4, |x, y| (10 * y + x) as f64 + 100.0 * r as f64);
            images
                .add_image(StokesImage::new(grid, 1.4e9, Stokes::I, plane).unwrap())
                .unwrap();
        }
        images
    }

    #[test]
    fn line_has_one_sample_per_major_step() {
        assert_eq!(line_pixels((0, 0), (4, 2)).len(), 5);
        assert_eq!(line_pixels((3, 1), (3, 1)), vec![(3, 1)]);
        assert_eq!(line_pixels((2, 3), (2, 0)), vec![(2, 3), (2, 2), (2, 1), (2, 0)]);
    }

    #[test]
    fn profile_samples_every_replica() {
        let images = ramp_collection(2);
        let profile = images.profile((0, 0), (4, 0), &Selection::any()).unwrap();
        assert_eq!(profile.len(), 5);
        assert_eq!(profile[3], vec![3.0, 103.0]);

        let err = images.profile((0, 0), (5, 0), &Selection::any()).unwrap_err();
        assert!(matches!(err, RmError::OutOfBounds { x: 5, .. }));
    }

    #[test]
    fn apply_pixelwise_writes_back_in_replica_order() {
        let mut images = ramp_collection(3);
        images
            .apply_pixelwise(&Selection::any(), |values| values.reverse())
            .unwrap();
        let cube = images.build_cube(&Selection::any(), ImageVariant::Restored).unwrap();
        assert_eq!(cube.sample(1, 2), &[221.0, 121.0, 21.0]);
    }

    #[test]
    fn region_reductions() {
        let images = ramp_collection(2);
        let boxed = Region::Box {
            blc: (0, 0),
            trc: (1, 1),
        };
        // Pixels 0, 1, 10, 11.
        let sums = images.region_samples(&Selection::any(), &boxed, Reduce::Sum).unwrap();
        assert_eq!(sums, vec![22.0, 422.0]);
        let means = images.region_samples(&Selection::any(), &boxed, Reduce::Mean).unwrap();
        assert_eq!(means, vec![5.5, 105.5]);

        let circle = Region::Circle {
            center: (2.0, 2.0),
            radius: 0.5,
        };
        let centre = images.region_samples(&Selection::any(), &circle, Reduce::Mean).unwrap();
        assert_eq!(centre, vec![22.0, 122.0]);

        let empty = Region::Mask(Mask::all(5, 4));
        let none = images.region_samples(&Selection::any(), &empty, Reduce::Sum).unwrap();
        assert!(none.iter().all(|v| v.is_nan()));

        let outside = Region::Box {
            blc: (0, 0),
            trc: (9, 1),
        };
        assert!(images.region_samples(&Selection::any(), &outside, Reduce::Sum).is_err());
    }
}
