use rand::prelude::*;
use rm_bootstrap::image::{ImageF64, StokesImage};
use rm_bootstrap::types::{Frequency, Stokes};
use rm_bootstrap::{ImageCollection, PixelGrid};

pub const FREQS: [f64; 4] = [4.6e9, 5.0e9, 8.1e9, 8.4e9];

/// Q/U/I replicas of a unit-flux source with RM `rm_at(x, y)` and angle
/// `chi0` at zero wavelength. Q and U get uniform noise of half-width `noise`.
pub fn qu_replicas(
    width: usize,
    height: usize,
    replicas: usize,
    noise: f64,
    chi0: f64,
    rm_at: impl Fn(usize, usize) -> f64,
) -> ImageCollection {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let grid = PixelGrid::new(width, height);
    let mut rng = StdRng::seed_from_u64(11);
    let mut images = ImageCollection::new();
    for &hz in &FREQS {
        let l2 = Frequency(hz).lambda_sq();
        for _ in 0..replicas {
            let mut q = ImageF64::new(width, height);
            let mut u = ImageF64::new(width, height);
            for y in 0..height {
                for x in 0..width {
                    let chi = rm_at(x, y) * l2 + chi0;
                    let dq = (rng.gen::<f64>() - 0.5) * 2.0 * noise;
                    let du = (rng.gen::<f64>() - 0.5) * 2.0 * noise;
                    q.set(x, y, (2.0 * chi).cos() + dq);
                    u.set(x, y, (2.0 * chi).sin() + du);
                }
            }
            let i = ImageF64::filled(width, height, 2.0);
            for (stokes, plane) in [(Stokes::Q, q), (Stokes::U, u), (Stokes::I, i)] {
                images
                    .add_image(StokesImage::new(grid, hz, stokes, plane).unwrap())
                    .unwrap();
            }
        }
    }
    images
}
