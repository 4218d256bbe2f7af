mod common;

use approx::assert_relative_eq;
use common::synthetic_qu::qu_replicas;
use rm_bootstrap::image::{ImageF64, Mask, StokesImage};
use rm_bootstrap::polarization::fractional_pol;
use rm_bootstrap::rm::unwrap_phases;
use rm_bootstrap::types::{Frequency, FrequencyKey, Stokes};
use rm_bootstrap::{
    fit_rm, ImageCollection, PixelGrid, RmError, RmFitParams, RotmOptions, Selection, UnwrapMode,
};

const WIDE_FREQS: [f64; 4] = [1.4e9, 5.0e9, 8.1e9, 8.4e9];

fn exact_angles(rm: f64, chi0: f64) -> Vec<f64> {
    WIDE_FREQS
        .iter()
        .map(|&f| rm * Frequency(f).lambda_sq() + chi0)
        .collect()
}

#[test]
fn exact_angles_recover_rm_and_chi0() {
    let _ = env_logger::builder().is_test(true).try_init();
    let params = RmFitParams {
        unwrap: UnwrapMode::Disabled,
        ..Default::default()
    };
    let fit = fit_rm(&WIDE_FREQS, &exact_angles(50.0, 0.3), None, &params).unwrap();
    assert_relative_eq!(fit.rm, 50.0, epsilon = 1e-6);
    assert_relative_eq!(fit.chi0, 0.3, epsilon = 1e-6);
    assert!(fit.covariance.is_some());
}

#[test]
fn greedy_unwrap_cannot_recover_a_large_low_frequency_rotation() {
    // RM·λ² at 1.4 GHz is about 2.3 rad, so folding the first angle into
    // [-π/2, π/2] shifts it by π and the rest of the sequence follows it.
    let fit = fit_rm(&WIDE_FREQS, &exact_angles(50.0, 0.3), None, &RmFitParams::default()).unwrap();
    assert!((fit.rm - 50.0).abs() > 1.0, "greedy unwrap recovered RM {}", fit.rm);
}

#[test]
fn unwrap_is_idempotent_on_smooth_sequences() {
    let sequences = [
        vec![0.1, 0.4, 0.9, 1.3, 1.8, 2.2],
        vec![-1.2, -0.3, 0.5, -0.4],
        vec![1.5, 1.0, 0.2],
    ];
    for seq in sequences {
        let once = unwrap_phases(&seq);
        assert_eq!(unwrap_phases(&once), once);
    }
}

#[test]
fn full_credible_mass_is_sample_range() {
    let images = qu_replicas(3, 3, 7, 0.2, 0.0, |_, _| 0.0);
    let key = FrequencyKey::single(5.0e9);
    let selection = Selection::at(key.clone(), Stokes::Q);
    let error = images.create_error_image(&selection, 1.0, None).unwrap();
    for y in 0..3 {
        for x in 0..3 {
            let sample: Vec<f64> = images
                .images_at(&key, Stokes::Q)
                .iter()
                .map(|img| img.restored().get(x, y))
                .collect();
            let max = sample.iter().cloned().fold(f64::MIN, f64::max);
            let min = sample.iter().cloned().fold(f64::MAX, f64::min);
            assert_eq!(error.get(x, y), max - min);
        }
    }
}

#[test]
fn single_replica_error_is_zero_for_any_mass() {
    let images = qu_replicas(3, 2, 1, 0.2, 0.0, |_, _| 5.0);
    let mut mask = Mask::none(3, 2);
    mask.set(2, 1, true);
    for mass in [0.05, 0.5, 0.68, 0.99, 1.0] {
        let error = images
            .create_error_image(&Selection::at(8.1e9, Stokes::U), mass, Some(&mask))
            .unwrap();
        assert!(error.get(2, 1).is_nan());
        assert_eq!(error.values.count_finite(), 5);
        assert!(error.values.data.iter().filter(|v| v.is_finite()).all(|&v| v == 0.0));
    }
}

#[test]
fn pixel_scale_mismatch_is_rejected_without_side_effects() {
    let grid = PixelGrid::new(4, 4).with_pixel_scale(1e-4, 1e-4);
    let mut images = ImageCollection::new();
    let image = |grid| StokesImage::new(grid, 5.0e9, Stokes::I, ImageF64::filled(4, 4, 1.0)).unwrap();
    images.add_image(image(grid)).unwrap();

    let err = images
        .add_image(image(grid.with_pixel_scale(2e-4, 1e-4)))
        .unwrap_err();
    assert!(matches!(err, RmError::GridMismatch { .. }));
    assert_eq!(images.len(), 1);
    assert_eq!(images.images_at(&5.0e9.into(), Stokes::I).len(), 1);
    assert_eq!(images.grid(), Some(&grid));
}

#[test]
fn rotm_without_u_reports_missing_stokes() {
    let grid = PixelGrid::new(2, 2);
    let mut images = ImageCollection::new();
    for hz in WIDE_FREQS {
        images
            .add_image(StokesImage::new(grid, hz, Stokes::Q, ImageF64::new(2, 2)).unwrap())
            .unwrap();
        if hz != 8.1e9 {
            images
                .add_image(StokesImage::new(grid, hz, Stokes::U, ImageF64::new(2, 2)).unwrap())
                .unwrap();
        }
    }
    let err = images.create_rotm_image(&RotmOptions::default(), 0).unwrap_err();
    assert_eq!(
        err,
        RmError::MissingStokes {
            frequency: FrequencyKey::single(8.1e9),
            stokes: Stokes::U,
        }
    );
}

#[test]
fn fractional_pol_of_zero_intensity_is_nan() {
    assert!(fractional_pol(1.0, 0.0, 0.0).is_nan());
}
