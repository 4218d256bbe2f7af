mod common;

use approx::assert_relative_eq;
use common::synthetic_qu::{qu_replicas, FREQS};
use rm_bootstrap::image::Mask;
use rm_bootstrap::types::{FrequencyKey, ImageVariant, Stokes};
use rm_bootstrap::{ImageCollection, RotmOptions, Selection};

#[test]
fn bootstrap_rm_error_is_nan_exactly_where_masked() {
    let _ = env_logger::builder().is_test(true).try_init();
    let images = qu_replicas(8, 6, 12, 0.01, 0.3, |x, _| -40.0 + 10.0 * x as f64);
    let mut mask = Mask::none(8, 6);
    for y in 0..6 {
        mask.set(0, y, true);
    }
    mask.set(5, 3, true);

    let options = RotmOptions::default().mask(&mask);
    let (rm, rm_sigma) = images.create_rotm_image(&options, 0).unwrap();
    let rm_replicas = images.create_rotm_images(&options).unwrap();
    assert_eq!(rm_replicas.len(), 12);
    let rm_error = rm_replicas
        .create_error_image(&Selection::any(), 0.68, Some(&mask))
        .unwrap();

    for y in 0..6 {
        for x in 0..8 {
            if mask.is_masked(x, y) {
                assert!(rm.get(x, y).is_nan());
                assert!(rm_sigma.get(x, y).is_nan());
                assert!(rm_error.get(x, y).is_nan());
            } else {
                let truth = -40.0 + 10.0 * x as f64;
                assert!((rm.get(x, y) - truth).abs() < 15.0, "RM {} vs {truth}", rm.get(x, y));
                assert!(rm_error.get(x, y) > 0.0);
            }
        }
    }
}

#[test]
fn noiseless_replicas_agree_and_have_zero_spread() {
    let images = qu_replicas(4, 4, 3, 0.0, 0.1, |_, y| 20.0 * y as f64);
    let rm_replicas = images.create_rotm_images(&RotmOptions::default()).unwrap();
    let rm_error = rm_replicas
        .create_error_image(&Selection::any(), 0.95, None)
        .unwrap();
    for &v in &rm_error.values.data {
        assert_relative_eq!(v, 0.0, epsilon = 1e-6);
    }
    let cube = rm_replicas
        .build_cube(&Selection::any(), ImageVariant::Restored)
        .unwrap();
    assert_relative_eq!(cube.sample(2, 3)[1], 60.0, epsilon = 1e-6);
}

#[test]
fn flux_error_from_derived_replicas() {
    let images = qu_replicas(5, 5, 8, 0.1, 0.0, |_, _| 0.0);
    let freq = FrequencyKey::single(FREQS[2]);
    let pol = images
        .create_pol_images(Some(&freq), None, ImageVariant::Restored)
        .unwrap();
    let fpol = images
        .create_fpol_images(Some(&freq), None, ImageVariant::Restored)
        .unwrap();
    assert_eq!(pol.len(), 8);
    assert_relative_eq!(
        fpol[3].restored().get(2, 2),
        pol[3].restored().get(2, 2) / 2.0,
        epsilon = 1e-12
    );

    let mut collection = ImageCollection::new();
    collection.add_images(pol, 2).unwrap();
    let error = collection.create_error_image(&Selection::any(), 1.0, None).unwrap();
    let cube = collection
        .build_cube(&Selection::at(freq, Stokes::PolFlux), ImageVariant::Restored)
        .unwrap();
    let sample = cube.sample(1, 4);
    let max = sample.iter().cloned().fold(f64::MIN, f64::max);
    let min = sample.iter().cloned().fold(f64::MAX, f64::min);
    assert_eq!(error.get(1, 4), max - min);
}
