use rm_bootstrap::collection::{Reduce, Region, RotmOptions, Selection};
use rm_bootstrap::config::{self, SyntheticDataset};
use rm_bootstrap::diagnostics::{RmMapReport, TimingBreakdown};
use rm_bootstrap::image::{ImageF64, Mask, StokesImage};
use rm_bootstrap::io::write_json_file;
use rm_bootstrap::rm::RmMapBuilder;
use rm_bootstrap::stats::{knuth_histogram, Histogram};
use rm_bootstrap::types::{Frequency, FrequencyKey, ImageVariant, Stokes};
use rm_bootstrap::{ImageCollection, PixelGrid};
use rand::prelude::*;
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = config::load_config(Path::new(&config_path))?;
    let dataset = &config.dataset;
    let mut timing = TimingBreakdown::default();

    let images = timing.measure("synthesize", || synthesize(dataset))?;
    let grid = *images.grid().ok_or("Synthetic dataset is empty")?;
    let (w, h) = grid.image_size;

    // Mask from the first frequency's polarized flux (replica 0) plus the grid border.
    let first = FrequencyKey::single(
        *dataset
            .frequencies
            .first()
            .ok_or("Config lists no frequencies")?,
    );
    let pol_images = timing
        .measure("pol_images", || {
            images.create_pol_images(Some(&first), None, ImageVariant::Restored)
        })
        .map_err(|e| e.to_string())?;
    let threshold = ImageF64::filled(w, h, dataset.pol_flux_threshold);
    let flux_mask = match pol_images.first() {
        Some(img) => Mask::below(img.restored(), &threshold).map_err(|e| e.to_string())?,
        None => Mask::none(w, h),
    };
    let mask = flux_mask
        .union(&border_mask(w, h, dataset.edge_margin))
        .map_err(|e| e.to_string())?;

    // Single-replica fit through the map builder, for its pixel report.
    let replica0_report = timing
        .measure("rm_replica0", || replica0_report(&images, &dataset.frequencies, &mask, &config))
        .map_err(|e| e.to_string())?;

    let options = RotmOptions::default()
        .frequencies(&dataset.frequencies)
        .mask(&mask)
        .params(config.rm.clone());
    let rm_images = timing
        .measure("rm_replicas", || images.create_rotm_images(&options))
        .map_err(|e| e.to_string())?;
    let rm_error = timing
        .measure("rm_error", || {
            rm_images.create_error_image_with(&Selection::any(), &config.error, Some(&mask))
        })
        .map_err(|e| e.to_string())?;

    let mut pol_collection = ImageCollection::new();
    pol_collection
        .add_images(pol_images, 1)
        .map_err(|e| e.to_string())?;
    let pol_error = timing
        .measure("pol_error", || {
            pol_collection.create_error_image_with(&Selection::any(), &config.error, Some(&mask))
        })
        .map_err(|e| e.to_string())?;

    let centre = Region::Circle {
        center: (w as f64 / 2.0, h as f64 / 2.0),
        radius: (w.min(h) as f64 / 4.0).max(1.0),
    };
    let centre_rm = rm_images
        .region_samples(&Selection::any(), &centre, Reduce::Mean)
        .map_err(|e| e.to_string())?;
    let centre_histogram = knuth_histogram(&centre_rm).ok();

    let summary = DemoSummary {
        width: w,
        height: h,
        frequencies: dataset.frequencies.clone(),
        replicas: rm_images.len(),
        credible_mass: config.error.credible_mass,
        masked_pixels: mask.count_masked(),
        replica0: replica0_report,
        rm_error: MapStats::of(&rm_error.values),
        pol_error: MapStats::of(&pol_error.values),
        centre_rm,
        centre_histogram,
        timing,
    };
    write_json_file(&config.output.result_json, &summary)?;

    println!(
        "Fitted {} RM replicas on a {}x{} grid; median RM error {:.3} rad/m²",
        summary.replicas, w, h, summary.rm_error.median
    );
    println!("Saved summary to {}", config.output.result_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: rm_bootstrap_demo <config.json>".to_string()
}

/// Excludes pixels closer than `margin` to any edge of a `w × h` grid.
fn border_mask(w: usize, h: usize, margin: usize) -> Mask {
    let mut mask = Mask::none(w, h);
    for y in 0..h {
        for x in 0..w {
            let inside = x >= margin && y >= margin && x + margin < w && y + margin < h;
            mask.set(x, y, !inside);
        }
    }
    mask
}

/// Q/U replicas of a source whose RM grows linearly along x.
fn synthesize(dataset: &SyntheticDataset) -> Result<ImageCollection, String> {
    let grid = PixelGrid::new(dataset.width, dataset.height);
    let mut rng = StdRng::seed_from_u64(dataset.seed);
    let mut images = ImageCollection::new();
    for &hz in &dataset.frequencies {
        let l2 = Frequency(hz).lambda_sq();
        for _ in 0..dataset.replicas {
            let mut noisy = |x: usize| {
                let chi = (dataset.rm_start + dataset.rm_gradient * x as f64) * l2 + dataset.chi0;
                let q = dataset.pol_flux * (2.0 * chi).cos();
                let u = dataset.pol_flux * (2.0 * chi).sin();
                let dq = (rng.gen::<f64>() - 0.5) * 2.0 * dataset.noise;
                let du = (rng.gen::<f64>() - 0.5) * 2.0 * dataset.noise;
                (q + dq, u + du)
            };
            let mut q = ImageF64::new(dataset.width, dataset.height);
            let mut u = ImageF64::new(dataset.width, dataset.height);
            for y in 0..dataset.height {
                for x in 0..dataset.width {
                    let (qv, uv) = noisy(x);
                    q.set(x, y, qv);
                    u.set(x, y, uv);
                }
            }
            for (stokes, plane) in [(Stokes::Q, q), (Stokes::U, u)] {
                let image = StokesImage::new(grid, hz, stokes, plane).map_err(|e| e.to_string())?;
                images.add_image(image).map_err(|e| e.to_string())?;
            }
        }
    }
    Ok(images)
}

fn replica0_report(
    images: &ImageCollection,
    frequencies: &[f64],
    mask: &Mask,
    config: &config::RuntimeConfig,
) -> rm_bootstrap::Result<RmMapReport> {
    let mut angles = Vec::with_capacity(frequencies.len());
    for &hz in frequencies {
        let pang = images.create_pang_images(
            Some(&FrequencyKey::single(hz)),
            Some(mask),
            ImageVariant::Restored,
        )?;
        if let Some(first) = pang.into_iter().next() {
            angles.push(first.restored().clone());
        }
    }
    let maps = RmMapBuilder::new(config.rm.clone()).build_from_maps(frequencies, &angles, None, Some(mask))?;
    Ok(maps.report)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapStats {
    finite: usize,
    min: f64,
    median: f64,
    max: f64,
}

impl MapStats {
    fn of(image: &ImageF64) -> Self {
        let mut values: Vec<f64> = image.data.iter().copied().filter(|v| v.is_finite()).collect();
        values.sort_by(f64::total_cmp);
        let pick = |i: usize| values.get(i).copied().unwrap_or(f64::NAN);
        Self {
            finite: values.len(),
            min: pick(0),
            median: pick(values.len() / 2),
            max: values.last().copied().unwrap_or(f64::NAN),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoSummary {
    width: usize,
    height: usize,
    frequencies: Vec<f64>,
    replicas: usize,
    credible_mass: f64,
    masked_pixels: usize,
    replica0: RmMapReport,
    rm_error: MapStats,
    pol_error: MapStats,
    centre_rm: Vec<f64>,
    centre_histogram: Option<Histogram>,
    timing: TimingBreakdown,
}
