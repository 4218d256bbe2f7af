//! Bayesian-optimal histogram binning (Knuth 2006) for replica distributions.
//!
//! The bin count is chosen by maximising the log-posterior
//! `n·ln M + lnΓ(M/2) − M·lnΓ(1/2) − lnΓ(n + M/2) + Σ lnΓ(n_k + 1/2)` over
//! equal-width binnings of the sample range. With `M0` the Freedman–Diaconis
//! bin count, `M` is scanned over `1..=max(2·M0, 2)`, capped at the sample
//! size `n` (never below 2) so a sample with a tiny IQR and a far outlier
//! cannot force an unbounded scan.
use crate::error::{Result, RmError};
use serde::Serialize;
use statrs::function::gamma::ln_gamma;

/// Equal-width histogram with normalised density.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Histogram {
    /// `counts.len() + 1` bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    /// Counts divided by `n · bin_width`, integrating to one.
    pub density: Vec<f64>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }
}

fn sorted_finite(data: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Freedman–Diaconis bin width `2·IQR / n^(1/3)`; needs at least four values.
pub fn freedman_bin_width(data: &[f64]) -> Result<f64> {
    let sorted = sorted_finite(data);
    fd_width(&sorted)
}

fn fd_width(sorted: &[f64]) -> Result<f64> {
    let n = sorted.len();
    if n < 4 {
        return Err(RmError::InsufficientInput {
            what: "histogram sample",
            required: 4,
            actual: n,
        });
    }
    let v25 = sorted[n / 4 - 1];
    let v75 = sorted[3 * n / 4 - 1];
    Ok(2.0 * (v75 - v25) / (n as f64).cbrt())
}

fn bin_counts(sorted: &[f64], bins: usize) -> Vec<usize> {
    let lo = sorted[0];
    let hi = sorted[sorted.len() - 1];
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in sorted {
        // The last edge is inclusive.
        let k = (((v - lo) / width) as usize).min(bins - 1);
        counts[k] += 1;
    }
    counts
}

fn log_posterior(n: usize, counts: &[usize]) -> f64 {
    let m = counts.len() as f64;
    let n = n as f64;
    let occupancy: f64 = counts.iter().map(|&c| ln_gamma(c as f64 + 0.5)).sum();
    n * m.ln() + ln_gamma(0.5 * m) - m * ln_gamma(0.5) - ln_gamma(n + 0.5 * m) + occupancy
}

/// Histogram of the finite values of `data` with Knuth's optimal bin count.
pub fn knuth_histogram(data: &[f64]) -> Result<Histogram> {
    let sorted = sorted_finite(data);
    let dx = fd_width(&sorted)?;
    let n = sorted.len();
    let lo = sorted[0];
    let hi = sorted[n - 1];

    if hi <= lo {
        return Ok(Histogram {
            edges: vec![lo - 0.5, lo + 0.5],
            counts: vec![n],
            density: vec![1.0],
        });
    }

    let m0 = if dx > 0.0 {
        ((hi - lo) / dx).ceil().max(1.0) as usize
    } else {
        1
    };
    let m_max = (2 * m0).max(2).min(n.max(2));

    let mut best_m = 1;
    let mut best_post = f64::NEG_INFINITY;
    let mut best_counts = vec![n];
    for m in 1..=m_max {
        let counts = bin_counts(&sorted, m);
        let post = log_posterior(n, &counts);
        if post > best_post {
            best_post = post;
            best_m = m;
            best_counts = counts;
        }
    }
    log::debug!("knuth_histogram: n={n} m0={m0} chosen bins={best_m}");

    let width = (hi - lo) / best_m as f64;
    let edges = (0..=best_m).map(|k| lo + k as f64 * width).collect();
    let density = best_counts
        .iter()
        .map(|&c| c as f64 / (n as f64 * width))
        .collect();
    Ok(Histogram {
        edges,
        counts: best_counts,
        density,
    })
}
