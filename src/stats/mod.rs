//! Finite-sample statistics over bootstrap replicas.
pub mod hdi;
pub mod histogram;

pub use hdi::{hdi_interval, hdi_width, hdi_width_map};
pub use histogram::{freedman_bin_width, knuth_histogram, Histogram};
