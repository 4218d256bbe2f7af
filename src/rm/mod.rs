//! Rotation-measure estimation.
//!
//! Overview
//! - [`unwrap`] removes ±π ambiguities from a per-pixel angle sequence with a
//!   local greedy rule.
//! - [`fit`] solves the weighted linear model `chi = RM·λ² + chi0` in closed
//!   form and reports the 2×2 parameter covariance.
//! - [`map`] runs the fitter over every unmasked pixel of a frequency-stacked
//!   angle cube, in parallel with the `parallel` feature, and recovers per-pixel
//!   failures as NaN.
//! - [`params`] holds the knobs for both stages.
//!
//! Key Ideas
//! - Polarization angles are defined modulo π. Unwrapping keeps consecutive
//!   samples (in caller order) within π/2 of each other but cannot recover a
//!   genuine jump of more than π/2 between two adjacent samples.
//! - The model is linear in `(RM, chi0)`, so a single Gauss–Newton step from
//!   the initial guess is the exact least-squares solution.

pub mod fit;
pub mod map;
pub mod params;
pub mod unwrap;

pub use fit::{fit_rm, RmFit};
pub use map::{RmMapBuilder, RmMaps};
pub use params::{RmFitParams, RmMapParams, UnwrapMode};
pub use unwrap::unwrap_phases;
