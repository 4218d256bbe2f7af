//! Parameter types configuring the RM fitter and the map builder.
//!
//! Defaults: greedy unwrapping, a `(0, 0)` initial guess, absolute-σ
//! covariance for weighted fits and strict (all-or-nothing) cancellation.
//! Set `scale_weighted_covariance` to also scale weighted-fit covariance by
//! the residual variance, as unweighted fits always are.
use serde::Deserialize;

/// How angle sequences are preprocessed before fitting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnwrapMode {
    /// Fold the first angle into [-π/2, π/2] and greedily remove ±π steps.
    #[default]
    Greedy,
    /// Fit the angles as given.
    Disabled,
}

/// Per-pixel fit configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RmFitParams {
    pub unwrap: UnwrapMode,
    /// Linearisation point `(RM0 [rad/m²], chi0_0 [rad])`.
    pub initial_guess: (f64, f64),
    /// Scale weighted-fit covariance by the reduced chi-square as well.
    /// Unweighted fits are always scaled by the residual variance.
    pub scale_weighted_covariance: bool,
}

impl Default for RmFitParams {
    fn default() -> Self {
        Self {
            unwrap: UnwrapMode::Greedy,
            initial_guess: (0.0, 0.0),
            scale_weighted_covariance: false,
        }
    }
}

/// Map-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RmMapParams {
    pub fit: RmFitParams,
    /// Return partial maps (unfitted pixels NaN) when a run is cancelled
    /// instead of failing with `Cancelled`.
    pub best_effort: bool,
}
