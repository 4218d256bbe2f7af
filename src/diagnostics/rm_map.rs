use serde::Serialize;

/// Pixel accounting for one RM map run.
///
/// `masked + fitted + failed + skipped == total_pixels`. Pixels counted in
/// `undefined_covariance` are also counted in `fitted`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RmMapReport {
    pub width: usize,
    pub height: usize,
    pub frequencies: usize,
    pub total_pixels: usize,
    pub masked: usize,
    pub fitted: usize,
    pub undefined_covariance: usize,
    /// Pixels whose fit failed and were set to NaN.
    pub failed: usize,
    /// Pixels never processed because the run was cancelled.
    pub skipped: usize,
    pub cancelled: bool,
    pub elapsed_ms: f64,
}
