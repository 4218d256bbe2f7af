use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Observing frequency in Hz, totally ordered so it can key ordered maps.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(pub f64);

impl Frequency {
    #[inline]
    pub fn hz(self) -> f64 {
        self.0
    }

    /// Wavelength squared `(c / f)^2` in m².
    #[inline]
    pub fn lambda_sq(self) -> f64 {
        let lambda = SPEED_OF_LIGHT / self.0;
        lambda * lambda
    }
}

impl PartialEq for Frequency {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frequency {}

impl PartialOrd for Frequency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frequency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Frequency {
    fn from(hz: f64) -> Self {
        Frequency(hz)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6e} Hz", self.0)
    }
}

/// Collection key along the frequency axis.
///
/// Products that combine several bands (RM maps) are keyed by the tuple of
/// frequencies they were built from.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FrequencyKey {
    Single(Frequency),
    Composite(Vec<Frequency>),
}

impl FrequencyKey {
    pub fn single(hz: f64) -> Self {
        FrequencyKey::Single(Frequency(hz))
    }

    pub fn as_single(&self) -> Option<Frequency> {
        match self {
            FrequencyKey::Single(f) => Some(*f),
            FrequencyKey::Composite(_) => None,
        }
    }
}

impl From<f64> for FrequencyKey {
    fn from(hz: f64) -> Self {
        FrequencyKey::single(hz)
    }
}

impl From<Frequency> for FrequencyKey {
    fn from(f: Frequency) -> Self {
        FrequencyKey::Single(f)
    }
}

impl fmt::Display for FrequencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrequencyKey::Single(freq) => write!(f, "{freq}"),
            FrequencyKey::Composite(freqs) => {
                write!(f, "(")?;
                for (i, freq) in freqs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{freq}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Stokes parameter or derived polarization product carried by an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stokes {
    I,
    Q,
    U,
    V,
    /// Polarization position angle (rad).
    PolAngle,
    /// Polarized flux `|Q + iU|`.
    PolFlux,
    /// Fractional polarization `|Q + iU| / I`.
    FracPol,
    /// Rotation measure (rad/m²).
    RotationMeasure,
}

impl fmt::Display for Stokes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stokes::I => "I",
            Stokes::Q => "Q",
            Stokes::U => "U",
            Stokes::V => "V",
            Stokes::PolAngle => "PANG",
            Stokes::PolFlux => "PPOL",
            Stokes::FracPol => "FPOL",
            Stokes::RotationMeasure => "ROTM",
        };
        f.write_str(label)
    }
}

/// Which of an image's two arrays an operation reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageVariant {
    /// Restored (beam-convolved) image.
    #[default]
    Restored,
    /// Raw model image before restoration.
    Raw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequencies_sort_numerically() {
        let mut keys = vec![
            FrequencyKey::single(8.4e9),
            FrequencyKey::single(1.4e9),
            FrequencyKey::single(5.0e9),
        ];
        keys.sort();
        let hz: Vec<f64> = keys.iter().filter_map(|k| k.as_single()).map(|f| f.hz()).collect();
        assert_eq!(hz, vec![1.4e9, 5.0e9, 8.4e9]);
    }

    #[test]
    fn lambda_sq_matches_definition() {
        let f = Frequency(SPEED_OF_LIGHT);
        assert!((f.lambda_sq() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stokes_labels() {
        assert_eq!(Stokes::RotationMeasure.to_string(), "ROTM");
        assert_eq!(Stokes::Q.to_string(), "Q");
    }
}
