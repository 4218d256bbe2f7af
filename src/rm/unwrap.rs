//! Greedy ±π unwrapping of polarization angles.
//!
//! The first angle is folded once into [-π/2, π/2]. Every following angle is
//! shifted by whichever of `{0, −π, +π}` brings it closest to its already
//! unwrapped predecessor. Order is the caller's frequency order, not a sorted
//! one. Jumps larger than π/2 between neighbours are not recoverable.
use std::f64::consts::{FRAC_PI_2, PI};

/// Unwrap `phases` in place.
pub fn unwrap_in_place(phases: &mut [f64]) {
    let Some(first) = phases.first_mut() else {
        return;
    };
    if *first > FRAC_PI_2 {
        *first -= PI;
    } else if *first < -FRAC_PI_2 {
        *first += PI;
    }
    for i in 1..phases.len() {
        let diff = phases[i] - phases[i - 1];
        // Ties resolve in the order 0, −π, +π.
        let mut offset = 0.0;
        let mut best = diff.abs();
        for candidate in [-PI, PI] {
            let d = (diff + candidate).abs();
            if d < best {
                best = d;
                offset = candidate;
            }
        }
        phases[i] += offset;
    }
}

/// Unwrapped copy of `phases`.
pub fn unwrap_phases(phases: &[f64]) -> Vec<f64> {
    let mut out = phases.to_vec();
    unwrap_in_place(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_first_value_into_half_pi_range() {
        assert!((unwrap_phases(&[2.0])[0] - (2.0 - PI)).abs() < 1e-12);
        assert!((unwrap_phases(&[-2.0])[0] - (PI - 2.0)).abs() < 1e-12);
        assert_eq!(unwrap_phases(&[1.0])[0], 1.0);
    }

    #[test]
    fn removes_single_pi_jumps() {
        let truth = [0.2, 0.9, 1.4, 1.9];
        let wrapped = [0.2, 0.9, 1.4 - PI, 1.9 - PI];
        let out = unwrap_phases(&wrapped);
        for (o, t) in out.iter().zip(truth) {
            assert!((o - t).abs() < 1e-12, "{o} vs {t}");
        }
    }

    #[test]
    fn idempotent_on_close_sequences() {
        let seq = [0.3, 0.1, -0.4, 0.5, 1.2, 0.9];
        let once = unwrap_phases(&seq);
        assert_eq!(once, seq.to_vec());
        assert_eq!(unwrap_phases(&once), once);
    }

    #[test]
    fn empty_input_is_untouched() {
        assert!(unwrap_phases(&[]).is_empty());
    }
}
