//! Angular separation between oscillation axes
//!
//! Axes compare as lines rather than rays: a fluctuation swings both ways
//! along its axis, so `a` and `-a` are the same axis.

use glam::Vec3;
use rand::Rng;
use std::f32::consts::PI;

use super::random_unit_vector;

/// Chord length between two unit vectors separated by `angle` radians.
///
/// Law of sines on the isosceles triangle spanned by the two unit vectors:
/// `c / sin(angle) = 1 / sin((pi - angle) / 2)`. Comparing chord lengths
/// against this value tests separation without an `acos` per candidate.
#[must_use]
pub fn chord_for_angle(angle: f32) -> f32 {
    let base = ((PI - angle) * 0.5).sin();
    if base <= f32::EPSILON {
        // angle ~= pi, the chord of antipodal unit vectors
        return 2.0;
    }
    angle.sin() / base
}

/// Separation chord between two axes, treating each as a line.
#[must_use]
pub fn axis_chord(a: Vec3, b: Vec3) -> f32 {
    (a - b).length().min((a + b).length())
}

/// Draw a random axis at least `min_angle` radians away from every axis in
/// `existing`.
///
/// Rejection-samples up to `attempts` candidates and returns the first one
/// clearing the threshold, or the best-separated candidate seen, so the call
/// always yields a usable axis.
pub fn separated_axis(
    rng: &mut impl Rng,
    existing: &[Vec3],
    min_angle: f32,
    attempts: u32,
) -> Vec3 {
    let min_chord = chord_for_angle(min_angle);

    let mut best = Vec3::Z;
    let mut best_chord = -1.0_f32;

    for _ in 0..attempts.max(1) {
        let candidate = random_unit_vector(rng);
        let nearest = existing
            .iter()
            .map(|axis| axis_chord(candidate, *axis))
            .fold(f32::INFINITY, f32::min);

        if nearest >= min_chord {
            return candidate;
        }
        if nearest > best_chord {
            best_chord = nearest;
            best = candidate;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_3};

    #[test]
    fn test_chord_matches_known_triangles() {
        // An equilateral triangle: 60 degrees between unit sides, unit chord
        assert!((chord_for_angle(FRAC_PI_3) - 1.0).abs() < 1e-6);
        assert!((chord_for_angle(FRAC_PI_2) - 2.0_f32.sqrt()).abs() < 1e-6);
        assert!(chord_for_angle(0.0).abs() < 1e-6);
        assert!((chord_for_angle(PI) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_chord_grows_with_angle() {
        let mut previous = -1.0;
        for n in 0..=16 {
            let chord = chord_for_angle(PI * n as f32 / 16.0);
            assert!(chord > previous);
            previous = chord;
        }
    }

    #[test]
    fn test_axis_chord_ignores_sign() {
        let a = Vec3::X;
        assert!(axis_chord(a, -a).abs() < 1e-6);
        assert!((axis_chord(a, Vec3::Y) - 2.0_f32.sqrt()).abs() < 1e-6);
        assert!((axis_chord(a, a) - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_separated_axis_clears_threshold() {
        let mut rng = SmallRng::seed_from_u64(3);
        let existing = [Vec3::X, Vec3::Y];
        let min_chord = chord_for_angle(FRAC_PI_3 * 0.5);
        for _ in 0..32 {
            let axis = separated_axis(&mut rng, &existing, FRAC_PI_3 * 0.5, 16);
            assert!((axis.length() - 1.0).abs() < 1e-5);
            for other in existing {
                assert!(axis_chord(axis, other) >= min_chord);
            }
        }
    }

    #[test]
    fn test_separated_axis_with_no_neighbors() {
        let mut rng = SmallRng::seed_from_u64(9);
        let axis = separated_axis(&mut rng, &[], FRAC_PI_2, 4);
        assert!((axis.length() - 1.0).abs() < 1e-5);
    }
}
