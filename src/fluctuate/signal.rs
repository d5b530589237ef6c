//! Harmonic signal synthesis

use std::f32::consts::TAU;

/// Sample the averaged sine stack driving one fluctuation axis at time `t`.
///
/// Harmonic `j` runs at `frequency / ratio^j`, so each successive harmonic is
/// slower by `ratio`; averaging keeps the output in `[-1, 1]`. An irrational
/// ratio such as [`GOLDEN_RATIO`](crate::math::GOLDEN_RATIO) keeps the stack
/// from repeating.
#[must_use]
pub fn harmonic_signal(t: f32, frequency: f32, harmonics: u32, ratio: f32) -> f32 {
    if harmonics == 0 {
        return 0.0;
    }
    let ratio = ratio.max(f32::EPSILON);

    let mut sum = 0.0;
    for j in 0..harmonics {
        sum += (TAU * t * frequency / ratio.powi(j as i32)).sin();
    }
    sum / harmonics as f32
}
