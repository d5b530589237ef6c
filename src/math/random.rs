//! Random direction sampling

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Draw a direction uniformly distributed on the unit sphere.
///
/// Azimuth uniform in `[0, tau)`, cosine of the inclination uniform in
/// `[-1, 1]`.
pub fn random_unit_vector(rng: &mut impl Rng) -> Vec3 {
    let phi = rng.random_range(0.0..TAU);
    let cos_theta = rng.random_range(-1.0_f32..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}
