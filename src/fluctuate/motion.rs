//! The fluctuation component and its update system

use glam::{Quat, Vec3};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::ecs::Transform;
use crate::math::{GOLDEN_RATIO, separated_axis};

use super::axis::FluctuationAxis;
use super::signal::harmonic_signal;

/// Candidate draws per axis re-seed before settling for the best separation
const SEPARATION_ATTEMPTS: u32 = 8;

/// Tuning parameters for a fluctuation effect
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FluctuateParams {
    /// Nominal number of oscillation axes. The live set holds one more so
    /// the staggered lifetimes always overlap. Changes to the count apply on
    /// the next enable.
    pub axis_count: usize,
    /// Seconds an axis lives before it is re-seeded
    pub axis_lifetime: f32,
    /// Number of summed sine harmonics per axis
    pub harmonics: u32,
    /// Frequency divisor between successive harmonics
    pub harmonic_ratio: f32,
    /// Base oscillation frequency in hertz
    pub frequency: f32,
    /// Peak displacement scale
    pub magnitude: f32,
    /// Fixed rotation applied to the blended displacement
    pub offset_rotation: Quat,
    /// Fixed translation added on top of the anchor
    pub offset_translation: Vec3,
}

impl Default for FluctuateParams {
    fn default() -> Self {
        Self {
            axis_count: 3,
            axis_lifetime: 1.0,
            harmonics: 3,
            harmonic_ratio: GOLDEN_RATIO,
            frequency: 0.5,
            magnitude: 1.0,
            offset_rotation: Quat::IDENTITY,
            offset_translation: Vec3::ZERO,
        }
    }
}

impl FluctuateParams {
    /// Set the peak displacement scale
    #[must_use]
    pub fn with_magnitude(mut self, magnitude: f32) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// Set the base oscillation frequency in hertz
    #[must_use]
    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// Set the number of oscillation axes
    #[must_use]
    pub fn with_axis_count(mut self, axis_count: usize) -> Self {
        self.axis_count = axis_count;
        self
    }

    /// Set the axis lifetime in seconds
    #[must_use]
    pub fn with_axis_lifetime(mut self, axis_lifetime: f32) -> Self {
        self.axis_lifetime = axis_lifetime;
        self
    }

    /// Set the harmonic count and the frequency divisor between harmonics
    #[must_use]
    pub fn with_harmonics(mut self, harmonics: u32, harmonic_ratio: f32) -> Self {
        self.harmonics = harmonics;
        self.harmonic_ratio = harmonic_ratio;
        self
    }

    /// Set the fixed rotation and translation applied to the displacement
    #[must_use]
    pub fn with_offset(mut self, rotation: Quat, translation: Vec3) -> Self {
        self.offset_rotation = rotation;
        self.offset_translation = translation;
        self
    }
}

/// Procedural oscillation of an entity's translation.
///
/// A handful of randomly oriented axes each drives an averaged sine stack;
/// their weighted blend displaces the entity around an anchor captured from
/// its transform the first time the effect runs. Each axis fades in and out
/// over its life and is re-seeded in a fresh direction when it expires, so
/// the motion never repeats and never pops.
#[derive(Debug, Clone)]
pub struct Fluctuate {
    /// Effect tuning, safe to edit between updates
    pub params: FluctuateParams,
    enabled: bool,
    axes: SmallVec<[FluctuationAxis; 4]>,
    rng: SmallRng,
    anchor: Option<Vec3>,
}

impl Fluctuate {
    /// Create an enabled effect with a randomly seeded axis set
    #[must_use]
    pub fn new(params: FluctuateParams) -> Self {
        Self::with_rng(params, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Create an enabled effect with a deterministic axis sequence
    #[must_use]
    pub fn with_seed(params: FluctuateParams, seed: u64) -> Self {
        Self::with_rng(params, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(params: FluctuateParams, rng: SmallRng) -> Self {
        let mut flux = Self {
            params,
            enabled: true,
            axes: SmallVec::new(),
            rng,
            anchor: None,
        };
        flux.setup();
        flux
    }

    /// Seed `axis_count + 1` axes with evenly staggered ages, so expiries
    /// spread out instead of arriving in one frame
    fn setup(&mut self) {
        self.axes.clear();
        if self.params.axis_count == 0 {
            return;
        }

        let len = self.params.axis_count + 1;
        let age_step = self.params.axis_lifetime / len as f32;
        let min_angle = self.min_separation();

        let mut placed: SmallVec<[Vec3; 4]> = SmallVec::new();
        for n in 0..len {
            let axis = separated_axis(&mut self.rng, &placed, min_angle, SEPARATION_ATTEMPTS);
            placed.push(axis);
            self.axes
                .push(FluctuationAxis::new(age_step * n as f32, axis, &mut self.rng));
        }
    }

    /// Minimum angle kept between axes; tighter packs allow closer neighbors
    fn min_separation(&self) -> f32 {
        FRAC_PI_2 / self.params.axis_count.max(1) as f32
    }

    /// Whether the effect is currently driving its entity
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the effect.
    ///
    /// Enabling seeds a fresh staggered axis set; disabling clears it and
    /// leaves the transform wherever the last update put it.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.setup();
        } else {
            self.axes.clear();
        }
    }

    /// Forget the captured anchor; the next update re-captures it from the
    /// entity's current transform
    pub fn rebase(&mut self) {
        self.anchor = None;
    }

    /// Anchor position the displacement plays around, once captured
    #[must_use]
    pub fn anchor(&self) -> Option<Vec3> {
        self.anchor
    }

    /// Number of live axes
    #[must_use]
    pub fn axis_len(&self) -> usize {
        self.axes.len()
    }

    /// Advance the effect by `dt` seconds and return the blended displacement.
    ///
    /// Expired axes are re-seeded away from the surviving ones and sit out
    /// the frame with zero weight; the sine life weight guarantees they had
    /// already faded out on the way there. The result stays within
    /// `magnitude` of zero.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        if !self.enabled || self.axes.is_empty() {
            return Vec3::ZERO;
        }

        let params = self.params;
        let mut blend = Vec3::ZERO;
        let mut weight_sum = 0.0;
        let mut expired: SmallVec<[usize; 4]> = SmallVec::new();

        for (n, flux) in self.axes.iter_mut().enumerate() {
            flux.time += dt;

            if flux.life(params.axis_lifetime) >= 1.0 {
                expired.push(n);
                continue;
            }

            let signal = harmonic_signal(
                flux.time + flux.time_offset,
                params.frequency,
                params.harmonics,
                params.harmonic_ratio,
            );
            let weight = (flux.life(params.axis_lifetime) * PI).sin();

            blend += flux.axis * signal * weight;
            weight_sum += weight;
        }

        let min_angle = self.min_separation();
        for n in expired {
            let others: SmallVec<[Vec3; 4]> = self
                .axes
                .iter()
                .enumerate()
                .filter(|(m, _)| *m != n)
                .map(|(_, flux)| flux.axis)
                .collect();
            let axis = separated_axis(&mut self.rng, &others, min_angle, SEPARATION_ATTEMPTS);
            self.axes[n].reset(0.0, axis, &mut self.rng);
        }

        if weight_sum > 0.0 {
            blend *= params.magnitude / weight_sum;
        }
        blend / self.params.axis_count.max(1) as f32
    }
}

/// Drive every enabled fluctuation in `world` and write the displaced
/// positions back to the transforms.
///
/// Call once per frame with the frame's delta time.
pub fn update(world: &mut hecs::World, dt: f32) {
    for (_entity, (flux, transform)) in world.query_mut::<(&mut Fluctuate, &mut Transform)>() {
        if !flux.enabled() {
            continue;
        }
        let anchor = *flux.anchor.get_or_insert(transform.position);
        let displacement = flux.advance(dt);
        transform.position =
            anchor + flux.params.offset_translation + flux.params.offset_rotation * displacement;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{axis_chord, chord_for_angle};

    #[test]
    fn test_setup_staggers_axis_ages() {
        let flux = Fluctuate::with_seed(FluctuateParams::default(), 42);
        assert_eq!(flux.axis_len(), 4);
        for (n, axis) in flux.axes.iter().enumerate() {
            assert!((axis.time - 0.25 * n as f32).abs() < 1e-6);
            assert!((axis.axis.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_setup_spreads_axes_apart() {
        // The sampler promises the best candidate it saw, not a hard floor,
        // so check that no two axes ended up near the same line
        let flux = Fluctuate::with_seed(FluctuateParams::default(), 42);
        for (n, a) in flux.axes.iter().enumerate() {
            for b in flux.axes.iter().skip(n + 1) {
                assert!(axis_chord(a.axis, b.axis) > 0.1);
            }
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let params = FluctuateParams::default();
        let mut a = Fluctuate::with_seed(params, 7);
        let mut b = Fluctuate::with_seed(params, 7);
        for _ in 0..100 {
            assert_eq!(a.advance(1.0 / 60.0), b.advance(1.0 / 60.0));
        }
    }

    #[test]
    fn test_displacement_bounded_by_magnitude() {
        let params = FluctuateParams::default().with_magnitude(0.75);
        let mut flux = Fluctuate::with_seed(params, 19);
        for _ in 0..500 {
            let d = flux.advance(0.013);
            assert!(d.length() <= 0.75 + 1e-4);
        }
    }

    #[test]
    fn test_axes_reseed_after_lifetime() {
        let mut flux = Fluctuate::with_seed(FluctuateParams::default(), 3);
        let first: Vec<Vec3> = flux.axes.iter().map(|a| a.axis).collect();
        for _ in 0..180 {
            flux.advance(1.0 / 60.0);
        }
        // Three seconds against a one second lifetime: every slot re-seeded
        for (n, axis) in flux.axes.iter().enumerate() {
            assert!(axis.time < 1.0);
            assert_ne!(first[n], axis.axis);
        }
    }

    #[test]
    fn test_zero_axes_is_inert() {
        let params = FluctuateParams::default().with_axis_count(0);
        let mut flux = Fluctuate::with_seed(params, 1);
        assert_eq!(flux.axis_len(), 0);
        for _ in 0..10 {
            assert_eq!(flux.advance(0.1), Vec3::ZERO);
        }
    }

    #[test]
    fn test_zero_lifetime_stays_finite() {
        let params = FluctuateParams::default().with_axis_lifetime(0.0);
        let mut flux = Fluctuate::with_seed(params, 1);
        for _ in 0..10 {
            let d = flux.advance(0.016);
            assert!(d.is_finite());
            assert_eq!(d, Vec3::ZERO);
        }
    }

    #[test]
    fn test_disable_clears_and_enable_reseeds() {
        let mut flux = Fluctuate::with_seed(FluctuateParams::default(), 11);
        flux.set_enabled(false);
        assert_eq!(flux.axis_len(), 0);
        assert_eq!(flux.advance(0.1), Vec3::ZERO);
        flux.set_enabled(true);
        assert_eq!(flux.axis_len(), 4);
    }

    #[test]
    fn test_update_sways_around_anchor() {
        let mut world = hecs::World::new();
        let start = Vec3::new(5.0, 2.0, -1.0);
        let entity = world.spawn((
            Transform::from_position(start),
            Fluctuate::with_seed(FluctuateParams::default(), 23),
        ));

        let mut moved = false;
        for _ in 0..60 {
            update(&mut world, 1.0 / 60.0);
            let transform = world.get::<&Transform>(entity).unwrap();
            assert!((transform.position - start).length() <= 1.0 + 1e-4);
            if (transform.position - start).length() > 1e-5 {
                moved = true;
            }
        }
        assert!(moved);

        let flux = world.get::<&Fluctuate>(entity).unwrap();
        assert_eq!(flux.anchor(), Some(start));
    }

    #[test]
    fn test_offset_shifts_displacement() {
        let mut world = hecs::World::new();
        let start = Vec3::ZERO;
        let offset = Vec3::new(0.0, 10.0, 0.0);
        let params = FluctuateParams::default().with_offset(Quat::IDENTITY, offset);
        let entity = world.spawn((Transform::from_position(start), Fluctuate::with_seed(params, 2)));

        update(&mut world, 1.0 / 60.0);
        let transform = world.get::<&Transform>(entity).unwrap();
        assert!((transform.position - offset).length() <= 1.0 + 1e-4);
    }

    #[test]
    fn test_rebase_recaptures_anchor() {
        let mut world = hecs::World::new();
        let entity = world.spawn((
            Transform::from_position(Vec3::ZERO),
            Fluctuate::with_seed(FluctuateParams::default(), 31),
        ));
        update(&mut world, 1.0 / 60.0);

        {
            let mut transform = world.get::<&mut Transform>(entity).unwrap();
            transform.position = Vec3::new(100.0, 0.0, 0.0);
        }
        world.get::<&mut Fluctuate>(entity).unwrap().rebase();

        update(&mut world, 1.0 / 60.0);
        let transform = world.get::<&Transform>(entity).unwrap();
        assert!((transform.position - Vec3::new(100.0, 0.0, 0.0)).length() <= 1.0 + 1e-4);
    }
}
