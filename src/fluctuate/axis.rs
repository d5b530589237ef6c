//! A single oscillation axis

use glam::Vec3;
use rand::Rng;

/// One re-seedable oscillation axis of a fluctuation effect.
///
/// The axis accumulates time while it lives; `time_offset` decorrelates the
/// sine stacks of axes seeded in the same frame.
#[derive(Debug, Clone, Copy)]
pub struct FluctuationAxis {
    /// Unit direction the signal oscillates along
    pub axis: Vec3,
    /// Seconds lived since the last re-seed
    pub time: f32,
    /// Random phase offset in `[0, 1)`, drawn at each re-seed
    pub time_offset: f32,
}

impl FluctuationAxis {
    /// Create an axis already `time` seconds into its life, as the staggered
    /// initial setup does
    pub fn new(time: f32, axis: Vec3, rng: &mut impl Rng) -> Self {
        let mut flux = Self {
            axis: Vec3::Z,
            time: 0.0,
            time_offset: 0.0,
        };
        flux.reset(time, axis, rng);
        flux
    }

    /// Re-seed the axis: new direction, new phase, life restarted at `time`
    pub fn reset(&mut self, time: f32, axis: Vec3, rng: &mut impl Rng) {
        self.time = time;
        self.time_offset = rng.random();
        self.axis = axis.normalize_or_zero();
    }

    /// Fraction of `lifetime` already lived; `1.0` means due for a re-seed
    #[must_use]
    pub fn life(&self, lifetime: f32) -> f32 {
        if lifetime <= 0.0 {
            return 1.0;
        }
        self.time / lifetime
    }
}
