//! Math helpers shared by the motion behaviors

mod random;
mod separation;

pub use random::random_unit_vector;
pub use separation::{axis_chord, chord_for_angle, separated_axis};

/// Ratio between successive harmonic frequencies in a fluctuation signal
pub const GOLDEN_RATIO: f32 = 1.618_034;
