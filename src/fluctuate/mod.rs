//! Procedural fluctuation motion
//!
//! A small set of randomly oriented, re-seeding oscillation axes each drives
//! an averaged sine stack; their weighted blend sways an entity's translation
//! around an anchor. Useful for floating pickups, drifting lights, idle
//! hover and similar ambient motion.

mod axis;
mod motion;
mod signal;

pub use axis::FluctuationAxis;
pub use motion::{Fluctuate, FluctuateParams, update};
pub use signal::harmonic_signal;
