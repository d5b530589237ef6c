//! Surface velocity behaviors
//!
//! Conveyor, burrow and walk: answers to one question, asked per contact by
//! the physics bridge. At a world-space point on a body's surface, with the
//! outward normal known, how fast is the surface material moving?

mod motion;
mod velocity;

pub use motion::{SurfaceMotion, configuration_warnings};
pub use velocity::{Burrow, Conveyor, SurfaceBehavior, SurfaceVelocity, Walk};
