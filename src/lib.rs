//! Procedural motion behaviors for hecs + rapier3d games
//!
//! This crate provides:
//! - Fluctuation: a blended stack of re-seeding sine oscillators that sways
//!   an entity's translation around an anchor
//! - Surface velocities: conveyor, burrow and walk behaviors evaluated per
//!   contact and fed into rapier3d's friction solver
//! - Motion profiles: RON/JSON presets for tuning behaviors as data

pub mod config;
pub mod ecs;
pub mod fluctuate;
pub mod math;
pub mod physics;
pub mod surface;

// Re-exports for convenience
pub use glam;
pub use hecs;
pub use rapier3d;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{MotionProfile, ProfileError};
    pub use crate::ecs::{ColliderRef, Name, Transform};
    pub use crate::fluctuate::{Fluctuate, FluctuateParams};
    pub use crate::physics::{
        ColliderHandle, Physics, RaycastHit, RigidBodyHandle, SurfaceTable,
    };
    pub use crate::surface::{
        Burrow, Conveyor, SurfaceBehavior, SurfaceMotion, SurfaceVelocity, Walk,
    };
    pub use glam::{Quat, Vec3};
}
