//! Physics simulation module
//!
//! Built on top of rapier3d, plus the bridge that feeds surface velocities
//! into its contact solver

mod surfaces;
mod world;

pub use surfaces::SurfaceTable;
pub use world::{ColliderHandle, Physics, RaycastHit, RigidBodyHandle};
