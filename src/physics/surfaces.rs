//! Feeding surface velocities into the contact solver
//!
//! rapier calls `modify_solver_contacts` for every contact pair in which at
//! least one collider carries the `MODIFY_SOLVER_CONTACTS` flag. Writing a
//! solver contact's `tangent_velocity` tells the friction solver what
//! relative tangential velocity to drive the pair toward, which is exactly
//! what a conveyor belt or a walking foot needs. The table tracks which
//! colliders carry which behavior and does that arithmetic per contact.

use glam::Vec3;
use rapier3d::prelude::*;
use rustc_hash::FxHashMap;

use crate::ecs::ColliderRef;
use crate::surface::{SurfaceMotion, SurfaceVelocity};

use super::world::{Physics, point_from_rapier, quat_from_rapier, vec_from_rapier, vec_to_rapier};
// Shadows the rapier handle from the prelude; the table speaks this crate's
// handle type
use super::world::ColliderHandle;

/// Collider-to-behavior bindings, installed as the solver's physics hooks
/// during [`Physics::step_with_surfaces`].
#[derive(Default)]
pub struct SurfaceTable {
    table: FxHashMap<ColliderHandle, SurfaceMotion>,
}

impl SurfaceTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: FxHashMap::default(),
        }
    }

    /// Number of registered colliders
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether no collider is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Whether `collider` is registered
    #[must_use]
    pub fn contains(&self, collider: ColliderHandle) -> bool {
        self.table.contains_key(&collider)
    }

    /// Bind a behavior straight to a collider, outside the ECS path
    pub fn insert(
        &mut self,
        physics: &mut Physics,
        collider: ColliderHandle,
        motion: SurfaceMotion,
    ) {
        physics.set_surface_hooks(collider, true);
        self.table.insert(collider, motion);
    }

    /// Drop a binding and clear the collider's hook flag
    pub fn remove(&mut self, physics: &mut Physics, collider: ColliderHandle) {
        if self.table.remove(&collider).is_some() {
            physics.set_surface_hooks(collider, false);
        }
    }

    /// Reconcile the table with the ECS.
    ///
    /// Every entity carrying an enabled [`SurfaceMotion`] and a
    /// [`ColliderRef`] to a live collider ends up registered; every other
    /// binding is dropped. Attaching, detaching, enabling, disabling and
    /// despawning all funnel through here, so one call per frame keeps the
    /// solver in agreement with the world.
    pub fn sync(&mut self, world: &hecs::World, physics: &mut Physics) {
        let mut next: FxHashMap<ColliderHandle, SurfaceMotion> = FxHashMap::default();

        for (_entity, (motion, collider)) in
            world.query::<(&SurfaceMotion, &ColliderRef)>().iter()
        {
            if motion.enabled && physics.has_collider(collider.0) {
                next.insert(collider.0, *motion);
            }
        }

        for handle in self.table.keys() {
            if !next.contains_key(handle) {
                physics.set_surface_hooks(*handle, false);
                log::debug!("surface motion unbound from {:?}", handle.0);
            }
        }
        for handle in next.keys() {
            if !self.table.contains_key(handle) {
                physics.set_surface_hooks(*handle, true);
                log::debug!("surface motion bound to {:?}", handle.0);
            }
        }

        self.table = next;
    }

    /// Material velocity of `collider`'s surface at a world-space contact.
    ///
    /// `outward_normal` points away from the collider's surface. Angular
    /// behavior contributions pivot around the carrying body's origin.
    fn material_velocity(
        &self,
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        collider: ColliderHandle,
        point: Vec3,
        outward_normal: Vec3,
    ) -> Vec3 {
        let Some(motion) = self.table.get(&collider) else {
            return Vec3::ZERO;
        };
        if !motion.enabled {
            return Vec3::ZERO;
        }
        let Some(shape) = colliders.get(collider.0) else {
            return Vec3::ZERO;
        };

        let (rotation, origin) = match shape.parent().and_then(|body| bodies.get(body)) {
            Some(body) => (
                quat_from_rapier(body.rotation()),
                vec_from_rapier(body.translation()),
            ),
            None => (
                quat_from_rapier(&shape.position().rotation),
                vec_from_rapier(&shape.position().translation.vector),
            ),
        };

        let linear = motion.behavior.linear_velocity(point, outward_normal, rotation);
        let spin = motion.behavior.angular_velocity(point, outward_normal, rotation);

        linear + spin.cross(point - origin)
    }
}

impl PhysicsHooks for SurfaceTable {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let first = ColliderHandle(context.collider1);
        let second = ColliderHandle(context.collider2);
        if !self.contains(first) && !self.contains(second) {
            return;
        }

        // The manifold normal points out of the first collider
        let normal = vec_from_rapier(context.normal);

        for contact in context.solver_contacts.iter_mut() {
            let point = point_from_rapier(&contact.point);
            let of_first =
                self.material_velocity(context.bodies, context.colliders, first, point, normal);
            let of_second =
                self.material_velocity(context.bodies, context.colliders, second, point, -normal);

            // No slip against moving surface material: the pair's relative
            // tangential velocity is driven toward the material difference
            contact.tangent_velocity = vec_to_rapier(of_first - of_second);
        }
    }
}
