//! Physics simulation using rapier3d

use glam::{Quat, Vec3};
use nalgebra::UnitQuaternion;
use rapier3d::prelude::*;

use super::surfaces::SurfaceTable;

/// Handle to a rigid body in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RigidBodyHandle(pub rapier3d::dynamics::RigidBodyHandle);

/// Handle to a collider in the physics world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderHandle(pub rapier3d::geometry::ColliderHandle);

/// Convert a glam vector to rapier's nalgebra layout
pub(crate) fn vec_to_rapier(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

/// Convert rapier's nalgebra vector back to glam
pub(crate) fn vec_from_rapier(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

/// Convert a rapier point back to glam
pub(crate) fn point_from_rapier(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

/// Convert glam Quat to rapier3d UnitQuaternion
pub(crate) fn quat_to_rapier(q: Quat) -> UnitQuaternion<f32> {
    UnitQuaternion::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
}

/// Convert rapier3d UnitQuaternion to glam Quat
pub(crate) fn quat_from_rapier(uq: &UnitQuaternion<f32>) -> Quat {
    let q = uq.quaternion();
    Quat::from_xyzw(q.i, q.j, q.k, q.w)
}

/// Physics world manager
pub struct Physics {
    /// Gravity vector
    pub gravity: Vec3,
    /// Physics pipeline
    pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase
    broad_phase: DefaultBroadPhase,
    /// Narrow phase
    narrow_phase: NarrowPhase,
    /// Rigid body set
    rigid_body_set: RigidBodySet,
    /// Collider set
    collider_set: ColliderSet,
    /// Impulse joint set
    impulse_joint_set: ImpulseJointSet,
    /// Multibody joint set
    multibody_joint_set: MultibodyJointSet,
    /// CCD solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasting
    query_pipeline: QueryPipeline,
    /// Integration parameters
    integration_parameters: IntegrationParameters,
}

impl Physics {
    /// Create a new physics world with default gravity
    pub fn new() -> Self {
        Self::with_gravity(Vec3::new(0.0, -9.81, 0.0))
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            gravity,
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            integration_parameters: IntegrationParameters::default(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self, dt: f32) {
        self.step_inner(dt, &());
    }

    /// Step the physics simulation with surface velocities installed.
    ///
    /// Colliders registered in `surfaces` feed their material velocity into
    /// the contact solver for this step.
    pub fn step_with_surfaces(&mut self, dt: f32, surfaces: &SurfaceTable) {
        self.step_inner(dt, surfaces);
    }

    fn step_inner(&mut self, dt: f32, hooks: &dyn PhysicsHooks) {
        self.integration_parameters.dt = dt;

        self.pipeline.step(
            &vec_to_rapier(self.gravity),
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            hooks,
            &(),
        );
    }

    /// Create a static rigid body (doesn't move)
    pub fn create_static_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let isometry = Isometry::from_parts(
            nalgebra::Translation3::new(position.x, position.y, position.z),
            quat_to_rapier(rotation),
        );
        let body = RigidBodyBuilder::fixed().position(isometry).build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Create a dynamic rigid body (affected by forces)
    pub fn create_dynamic_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let isometry = Isometry::from_parts(
            nalgebra::Translation3::new(position.x, position.y, position.z),
            quat_to_rapier(rotation),
        );
        let body = RigidBodyBuilder::dynamic().position(isometry).build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Create a kinematic rigid body (controlled directly)
    pub fn create_kinematic_body(&mut self, position: Vec3, rotation: Quat) -> RigidBodyHandle {
        let isometry = Isometry::from_parts(
            nalgebra::Translation3::new(position.x, position.y, position.z),
            quat_to_rapier(rotation),
        );
        let body = RigidBodyBuilder::kinematic_position_based()
            .position(isometry)
            .build();

        RigidBodyHandle(self.rigid_body_set.insert(body))
    }

    /// Add a box collider to a rigid body
    pub fn add_box_collider(
        &mut self,
        body: RigidBodyHandle,
        half_extents: Vec3,
        density: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .density(density)
            .build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Add a sphere collider to a rigid body
    pub fn add_sphere_collider(
        &mut self,
        body: RigidBodyHandle,
        radius: f32,
        density: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::ball(radius).density(density).build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Add a capsule collider to a rigid body
    pub fn add_capsule_collider(
        &mut self,
        body: RigidBodyHandle,
        half_height: f32,
        radius: f32,
        density: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::capsule_y(half_height, radius)
            .density(density)
            .build();

        ColliderHandle(self.collider_set.insert_with_parent(
            collider,
            body.0,
            &mut self.rigid_body_set,
        ))
    }

    /// Whether a collider is still alive
    pub fn has_collider(&self, collider: ColliderHandle) -> bool {
        self.collider_set.contains(collider.0)
    }

    /// Mark or unmark a collider for surface velocity contact modification.
    ///
    /// The solver only consults the surface table for colliders carrying the
    /// modification flag.
    pub fn set_surface_hooks(&mut self, collider: ColliderHandle, active: bool) {
        if let Some(c) = self.collider_set.get_mut(collider.0) {
            if active {
                c.set_active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS);
            } else {
                c.set_active_hooks(ActiveHooks::empty());
            }
        }
    }

    /// Get the position of a rigid body
    pub fn get_position(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(body.0)
            .map(|rb| vec_from_rapier(rb.translation()))
    }

    /// Get the rotation of a rigid body
    pub fn get_rotation(&self, body: RigidBodyHandle) -> Option<Quat> {
        self.rigid_body_set
            .get(body.0)
            .map(|rb| quat_from_rapier(rb.rotation()))
    }

    /// Set the position of a kinematic body
    pub fn set_kinematic_position(&mut self, body: RigidBodyHandle, position: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_next_kinematic_translation(vec_to_rapier(position));
        }
    }

    /// Set the linear velocity of a body
    pub fn set_linear_velocity(&mut self, body: RigidBodyHandle, velocity: Vec3) {
        if let Some(rb) = self.rigid_body_set.get_mut(body.0) {
            rb.set_linvel(vec_to_rapier(velocity), true);
        }
    }

    /// Get the linear velocity of a body
    pub fn get_linear_velocity(&self, body: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(body.0)
            .map(|rb| vec_from_rapier(rb.linvel()))
    }

    /// Cast a ray and return the first hit
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vec_to_rapier(direction),
        );

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                QueryFilter::default(),
            )
            .map(|(handle, distance)| {
                let point = ray.point_at(distance);
                RaycastHit {
                    collider: ColliderHandle(handle),
                    point: point_from_rapier(&point),
                    distance,
                }
            })
    }

    /// Remove a rigid body and its colliders
    pub fn remove_body(&mut self, body: RigidBodyHandle) {
        self.rigid_body_set.remove(
            body.0,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Shared access to the body and collider sets, as the solver hooks see
    /// them
    pub(crate) fn sets(&self) -> (&RigidBodySet, &ColliderSet) {
        (&self.rigid_body_set, &self.collider_set)
    }
}

impl Default for Physics {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a raycast
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// The point of intersection
    pub point: Vec3,
    /// Distance from ray origin
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_pose_round_trip() {
        let mut physics = Physics::new();
        let rotation = Quat::from_rotation_y(0.7);
        let body = physics.create_static_body(Vec3::new(1.0, 2.0, 3.0), rotation);

        let position = physics.get_position(body).unwrap();
        assert!((position - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);

        let back = physics.get_rotation(body).unwrap();
        assert!(back.dot(rotation).abs() > 0.9999);
    }

    #[test]
    fn test_raycast_hits_sphere() {
        let mut physics = Physics::new();
        let body = physics.create_static_body(Vec3::ZERO, Quat::IDENTITY);
        physics.add_sphere_collider(body, 1.0, 1.0);
        // One step so the query pipeline sees the new collider
        physics.step(1.0 / 60.0);

        let hit = physics
            .raycast(Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y, 10.0)
            .unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-3);
        assert!((hit.point - Vec3::Y).length() < 1e-3);

        assert!(physics.raycast(Vec3::new(5.0, 3.0, 0.0), Vec3::NEG_Y, 10.0).is_none());
    }

    #[test]
    fn test_dynamic_capsule_settles_on_ground() {
        let mut physics = Physics::new();
        let ground = physics.create_static_body(Vec3::ZERO, Quat::IDENTITY);
        physics.add_box_collider(ground, Vec3::new(10.0, 0.1, 10.0), 1.0);

        let walker = physics.create_dynamic_body(Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY);
        physics.add_capsule_collider(walker, 0.5, 0.3, 1.0);

        for _ in 0..240 {
            physics.step(1.0 / 60.0);
        }

        // Capsule tip at the ground top: center at 0.1 + 0.5 + 0.3
        let y = physics.get_position(walker).unwrap().y;
        assert!((y - 0.9).abs() < 0.1, "capsule rested at y = {y}");
        assert!(physics.get_linear_velocity(walker).unwrap().length() < 0.1);
    }

    #[test]
    fn test_remove_body_drops_colliders() {
        let mut physics = Physics::new();
        let body = physics.create_dynamic_body(Vec3::ZERO, Quat::IDENTITY);
        let collider = physics.add_sphere_collider(body, 0.5, 1.0);
        assert!(physics.has_collider(collider));

        physics.remove_body(body);
        assert!(physics.get_position(body).is_none());
        assert!(!physics.has_collider(collider));
    }
}
