//! Common ECS components

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::physics::ColliderHandle;

/// Transform component for position, rotation, and scale
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Transform {
    /// Create a new transform at the origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Get the transformation matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Get the right direction (positive X in local space)
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y in local space)
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Translate by a delta
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Name component for logs and warnings
#[derive(Debug, Clone)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Links an entity to the physics collider it owns
#[derive(Debug, Clone, Copy)]
pub struct ColliderRef(pub ColliderHandle);

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_matrix_applies_position_and_rotation() {
        let transform =
            Transform::from_position_rotation(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(FRAC_PI_2));
        let moved = transform.matrix().transform_point3(Vec3::X);
        assert!((moved - Vec3::new(1.0, 2.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotated_basis_vectors() {
        let mut transform = Transform::from_position(Vec3::ZERO);
        transform.rotation = Quat::from_rotation_y(FRAC_PI_2);
        assert!((transform.forward() - Vec3::NEG_X).length() < 1e-5);
        assert!((transform.right() - Vec3::NEG_Z).length() < 1e-5);
        assert!((transform.up() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_translate_accumulates() {
        let mut transform = Transform::new();
        transform.translate(Vec3::X);
        transform.translate(Vec3::Y);
        assert_eq!(transform.position, Vec3::new(1.0, 1.0, 0.0));
    }
}
