//! The surface velocity trait and its behaviors

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Velocity of a body's surface material at a contact point.
///
/// `point` and `normal` are world-space; `normal` is the outward normal of
/// the carrying surface at the contact. `rotation` is the carrying body's
/// world rotation, consulted by the `*_relative` flags.
pub trait SurfaceVelocity {
    /// Linear material velocity at the contact
    fn linear_velocity(&self, point: Vec3, normal: Vec3, rotation: Quat) -> Vec3;

    /// Angular material velocity at the contact; zero for most behaviors
    fn angular_velocity(&self, _point: Vec3, _normal: Vec3, _rotation: Quat) -> Vec3 {
        Vec3::ZERO
    }
}

/// Belt-style flow: the surface material circulates around a fixed axle.
///
/// The flow at a contact is perpendicular to both the axle and the surface
/// normal, so one conveyor drives its top and bottom faces in opposite
/// directions, like the loop of a real belt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Conveyor {
    /// Axle the belt wraps around
    pub axis: Vec3,
    /// Interpret `axis` in the body's local frame
    pub axis_relative: bool,
    /// Surface speed in units per second
    pub speed: f32,
}

impl Conveyor {
    /// Belt around a world-space `axis` at `speed`
    #[must_use]
    pub fn new(axis: Vec3, speed: f32) -> Self {
        Self {
            axis,
            axis_relative: false,
            speed,
        }
    }
}

impl Default for Conveyor {
    fn default() -> Self {
        Self {
            axis: Vec3::Z,
            axis_relative: false,
            speed: 1.0,
        }
    }
}

impl SurfaceVelocity for Conveyor {
    fn linear_velocity(&self, _point: Vec3, normal: Vec3, rotation: Quat) -> Vec3 {
        let axis = if self.axis_relative {
            rotation * self.axis
        } else {
            self.axis
        };
        axis.cross(normal).normalize_or_zero() * self.speed
    }
}

/// Directional flow: the surface material streams along a fixed direction,
/// projected into the surface, as if the body were tunnelling that way.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Burrow {
    /// Travel direction of the surface material
    pub direction: Vec3,
    /// Interpret `direction` in the body's local frame
    pub direction_relative: bool,
    /// Surface speed in units per second
    pub speed: f32,
}

impl Burrow {
    /// Stream along a world-space `direction` at `speed`
    #[must_use]
    pub fn new(direction: Vec3, speed: f32) -> Self {
        Self {
            direction,
            direction_relative: false,
            speed,
        }
    }
}

impl Default for Burrow {
    fn default() -> Self {
        Self {
            direction: Vec3::X,
            direction_relative: false,
            speed: 1.0,
        }
    }
}

impl SurfaceVelocity for Burrow {
    fn linear_velocity(&self, _point: Vec3, normal: Vec3, rotation: Quat) -> Vec3 {
        let direction = if self.direction_relative {
            rotation * self.direction
        } else {
            self.direction
        };
        let direction = direction.normalize_or_zero();
        (direction - normal * normal.dot(direction)) * self.speed
    }
}

/// Ground-locomotion flow for a body that walks on whatever it touches.
///
/// Contacts opposing `up` get the full travel speed; traction fades to zero
/// as the contact normal turns sideways, so walls and ceilings give no push.
/// A nonzero `turn_speed` additionally spins the contact around `up`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Walk {
    /// Travel direction of the surface material
    pub direction: Vec3,
    /// Interpret `direction` in the body's local frame
    pub direction_relative: bool,
    /// Which way is up for this walker
    pub up: Vec3,
    /// Interpret `up` in the body's local frame
    pub up_relative: bool,
    /// Spin rate around `up` in radians per second
    pub turn_speed: f32,
    /// Travel speed in units per second
    pub speed: f32,
}

impl Walk {
    /// Walk along a world-space `direction` at `speed`, with `Vec3::Y` up
    #[must_use]
    pub fn new(direction: Vec3, speed: f32) -> Self {
        Self {
            direction,
            direction_relative: false,
            up: Vec3::Y,
            up_relative: false,
            turn_speed: 0.0,
            speed,
        }
    }

    /// Resolved world-space travel direction and unit up vector
    fn frame(&self, rotation: Quat) -> (Vec3, Vec3) {
        let direction = if self.direction_relative {
            rotation * self.direction
        } else {
            self.direction
        };
        let up = if self.up_relative {
            rotation * self.up
        } else {
            self.up
        };
        (direction, up.normalize_or_zero())
    }

    /// Grip against a surface: full when the normal opposes `up`, zero once
    /// the normal turns perpendicular or beyond
    fn traction(up: Vec3, normal: Vec3) -> f32 {
        (-up.dot(normal)).max(0.0)
    }
}

impl SurfaceVelocity for Walk {
    fn linear_velocity(&self, _point: Vec3, normal: Vec3, rotation: Quat) -> Vec3 {
        let (direction, up) = self.frame(rotation);
        let traction = Self::traction(up, normal);

        // Travel happens in the plane perpendicular to up, then follows the
        // contact surface
        let direction = direction - up * up.dot(direction);
        let direction = direction.normalize_or_zero();
        let direction = direction - normal * normal.dot(direction);

        direction * self.speed * traction
    }

    fn angular_velocity(&self, _point: Vec3, normal: Vec3, rotation: Quat) -> Vec3 {
        let (_, up) = self.frame(rotation);
        up * Self::traction(up, normal) * self.turn_speed
    }
}

/// A surface behavior in the closed form components and profiles store
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SurfaceBehavior {
    /// Belt flow around an axle
    Conveyor(Conveyor),
    /// Directional tunnelling flow
    Burrow(Burrow),
    /// Ground locomotion flow
    Walk(Walk),
}

impl SurfaceVelocity for SurfaceBehavior {
    fn linear_velocity(&self, point: Vec3, normal: Vec3, rotation: Quat) -> Vec3 {
        match self {
            Self::Conveyor(behavior) => behavior.linear_velocity(point, normal, rotation),
            Self::Burrow(behavior) => behavior.linear_velocity(point, normal, rotation),
            Self::Walk(behavior) => behavior.linear_velocity(point, normal, rotation),
        }
    }

    fn angular_velocity(&self, point: Vec3, normal: Vec3, rotation: Quat) -> Vec3 {
        match self {
            Self::Conveyor(behavior) => behavior.angular_velocity(point, normal, rotation),
            Self::Burrow(behavior) => behavior.angular_velocity(point, normal, rotation),
            Self::Walk(behavior) => behavior.angular_velocity(point, normal, rotation),
        }
    }
}

impl From<Conveyor> for SurfaceBehavior {
    fn from(behavior: Conveyor) -> Self {
        Self::Conveyor(behavior)
    }
}

impl From<Burrow> for SurfaceBehavior {
    fn from(behavior: Burrow) -> Self {
        Self::Burrow(behavior)
    }
}

impl From<Walk> for SurfaceBehavior {
    fn from(behavior: Walk) -> Self {
        Self::Walk(behavior)
    }
}
