//! The surface motion component and wiring checks

use serde::{Deserialize, Serialize};

use crate::ecs::{ColliderRef, Name};

use super::velocity::SurfaceBehavior;

/// Binds a surface velocity behavior to an entity's collider.
///
/// The physics bridge picks these up on sync; see
/// [`SurfaceTable::sync`](crate::physics::SurfaceTable::sync).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SurfaceMotion {
    /// The behavior evaluated at each solver contact
    pub behavior: SurfaceBehavior,
    /// Disabled motions stay attached but are unregistered from the solver
    pub enabled: bool,
}

impl SurfaceMotion {
    /// Enabled motion around `behavior`
    #[must_use]
    pub fn new(behavior: impl Into<SurfaceBehavior>) -> Self {
        Self {
            behavior: behavior.into(),
            enabled: true,
        }
    }
}

/// Report entities whose surface motion cannot reach the solver.
///
/// The editor-style wiring check: a [`SurfaceMotion`] without a
/// [`ColliderRef`] has no physics surface to act on.
#[must_use]
pub fn configuration_warnings(world: &hecs::World) -> Vec<String> {
    let mut warnings = Vec::new();
    for (entity, (_, collider, name)) in world
        .query::<(&SurfaceMotion, Option<&ColliderRef>, Option<&Name>)>()
        .iter()
    {
        if collider.is_none() {
            let label = name.map_or_else(|| format!("{entity:?}"), |name| name.0.clone());
            warnings.push(format!(
                "surface motion on {label} has no collider to act on"
            ));
        }
    }
    warnings
}
