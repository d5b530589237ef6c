//! Motion profiles: file-backed behavior presets
//!
//! A profile bundles the tuning of the motion behaviors so designers can
//! edit them as data. RON (Rusty Object Notation) is the primary format,
//! with JSON supported for external tools.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fluctuate::{Fluctuate, FluctuateParams};
use crate::surface::SurfaceMotion;

/// A named preset of motion behaviors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Profile name
    pub name: String,
    /// Profile version for compatibility
    pub version: u32,
    /// Fluctuation tuning to attach, if any
    #[serde(default)]
    pub fluctuate: Option<FluctuateParams>,
    /// Surface motion to attach, if any
    #[serde(default)]
    pub surface: Option<SurfaceMotion>,
}

impl MotionProfile {
    /// Create an empty profile
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            fluctuate: None,
            surface: None,
        }
    }

    /// Attach the profile's components to an entity.
    ///
    /// Fluctuation tuning becomes a freshly seeded effect; existing
    /// components of the same type are replaced.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity has been despawned
    pub fn apply(
        &self,
        world: &mut hecs::World,
        entity: hecs::Entity,
    ) -> Result<(), hecs::NoSuchEntity> {
        if let Some(params) = self.fluctuate {
            world.insert_one(entity, Fluctuate::new(params))?;
        }
        if let Some(surface) = self.surface {
            world.insert_one(entity, surface)?;
        }
        Ok(())
    }

    /// Serialize the profile to a pretty RON string
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron_string(&self) -> Result<String, ProfileError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ProfileError::SerializeError(e.to_string()))
    }

    /// Parse a profile from a RON string
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    pub fn from_ron_str(content: &str) -> Result<Self, ProfileError> {
        ron::from_str(content).map_err(|e| ProfileError::DeserializeError(e.to_string()))
    }

    /// Save the profile to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ProfileError> {
        let ron_string = self.to_ron_string()?;
        fs::write(path, ron_string).map_err(|e| ProfileError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a profile from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let content =
            fs::read_to_string(path).map_err(|e| ProfileError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save the profile to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ProfileError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ProfileError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ProfileError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a profile from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let content =
            fs::read_to_string(path).map_err(|e| ProfileError::IoError(e.to_string()))?;
        let profile: MotionProfile = serde_json::from_str(&content)
            .map_err(|e| ProfileError::DeserializeError(e.to_string()))?;
        Ok(profile)
    }

    /// Whether the profile configures anything at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fluctuate.is_none() && self.surface.is_none()
    }
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Errors that can occur during profile operations
#[derive(Debug, Clone)]
pub enum ProfileError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for ProfileError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Transform;
    use crate::surface::{Conveyor, SurfaceBehavior};
    use glam::Vec3;

    fn sample_profile() -> MotionProfile {
        let mut profile = MotionProfile::new("Bobbing Lantern");
        profile.fluctuate = Some(
            FluctuateParams::default()
                .with_magnitude(0.4)
                .with_frequency(0.8),
        );
        profile.surface = Some(SurfaceMotion::new(Conveyor::new(Vec3::Z, 2.0)));
        profile
    }

    #[test]
    fn test_profile_round_trip_ron() {
        let profile = sample_profile();
        let ron_str = profile.to_ron_string().unwrap();
        assert!(ron_str.contains("Bobbing Lantern"));

        let loaded = MotionProfile::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded.name, "Bobbing Lantern");
        let params = loaded.fluctuate.unwrap();
        assert!((params.magnitude - 0.4).abs() < 1e-6);
        assert!((params.frequency - 0.8).abs() < 1e-6);
        match loaded.surface.unwrap().behavior {
            SurfaceBehavior::Conveyor(belt) => {
                assert_eq!(belt.axis, Vec3::Z);
                assert!((belt.speed - 2.0).abs() < 1e-6);
            }
            other => panic!("expected a conveyor, got {other:?}"),
        }
    }

    #[test]
    fn test_profile_round_trip_json() {
        let profile = sample_profile();
        let json_str = serde_json::to_string_pretty(&profile).unwrap();

        let loaded: MotionProfile = serde_json::from_str(&json_str).unwrap();
        assert_eq!(loaded.version, 1);
        assert!(loaded.fluctuate.is_some());
        assert!(loaded.surface.is_some());
    }

    #[test]
    fn test_partial_profile_parses() {
        let loaded = MotionProfile::from_ron_str("(name: \"Just A Name\", version: 1)").unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_malformed_ron_is_deserialize_error() {
        let result = MotionProfile::from_ron_str("(name: 12)");
        assert!(matches!(result, Err(ProfileError::DeserializeError(_))));
    }

    #[test]
    fn test_apply_attaches_components() {
        let profile = sample_profile();
        let mut world = hecs::World::new();
        let entity = world.spawn((Transform::from_position(Vec3::Y),));

        profile.apply(&mut world, entity).unwrap();
        assert!(world.get::<&Fluctuate>(entity).is_ok());
        assert!(world.get::<&SurfaceMotion>(entity).is_ok());

        let flux = world.get::<&Fluctuate>(entity).unwrap();
        assert!((flux.params.magnitude - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_apply_to_despawned_entity_fails() {
        let profile = sample_profile();
        let mut world = hecs::World::new();
        let entity = world.spawn((Transform::default(),));
        world.despawn(entity).unwrap();

        assert!(profile.apply(&mut world, entity).is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let profile = sample_profile();
        let dir = std::env::temp_dir();
        let ron_path = dir.join("motile_profile_test.ron");
        let json_path = dir.join("motile_profile_test.json");

        profile.save_ron(&ron_path).unwrap();
        let loaded = MotionProfile::load_ron(&ron_path).unwrap();
        assert_eq!(loaded.name, profile.name);

        profile.save_json(&json_path).unwrap();
        let loaded = MotionProfile::load_json(&json_path).unwrap();
        assert_eq!(loaded.name, profile.name);

        let _ = fs::remove_file(ron_path);
        let _ = fs::remove_file(json_path);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = MotionProfile::load_ron("/nonexistent/profile.ron");
        assert!(matches!(result, Err(ProfileError::IoError(_))));
    }
}
