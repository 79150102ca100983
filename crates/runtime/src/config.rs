use glade_camera::CameraConfig;
use glade_input::KeyBindings;
use glade_terrain::TerrainConfig;
use glade_tween::DEFAULT_NEAR_END_THRESHOLD;
use serde::{Deserialize, Serialize};

use crate::error::RuntimeError;

/// Everything a session needs, loadable from JSON with any field omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub terrain: TerrainConfig,
    pub camera: CameraConfig,
    pub bindings: KeyBindings,
    /// Longest frame delta in seconds that a single step will simulate.
    pub max_step: f32,
    /// Tween progress at which "nearing end" fires.
    pub near_end_threshold: f32,
    /// Crystal cluster spin about world-up, radians per second.
    pub crystal_spin: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainConfig::default(),
            camera: CameraConfig::default(),
            bindings: KeyBindings::default(),
            max_step: 0.1,
            near_end_threshold: DEFAULT_NEAR_END_THRESHOLD,
            crystal_spin: 0.5,
        }
    }
}

impl SessionConfig {
    /// Checks the session-level fields. Terrain and camera settings are
    /// checked by their own builders.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        if !self.max_step.is_finite() || self.max_step <= 0.0 {
            return Err(RuntimeError::InvalidParameter {
                name: "max_step",
                reason: format!("must be finite and positive, got {}", self.max_step),
            });
        }
        if !self.crystal_spin.is_finite() {
            return Err(RuntimeError::InvalidParameter {
                name: "crystal_spin",
                reason: format!("must be finite, got {}", self.crystal_spin),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_max_step_rejected() {
        let config = SessionConfig {
            max_step: 0.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RuntimeError::InvalidParameter { name: "max_step", .. })
        ));
    }

    #[test]
    fn nested_json_overrides() {
        let json = r#"{
            "terrain": { "world_size": 8, "seed": 5 },
            "camera": { "speed": 3.0 },
            "bindings": { "up": "Space" },
            "max_step": 0.05
        }"#;
        let config: SessionConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.terrain.world_size, 8);
        assert_eq!(config.terrain.seed, Some(5));
        assert_eq!(config.terrain.octaves, TerrainConfig::default().octaves);
        assert_eq!(config.camera.speed, 3.0);
        assert_eq!(config.bindings.up, "Space");
        assert_eq!(config.max_step, 0.05);
        assert_eq!(config.near_end_threshold, DEFAULT_NEAR_END_THRESHOLD);
    }
}
