//! Main ServoConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::control::ControlSection;
use super::error::ConfigLoadError;
use super::features::FeatureSection;
use super::scene::SceneSection;
use crate::control::ServoLoop;
use crate::registry::FeatureStack;

/// Full experiment configuration loaded from YAML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct ServoConfig {
    /// Feature selection
    #[serde(default)]
    pub features: FeatureSection,

    /// Control loop tuning
    #[serde(default)]
    pub control: ControlSection,

    /// Poses and target
    #[serde(default)]
    pub scene: SceneSection,
}

impl ServoConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigLoadError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load from default config path (configs/servo.yaml)
    pub fn load_default() -> Result<Self, ConfigLoadError> {
        let path = Path::new("configs/servo.yaml");
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Feature stack for the configured scene, not yet frozen
    pub fn build_stack(&self) -> FeatureStack {
        FeatureStack::from_config(
            self.scene.reference_pose(),
            &self.features,
            &self.scene.target(),
        )
    }

    /// Control loop with the configured tuning
    pub fn servo_loop(&self) -> ServoLoop {
        ServoLoop::from_config(&self.control)
    }
}
