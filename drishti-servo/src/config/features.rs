//! Feature selection section.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::features::{DepthPolicy, RotationMode, TranslationMode};

/// Feature selection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeatureSection {
    /// Stack a Cartesian point per target point
    #[serde(default = "defaults::enabled")]
    pub use_xy: bool,

    /// Stack a polar point per target point
    #[serde(default)]
    pub use_polar: bool,

    /// Stack the log-depth of the target center
    #[serde(default)]
    pub use_depth: bool,

    /// Translation mode string: "cTo", "cdTc", anything else disables
    #[serde(default = "defaults::translation_3d")]
    pub translation_3d: String,

    /// Rotation mode string: "cdRc", "cRcd", anything else disables
    #[serde(default = "defaults::rotation_3d")]
    pub rotation_3d: String,

    /// Depth estimate: <0 tracked, 0 desired depth, >0 constant depth
    #[serde(default = "defaults::z_estim")]
    pub z_estim: f64,

    /// Allocate the stability diagnostics
    #[serde(default)]
    pub stability: bool,
}

impl Default for FeatureSection {
    fn default() -> Self {
        Self {
            use_xy: true,
            use_polar: false,
            use_depth: false,
            translation_3d: defaults::translation_3d(),
            rotation_3d: defaults::rotation_3d(),
            z_estim: defaults::z_estim(),
            stability: false,
        }
    }
}

impl FeatureSection {
    /// Parsed translation mode.
    pub fn translation_mode(&self) -> TranslationMode {
        TranslationMode::from_descriptor(&self.translation_3d)
    }

    /// Parsed rotation mode.
    pub fn rotation_mode(&self) -> RotationMode {
        RotationMode::from_descriptor(&self.rotation_3d)
    }

    /// Decoded depth policy.
    pub fn depth_policy(&self) -> DepthPolicy {
        DepthPolicy::from_setting(self.z_estim)
    }
}
