//! Configuration loading for DrishtiServo.
//!
//! Loads the experiment configuration from a single YAML file with sensible
//! defaults. Only the feature selection is consumed by the feature stack; the
//! control and scene sections drive [`ServoLoop`](crate::control::ServoLoop)
//! and the demo simulation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use drishti_servo::config::ServoConfig;
//!
//! // Load from default path (configs/servo.yaml), or built-in defaults
//! let config = ServoConfig::load_default()?;
//!
//! let reference = config.scene.reference_pose();
//! let stack = FeatureStack::from_config(reference, &config.features, &config.scene.target());
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`FeatureSection`] | Which features to stack, depth estimate, diagnostics |
//! | [`ControlSection`] | Gain, convergence threshold, iteration cap, period |
//! | [`SceneSection`] | Start / reference poses and target size |
//!
//! ## Example YAML
//!
//! ```yaml
//! features:
//!   use_xy: true
//!   use_polar: false
//!   use_depth: false
//!   translation_3d: cTo     # cTo | cdTc | anything else disables
//!   rotation_3d: cRcd       # cdRc | cRcd | anything else disables
//!   z_estim: 0.0            # <0 tracked, 0 desired depth, >0 constant
//!   stability: true
//!
//! control:
//!   lambda: 0.5
//!   err_min: 0.0001
//!   iter_max: 2000
//!   dt: 0.01
//! ```

mod control;
mod defaults;
mod error;
mod features;
mod scene;
mod servo;

// Re-export main types
pub use error::ConfigLoadError;
pub use servo::ServoConfig;

// Re-export section types
pub use control::ControlSection;
pub use features::FeatureSection;
pub use scene::SceneSection;
