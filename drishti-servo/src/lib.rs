//! # DrishtiServo
//!
//! Numerical core of an image-based visual servoing (IBVS) loop.
//!
//! ## Overview
//!
//! A [`FeatureStack`] composes heterogeneous visual features into a single
//! feature vector `s`, its desired value `sd`, the error `e = s - sd` and the
//! interaction matrix `L` (`ṡ = L v`), recomputed against a camera pose each
//! control cycle:
//!
//! - **Point XY** - normalized image coordinates of a 3D point
//! - **Point Polar** - polar coordinates `(ρ, θ)` of the same projection
//! - **Depth** - `log(Z / Z*)` of a point
//! - **3D translation** - `cTo` or `cdTc`
//! - **3D rotation** - `θu` of `cdRc` or `cRcd`
//!
//! ## Features
//!
//! - **Depth policies**: tracked, desired or constant depth in the point
//!   interaction matrices ([`DepthPolicy`])
//! - **Stability check**: eigenvalues of `L_true · L⁺` under the chosen depth
//!   estimate ([`FeatureStack::stability`])
//! - **Control loop**: `v = -λ L⁺ e` with a kinematic camera ([`ServoLoop`])
//! - **YAML configuration**: [`ServoConfig`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use drishti_servo::ServoConfig;
//!
//! let config = ServoConfig::load_default()?;
//! let mut stack = config.build_stack();
//! stack.log_summary();
//!
//! let outcome = config.servo_loop().run(&mut stack, config.scene.start_pose())?;
//! println!("converged: {} in {} iterations", outcome.converged, outcome.iterations);
//! ```
//!
//! ## Conventions
//!
//! ViSP conventions: poses are `cMo` (object to camera), velocities are
//! `(vx, vy, vz, ωx, ωy, ωz)` in the current camera frame.

#![warn(missing_docs)]

// Geometry primitives
pub mod core;

// Per-kind feature builds
pub mod features;

// Ordered feature stack
pub mod registry;

// Eigenvalue check of the depth approximation
pub mod stability;

// Control law and kinematic integration
pub mod control;

// Unified configuration
pub mod config;

// Row labels and experiment naming
pub mod labels;

mod error;

// Re-export commonly used types
pub use core::{TrackedPoint, exp_map, pose_from_homogeneous, pose_from_vector};

pub use features::{
    BuildContext, DepthPolicy, Feature, FeatureKind, FeatureSample, PointAnchor, PointKind,
    RotationMode, TranslationMode,
};

pub use registry::{FeatureStack, LayoutEntry, LayoutSummary};

pub use stability::{StabilityReport, product_eigenvalues};

pub use control::{ServoLoop, ServoOutcome, ServoStep, integrate, velocity};

pub use config::{ConfigLoadError, ServoConfig};

pub use labels::{ExperimentId, experiment_id, legend, row_labels};

pub use error::{Result, ServoError};
