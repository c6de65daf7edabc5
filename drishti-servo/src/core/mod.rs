//! Core types for the servoing library.
//!
//! ## Conventions
//!
//! - Poses are `Isometry3<f64>` transforms from the object frame to the camera
//!   frame (`cMo`); the reference (desired) pose is `cdMo`.
//! - Camera velocities are 6-vectors `(vx, vy, vz, ωx, ωy, ωz)` expressed in the
//!   current camera frame.
//! - Interaction matrices have one row per feature component and six columns,
//!   so that `ṡ = L · v`.

pub mod math;
mod pose;

pub use math::{PINV_TOLERANCE, pseudo_inverse, sinc, skew};
pub use pose::{TrackedPoint, exp_map, pose_from_homogeneous, pose_from_vector, track};
