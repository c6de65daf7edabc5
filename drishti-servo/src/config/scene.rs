//! Scene section: poses and observed target.

use nalgebra::{Isometry3, Point3};
use serde::{Deserialize, Serialize};

use super::defaults;
use crate::core::pose_from_vector;

/// Start / reference poses and the square target.
///
/// Poses are `(tx, ty, tz, θux, θuy, θuz)` vectors of `cMo`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneSection {
    /// Initial camera pose
    #[serde(default = "defaults::start_pose")]
    pub start: [f64; 6],

    /// Desired camera pose
    #[serde(default = "defaults::reference_pose")]
    pub reference: [f64; 6],

    /// Half side of the square target (meters)
    #[serde(default = "defaults::target_half_size")]
    pub target_half_size: f64,
}

impl Default for SceneSection {
    fn default() -> Self {
        Self {
            start: defaults::start_pose(),
            reference: defaults::reference_pose(),
            target_half_size: defaults::target_half_size(),
        }
    }
}

impl SceneSection {
    /// Initial `cMo`.
    pub fn start_pose(&self) -> Isometry3<f64> {
        pose_from_vector(&self.start)
    }

    /// Desired `cdMo`.
    pub fn reference_pose(&self) -> Isometry3<f64> {
        pose_from_vector(&self.reference)
    }

    /// Corners of the planar square target, in the object frame.
    pub fn target(&self) -> Vec<Point3<f64>> {
        let ps = self.target_half_size;
        vec![
            Point3::new(-ps, -ps, 0.0),
            Point3::new(-ps, ps, 0.0),
            Point3::new(ps, ps, 0.0),
            Point3::new(ps, -ps, 0.0),
        ]
    }
}
