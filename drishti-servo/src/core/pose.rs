//! Camera poses and point tracking.
//!
//! Poses are `Isometry3<f64>` homogeneous transforms from the object frame to
//! the camera frame (`cMo`). The reference pose of a servoing task is `cdMo`.

use nalgebra::{
    DMatrix, Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3, Vector6,
};

use super::math::skew;
use crate::error::{Result, ServoError};

/// Tolerance on `R^T R - I` and on the homogeneous bottom row.
const RIGID_TOLERANCE: f64 = 1e-6;

/// A 3D point observed by a pinhole camera, in normalized image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackedPoint {
    /// Normalized abscissa `X / Z`
    pub x: f64,
    /// Normalized ordinate `Y / Z`
    pub y: f64,
    /// Depth along the optical axis
    pub z: f64,
}

/// Express `anchor` (object frame) in the camera frame of `pose` and project it.
///
/// The point is expected in front of the camera (`Z > 0`).
#[inline]
pub fn track(pose: &Isometry3<f64>, anchor: &Point3<f64>) -> TrackedPoint {
    let p = pose.transform_point(anchor);
    TrackedPoint {
        x: p.x / p.z,
        y: p.y / p.z,
        z: p.z,
    }
}

/// Build a pose from a 4x4 homogeneous matrix.
///
/// Fails with [`ServoError::Dimension`] if the matrix is not 4x4 and with
/// [`ServoError::InvalidPose`] if it is not a rigid transform.
pub fn pose_from_homogeneous(matrix: &DMatrix<f64>) -> Result<Isometry3<f64>> {
    if matrix.shape() != (4, 4) {
        return Err(ServoError::matrix_shape(
            "homogeneous pose",
            (4, 4),
            matrix.shape(),
        ));
    }

    let bottom = [matrix[(3, 0)], matrix[(3, 1)], matrix[(3, 2)], matrix[(3, 3)] - 1.0];
    if bottom.iter().any(|v| v.abs() > RIGID_TOLERANCE) {
        return Err(ServoError::InvalidPose(
            "bottom row must be [0, 0, 0, 1]".to_string(),
        ));
    }

    let rotation: Matrix3<f64> = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let orthogonality = (rotation.transpose() * rotation - Matrix3::identity()).abs().max();
    if orthogonality > RIGID_TOLERANCE || rotation.determinant() <= 0.0 {
        return Err(ServoError::InvalidPose(format!(
            "rotation block is not a proper rotation (orthogonality error {:.3e})",
            orthogonality
        )));
    }

    let translation = Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation));
    Ok(Isometry3::from_parts(Translation3::from(translation), rotation))
}

/// Build a pose from a `(tx, ty, tz, θux, θuy, θuz)` pose vector.
pub fn pose_from_vector(p: &[f64; 6]) -> Isometry3<f64> {
    Isometry3::new(
        Vector3::new(p[0], p[1], p[2]),
        Vector3::new(p[3], p[4], p[5]),
    )
}

/// SE(3) exponential map of a twist `(v, ω)` applied for `dt` seconds.
///
/// Returns the displacement `c(t)Mc(t+dt)` of a frame moving with the twist
/// expressed in its own coordinates.
pub fn exp_map(twist: &Vector6<f64>, dt: f64) -> Isometry3<f64> {
    let v = Vector3::new(twist[0], twist[1], twist[2]) * dt;
    let w = Vector3::new(twist[3], twist[4], twist[5]) * dt;
    let theta = w.norm();
    let w_x = skew(&w);

    // V = I + (1 - cos θ)/θ² [w]x + (θ - sin θ)/θ³ [w]x²
    let (a, b) = if theta < 1e-8 {
        (0.5, 1.0 / 6.0)
    } else {
        let t2 = theta * theta;
        ((1.0 - theta.cos()) / t2, (theta - theta.sin()) / (t2 * theta))
    };
    let jacobian = Matrix3::identity() + w_x * a + w_x * w_x * b;

    Isometry3::from_parts(
        Translation3::from(jacobian * v),
        UnitQuaternion::from_scaled_axis(w),
    )
}
