//! Interaction matrices of point-based image features.
//!
//! All formulas use normalized image coordinates `(x, y)` and the depth `Z`
//! of the observed point. The depth passed here may be an estimate (see
//! [`DepthPolicy`](super::DepthPolicy)); the coordinates always come from the
//! tracked geometry.

use nalgebra::SMatrix;

/// Interaction matrix of the Cartesian image point `(x, y)`.
pub fn xy_interaction(x: f64, y: f64, z: f64) -> SMatrix<f64, 2, 6> {
    let inv_z = 1.0 / z;
    SMatrix::<f64, 2, 6>::from_row_slice(&[
        -inv_z,
        0.0,
        x * inv_z,
        x * y,
        -(1.0 + x * x),
        y,
        0.0,
        -inv_z,
        y * inv_z,
        1.0 + y * y,
        -x * y,
        -x,
    ])
}

/// Polar coordinates `(ρ, θ)` of a normalized image point.
#[inline]
pub fn polar(x: f64, y: f64) -> (f64, f64) {
    (x.hypot(y), y.atan2(x))
}

/// Interaction matrix of the polar image point `(ρ, θ)`.
///
/// Undefined for a point on the optical axis (`ρ == 0`).
pub fn polar_interaction(rho: f64, theta: f64, z: f64) -> SMatrix<f64, 2, 6> {
    let (s, c) = theta.sin_cos();
    let rho2 = 1.0 + rho * rho;
    SMatrix::<f64, 2, 6>::from_row_slice(&[
        -c / z,
        -s / z,
        rho / z,
        rho2 * s,
        -rho2 * c,
        0.0,
        s / (rho * z),
        -c / (rho * z),
        0.0,
        c / rho,
        s / rho,
        -1.0,
    ])
}

/// Interaction matrix of the log-depth feature `log(Z / Z*)`.
pub fn depth_interaction(x: f64, y: f64, z: f64) -> SMatrix<f64, 1, 6> {
    SMatrix::<f64, 1, 6>::from_row_slice(&[0.0, 0.0, -1.0 / z, -y, x, 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{exp_map, track};
    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, Point3, Vector2, Vector6};

    /// Finite-difference check of `ṡ = L v` for a small camera motion.
    fn numeric_rate<F>(pose: &Isometry3<f64>, v: &Vector6<f64>, feature: F) -> Vector2<f64>
    where
        F: Fn(&Isometry3<f64>) -> Vector2<f64>,
    {
        let dt = 1e-6;
        let moved = exp_map(v, dt).inverse() * pose;
        (feature(&moved) - feature(pose)) / dt
    }

    fn scene() -> (Isometry3<f64>, Point3<f64>, Vector6<f64>) {
        let pose = Isometry3::new(
            nalgebra::Vector3::new(0.02, -0.03, 0.6),
            nalgebra::Vector3::new(0.1, -0.2, 0.3),
        );
        let anchor = Point3::new(0.05, 0.04, 0.01);
        let v = Vector6::new(0.1, -0.05, 0.2, 0.3, -0.1, 0.25);
        (pose, anchor, v)
    }

    #[test]
    fn test_xy_interaction_matches_motion() {
        let (pose, anchor, v) = scene();
        let p = track(&pose, &anchor);
        let predicted = xy_interaction(p.x, p.y, p.z) * v;
        let measured = numeric_rate(&pose, &v, |m| {
            let q = track(m, &anchor);
            Vector2::new(q.x, q.y)
        });
        assert_relative_eq!(predicted, measured, epsilon = 1e-4);
    }

    #[test]
    fn test_polar_interaction_matches_motion() {
        let (pose, anchor, v) = scene();
        let p = track(&pose, &anchor);
        let (rho, theta) = polar(p.x, p.y);
        let predicted = polar_interaction(rho, theta, p.z) * v;
        let measured = numeric_rate(&pose, &v, |m| {
            let q = track(m, &anchor);
            let (r, t) = polar(q.x, q.y);
            Vector2::new(r, t)
        });
        assert_relative_eq!(predicted, measured, epsilon = 1e-4);
    }

    #[test]
    fn test_depth_interaction_matches_motion() {
        let (pose, anchor, v) = scene();
        let p = track(&pose, &anchor);
        let predicted = (depth_interaction(p.x, p.y, p.z) * v)[0];
        let measured = numeric_rate(&pose, &v, |m| {
            let q = track(m, &anchor);
            Vector2::new(q.z.ln(), 0.0)
        });
        assert_relative_eq!(predicted, measured[0], epsilon = 1e-4);
    }

    #[test]
    fn test_polar_of_axis_points() {
        let (rho, theta) = polar(0.0, 0.2);
        assert_relative_eq!(rho, 0.2);
        assert_relative_eq!(theta, std::f64::consts::FRAC_PI_2);
    }
}
