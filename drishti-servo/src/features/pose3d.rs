//! 3D pose-error features: translation and θu rotation.

use nalgebra::{Isometry3, Matrix3, SMatrix, Vector3};

use super::{RotationMode, TranslationMode};
use crate::core::{sinc, skew};

/// Translation feature value and its interaction matrix.
///
/// `pose` is the current `cMo`, `reference` the desired `cdMo`.
pub fn translation(
    mode: TranslationMode,
    pose: &Isometry3<f64>,
    reference: &Isometry3<f64>,
) -> Option<(Vector3<f64>, SMatrix<f64, 3, 6>)> {
    let mut l = SMatrix::<f64, 3, 6>::zeros();
    match mode {
        TranslationMode::None => return None,
        TranslationMode::PoseVsReference => {
            // c t o, with ṫ = -v + [t]x ω
            let t = pose.translation.vector;
            l.fixed_view_mut::<3, 3>(0, 0).copy_from(&-Matrix3::identity());
            l.fixed_view_mut::<3, 3>(0, 3).copy_from(&skew(&t));
            Some((t, l))
        }
        TranslationMode::ReferenceVsPose => {
            // cd t c, with ṫ = cdRc v
            let cd_m_c = reference * pose.inverse();
            let rotation = cd_m_c.rotation.to_rotation_matrix();
            l.fixed_view_mut::<3, 3>(0, 0).copy_from(rotation.matrix());
            Some((cd_m_c.translation.vector, l))
        }
    }
}

/// θu rotation feature value and its interaction matrix.
pub fn rotation(
    mode: RotationMode,
    pose: &Isometry3<f64>,
    reference: &Isometry3<f64>,
) -> Option<(Vector3<f64>, SMatrix<f64, 3, 6>)> {
    let (theta_u, sign) = match mode {
        RotationMode::None => return None,
        RotationMode::RefVsPose => ((reference * pose.inverse()).rotation.scaled_axis(), 1.0),
        RotationMode::PoseVsRef => ((pose * reference.inverse()).rotation.scaled_axis(), -1.0),
    };

    let mut l = SMatrix::<f64, 3, 6>::zeros();
    l.fixed_view_mut::<3, 3>(0, 3)
        .copy_from(&theta_u_jacobian(&theta_u, sign));
    Some((theta_u, l))
}

/// `±I + θ/2 [u]x ± (1 - sinc θ / sinc²(θ/2)) [u]x²`, written in terms of `θu`.
fn theta_u_jacobian(theta_u: &Vector3<f64>, sign: f64) -> Matrix3<f64> {
    let theta = theta_u.norm();
    let w = skew(theta_u);

    let coeff = if theta < 1e-6 {
        1.0 / 12.0
    } else {
        let half = sinc(theta / 2.0);
        (1.0 - sinc(theta) / (half * half)) / (theta * theta)
    };

    (Matrix3::identity() + w * w * coeff) * sign + w * 0.5
}
