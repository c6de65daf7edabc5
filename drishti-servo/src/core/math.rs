//! Linear algebra helpers shared by the feature builds, the stability check
//! and the control law.

use nalgebra::{DMatrix, Matrix3, Vector3};

use crate::error::{Result, ServoError};

/// Relative singular value threshold used by [`pseudo_inverse`] throughout the crate.
pub const PINV_TOLERANCE: f64 = 1e-6;

/// Convergence threshold of the SVD iteration.
const SVD_EPSILON: f64 = 1e-14;

/// Iteration cap of the SVD iteration.
const SVD_MAX_ITERATIONS: usize = 10_000;

/// Skew-symmetric matrix `[v]x` such that `[v]x * w == v.cross(w)`.
#[inline]
pub fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Unnormalized sinc: `sin(x) / x`, with `sinc(0) == 1`.
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-8 {
        1.0 - x * x / 6.0
    } else {
        x.sin() / x
    }
}

/// Moore-Penrose pseudo-inverse via SVD.
///
/// Singular values below `tolerance * sigma_max` are treated as zero, so the
/// result stays finite for rank-deficient or near-singular matrices. An
/// `m x n` input yields an `n x m` output; an all-zero or empty input yields
/// an all-zero output.
///
/// Fails with [`ServoError::NonFinite`] on NaN or infinite entries and with
/// [`ServoError::SvdNotConverged`] when the bounded SVD iteration gives up.
pub fn pseudo_inverse(matrix: &DMatrix<f64>, tolerance: f64) -> Result<DMatrix<f64>> {
    let (rows, cols) = matrix.shape();
    if rows == 0 || cols == 0 {
        return Ok(DMatrix::zeros(cols, rows));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(ServoError::NonFinite("pseudo-inverse input"));
    }

    let svd = matrix
        .clone()
        .try_svd(true, true, SVD_EPSILON, SVD_MAX_ITERATIONS)
        .ok_or(ServoError::SvdNotConverged(rows, cols))?;
    let (Some(u), Some(v_t)) = (svd.u, svd.v_t) else {
        return Err(ServoError::SvdNotConverged(rows, cols));
    };

    let threshold = tolerance * svd.singular_values.max();
    let mut v = v_t.transpose();
    for (j, mut column) in v.column_iter_mut().enumerate() {
        let sigma = svd.singular_values[j];
        let inv = if sigma > threshold { 1.0 / sigma } else { 0.0 };
        column *= inv;
    }

    Ok(v * u.transpose())
}
