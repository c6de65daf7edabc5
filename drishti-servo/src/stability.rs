//! Local stability check of a servoing law under depth-estimation error.
//!
//! The classical IBVS law `v = -λ L̂⁺ e` gives the linearized closed loop
//! `ė = -λ L L̂⁺ e`, where `L` is the true interaction matrix and `L̂` the
//! one built with estimated depth. The eigenvalues of `L L̂⁺` tell whether the
//! approximation keeps the loop locally stable: when both matrices coincide
//! they are `1` (and `0` for redundant rows), negative real parts mean the
//! loop can diverge.
//!
//! The check is `O(dim_s³)` and runs on demand; budget for it when called
//! every control cycle.

use log::{debug, warn};
use nalgebra::DMatrix;

use crate::core::{PINV_TOLERANCE, pseudo_inverse};
use crate::error::{Result, ServoError};
use crate::registry::FeatureStack;

/// Convergence threshold of the Schur iteration.
const SCHUR_EPSILON: f64 = 1e-12;

/// Iteration cap of the Schur iteration.
const SCHUR_MAX_ITERATIONS: usize = 10_000;

/// Eigenvalues closer to zero than this count as zero.
const ZERO_TOLERANCE: f64 = 1e-9;

/// Magnitude above which an eigenvalue is reported as extreme.
const EXTREME_MAGNITUDE: f64 = 1e3;

/// Sorted real parts of the eigenvalues of `l_true · pinv(l_estimated)`.
///
/// For a tall stack (`dim_s > 6`) the product has rank at most 6. Its non-zero
/// spectrum equals that of the 6x6 `pinv(l_estimated) · l_true`, so that
/// smaller matrix is decomposed and the remaining `dim_s - 6` eigenvalues are
/// exactly zero.
///
/// Writes into `out` (cleared first). Pure in the two matrices. NaN or
/// infinite entries in either matrix are reported as [`ServoError::NonFinite`]
/// and leave `out` untouched.
pub fn product_eigenvalues(
    l_true: &DMatrix<f64>,
    l_estimated: &DMatrix<f64>,
    out: &mut Vec<f64>,
) -> Result<()> {
    if l_true.shape() != l_estimated.shape() {
        return Err(ServoError::matrix_shape(
            "true interaction matrix",
            l_estimated.shape(),
            l_true.shape(),
        ));
    }
    let (dim, dof) = l_true.shape();
    if dim == 0 {
        return Err(ServoError::EmptyStack);
    }

    if l_true.iter().any(|v| !v.is_finite()) {
        return Err(ServoError::NonFinite("true interaction matrix"));
    }
    let pinv = pseudo_inverse(l_estimated, PINV_TOLERANCE)?;
    let product = if dim > dof {
        pinv * l_true
    } else {
        l_true * pinv
    };
    let size = product.nrows();
    let schur = product
        .try_schur(SCHUR_EPSILON, SCHUR_MAX_ITERATIONS)
        .ok_or(ServoError::EigenDecomposition(size))?;

    out.clear();
    out.extend(schur.complex_eigenvalues().iter().map(|c| c.re));
    out.resize(dim, 0.0);
    out.sort_by(f64::total_cmp);
    Ok(())
}

/// Interpretation of a set of eigenvalues.
#[derive(Clone, Debug, PartialEq)]
pub struct StabilityReport {
    /// Smallest real part
    pub min: f64,
    /// Largest real part
    pub max: f64,
    /// Count of clearly negative real parts
    pub negative: usize,
    /// Count of real parts within tolerance of zero (redundant rows)
    pub zero: usize,
}

impl StabilityReport {
    /// Summarize sorted eigenvalue real parts. `None` for an empty slice.
    pub fn from_eigenvalues(eigenvalues: &[f64]) -> Option<Self> {
        let min = *eigenvalues.first()?;
        let max = *eigenvalues.last()?;
        Some(Self {
            min,
            max,
            negative: eigenvalues.iter().filter(|&&v| v < -ZERO_TOLERANCE).count(),
            zero: eigenvalues
                .iter()
                .filter(|&&v| v.abs() <= ZERO_TOLERANCE)
                .count(),
        })
    }

    /// No negative real part.
    pub fn is_locally_stable(&self) -> bool {
        self.negative == 0
    }

    /// Some magnitude is large enough that the result is likely uninformative.
    pub fn is_extreme(&self) -> bool {
        self.min.abs() > EXTREME_MAGNITUDE || self.max.abs() > EXTREME_MAGNITUDE
    }
}

impl FeatureStack {
    /// Stability eigenvalues for the latest current build.
    ///
    /// Requires diagnostics, a non-empty stack and a prior
    /// [`FeatureStack::current_vector`] call. The result lives in the
    /// stack's diagnostic buffer until the next call.
    pub fn stability(&mut self) -> Result<&[f64]> {
        if !self.has_diagnostics() {
            return Err(ServoError::DiagnosticsDisabled);
        }
        if self.dim_s() == 0 {
            return Err(ServoError::EmptyStack);
        }
        if !self.is_computed() {
            return Err(ServoError::NotComputed);
        }

        let Some((l_estimated, diagnostics)) = self.diagnostic_parts() else {
            return Err(ServoError::DiagnosticsDisabled);
        };
        product_eigenvalues(
            &diagnostics.l_true,
            l_estimated,
            &mut diagnostics.eigenvalues,
        )?;

        if let Some(report) = StabilityReport::from_eigenvalues(&diagnostics.eigenvalues) {
            debug!(
                "Stability eigenvalues in [{:.4}, {:.4}], {} zero",
                report.min, report.max, report.zero
            );
            if !report.is_locally_stable() {
                warn!(
                    "{} negative stability eigenvalue(s), min {:.4}: depth estimate may destabilize the loop",
                    report.negative, report.min
                );
            }
            if report.is_extreme() {
                warn!(
                    "Extreme stability eigenvalues [{:.3e}, {:.3e}]: interaction matrix near singular",
                    report.min, report.max
                );
            }
        }

        Ok(&diagnostics.eigenvalues)
    }
}
