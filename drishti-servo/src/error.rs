//! Error types for the servoing core.

use thiserror::Error;

/// Errors reported by the feature stack, the stability check and the control law.
///
/// Programmer contract violations (registering a feature after the stack is
/// frozen) are not represented here: they panic.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServoError {
    /// A caller supplied vector or matrix has the wrong shape.
    #[error("dimension mismatch for {what}: expected {expected}, got {actual}")]
    Dimension {
        /// What was being checked (e.g. "error buffer")
        what: &'static str,
        /// Expected shape
        expected: String,
        /// Shape that was supplied
        actual: String,
    },

    /// A 4x4 matrix that is not a rigid homogeneous transform.
    #[error("invalid homogeneous pose: {0}")]
    InvalidPose(String),

    /// Stability diagnostics were not requested when the stack was created.
    #[error("stability diagnostics are disabled for this feature stack")]
    DiagnosticsDisabled,

    /// The stack has no rows.
    #[error("feature stack is empty")]
    EmptyStack,

    /// No current build has been computed yet.
    #[error("no interaction matrix computed yet, call current_vector first")]
    NotComputed,

    /// A matrix entering a decomposition holds NaN or infinite entries.
    #[error("non-finite entries in {0}")]
    NonFinite(&'static str),

    /// The SVD iteration did not converge.
    #[error("singular value decomposition did not converge for a {0}x{1} matrix")]
    SvdNotConverged(usize, usize),

    /// The Schur iteration did not converge.
    #[error("eigen decomposition did not converge for a {0}x{0} matrix")]
    EigenDecomposition(usize),
}

impl ServoError {
    pub(crate) fn vector_len(what: &'static str, expected: usize, actual: usize) -> Self {
        ServoError::Dimension {
            what,
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub(crate) fn matrix_shape(
        what: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> Self {
        ServoError::Dimension {
            what,
            expected: format!("{}x{}", expected.0, expected.1),
            actual: format!("{}x{}", actual.0, actual.1),
        }
    }
}

/// Result alias for servoing operations.
pub type Result<T> = std::result::Result<T, ServoError>;
