//! Classical control law and a kinematic camera for closing the loop.
//!
//! The feature stack only provides `e` and `L`. This module turns them into a
//! camera velocity `v = -λ L⁺ e` and integrates that velocity into a new pose,
//! which is enough to run a complete servoing task without a simulator.

use log::{debug, info};
use nalgebra::{DMatrix, DVector, Isometry3, Vector6};

use crate::config::ControlSection;
use crate::core::{PINV_TOLERANCE, exp_map, pseudo_inverse};
use crate::error::{Result, ServoError};
use crate::registry::FeatureStack;

/// Camera velocity `v = -λ L⁺ e`.
///
/// A degenerate feature configuration (e.g. a polar point on the optical
/// axis) yields non-finite rows and is reported as [`ServoError::NonFinite`].
pub fn velocity(
    lambda: f64,
    interaction: &DMatrix<f64>,
    error: &DVector<f64>,
) -> Result<Vector6<f64>> {
    if interaction.ncols() != 6 || interaction.nrows() != error.len() {
        return Err(ServoError::matrix_shape(
            "interaction matrix",
            (error.len(), 6),
            interaction.shape(),
        ));
    }
    if error.iter().any(|v| !v.is_finite()) {
        return Err(ServoError::NonFinite("feature error"));
    }
    let v = pseudo_inverse(interaction, PINV_TOLERANCE)? * error * -lambda;
    Ok(Vector6::from_column_slice(v.as_slice()))
}

/// Apply camera-frame velocity `v` for `dt` seconds to `cMo`.
#[inline]
pub fn integrate(pose: &Isometry3<f64>, v: &Vector6<f64>, dt: f64) -> Isometry3<f64> {
    exp_map(v, dt).inverse() * pose
}

/// One iteration of a servoing run.
#[derive(Clone, Debug)]
pub struct ServoStep {
    /// 0-based iteration
    pub iteration: usize,
    /// `‖e‖` before the command
    pub error_norm: f64,
    /// Commanded velocity
    pub velocity: Vector6<f64>,
    /// Smallest stability eigenvalue, when diagnostics are enabled
    pub min_eigenvalue: Option<f64>,
}

/// Result of [`ServoLoop::run`].
#[derive(Clone, Debug)]
pub struct ServoOutcome {
    /// Final camera pose
    pub pose: Isometry3<f64>,
    /// Whether `‖e‖` dropped below the threshold
    pub converged: bool,
    /// Iterations run
    pub iterations: usize,
    /// `‖e‖` at [`ServoOutcome::pose`]
    pub final_error: f64,
    /// Per-iteration record
    pub history: Vec<ServoStep>,
}

/// Fixed-gain servoing loop.
#[derive(Clone, Debug, PartialEq)]
pub struct ServoLoop {
    /// Control gain λ
    pub lambda: f64,
    /// Convergence threshold on `‖e‖`
    pub err_min: f64,
    /// Iteration cap
    pub iter_max: usize,
    /// Control period (seconds)
    pub dt: f64,
}

impl Default for ServoLoop {
    fn default() -> Self {
        Self::from_config(&ControlSection::default())
    }
}

impl ServoLoop {
    /// Loop with the given tuning.
    pub fn from_config(config: &ControlSection) -> Self {
        Self {
            lambda: config.lambda,
            err_min: config.err_min,
            iter_max: config.iter_max,
            dt: config.dt,
        }
    }

    /// Drive the camera from `start` until convergence or the iteration cap.
    pub fn run(&self, stack: &mut FeatureStack, start: Isometry3<f64>) -> Result<ServoOutcome> {
        let mut pose = start;
        let mut history = Vec::new();
        let mut converged = false;
        let mut final_error = f64::INFINITY;

        for iteration in 0..self.iter_max {
            let error = stack.error(&pose).clone();
            final_error = error.norm();
            if final_error < self.err_min {
                converged = true;
                break;
            }

            let min_eigenvalue = if stack.has_diagnostics() {
                stack.stability()?.first().copied()
            } else {
                None
            };

            let v = velocity(self.lambda, stack.interaction(), &error)?;
            pose = integrate(&pose, &v, self.dt);

            if iteration % 100 == 0 {
                debug!("iter {}: |e| = {:.6}", iteration, final_error);
            }
            history.push(ServoStep {
                iteration,
                error_norm: final_error,
                velocity: v,
                min_eigenvalue,
            });
        }

        if !converged {
            // Measure at the pose actually reached by the last command
            final_error = stack.error(&pose).norm();
            converged = final_error < self.err_min;
        }

        info!(
            "Servoing {} after {} iterations, |e| = {:.3e}",
            if converged { "converged" } else { "stopped" },
            history.len(),
            final_error
        );

        Ok(ServoOutcome {
            pose,
            converged,
            iterations: history.len(),
            final_error,
            history,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_velocity_shape_mismatch() {
        let l = DMatrix::zeros(4, 6);
        let e = DVector::zeros(3);
        assert!(velocity(0.5, &l, &e).is_err());

        let l = DMatrix::zeros(3, 5);
        assert!(velocity(0.5, &l, &e).is_err());
    }

    #[test]
    fn test_velocity_inverts_interaction() {
        let l = DMatrix::<f64>::identity(6, 6) * 2.0;
        let e = DVector::from_column_slice(&[1.0, 0.0, -1.0, 0.5, 0.0, 0.0]);
        let v = velocity(0.5, &l, &e).unwrap();
        assert_relative_eq!(v[0], -0.25, epsilon = 1e-12);
        assert_relative_eq!(v[2], 0.25, epsilon = 1e-12);
        assert_relative_eq!(v[3], -0.125, epsilon = 1e-12);
    }

    #[test]
    fn test_integrate_forward_motion() {
        // Moving forward along the optical axis brings the object closer
        let pose = Isometry3::translation(0.0, 0.0, 1.0);
        let v = Vector6::new(0.0, 0.0, 0.1, 0.0, 0.0, 0.0);
        let next = integrate(&pose, &v, 1.0);
        assert_relative_eq!(
            next.translation.vector,
            Vector3::new(0.0, 0.0, 0.9),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_capped_run_reports_error_at_final_pose() {
        let reference = Isometry3::translation(0.0, 0.0, 0.5);
        let mut stack = FeatureStack::new(reference);
        stack.set_translation_mode(crate::features::TranslationMode::PoseVsReference);

        let servo = ServoLoop {
            iter_max: 2,
            ..ServoLoop::default()
        };
        let start = Isometry3::translation(0.1, 0.0, 0.5);
        let outcome = servo.run(&mut stack, start).unwrap();

        assert_eq!(outcome.iterations, 2);
        let measured = stack.error(&outcome.pose).norm();
        assert_relative_eq!(outcome.final_error, measured, epsilon = 1e-15);
        assert!(outcome.final_error < outcome.history[1].error_norm);
    }

    #[test]
    fn test_velocity_rejects_polar_point_on_axis() {
        use crate::features::PointKind;
        use nalgebra::Point3;

        let reference = Isometry3::translation(0.0, 0.0, 0.5);
        let mut stack = FeatureStack::new(reference);
        stack.register(PointKind::Polar, Point3::origin());
        stack.register(PointKind::XY, Point3::new(0.05, 0.05, 0.0));

        let e = stack.error(&reference).clone();
        assert!(matches!(
            velocity(0.5, stack.interaction(), &e),
            Err(ServoError::NonFinite(_))
        ));
    }

    #[test]
    fn test_run_empty_stack_converges_immediately() {
        let reference = Isometry3::translation(0.0, 0.0, 0.5);
        let mut stack = FeatureStack::new(reference);
        let outcome = ServoLoop::default().run(&mut stack, reference).unwrap();
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 0);
    }
}
