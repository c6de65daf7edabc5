//! Stability check integration tests.

mod common;

use approx::assert_relative_eq;
use drishti_servo::{
    DepthPolicy, FeatureStack, PointKind, RotationMode, ServoError, StabilityReport,
    TranslationMode, velocity,
};
use nalgebra::Point3;

#[test]
fn test_pose_blocks_only_give_unit_eigenvalues() {
    // No point feature: the estimated and true matrices coincide
    for (translation, rotation) in [
        (TranslationMode::PoseVsReference, RotationMode::PoseVsRef),
        (TranslationMode::ReferenceVsPose, RotationMode::RefVsPose),
    ] {
        let mut stack = FeatureStack::new(common::reference())
            .with_depth_policy(DepthPolicy::Constant(3.0))
            .with_diagnostics(true);
        stack.set_translation_mode(translation);
        stack.set_rotation_mode(rotation);
        stack.current_vector(&common::offset_pose());

        let eigenvalues = stack.stability().unwrap();
        assert_eq!(eigenvalues.len(), 6);
        for &v in eigenvalues {
            assert_relative_eq!(v, 1.0, epsilon = 1e-6);
        }
    }
}

#[test]
fn test_full_stack_six_ones_eight_zeros() {
    let mut stack = common::full_stack(DepthPolicy::Tracked, true);
    stack.current_vector(&common::offset_pose());

    let eigenvalues = stack.stability().unwrap().to_vec();
    assert_eq!(eigenvalues.len(), 14);
    for &v in &eigenvalues[..8] {
        assert_relative_eq!(v, 0.0, epsilon = 1e-9);
    }
    for &v in &eigenvalues[8..] {
        assert_relative_eq!(v, 1.0, epsilon = 1e-6);
    }

    let report = StabilityReport::from_eigenvalues(&eigenvalues).unwrap();
    assert!(report.is_locally_stable());
    assert_eq!(report.zero, 8);
}

#[test]
fn test_desired_depth_exact_at_reference() {
    let mut stack = common::xy_stack(common::reference())
        .with_depth_policy(DepthPolicy::Desired)
        .with_diagnostics(true);
    stack.current_vector(&common::reference());

    let eigenvalues = stack.stability().unwrap().to_vec();
    assert_eq!(eigenvalues.len(), 8);
    assert_relative_eq!(eigenvalues[0], 0.0, epsilon = 1e-9);
    assert_relative_eq!(eigenvalues[1], 0.0, epsilon = 1e-9);
    for &v in &eigenvalues[2..] {
        assert_relative_eq!(v, 1.0, epsilon = 1e-6);
    }
}

#[test]
fn test_constant_depth_moves_eigenvalues() {
    let mut stack = common::xy_stack(common::reference())
        .with_depth_policy(DepthPolicy::Constant(2.0))
        .with_diagnostics(true);
    stack.current_vector(&common::offset_pose());

    let eigenvalues = stack.stability().unwrap();
    assert_eq!(eigenvalues.len(), 8);
    assert!(
        eigenvalues.iter().any(|v| (v - 1.0).abs() > 1e-2),
        "a wrong depth should move the spectrum away from 1: {:?}",
        eigenvalues
    );
}

#[test]
fn test_sorted_ascending() {
    let mut stack = common::full_stack(DepthPolicy::Constant(0.3), true);
    stack.current_vector(&common::start_pose());
    let eigenvalues = stack.stability().unwrap();
    assert!(eigenvalues.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_stability_errors() {
    let mut plain = common::xy_stack(common::reference());
    plain.current_vector(&common::offset_pose());
    assert_eq!(plain.stability(), Err(ServoError::DiagnosticsDisabled));

    let mut empty = FeatureStack::new(common::reference()).with_diagnostics(true);
    empty.current_vector(&common::offset_pose());
    assert_eq!(empty.stability(), Err(ServoError::EmptyStack));

    let mut fresh = FeatureStack::new(common::reference()).with_diagnostics(true);
    fresh.register(PointKind::Polar, common::square()[0]);
    assert_eq!(fresh.stability(), Err(ServoError::NotComputed));
}

#[test]
fn test_polar_point_on_optical_axis_is_reported() {
    // ρ = 0 at the reference pose: the polar rows divide by zero
    let mut stack = FeatureStack::new(common::reference()).with_diagnostics(true);
    stack.register(PointKind::Polar, Point3::origin());
    stack.register(PointKind::XY, Point3::new(0.05, 0.05, 0.0));
    stack.current_vector(&common::reference());
    assert!(stack.interaction().iter().any(|v| !v.is_finite()));

    assert!(matches!(stack.stability(), Err(ServoError::NonFinite(_))));

    let e = stack.error(&common::reference()).clone();
    assert!(matches!(
        velocity(0.5, stack.interaction(), &e),
        Err(ServoError::NonFinite(_))
    ));
}
