//! Closed-loop servoing tests with the kinematic camera.

mod common;

use drishti_servo::{DepthPolicy, FeatureStack, RotationMode, ServoLoop, TranslationMode};

/// Fast loop: `(1 - λ dt)` contraction of 0.95 per iteration.
fn fast_loop() -> ServoLoop {
    ServoLoop {
        lambda: 1.0,
        err_min: 1e-6,
        iter_max: 2000,
        dt: 0.05,
    }
}

#[test]
fn test_pose_based_converges_to_reference() {
    let mut stack = FeatureStack::new(common::reference());
    stack.set_translation_mode(TranslationMode::PoseVsReference);
    stack.set_rotation_mode(RotationMode::PoseVsRef);

    let outcome = fast_loop().run(&mut stack, common::start_pose()).unwrap();
    assert!(outcome.converged, "stopped at |e| = {}", outcome.final_error);
    assert!(outcome.final_error < 1e-6);

    let delta = common::reference().inverse() * outcome.pose;
    assert!(delta.translation.vector.norm() < 1e-5);
    assert!(delta.rotation.angle() < 1e-5);
}

#[test]
fn test_image_based_converges() {
    let mut stack = common::xy_stack(common::reference());
    let outcome = fast_loop().run(&mut stack, common::offset_pose()).unwrap();

    assert!(outcome.converged, "stopped at |e| = {}", outcome.final_error);
    let first = outcome.history.first().map(|s| s.error_norm).unwrap();
    assert!(first > outcome.final_error);

    let delta = common::reference().inverse() * outcome.pose;
    assert!(delta.translation.vector.norm() < 1e-3);
    assert!(delta.rotation.angle() < 1e-3);
}

#[test]
fn test_loop_records_stability() {
    let mut stack = common::full_stack(DepthPolicy::Desired, true);
    let servo = ServoLoop {
        iter_max: 50,
        ..fast_loop()
    };
    let outcome = servo.run(&mut stack, common::offset_pose()).unwrap();

    assert_eq!(outcome.iterations, outcome.history.len());
    assert!(!outcome.history.is_empty());
    for step in &outcome.history {
        let min = step.min_eigenvalue.unwrap();
        // Tall stack: the redundant rows give exact zeros
        assert_eq!(min, 0.0);
    }
}

#[test]
fn test_iteration_cap() {
    let mut stack = common::xy_stack(common::reference());
    let servo = ServoLoop {
        iter_max: 3,
        ..fast_loop()
    };
    let outcome = servo.run(&mut stack, common::start_pose()).unwrap();
    assert!(!outcome.converged);
    assert_eq!(outcome.iterations, 3);
    assert_eq!(
        outcome.history.iter().map(|s| s.iteration).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}
