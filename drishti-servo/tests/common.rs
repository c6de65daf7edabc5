//! Test utilities for DrishtiServo.
//!
//! Shared scene: a planar square target seen head-on from half a meter.

#![allow(dead_code)]

use drishti_servo::{DepthPolicy, FeatureStack, PointKind, RotationMode, TranslationMode};
use nalgebra::{Isometry3, Point3, Vector3};

/// Half side of the square target (meters).
pub const HALF_SIZE: f64 = 0.05;

/// Reference pose `cdMo`: target centered, 0.5 m ahead.
pub fn reference() -> Isometry3<f64> {
    Isometry3::translation(0.0, 0.0, 0.5)
}

/// Corners of the square target in the object frame.
pub fn square() -> Vec<Point3<f64>> {
    vec![
        Point3::new(-HALF_SIZE, -HALF_SIZE, 0.0),
        Point3::new(-HALF_SIZE, HALF_SIZE, 0.0),
        Point3::new(HALF_SIZE, HALF_SIZE, 0.0),
        Point3::new(HALF_SIZE, -HALF_SIZE, 0.0),
    ]
}

/// Pose displaced from the reference by a small translation and rotation.
pub fn offset_pose() -> Isometry3<f64> {
    Isometry3::new(Vector3::new(0.02, -0.01, 0.6), Vector3::new(0.05, -0.03, 0.15))
}

/// Pose far enough from the reference to need many servo iterations.
pub fn start_pose() -> Isometry3<f64> {
    Isometry3::new(Vector3::new(0.05, -0.03, 0.7), Vector3::new(0.1, -0.1, 0.3))
}

/// Four XY points on the square.
pub fn xy_stack(reference: Isometry3<f64>) -> FeatureStack {
    let mut stack = FeatureStack::new(reference);
    for p in square() {
        stack.register(PointKind::XY, p);
    }
    stack
}

/// Four XY points plus `cTo` and `cRcd`: 14 rows.
pub fn full_stack(policy: DepthPolicy, diagnostics: bool) -> FeatureStack {
    let mut stack = FeatureStack::new(reference())
        .with_depth_policy(policy)
        .with_diagnostics(diagnostics);
    for p in square() {
        stack.register(PointKind::XY, p);
    }
    stack.set_translation_mode(TranslationMode::PoseVsReference);
    stack.set_rotation_mode(RotationMode::PoseVsRef);
    stack
}
