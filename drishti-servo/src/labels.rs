//! Row labels, plot legend and experiment naming.
//!
//! Labels follow the frozen row layout, so `row_labels(&stack.layout())[i]`
//! names row `i` of `e` and `L`. Indices are 1-based and counted per kind.

use std::fmt;

use crate::features::{DepthPolicy, FeatureKind};
use crate::registry::{LayoutEntry, LayoutSummary};

/// One label per row of the layout.
pub fn row_labels(layout: &[LayoutEntry]) -> Vec<String> {
    let mut labels = Vec::with_capacity(layout.last().map_or(0, |e| e.rows.end));
    for entry in layout {
        let i = entry.ordinal + 1;
        match entry.kind {
            FeatureKind::Translation => {
                labels.extend(["t_x", "t_y", "t_z"].map(String::from));
            }
            FeatureKind::Rotation => {
                labels.extend(["\\theta u_x", "\\theta u_y", "\\theta u_z"].map(String::from));
            }
            FeatureKind::PointXY => {
                labels.push(format!("x_{{{}}}", i));
                labels.push(format!("y_{{{}}}", i));
            }
            FeatureKind::PointPolar => {
                labels.push(format!("\\rho_{{{}}}", i));
                labels.push(format!("\\theta_{{{}}}", i));
            }
            FeatureKind::Depth => {
                labels.push(format!("\\log Z_{{{}}}/Z^*", i));
            }
        }
    }
    labels
}

/// Row labels as a quoted list, `['x_{1}', 'y_{1}', ...]`.
pub fn legend(layout: &[LayoutEntry]) -> String {
    let quoted: Vec<String> = row_labels(layout)
        .into_iter()
        .map(|label| format!("'{}'", label))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Name of a servoing experiment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExperimentId {
    /// Feature set, e.g. `XY4_cTo_cRcd`
    pub base_path: String,
    /// Tuning, e.g. `Zd_lambda0.5`
    pub run: String,
}

impl fmt::Display for ExperimentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base_path, self.run)
    }
}

/// Experiment name from the feature counts and the control gain.
///
/// The depth tag is `Zd` for the desired depth, `Z<z>` for a constant and
/// `Zc` for the tracked depth; it is omitted when no point feature exists.
pub fn experiment_id(summary: &LayoutSummary, lambda: f64) -> ExperimentId {
    let mut parts = Vec::new();
    if summary.points_xy > 0 {
        parts.push(format!("XY{}", summary.points_xy));
    }
    if summary.points_polar > 0 {
        parts.push(format!("Polar{}", summary.points_polar));
    }
    if summary.depths > 0 {
        parts.push(format!("Depth{}", summary.depths));
    }
    parts.extend(summary.translation.descriptor().map(String::from));
    parts.extend(summary.rotation.descriptor().map(String::from));

    let mut run = String::new();
    if summary.has_points() {
        match summary.depth_policy {
            DepthPolicy::Desired => run.push_str("Zd"),
            DepthPolicy::Constant(z) => run.push_str(&format!("Z{}", z)),
            DepthPolicy::Tracked => run.push_str("Zc"),
        }
        run.push('_');
    }
    run.push_str(&format!("lambda{}", lambda));

    ExperimentId {
        base_path: parts.join("_"),
        run,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{PointKind, RotationMode, TranslationMode};
    use crate::registry::FeatureStack;
    use nalgebra::{Isometry3, Point3};

    fn stack() -> FeatureStack {
        let mut stack = FeatureStack::new(Isometry3::translation(0.0, 0.0, 0.5));
        stack.register(PointKind::XY, Point3::new(0.05, 0.05, 0.0));
        stack.register(PointKind::Depth, Point3::new(0.05, 0.05, 0.0));
        stack.register(PointKind::XY, Point3::new(-0.05, 0.05, 0.0));
        stack.set_rotation_mode(RotationMode::PoseVsRef);
        stack
    }

    #[test]
    fn test_row_labels_follow_layout() {
        let stack = stack();
        let labels = row_labels(&stack.layout());
        assert_eq!(labels.len(), stack.dim_s());
        assert_eq!(
            labels,
            vec![
                "\\theta u_x",
                "\\theta u_y",
                "\\theta u_z",
                "x_{1}",
                "y_{1}",
                "\\log Z_{1}/Z^*",
                "x_{2}",
                "y_{2}",
            ]
        );
    }

    #[test]
    fn test_legend() {
        let mut stack = FeatureStack::new(Isometry3::translation(0.0, 0.0, 0.5));
        stack.register(PointKind::Polar, Point3::new(0.05, 0.05, 0.0));
        assert_eq!(legend(&stack.layout()), "['\\rho_{1}', '\\theta_{1}']");
        assert_eq!(legend(&[]), "[]");
    }

    #[test]
    fn test_experiment_id() {
        let mut stack = stack();
        stack.set_translation_mode(TranslationMode::PoseVsReference);
        let id = experiment_id(&stack.summary(), 0.5);
        assert_eq!(id.base_path, "XY2_Depth1_cTo_cRcd");
        assert_eq!(id.run, "Zc_lambda0.5");

        let stack = stack.with_depth_policy(DepthPolicy::Desired);
        assert_eq!(experiment_id(&stack.summary(), 1.0).run, "Zd_lambda1");

        let stack = stack.with_depth_policy(DepthPolicy::Constant(0.8));
        assert_eq!(
            experiment_id(&stack.summary(), 0.5).to_string(),
            "XY2_Depth1_cTo_cRcd/Z0.8_lambda0.5"
        );
    }

    #[test]
    fn test_experiment_id_without_points() {
        let mut stack = FeatureStack::new(Isometry3::identity());
        stack.set_translation_mode(TranslationMode::ReferenceVsPose);
        stack.set_rotation_mode(RotationMode::RefVsPose);
        let id = experiment_id(&stack.summary(), 0.5);
        assert_eq!(id.base_path, "cdTc_cdRc");
        assert_eq!(id.run, "lambda0.5");
    }
}
