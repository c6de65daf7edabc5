//! Frozen row layout and stack summary.

use std::fmt;
use std::ops::Range;

use crate::features::{DepthPolicy, FeatureKind, RotationMode, TranslationMode};

/// Where one feature lives in the stacked vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutEntry {
    /// Feature kind
    pub kind: FeatureKind,
    /// 0-based index among features of the same kind, in registration order
    pub ordinal: usize,
    /// Rows occupied in `s`, `sd`, `L` and `L_true`
    pub rows: Range<usize>,
}

/// Feature counts of a stack.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutSummary {
    /// Total number of rows
    pub dim_s: usize,
    /// Cartesian point count
    pub points_xy: usize,
    /// Polar point count
    pub points_polar: usize,
    /// Log-depth count
    pub depths: usize,
    /// Translation convention
    pub translation: TranslationMode,
    /// Rotation convention
    pub rotation: RotationMode,
    /// Depth policy of the point interactions
    pub depth_policy: DepthPolicy,
}

impl LayoutSummary {
    /// Whether any point-anchored feature is registered.
    pub fn has_points(&self) -> bool {
        self.points_xy + self.points_polar + self.depths > 0
    }
}

impl fmt::Display for LayoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total feature dimension: {}", self.dim_s)?;
        let mut recap = |name: &str, n: usize, dim: usize| -> fmt::Result {
            if n > 0 {
                write!(f, "\n - {}: {} (dim {})", name, n, n * dim)?;
            }
            Ok(())
        };
        recap("Points XY", self.points_xy, 2)?;
        recap("Points Polar", self.points_polar, 2)?;
        recap("Points depths", self.depths, 1)?;
        recap("3D translations", usize::from(self.translation.is_enabled()), 3)?;
        recap("3D rotations", usize::from(self.rotation.is_enabled()), 3)?;
        Ok(())
    }
}
