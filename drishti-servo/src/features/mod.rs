//! Visual features and their per-kind builds.
//!
//! Every feature kind exposes a single capability, [`Feature::build`], which
//! turns a camera pose into the feature value and its interaction row-block.
//! Builds are pure: the same feature can be evaluated twice in one cycle with
//! different depth policies (estimated vs. true) without any hidden state.
//!
//! | Kind | Rows | Value |
//! |------|------|-------|
//! | [`FeatureKind::Translation`] | 3 | `c t o` or `cd t c` |
//! | [`FeatureKind::Rotation`] | 3 | `θu` of `cdRc` or `cRcd` |
//! | [`FeatureKind::PointXY`] | 2 | `(x, y)` |
//! | [`FeatureKind::PointPolar`] | 2 | `(ρ, θ)` |
//! | [`FeatureKind::Depth`] | 1 | `log(Z / Z*)` |

mod depth_policy;
pub mod point;
pub mod pose3d;

use std::fmt;

use log::warn;
use nalgebra::{DMatrix, DVector, Isometry3, Point3, SMatrix};

use crate::core::track;

pub use depth_policy::DepthPolicy;

/// Kind of a feature slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Cartesian image point
    PointXY,
    /// Polar image point
    PointPolar,
    /// Log-depth of a point
    Depth,
    /// 3D translation error
    Translation,
    /// 3D θu rotation error
    Rotation,
}

impl FeatureKind {
    /// Number of rows this kind contributes to the stacked vector.
    pub fn dimension(self) -> usize {
        match self {
            FeatureKind::PointXY | FeatureKind::PointPolar => 2,
            FeatureKind::Depth => 1,
            FeatureKind::Translation | FeatureKind::Rotation => 3,
        }
    }

    /// Whether the kind is anchored on a 3D point.
    pub fn is_point(self) -> bool {
        matches!(
            self,
            FeatureKind::PointXY | FeatureKind::PointPolar | FeatureKind::Depth
        )
    }
}

/// The point-anchored subset of [`FeatureKind`], accepted by registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointKind {
    /// Cartesian image point `(x, y)`
    XY,
    /// Polar image point `(ρ, θ)`
    Polar,
    /// Log-depth `log(Z / Z*)`
    Depth,
}

impl From<PointKind> for FeatureKind {
    fn from(kind: PointKind) -> Self {
        match kind {
            PointKind::XY => FeatureKind::PointXY,
            PointKind::Polar => FeatureKind::PointPolar,
            PointKind::Depth => FeatureKind::Depth,
        }
    }
}

/// Convention of the 3D translation feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TranslationMode {
    /// Feature disabled
    #[default]
    None,
    /// `c t o`: object position seen from the current camera (`"cTo"`)
    PoseVsReference,
    /// `cd t c`: current camera position in the desired camera frame (`"cdTc"`)
    ReferenceVsPose,
}

impl TranslationMode {
    /// Parse a mode string. Unknown strings disable the feature.
    pub fn from_descriptor(descriptor: &str) -> Self {
        match descriptor.trim() {
            "cTo" => TranslationMode::PoseVsReference,
            "cdTc" => TranslationMode::ReferenceVsPose,
            "" | "none" | "None" | "NONE" => TranslationMode::None,
            other => {
                warn!("Unknown translation mode '{}', feature disabled", other);
                TranslationMode::None
            }
        }
    }

    /// Mode string, `None` when disabled.
    pub fn descriptor(self) -> Option<&'static str> {
        match self {
            TranslationMode::None => None,
            TranslationMode::PoseVsReference => Some("cTo"),
            TranslationMode::ReferenceVsPose => Some("cdTc"),
        }
    }

    /// Whether the feature contributes rows.
    pub fn is_enabled(self) -> bool {
        self != TranslationMode::None
    }
}

/// Convention of the 3D rotation feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RotationMode {
    /// Feature disabled
    #[default]
    None,
    /// `θu` of `cdRc` (`"cdRc"`)
    RefVsPose,
    /// `θu` of `cRcd` (`"cRcd"`)
    PoseVsRef,
}

impl RotationMode {
    /// Parse a mode string. Unknown strings disable the feature.
    pub fn from_descriptor(descriptor: &str) -> Self {
        match descriptor.trim() {
            "cdRc" => RotationMode::RefVsPose,
            "cRcd" => RotationMode::PoseVsRef,
            "" | "none" | "None" | "NONE" => RotationMode::None,
            other => {
                warn!("Unknown rotation mode '{}', feature disabled", other);
                RotationMode::None
            }
        }
    }

    /// Mode string, `None` when disabled.
    pub fn descriptor(self) -> Option<&'static str> {
        match self {
            RotationMode::None => None,
            RotationMode::RefVsPose => Some("cdRc"),
            RotationMode::PoseVsRef => Some("cRcd"),
        }
    }

    /// Whether the feature contributes rows.
    pub fn is_enabled(self) -> bool {
        self != RotationMode::None
    }
}

impl fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().unwrap_or("none"))
    }
}

impl fmt::Display for RotationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().unwrap_or("none"))
    }
}

/// 3D point a feature is anchored on, with its depth at the reference pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointAnchor {
    /// Position in the object frame
    pub position: Point3<f64>,
    /// Depth `Z*` of the point seen from the reference pose
    pub depth_snapshot: f64,
}

impl PointAnchor {
    /// Anchor `position`, capturing its depth against `reference`.
    pub fn capture(position: Point3<f64>, reference: &Isometry3<f64>) -> Self {
        Self {
            position,
            depth_snapshot: track(reference, &position).z,
        }
    }
}

/// A feature slot of the stack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Feature {
    /// 3D translation error
    Translation(TranslationMode),
    /// 3D rotation error
    Rotation(RotationMode),
    /// Cartesian image point
    PointXY(PointAnchor),
    /// Polar image point
    PointPolar(PointAnchor),
    /// Log-depth
    Depth(PointAnchor),
}

/// Inputs of one build.
#[derive(Clone, Copy, Debug)]
pub struct BuildContext<'a> {
    /// Pose to evaluate at (`cMo`)
    pub pose: &'a Isometry3<f64>,
    /// Reference pose of the task (`cdMo`)
    pub reference: &'a Isometry3<f64>,
    /// Depth fed to point interaction matrices
    pub depth: DepthPolicy,
}

impl<'a> BuildContext<'a> {
    /// Build at `pose` with the given depth policy.
    pub fn new(pose: &'a Isometry3<f64>, reference: &'a Isometry3<f64>, depth: DepthPolicy) -> Self {
        Self {
            pose,
            reference,
            depth,
        }
    }

    /// Build at the reference pose with tracked depth.
    pub fn desired(reference: &'a Isometry3<f64>) -> Self {
        Self::new(reference, reference, DepthPolicy::Tracked)
    }
}

/// Value and interaction row-block produced by one feature build.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSample {
    /// Feature value (1 to 3 rows)
    pub value: DVector<f64>,
    /// Interaction rows (`value.len() x 6`)
    pub interaction: DMatrix<f64>,
}

impl FeatureSample {
    fn new<const R: usize>(value: &[f64], interaction: &SMatrix<f64, R, 6>) -> Self {
        Self {
            value: DVector::from_column_slice(value),
            interaction: DMatrix::from_column_slice(R, 6, interaction.as_slice()),
        }
    }

    fn empty() -> Self {
        Self {
            value: DVector::zeros(0),
            interaction: DMatrix::zeros(0, 6),
        }
    }

    /// Number of rows.
    pub fn dimension(&self) -> usize {
        self.value.len()
    }
}

impl Feature {
    /// Kind of this feature.
    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Translation(_) => FeatureKind::Translation,
            Feature::Rotation(_) => FeatureKind::Rotation,
            Feature::PointXY(_) => FeatureKind::PointXY,
            Feature::PointPolar(_) => FeatureKind::PointPolar,
            Feature::Depth(_) => FeatureKind::Depth,
        }
    }

    /// Rows contributed; zero for a disabled 3D feature.
    pub fn dimension(&self) -> usize {
        match self {
            Feature::Translation(mode) if !mode.is_enabled() => 0,
            Feature::Rotation(mode) if !mode.is_enabled() => 0,
            _ => self.kind().dimension(),
        }
    }

    /// Whether the interaction depends on the depth policy.
    pub fn uses_depth_estimate(&self) -> bool {
        self.kind().is_point()
    }

    /// Evaluate the feature value and interaction rows.
    ///
    /// Point values always come from the tracked geometry; only their
    /// interaction rows see the depth chosen by `ctx.depth`.
    pub fn build(&self, ctx: &BuildContext<'_>) -> FeatureSample {
        match self {
            Feature::Translation(mode) => pose3d::translation(*mode, ctx.pose, ctx.reference)
                .map(|(t, l)| FeatureSample::new(t.as_slice(), &l))
                .unwrap_or_else(FeatureSample::empty),
            Feature::Rotation(mode) => pose3d::rotation(*mode, ctx.pose, ctx.reference)
                .map(|(tu, l)| FeatureSample::new(tu.as_slice(), &l))
                .unwrap_or_else(FeatureSample::empty),
            Feature::PointXY(anchor) => {
                let p = track(ctx.pose, &anchor.position);
                let z = ctx.depth.substitute(p.z, anchor.depth_snapshot);
                FeatureSample::new(&[p.x, p.y], &point::xy_interaction(p.x, p.y, z))
            }
            Feature::PointPolar(anchor) => {
                let p = track(ctx.pose, &anchor.position);
                let z = ctx.depth.substitute(p.z, anchor.depth_snapshot);
                let (rho, theta) = point::polar(p.x, p.y);
                FeatureSample::new(&[rho, theta], &point::polar_interaction(rho, theta, z))
            }
            Feature::Depth(anchor) => {
                let p = track(ctx.pose, &anchor.position);
                let z = ctx.depth.substitute(p.z, anchor.depth_snapshot);
                let value = (p.z / anchor.depth_snapshot).ln();
                FeatureSample::new(&[value], &point::depth_interaction(p.x, p.y, z))
            }
        }
    }
}
