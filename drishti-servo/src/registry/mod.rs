//! Feature stack: composes heterogeneous features into `s`, `sd` and `L`.
//!
//! ## Lifecycle
//!
//! 1. **Configuration**: register point features and enable 3D blocks.
//! 2. **Freeze**: the first call to [`FeatureStack::current_vector`] or
//!    [`FeatureStack::desired_vector`] allocates every buffer. Registering
//!    afterwards panics.
//! 3. **Cycles**: `current_vector` / `interaction` / `error` are recomputed
//!    against the pose supplied each cycle; `sd` is computed once.
//!
//! ## Row layout
//!
//! Translation block, rotation block, then point features in registration
//! order. The layout is shared by `s`, `sd`, `L` and `L_true`.
//!
//! ## Example
//!
//! ```
//! use drishti_servo::{FeatureStack, PointKind, RotationMode, TranslationMode};
//! use nalgebra::{Isometry3, Point3};
//!
//! let reference = Isometry3::translation(0.0, 0.0, 0.5);
//! let mut stack = FeatureStack::new(reference);
//! stack.register(PointKind::XY, Point3::new(0.05, 0.05, 0.0));
//! stack.set_translation_mode(TranslationMode::PoseVsReference);
//! stack.set_rotation_mode(RotationMode::PoseVsRef);
//! assert_eq!(stack.dim_s(), 8);
//!
//! let e = stack.error(&reference).clone();
//! assert!(e.norm() < 1e-9);
//! assert_eq!(stack.interaction().shape(), (8, 6));
//! ```

mod layout;
mod rows;

use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector, Isometry3, Point3};

use crate::config::FeatureSection;
use crate::core::pose_from_homogeneous;
use crate::error::{Result, ServoError};
use crate::features::{
    BuildContext, DepthPolicy, Feature, FeatureKind, PointAnchor, PointKind, RotationMode,
    TranslationMode,
};

pub use layout::{LayoutEntry, LayoutSummary};
pub(crate) use rows::write_rows;

/// Buffers that only exist when stability diagnostics were requested.
#[derive(Clone, Debug)]
pub(crate) struct Diagnostics {
    /// Interaction matrix built with tracked depth
    pub(crate) l_true: DMatrix<f64>,
    /// Sorted real parts of the last eigen check
    pub(crate) eigenvalues: Vec<f64>,
}

/// Ordered stack of visual features.
#[derive(Clone, Debug)]
pub struct FeatureStack {
    /// Reference pose `cdMo`
    reference: Isometry3<f64>,
    /// Depth used by point interactions in the current build
    depth_policy: DepthPolicy,
    translation: TranslationMode,
    rotation: RotationMode,
    /// Point slots in registration order
    points: Vec<Feature>,
    dim_s: usize,
    diagnostics_requested: bool,

    frozen: bool,
    /// Set once `current_vector` has populated `s` and `l`
    computed: bool,
    s: DVector<f64>,
    e: DVector<f64>,
    l: DMatrix<f64>,
    desired: Option<DVector<f64>>,
    diagnostics: Option<Diagnostics>,
}

/// Traversal order shared by every build.
fn ordered(
    translation: TranslationMode,
    rotation: RotationMode,
    points: &[Feature],
) -> impl Iterator<Item = Feature> + '_ {
    let translation = translation
        .is_enabled()
        .then_some(Feature::Translation(translation));
    let rotation = rotation.is_enabled().then_some(Feature::Rotation(rotation));
    translation
        .into_iter()
        .chain(rotation)
        .chain(points.iter().copied())
}

impl FeatureStack {
    /// Create an empty stack for the reference pose `cdMo`.
    pub fn new(reference: Isometry3<f64>) -> Self {
        Self {
            reference,
            depth_policy: DepthPolicy::Tracked,
            translation: TranslationMode::None,
            rotation: RotationMode::None,
            points: Vec::new(),
            dim_s: 0,
            diagnostics_requested: false,
            frozen: false,
            computed: false,
            s: DVector::zeros(0),
            e: DVector::zeros(0),
            l: DMatrix::zeros(0, 6),
            desired: None,
            diagnostics: None,
        }
    }

    /// Set the depth policy of point interactions.
    pub fn with_depth_policy(mut self, policy: DepthPolicy) -> Self {
        self.depth_policy = policy;
        self
    }

    /// Request stability diagnostics (`L_true` and the eigenvalue buffer).
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.assert_configurable("request diagnostics");
        self.diagnostics_requested = enabled;
        self
    }

    /// Stack configured from a feature section.
    ///
    /// For each anchor, in order, registers an XY, a polar and a depth slot
    /// as enabled; then applies the 3D modes, depth policy and diagnostics.
    pub fn from_config(
        reference: Isometry3<f64>,
        config: &FeatureSection,
        anchors: &[Point3<f64>],
    ) -> Self {
        let mut stack = Self::new(reference)
            .with_depth_policy(config.depth_policy())
            .with_diagnostics(config.stability);

        let kinds = [
            (config.use_xy, PointKind::XY),
            (config.use_polar, PointKind::Polar),
            (config.use_depth, PointKind::Depth),
        ];
        for &anchor in anchors {
            for (_, kind) in kinds.iter().filter(|(enabled, _)| *enabled) {
                stack.register(*kind, anchor);
            }
        }
        stack.set_translation_mode(config.translation_mode());
        stack.set_rotation_mode(config.rotation_mode());
        stack
    }

    fn assert_configurable(&self, action: &str) {
        assert!(
            !self.frozen,
            "feature stack is frozen: cannot {} after the first computation",
            action
        );
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    /// Register a point feature anchored on `anchor` (object frame).
    ///
    /// The depth of the anchor at the reference pose is captured now.
    /// Returns the slot index among point features.
    ///
    /// # Panics
    ///
    /// If the stack is frozen.
    pub fn register(&mut self, kind: PointKind, anchor: Point3<f64>) -> usize {
        self.assert_configurable("register a point feature");

        let anchor = PointAnchor::capture(anchor, &self.reference);
        let feature = match kind {
            PointKind::XY => Feature::PointXY(anchor),
            PointKind::Polar => Feature::PointPolar(anchor),
            PointKind::Depth => Feature::Depth(anchor),
        };
        self.dim_s += feature.dimension();
        self.points.push(feature);
        self.points.len() - 1
    }

    /// Select the translation convention.
    ///
    /// Enabling grows `dim_s` by 3 once; switching between the two enabled
    /// conventions only changes the build.
    ///
    /// # Panics
    ///
    /// On an enable/disable transition once the stack is frozen.
    pub fn set_translation_mode(&mut self, mode: TranslationMode) {
        let (was, is) = (self.translation.is_enabled(), mode.is_enabled());
        if was != is {
            self.assert_configurable("enable or disable the translation block");
            self.resize_block(is);
        }
        self.translation = mode;
    }

    /// Select the rotation convention. Same rules as [`Self::set_translation_mode`].
    pub fn set_rotation_mode(&mut self, mode: RotationMode) {
        let (was, is) = (self.rotation.is_enabled(), mode.is_enabled());
        if was != is {
            self.assert_configurable("enable or disable the rotation block");
            self.resize_block(is);
        }
        self.rotation = mode;
    }

    fn resize_block(&mut self, enable: bool) {
        if enable {
            self.dim_s += 3;
        } else {
            self.dim_s -= 3;
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Total number of rows.
    pub fn dim_s(&self) -> usize {
        self.dim_s
    }

    /// Reference pose `cdMo`.
    pub fn reference(&self) -> &Isometry3<f64> {
        &self.reference
    }

    /// Depth policy of point interactions.
    pub fn depth_policy(&self) -> DepthPolicy {
        self.depth_policy
    }

    /// Translation convention.
    pub fn translation_mode(&self) -> TranslationMode {
        self.translation
    }

    /// Rotation convention.
    pub fn rotation_mode(&self) -> RotationMode {
        self.rotation
    }

    /// Whether the slot set is frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether stability diagnostics were requested.
    pub fn has_diagnostics(&self) -> bool {
        self.diagnostics_requested
    }

    /// Features in row order.
    pub fn features(&self) -> impl Iterator<Item = Feature> + '_ {
        ordered(self.translation, self.rotation, &self.points)
    }

    /// Row range of every feature, in row order.
    pub fn layout(&self) -> Vec<LayoutEntry> {
        let mut ordinals = [0usize; 5];
        let mut row = 0;
        self.features()
            .map(|feature| {
                let kind = feature.kind();
                let slot = match kind {
                    FeatureKind::Translation => 0,
                    FeatureKind::Rotation => 1,
                    FeatureKind::PointXY => 2,
                    FeatureKind::PointPolar => 3,
                    FeatureKind::Depth => 4,
                };
                let ordinal = ordinals[slot];
                ordinals[slot] += 1;
                let rows = row..row + feature.dimension();
                row = rows.end;
                LayoutEntry {
                    kind,
                    ordinal,
                    rows,
                }
            })
            .collect()
    }

    /// Feature counts.
    pub fn summary(&self) -> LayoutSummary {
        let count = |kind: PointKind| {
            let kind = FeatureKind::from(kind);
            self.points.iter().filter(|f| f.kind() == kind).count()
        };
        LayoutSummary {
            dim_s: self.dim_s,
            points_xy: count(PointKind::XY),
            points_polar: count(PointKind::Polar),
            depths: count(PointKind::Depth),
            translation: self.translation,
            rotation: self.rotation,
            depth_policy: self.depth_policy,
        }
    }

    /// Log the feature counts at info level.
    pub fn log_summary(&self) {
        for line in self.summary().to_string().lines() {
            info!("{}", line);
        }
    }

    // =========================================================================
    // BUILDS
    // =========================================================================

    /// Allocate buffers and lock the slot set. No-op once frozen.
    fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        self.frozen = true;
        self.s = DVector::zeros(self.dim_s);
        self.e = DVector::zeros(self.dim_s);
        self.l = DMatrix::zeros(self.dim_s, 6);
        if self.diagnostics_requested {
            self.diagnostics = Some(Diagnostics {
                l_true: DMatrix::zeros(self.dim_s, 6),
                eigenvalues: Vec::with_capacity(self.dim_s),
            });
        }
        debug!(
            "Feature stack frozen: dim_s={}, depth={}, diagnostics={}",
            self.dim_s, self.depth_policy, self.diagnostics_requested
        );
    }

    /// Build `s` and `L` (and `L_true` with diagnostics) at `pose`.
    ///
    /// Freezes the stack on first use.
    pub fn current_vector(&mut self, pose: &Isometry3<f64>) -> &DVector<f64> {
        self.freeze();

        let estimated = BuildContext::new(pose, &self.reference, self.depth_policy);
        let truth = BuildContext::new(pose, &self.reference, DepthPolicy::Tracked);

        let mut row = 0;
        for feature in ordered(self.translation, self.rotation, &self.points) {
            let sample = feature.build(&estimated);

            if let Some(diagnostics) = self.diagnostics.as_mut() {
                let l_true = Some(&mut diagnostics.l_true);
                let true_end = if feature.uses_depth_estimate() {
                    write_rows(row, &feature.build(&truth), None, l_true)
                } else {
                    write_rows(row, &sample, None, l_true)
                };
                debug_assert_eq!(true_end, row + sample.dimension());
            }

            row = write_rows(row, &sample, Some(&mut self.s), Some(&mut self.l));
        }
        debug_assert_eq!(row, self.dim_s);

        self.computed = true;
        &self.s
    }

    /// Like [`Self::current_vector`] for a 4x4 homogeneous matrix.
    ///
    /// A malformed matrix is reported and leaves every buffer untouched.
    pub fn current_vector_from_homogeneous(
        &mut self,
        pose: &DMatrix<f64>,
    ) -> Result<&DVector<f64>> {
        let pose = pose_from_homogeneous(pose).inspect_err(|e| warn!("Rejected pose: {}", e))?;
        Ok(self.current_vector(&pose))
    }

    /// Desired vector `sd`, built once at the reference pose with tracked depth.
    ///
    /// Freezes the stack on first use.
    pub fn desired_vector(&mut self) -> &DVector<f64> {
        self.freeze();

        let Self {
            reference,
            translation,
            rotation,
            points,
            dim_s,
            desired,
            ..
        } = self;

        desired.get_or_insert_with(|| {
            let ctx = BuildContext::desired(reference);
            let mut sd = DVector::zeros(*dim_s);
            let mut row = 0;
            for feature in ordered(*translation, *rotation, points) {
                row = write_rows(row, &feature.build(&ctx), Some(&mut sd), None);
            }
            debug!("Desired features computed ({} rows)", row);
            sd
        })
    }

    /// Interaction matrix from the latest [`Self::current_vector`] call.
    ///
    /// Empty (`0 x 6`) until the stack is frozen, then all zeros until the
    /// first `current_vector` call.
    pub fn interaction(&self) -> &DMatrix<f64> {
        &self.l
    }

    /// Interaction matrix built with tracked depth, when diagnostics are on.
    pub fn true_interaction(&self) -> Option<&DMatrix<f64>> {
        self.diagnostics.as_ref().map(|d| &d.l_true)
    }

    /// Feature error `e = s(pose) - sd`.
    pub fn error(&mut self, pose: &Isometry3<f64>) -> &DVector<f64> {
        self.desired_vector();
        self.current_vector(pose);
        if let Some(sd) = &self.desired {
            self.e.copy_from(&self.s);
            self.e -= sd;
        }
        &self.e
    }

    /// Write `e(pose)` into a caller buffer of length `dim_s`.
    ///
    /// A buffer of the wrong length is reported and nothing is computed.
    pub fn error_into(&mut self, pose: &Isometry3<f64>, out: &mut DVector<f64>) -> Result<()> {
        if out.len() != self.dim_s {
            let err = ServoError::vector_len("error buffer", self.dim_s, out.len());
            warn!("{}", err);
            return Err(err);
        }
        out.copy_from(self.error(pose));
        Ok(())
    }

    /// Copy `L` into a caller buffer of shape `dim_s x 6`.
    ///
    /// Fails with [`ServoError::NotComputed`] before the first
    /// [`Self::current_vector`] call.
    pub fn interaction_into(&self, out: &mut DMatrix<f64>) -> Result<()> {
        let expected = (self.dim_s, 6);
        if out.shape() != expected {
            let err = ServoError::matrix_shape("interaction buffer", expected, out.shape());
            warn!("{}", err);
            return Err(err);
        }
        if !self.computed {
            return Err(ServoError::NotComputed);
        }
        out.copy_from(&self.l);
        Ok(())
    }

    pub(crate) fn is_computed(&self) -> bool {
        self.computed
    }

    /// Current `L` together with the diagnostic buffers.
    pub(crate) fn diagnostic_parts(&mut self) -> Option<(&DMatrix<f64>, &mut Diagnostics)> {
        let l = &self.l;
        self.diagnostics.as_mut().map(|d| (l, d))
    }
}
