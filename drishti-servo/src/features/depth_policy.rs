//! Depth substitution for point features.

use std::fmt;

/// Which depth a point feature uses in its interaction matrix.
///
/// Point features never measure depth directly, so the interaction matrix is
/// usually built from an estimate. The policy is configured with a single
/// number (`z_estim`):
///
/// | setting | policy |
/// |---------|--------|
/// | `< 0`   | [`DepthPolicy::Tracked`]: live depth of the tracked point |
/// | `== 0`  | [`DepthPolicy::Desired`]: depth captured at the reference pose |
/// | `> 0`   | [`DepthPolicy::Constant`]: the setting itself |
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DepthPolicy {
    /// Use the live tracked depth unmodified
    #[default]
    Tracked,
    /// Use the depth snapshot taken against the reference pose
    Desired,
    /// Override every point with a constant depth
    Constant(f64),
}

impl DepthPolicy {
    /// Decode the tri-state `z_estim` setting. NaN is treated as "tracked".
    pub fn from_setting(z_estim: f64) -> Self {
        if z_estim > 0.0 {
            DepthPolicy::Constant(z_estim)
        } else if z_estim == 0.0 {
            DepthPolicy::Desired
        } else {
            DepthPolicy::Tracked
        }
    }

    /// Encode back to the tri-state setting.
    pub fn to_setting(self) -> f64 {
        match self {
            DepthPolicy::Tracked => -1.0,
            DepthPolicy::Desired => 0.0,
            DepthPolicy::Constant(z) => z,
        }
    }

    /// Depth to feed the interaction matrix.
    #[inline]
    pub fn substitute(self, tracked: f64, snapshot: f64) -> f64 {
        match self {
            DepthPolicy::Tracked => tracked,
            DepthPolicy::Desired => snapshot,
            DepthPolicy::Constant(z) => z,
        }
    }
}

impl fmt::Display for DepthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepthPolicy::Tracked => write!(f, "tracked"),
            DepthPolicy::Desired => write!(f, "desired"),
            DepthPolicy::Constant(z) => write!(f, "constant({})", z),
        }
    }
}
