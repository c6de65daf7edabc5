//! Control loop section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Control loop tuning
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ControlSection {
    /// Gain λ of `v = -λ L⁺ e`
    #[serde(default = "defaults::lambda")]
    pub lambda: f64,

    /// Stop once `‖e‖` drops below this
    #[serde(default = "defaults::err_min")]
    pub err_min: f64,

    /// Iteration cap
    #[serde(default = "defaults::iter_max")]
    pub iter_max: usize,

    /// Control period (seconds)
    #[serde(default = "defaults::dt")]
    pub dt: f64,
}

impl Default for ControlSection {
    fn default() -> Self {
        Self {
            lambda: defaults::lambda(),
            err_min: defaults::err_min(),
            iter_max: defaults::iter_max(),
            dt: defaults::dt(),
        }
    }
}
