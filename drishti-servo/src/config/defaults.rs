//! Default value functions for serde deserialization.

pub fn enabled() -> bool {
    true
}

pub fn translation_3d() -> String {
    "none".to_string()
}

pub fn rotation_3d() -> String {
    "none".to_string()
}

pub fn z_estim() -> f64 {
    -1.0
}

pub fn lambda() -> f64 {
    0.5
}

pub fn err_min() -> f64 {
    1e-4
}

pub fn iter_max() -> usize {
    5000
}

pub fn dt() -> f64 {
    0.01
}

pub fn target_half_size() -> f64 {
    0.05
}

pub fn start_pose() -> [f64; 6] {
    [0.1, -0.05, 0.75, 0.1, -0.15, 0.4]
}

pub fn reference_pose() -> [f64; 6] {
    [0.0, 0.0, 0.5, 0.0, 0.0, 0.0]
}
