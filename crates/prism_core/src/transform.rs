//! Model-view-projection math for the spinning mesh.
//!
//! Every function here is pure: the same inputs always produce the same
//! matrix, so a frame's transform depends only on the window size and the
//! milliseconds elapsed since startup.

use glam::{Mat4, Vec3};

/// Vertical field of view, in degrees.
pub const FOV_Y_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 2.0);
pub const TARGET: Vec3 = Vec3::ZERO;
pub const UP: Vec3 = Vec3::Y;

/// Rotation axis before normalisation.
pub const ROTATION_AXIS: Vec3 = Vec3::new(0.0, 1.0, 1.0);

/// Degrees of rotation per elapsed millisecond.
pub const DEGREES_PER_MS: f32 = 0.1;

/// `width / height`, or `1.0` for a degenerate height.
#[inline]
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

pub fn projection_matrix(aspect: f32) -> Mat4 {
    Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR)
}

pub fn view_matrix() -> Mat4 {
    Mat4::look_at_rh(EYE, TARGET, UP)
}

/// Rotation about `(0, 1, 1)` by `elapsed_ms × 0.1` degrees.
pub fn model_matrix(elapsed_ms: u64) -> Mat4 {
    // keep the angle in one turn so f32 precision holds for long runs
    let degrees = (elapsed_ms % 3_600) as f32 * DEGREES_PER_MS;
    Mat4::from_axis_angle(ROTATION_AXIS.normalize(), degrees.to_radians())
}

/// `projection × view × model` for a `width × height` target at `elapsed_ms`.
pub fn model_view_projection(width: u32, height: u32, elapsed_ms: u64) -> Mat4 {
    projection_matrix(aspect_ratio(width, height)) * view_matrix() * model_matrix(elapsed_ms)
}
