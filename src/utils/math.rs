//! src/utils/math.rs
//! Transform helpers for the shading uniforms

use glam::{Mat3, Mat4, Vec3};

/// Matrix that carries object-space normals into the space of `model`.
///
/// Inverse-transpose of the upper 3x3, widened back to 4x4 so it can be
/// uploaded as a `mat4`.
pub fn normal_matrix(model: Mat4) -> Mat4 {
    let upper = Mat3::from_mat4(model);
    if upper.determinant().abs() <= f32::EPSILON {
        return Mat4::IDENTITY;
    }
    Mat4::from_mat3(upper.inverse().transpose())
}

/// Model matrix for a body spinning about `axis` at `speed` radians per second.
pub fn spin(axis: Vec3, speed: f32, seconds: f32) -> Mat4 {
    let axis = axis.try_normalize().unwrap_or(Vec3::Y);
    Mat4::from_axis_angle(axis, speed * seconds)
}
