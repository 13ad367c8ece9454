//! Additional math helpers layered on top of `glam`.

use glam::{Mat3, Quat, Vec3};

/// Converts angular velocity vector (radians/sec) into a quaternion delta.
pub fn angular_velocity_to_quat(angular: Vec3, dt: f32) -> Quat {
    let angle = angular.length() * dt;
    if angle.abs() < 1e-6 {
        return Quat::IDENTITY;
    }
    Quat::from_axis_angle(angular.normalize(), angle)
}

/// Rotates a body-space inverse inertia tensor into world space.
pub fn world_inverse_inertia(local_inverse: Mat3, rotation: Quat) -> Mat3 {
    let basis = Mat3::from_quat(rotation);
    basis * local_inverse * basis.transpose()
}

/// Absolute value of every matrix entry, used to size rotated boxes.
pub fn abs_mat3(m: Mat3) -> Mat3 {
    Mat3::from_cols(m.x_axis.abs(), m.y_axis.abs(), m.z_axis.abs())
}
