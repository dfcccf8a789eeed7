use glam::{Vec2, Vec3};

/// Free-fly camera pose: world position plus (yaw, pitch) in radians.
///
/// Pitch is deliberately unclamped; the scene shader consumes the raw value.
pub struct CameraState {
    pub position: Vec3,
    pub rotation: Vec2,
}

impl CameraState {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec2::ZERO,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.x
    }

    pub fn pitch(&self) -> f32 {
        self.rotation.y
    }

    /// Debug-menu reset back to the spawn pose.
    pub fn reset(&mut self) {
        self.position = Vec3::ZERO;
        self.rotation = Vec2::ZERO;
    }
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new()
    }
}

/// Displace `position` by `speed` along the direction given by a yaw `rx`
/// and pitch `ry`.
///
/// Every movement axis reuses this one formula with different offsets:
/// forward/back pass the camera's own yaw and pitch, strafing passes
/// yaw - pi/2 with zero pitch, and ascending passes a fixed pitch of +pi/2
/// with negative speed.
pub fn displace(position: Vec3, rx: f32, ry: f32, speed: f32) -> Vec3 {
    let dx = -speed * ry.cos() * rx.sin();
    let dy = -speed * ry.sin();
    let dz = speed * ry.cos() * rx.cos();

    position + Vec3::new(dx, dy, dz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const STRAFE_OFFSET: f32 = 1.571;

    #[test]
    fn forward_step_moves_along_positive_z() {
        let p = displace(Vec3::ZERO, 0.0, 0.0, 1.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn strafe_right_moves_along_negative_x() {
        // Right strafe is yaw - pi/2 with positive speed.
        let p = displace(Vec3::ZERO, 0.0 - STRAFE_OFFSET, 0.0, 1.0);
        assert_relative_eq!(p.x, -1.0, epsilon = 1e-3);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn strafe_left_mirrors_strafe_right() {
        let right = displace(Vec3::ZERO, -STRAFE_OFFSET, 0.0, 1.0);
        let left = displace(Vec3::ZERO, -STRAFE_OFFSET, 0.0, -1.0);
        assert_relative_eq!(left.x, -right.x, epsilon = 1e-6);
        assert_relative_eq!(left.z, -right.z, epsilon = 1e-6);
    }

    #[test]
    fn ascend_moves_up() {
        // Ascend reuses the displacement formula: fixed pitch of +pi/2,
        // negative speed, which comes out as positive y.
        let p = displace(Vec3::ZERO, 0.0, 1.571, -1.0);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-3);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-3);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn strafe_ignores_pitch() {
        // Strafing passes ry = 0 regardless of where the camera looks, so
        // the step stays on the horizontal plane.
        let p = displace(Vec3::ZERO, 1.0 - STRAFE_OFFSET, 0.0, 1.0);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut cam = CameraState::new();
        cam.position = Vec3::new(4.0, -2.0, 9.5);
        cam.rotation = Vec2::new(1.2, -0.4);
        cam.reset();
        assert_eq!(cam.position, Vec3::ZERO);
        assert_eq!(cam.rotation, Vec2::ZERO);
    }
}
