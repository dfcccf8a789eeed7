use winit::keyboard::KeyCode;

use crate::controller::input::InputState;
use crate::model::camera::{displace, CameraState};

/// Yaw offset used for strafing and the fixed pitch used for ascending.
const QUARTER_TURN: f32 = 1.571;

/// Converts held keys and mouse deltas into camera pose updates.
///
/// The scheduler only calls in here while unpaused, so the controller
/// itself carries no pause logic.
pub struct CameraController {
    pub walk_speed: f32,
    pub sprint_speed: f32,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            walk_speed: 1.0,
            sprint_speed: 6.0,
        }
    }

    /// Apply a relative mouse delta. `sensitivity` is the published
    /// whole-unit value; 540 dots per radian at sensitivity 1.
    pub fn apply_look(&self, camera: &mut CameraState, dx: f32, dy: f32, sensitivity: f32) {
        camera.rotation.x -= dx / (540.0 / sensitivity);
        camera.rotation.y += dy / (540.0 / sensitivity);
    }

    /// Step the camera position for every movement key held this frame.
    pub fn update_movement(&self, camera: &mut CameraState, input: &InputState, dt: f32) {
        let speed = if input.sprint {
            self.sprint_speed
        } else {
            self.walk_speed
        } * dt;
        let yaw = camera.yaw();
        let pitch = camera.pitch();

        if input.is_down(KeyCode::KeyW) {
            camera.position = displace(camera.position, yaw, pitch, speed);
        }
        if input.is_down(KeyCode::KeyS) {
            camera.position = displace(camera.position, yaw, pitch, -speed);
        }
        if input.is_down(KeyCode::KeyA) {
            camera.position = displace(camera.position, yaw - QUARTER_TURN, 0.0, -speed);
        }
        if input.is_down(KeyCode::KeyD) {
            camera.position = displace(camera.position, yaw - QUARTER_TURN, 0.0, speed);
        }
        // Ascend only; there is no symmetric descend binding.
        if input.is_down(KeyCode::Space) {
            camera.position = displace(camera.position, 0.0, QUARTER_TURN, -speed);
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn look_divides_delta_by_dots_per_radian() {
        let controller = CameraController::new();
        let mut camera = CameraState::new();
        controller.apply_look(&mut camera, 540.0, -270.0, 1.0);
        assert_relative_eq!(camera.yaw(), -1.0, epsilon = 1e-6);
        assert_relative_eq!(camera.pitch(), -0.5, epsilon = 1e-6);
    }

    #[test]
    fn higher_sensitivity_turns_faster() {
        let controller = CameraController::new();
        let mut camera = CameraState::new();
        controller.apply_look(&mut camera, 540.0, 0.0, 3.0);
        assert_relative_eq!(camera.yaw(), -3.0, epsilon = 1e-6);
    }

    #[test]
    fn pitch_is_not_clamped() {
        let controller = CameraController::new();
        let mut camera = CameraState::new();
        controller.apply_look(&mut camera, 0.0, 5400.0, 1.0);
        assert_relative_eq!(camera.pitch(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn forward_key_steps_along_the_view_direction() {
        let controller = CameraController::new();
        let mut camera = CameraState::new();
        let mut input = InputState::new();
        input.key_down(KeyCode::KeyW);
        controller.update_movement(&mut camera, &input, 0.5);
        assert_relative_eq!(camera.position.z, 0.5, epsilon = 1e-6);
        assert_relative_eq!(camera.position.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn sprint_scales_speed_six_times() {
        let controller = CameraController::new();
        let mut input = InputState::new();
        input.key_down(KeyCode::KeyW);

        let mut walking = CameraState::new();
        controller.update_movement(&mut walking, &input, 1.0);

        input.key_down(crate::controller::input::SPRINT_KEY);
        let mut sprinting = CameraState::new();
        controller.update_movement(&mut sprinting, &input, 1.0);

        assert_relative_eq!(sprinting.position.z, walking.position.z * 6.0, epsilon = 1e-5);
    }

    #[test]
    fn opposite_keys_cancel_out() {
        let controller = CameraController::new();
        let mut camera = CameraState::new();
        let mut input = InputState::new();
        input.key_down(KeyCode::KeyW);
        input.key_down(KeyCode::KeyS);
        controller.update_movement(&mut camera, &input, 1.0);
        assert_relative_eq!(camera.position.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn ascend_raises_y_regardless_of_yaw() {
        let controller = CameraController::new();
        let mut camera = CameraState::new();
        camera.rotation.x = 2.3;
        let mut input = InputState::new();
        input.key_down(KeyCode::Space);
        controller.update_movement(&mut camera, &input, 1.0);
        assert_relative_eq!(camera.position.y, 1.0, epsilon = 1e-3);
    }
}
