/// Camera model and the per-frame pose update
use nalgebra::Vector3;

use crate::input::{Control, InputState};
use crate::transform::Matrix4x4;

/// Sideways and vertical nudge per frame while an arrow is held
pub const STRAFE_STEP: f32 = 0.05;
/// Distance moved along the look direction per frame
pub const WALK_STEP: f32 = 0.1;
/// Yaw change per frame (radians)
pub const TURN_STEP: f32 = 0.02;

/// Lens settings; changing them requires building a new [`Camera`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 70.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vector3<f32>,
    pub look_direction: Vector3<f32>,
    pub yaw: f32,
    aspect: f32,
    focal: f32,
    depth_factor: f32,
}

impl Camera {
    /// Camera at the origin looking down +z, sized for a `width` x `height` target
    pub fn new(config: CameraConfig, width: u32, height: u32) -> Self {
        Self {
            fov: config.fov,
            near: config.near,
            far: config.far,
            position: Vector3::zeros(),
            look_direction: Vector3::new(0.0, 0.0, 1.0),
            yaw: 0.0,
            aspect: height as f32 / width as f32,
            focal: 1.0 / (config.fov.to_radians() / 2.0).tan(),
            depth_factor: config.far / (config.far - config.near),
        }
    }

    /// Same pose and lens, re-derived for a new render target size
    pub fn with_viewport(&self, width: u32, height: u32) -> Camera {
        let config = CameraConfig {
            fov: self.fov,
            near: self.near,
            far: self.far,
        };
        Camera {
            position: self.position,
            look_direction: self.look_direction,
            yaw: self.yaw,
            ..Camera::new(config, width, height)
        }
    }

    /// Height over width of the render target
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn focal(&self) -> f32 {
        self.focal
    }

    pub fn depth_factor(&self) -> f32 {
        self.depth_factor
    }

    /// Move the camera according to the held controls.
    ///
    /// Forward movement follows the look direction the camera had at the
    /// start of the frame; the new yaw only takes effect once
    /// [`Camera::refresh_look_direction`] runs.
    pub fn apply_input(&self, input: &InputState) -> Camera {
        let mut next = *self;

        if input.is_held(Control::Up) {
            next.position.y += STRAFE_STEP;
        }
        if input.is_held(Control::Down) {
            next.position.y -= STRAFE_STEP;
        }
        if input.is_held(Control::Left) {
            next.position.x -= STRAFE_STEP;
        }
        if input.is_held(Control::Right) {
            next.position.x += STRAFE_STEP;
        }

        let step = self.look_direction * WALK_STEP;
        if input.is_held(Control::Forward) {
            next.position += step;
        }
        if input.is_held(Control::Backward) {
            next.position -= step;
        }

        if input.is_held(Control::YawLeft) {
            next.yaw += TURN_STEP;
        }
        if input.is_held(Control::YawRight) {
            next.yaw -= TURN_STEP;
        }

        next
    }

    /// Look direction implied by the current yaw
    pub fn yawed_look_direction(&self) -> Vector3<f32> {
        Matrix4x4::rotation_y(self.yaw).transform_point(&Vector3::new(0.0, 0.0, 1.0))
    }

    pub fn refresh_look_direction(&mut self) {
        self.look_direction = self.yawed_look_direction();
    }

    /// World-to-view matrix for the current position and look direction
    pub fn view_matrix(&self) -> Matrix4x4 {
        let target = self.position + self.look_direction;
        let up = Vector3::new(0.0, 1.0, 0.0);

        Matrix4x4::point_at(&self.position, &target, &up).quick_inverse()
    }

    pub fn projection_matrix(&self) -> Matrix4x4 {
        Matrix4x4::projection(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(CameraConfig::default(), 800, 600);
        assert!((camera.aspect() - 600.0 / 800.0).abs() < 1e-6);
        assert!((camera.depth_factor() - 1000.0 / 999.9).abs() < 1e-6);
        let expected_focal = 1.0 / (35.0f32.to_radians()).tan();
        assert!((camera.focal() - expected_focal).abs() < 1e-6);
        assert_eq!(camera.position, Vector3::zeros());
        assert_eq!(camera.look_direction, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_viewport_change_keeps_pose() {
        let mut camera = Camera::new(CameraConfig::default(), 800, 600);
        camera.position = Vector3::new(1.0, 2.0, 3.0);
        camera.yaw = 0.5;

        let resized = camera.with_viewport(100, 100);
        assert_eq!(resized.position, camera.position);
        assert_eq!(resized.yaw, 0.5);
        assert!((resized.aspect() - 1.0).abs() < 1e-6);
        assert_eq!(resized.focal(), camera.focal());
    }

    #[test]
    fn test_no_input_keeps_pose() {
        let camera = Camera::new(CameraConfig::default(), 800, 600);
        assert_eq!(camera.apply_input(&InputState::default()), camera);
    }

    #[test]
    fn test_arrows_nudge_position() {
        let camera = Camera::new(CameraConfig::default(), 800, 600);
        let mut input = InputState::default();
        input.set(Control::Up, true);
        input.set(Control::Right, true);

        let moved = camera.apply_input(&input).apply_input(&input);
        assert!((moved.position.y - 0.1).abs() < 1e-6);
        assert!((moved.position.x - 0.1).abs() < 1e-6);
        assert_eq!(moved.position.z, 0.0);
    }

    #[test]
    fn test_walk_follows_look_direction() {
        let mut camera = Camera::new(CameraConfig::default(), 800, 600);
        camera.look_direction = Vector3::new(1.0, 0.0, 0.0);
        let mut input = InputState::default();
        input.set(Control::Forward, true);

        let moved = camera.apply_input(&input);
        assert!((moved.position - Vector3::new(0.1, 0.0, 0.0)).norm() < 1e-6);

        input.set(Control::Forward, false);
        input.set(Control::Backward, true);
        let back = moved.apply_input(&input);
        assert!(back.position.norm() < 1e-6);
    }

    #[test]
    fn test_yaw_accumulates_and_turns_view() {
        let camera = Camera::new(CameraConfig::default(), 800, 600);
        let mut input = InputState::default();
        input.set(Control::YawLeft, true);

        let mut turned = camera.apply_input(&input).apply_input(&input);
        assert!((turned.yaw - 0.04).abs() < 1e-6);
        assert_eq!(turned.look_direction, Vector3::new(0.0, 0.0, 1.0));

        turned.refresh_look_direction();
        let expected = Vector3::new(-(0.04f32).sin(), 0.0, (0.04f32).cos());
        assert!((turned.look_direction - expected).norm() < 1e-6);

        // Straight ahead in view space after turning
        let ahead = turned.position + turned.look_direction * 4.0;
        let in_view = turned.view_matrix().transform_point(&ahead);
        assert!((in_view - Vector3::new(0.0, 0.0, 4.0)).norm() < 1e-5);
    }
}
