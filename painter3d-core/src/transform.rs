/// 4x4 transformation matrices and world rotation state
use nalgebra::{Matrix4, Vector3, Vector4};
use std::ops::Mul;

use crate::projection::Camera;

/// A homogeneous transform using the row-vector convention.
///
/// Points are transformed as `v * M`, so translation lives in the bottom row
/// and `a * b` applies `a` first, then `b`. The backing nalgebra matrix is
/// indexed `m[(row, col)]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4x4 {
    pub m: Matrix4<f32>,
}

impl Matrix4x4 {
    pub fn zero() -> Self {
        Self { m: Matrix4::zeros() }
    }

    pub fn identity() -> Self {
        Self {
            m: Matrix4::identity(),
        }
    }

    #[rustfmt::skip]
    pub fn rotation_x(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            m: Matrix4::new(
                1.0, 0.0, 0.0, 0.0,
                0.0, c, s, 0.0,
                0.0, -s, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    #[rustfmt::skip]
    pub fn rotation_y(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            m: Matrix4::new(
                c, 0.0, s, 0.0,
                0.0, 1.0, 0.0, 0.0,
                -s, 0.0, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    #[rustfmt::skip]
    pub fn rotation_z(theta: f32) -> Self {
        let (s, c) = theta.sin_cos();
        Self {
            m: Matrix4::new(
                c, -s, 0.0, 0.0,
                s, c, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    pub fn translation(offset: &Vector3<f32>) -> Self {
        let mut mat = Self::identity();
        mat.m[(3, 0)] = offset.x;
        mat.m[(3, 1)] = offset.y;
        mat.m[(3, 2)] = offset.z;
        mat
    }

    /// Perspective projection built from the camera's derived constants.
    ///
    /// `m[(2, 3)] = 1` copies view-space z into w for the later divide.
    pub fn projection(camera: &Camera) -> Self {
        let mut mat = Self::zero();
        mat.m[(0, 0)] = camera.aspect() * camera.focal();
        mat.m[(1, 1)] = camera.focal();
        mat.m[(2, 2)] = camera.depth_factor();
        mat.m[(3, 2)] = -camera.near * camera.depth_factor();
        mat.m[(2, 3)] = 1.0;
        mat
    }

    /// Camera-to-world orientation looking from `pos` towards `target`.
    ///
    /// Undefined when `up` is parallel to the viewing direction.
    #[rustfmt::skip]
    pub fn point_at(pos: &Vector3<f32>, target: &Vector3<f32>, up: &Vector3<f32>) -> Self {
        let forward = (target - pos).normalize();
        let new_up = (up - forward * up.dot(&forward)).normalize();
        let right = new_up.cross(&forward);

        Self {
            m: Matrix4::new(
                right.x, right.y, right.z, 0.0,
                new_up.x, new_up.y, new_up.z, 0.0,
                forward.x, forward.y, forward.z, 0.0,
                pos.x, pos.y, pos.z, 1.0,
            ),
        }
    }

    /// Inverse of a rotation + translation matrix such as [`Matrix4x4::point_at`].
    ///
    /// Only valid for orthonormal rotation blocks; never use it on a projection.
    pub fn quick_inverse(&self) -> Self {
        let m = &self.m;
        let mut mat = Self::zero();

        for r in 0..3 {
            for c in 0..3 {
                mat.m[(r, c)] = m[(c, r)];
            }
        }
        for c in 0..3 {
            mat.m[(3, c)] = -(m[(3, 0)] * mat.m[(0, c)]
                + m[(3, 1)] * mat.m[(1, c)]
                + m[(3, 2)] * mat.m[(2, c)]);
        }
        mat.m[(3, 3)] = 1.0;
        mat
    }

    pub fn multiply(&self, other: &Matrix4x4) -> Self {
        Self { m: self.m * other.m }
    }

    /// Transform a homogeneous row vector
    pub fn transform(&self, v: &Vector4<f32>) -> Vector4<f32> {
        self.m.tr_mul(v)
    }

    /// Transform a point with `w = 1`, discarding the resulting w.
    pub fn transform_point(&self, p: &Vector3<f32>) -> Vector3<f32> {
        self.transform(&p.push(1.0)).xyz()
    }

    /// Transform a point and apply the perspective divide
    pub fn project_point(&self, p: &Vector3<f32>) -> Vector3<f32> {
        let h = self.transform(&p.push(1.0));
        h.xyz() / h.w
    }
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, rhs: Matrix4x4) -> Matrix4x4 {
        self.multiply(&rhs)
    }
}

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Placement of a mesh in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub rotation: RotationState,
    pub translation: Vector3<f32>,
}

impl Transform {
    pub fn new(rotation: RotationState, translation: Vector3<f32>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Rotations first (z, y, then x), then the translation
    pub fn world_matrix(&self) -> Matrix4x4 {
        Matrix4x4::rotation_z(self.rotation.z)
            * Matrix4x4::rotation_y(self.rotation.y)
            * Matrix4x4::rotation_x(self.rotation.x)
            * Matrix4x4::translation(&self.translation)
    }
}

impl Default for Transform {
    /// Unrotated, pushed 3 units in front of the origin
    fn default() -> Self {
        Self::new(RotationState::zero(), Vector3::new(0.0, 0.0, 3.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{Camera, CameraConfig};

    fn assert_close(a: &Vector3<f32>, b: &Vector3<f32>) {
        assert!((a - b).norm() < 1e-4, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_identity_leaves_points_alone() {
        let p = Vector3::new(1.5, -2.0, 7.0);
        assert_close(&Matrix4x4::identity().transform_point(&p), &p);
    }

    #[test]
    fn test_translation_moves_points() {
        let mat = Matrix4x4::translation(&Vector3::new(1.0, 2.0, 3.0));
        assert_close(
            &mat.transform_point(&Vector3::new(1.0, 1.0, 1.0)),
            &Vector3::new(2.0, 3.0, 4.0),
        );
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let mat = Matrix4x4::rotation_y(std::f32::consts::FRAC_PI_2);
        // (0, 0, 1) * Ry(90°) = (-sin, 0, cos) = (-1, 0, 0)
        assert_close(
            &mat.transform_point(&Vector3::new(0.0, 0.0, 1.0)),
            &Vector3::new(-1.0, 0.0, 0.0),
        );
    }

    #[test]
    fn test_rotation_x_and_z_quarter_turn() {
        let rx = Matrix4x4::rotation_x(std::f32::consts::FRAC_PI_2);
        assert_close(
            &rx.transform_point(&Vector3::new(0.0, 1.0, 0.0)),
            &Vector3::new(0.0, 0.0, 1.0),
        );
        let rz = Matrix4x4::rotation_z(std::f32::consts::FRAC_PI_2);
        assert_close(
            &rz.transform_point(&Vector3::new(1.0, 0.0, 0.0)),
            &Vector3::new(0.0, -1.0, 0.0),
        );
    }

    #[test]
    fn test_multiply_applies_left_first() {
        let rotate = Matrix4x4::rotation_y(std::f32::consts::FRAC_PI_2);
        let shift = Matrix4x4::translation(&Vector3::new(0.0, 0.0, 3.0));
        let p = Vector3::new(0.0, 0.0, 1.0);
        assert_close(&(rotate * shift).transform_point(&p), &Vector3::new(-1.0, 0.0, 3.0));
        assert_close(
            &(shift * rotate).transform_point(&p),
            &Vector3::new(-4.0, 0.0, 0.0),
        );
    }

    #[test]
    fn test_quick_inverse_round_trip() {
        let pos = Vector3::new(1.0, 2.0, -3.0);
        let target = Vector3::new(4.0, 0.5, 2.0);
        let up = Vector3::new(0.0, 1.0, 0.0);

        let camera = Matrix4x4::point_at(&pos, &target, &up);
        let view = camera.quick_inverse();

        assert_close(&view.transform_point(&pos), &Vector3::zeros());
        assert_close(&camera.transform_point(&view.transform_point(&pos)), &pos);

        let round_trip = camera * view;
        assert!((round_trip.m - Matrix4::identity()).norm() < 1e-5);

        let probe = Vector3::new(-5.0, 3.0, 9.0);
        assert_close(&(view * camera).transform_point(&probe), &probe);
    }

    #[test]
    fn test_point_at_looks_down_forward_axis() {
        let pos = Vector3::new(0.0, 0.0, 0.0);
        let target = Vector3::new(0.0, 0.0, 1.0);
        let up = Vector3::new(0.0, 1.0, 0.0);
        let view = Matrix4x4::point_at(&pos, &target, &up).quick_inverse();
        assert_close(
            &view.transform_point(&Vector3::new(0.0, 0.0, 5.0)),
            &Vector3::new(0.0, 0.0, 5.0),
        );
    }

    #[test]
    fn test_projection_depth_range() {
        let camera = Camera::new(CameraConfig::default(), 800, 600);
        let proj = Matrix4x4::projection(&camera);

        let near = proj.project_point(&Vector3::new(0.0, 0.0, camera.near));
        let far = proj.project_point(&Vector3::new(0.0, 0.0, camera.far));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_projection_sets_w_from_depth() {
        let camera = Camera::new(CameraConfig::default(), 800, 600);
        let proj = Matrix4x4::projection(&camera);
        let h = proj.transform(&Vector4::new(0.0, 0.0, 7.0, 1.0));
        assert!((h.w - 7.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_world_matrix_is_forward_shift() {
        let world = Transform::default().world_matrix();
        let expected = Matrix4x4::translation(&Vector3::new(0.0, 0.0, 3.0));
        assert!((world.m - expected.m).norm() < 1e-6);
    }
}
