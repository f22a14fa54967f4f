/// Vector primitives shared by every pipeline stage
///
/// Arithmetic on 3D points and directions comes straight from nalgebra's
/// `Vector3`; this module adds the pieces nalgebra has no opinion on: screen
/// coordinates and planes used for clipping.
use nalgebra::Vector3;

/// A 2D coordinate pair in raster (screen) space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub u: f32,
    pub v: f32,
}

impl Vec2 {
    pub fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }
}

/// An infinite plane given by a point on it and its normal.
///
/// Points with a non-negative signed distance are on the inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
}

impl Plane {
    /// Create a plane, normalizing `normal`
    pub fn new(point: Vector3<f32>, normal: Vector3<f32>) -> Self {
        Self {
            point,
            normal: normal.normalize(),
        }
    }

    pub fn signed_distance(&self, p: &Vector3<f32>) -> f32 {
        self.normal.dot(p) - self.normal.dot(&self.point)
    }

    /// Point where the segment `start..end` crosses this plane.
    ///
    /// The parameter is not bounded: callers only ask for a crossing when one
    /// endpoint is inside and the other outside.
    pub fn intersect_segment(&self, start: &Vector3<f32>, end: &Vector3<f32>) -> Vector3<f32> {
        intersect_plane(&self.point, &self.normal, start, end)
    }
}

/// Intersect the line through `line_start` and `line_end` with a plane.
///
/// `plane_normal` need not be unit length.
pub fn intersect_plane(
    plane_point: &Vector3<f32>,
    plane_normal: &Vector3<f32>,
    line_start: &Vector3<f32>,
    line_end: &Vector3<f32>,
) -> Vector3<f32> {
    let normal = plane_normal.normalize();
    let plane_d = -normal.dot(plane_point);
    let ad = line_start.dot(&normal);
    let bd = line_end.dot(&normal);
    let t = (-plane_d - ad) / (bd - ad);

    line_start + (line_end - line_start) * t
}
