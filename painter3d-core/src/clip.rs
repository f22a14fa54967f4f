/// Triangle clipping against arbitrary planes
use nalgebra::Vector3;

use crate::geometry::Triangle;
use crate::vector::Plane;

/// The four edges of normalized device space, in clipping order
pub fn screen_planes() -> [Plane; 4] {
    [
        Plane::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0)),
        Plane::new(Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, -1.0, 0.0)),
        Plane::new(Vector3::new(-1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)),
        Plane::new(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, 1.0, 0.0)),
    ]
}

/// The camera-space near plane at distance `near`
pub fn near_plane(near: f32) -> Plane {
    Plane::new(Vector3::new(0.0, 0.0, near), Vector3::new(0.0, 0.0, 1.0))
}

/// Keep the part of `tri` on the inside of `plane`.
///
/// Returns no triangle when every vertex is outside, the triangle itself when
/// every vertex is inside, one smaller triangle when a single vertex is
/// inside, and two triangles covering the remaining quad when two are.
/// Luminance, normal and depth are copied onto every output.
pub fn clip_against_plane(plane: &Plane, tri: &Triangle) -> Vec<Triangle> {
    let mut inside: Vec<Vector3<f32>> = Vec::with_capacity(3);
    let mut outside: Vec<Vector3<f32>> = Vec::with_capacity(3);

    for p in &tri.p {
        if plane.signed_distance(p) >= 0.0 {
            inside.push(*p);
        } else {
            outside.push(*p);
        }
    }

    match (inside.as_slice(), outside.as_slice()) {
        ([], _) => Vec::new(),
        ([a], [b, c]) => {
            let ab = plane.intersect_segment(a, b);
            let ac = plane.intersect_segment(a, c);
            vec![tri.with_points([*a, ab, ac])]
        }
        ([a, b], [c]) => {
            let ac = plane.intersect_segment(a, c);
            let bc = plane.intersect_segment(b, c);
            vec![tri.with_points([*a, *b, ac]), tri.with_points([*b, ac, bc])]
        }
        // All three inside
        _ => vec![*tri],
    }
}

/// Clip against several planes in turn, feeding each plane's output to the next
pub fn clip_against_planes(planes: &[Plane], tri: &Triangle) -> Vec<Triangle> {
    let mut pending = vec![*tri];

    for plane in planes {
        pending = pending
            .iter()
            .flat_map(|t| clip_against_plane(plane, t))
            .collect();

        if pending.is_empty() {
            break;
        }
    }

    pending
}

/// Clip a projected triangle to the visible `[-1, 1]` square
pub fn clip_to_screen(tri: &Triangle) -> Vec<Triangle> {
    clip_against_planes(&screen_planes(), tri)
}
