/// Geometry primitives for 3D rendering
use nalgebra::Vector3;

/// A triangle flowing through the pipeline.
///
/// Vertices are wound clockwise when seen from the front. Every stage builds
/// a new triangle instead of editing one in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p: [Vector3<f32>; 3],
    /// Flat gray level, 0 to 255
    pub luminance: f32,
    pub normal: Vector3<f32>,
    /// Mean view-space depth, filled in at projection time
    pub average_depth: f32,
}

impl Triangle {
    pub fn new(p0: Vector3<f32>, p1: Vector3<f32>, p2: Vector3<f32>) -> Self {
        Self {
            p: [p0, p1, p2],
            luminance: 255.0,
            normal: Vector3::zeros(),
            average_depth: 0.0,
        }
    }

    /// Same attributes, different vertices
    pub fn with_points(&self, p: [Vector3<f32>; 3]) -> Self {
        Self { p, ..*self }
    }

    /// Unit face normal from the clockwise winding
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let edge1 = self.p[1] - self.p[0];
        let edge2 = self.p[2] - self.p[0];

        edge1.cross(&edge2).normalize()
    }

    pub fn mean_z(&self) -> f32 {
        (self.p[0].z + self.p[1].z + self.p[2].z) / 3.0
    }

    /// Twice the area of the triangle's projection onto the xy-plane, signed
    pub fn signed_area_xy(&self) -> f32 {
        let [a, b, c] = self.p;
        (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned cube centred on the origin, faces wound clockwise
    pub fn cube(size: f32) -> Self {
        const FACES: [[[f32; 3]; 3]; 12] = [
            // South
            [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
            [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
            // East
            [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
            [[1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
            // North
            [[1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
            [[1.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]],
            // West
            [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
            [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
            // Top
            [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
            [[0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
            // Bottom
            [[1.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]],
            [[1.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
        ];

        let corner = |c: [f32; 3]| Vector3::new(c[0] - 0.5, c[1] - 0.5, c[2] - 0.5) * size;

        let mut mesh = Self::with_capacity(FACES.len());
        for [a, b, c] in FACES {
            mesh.add_triangle(Triangle::new(corner(a), corner(b), corner(c)));
        }
        mesh
    }
}
