/// Per-frame geometry pipeline and the presentation surface it draws on
use log::trace;
use nalgebra::Vector3;

use crate::clip::{clip_against_plane, clip_to_screen, near_plane};
use crate::geometry::Triangle;
use crate::input::InputState;
use crate::mesh_source::MeshSlot;
use crate::projection::Camera;
use crate::transform::{Matrix4x4, Transform};
use crate::vector::Vec2;

/// An RGB colour, one byte per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Gray level from a 0..=255 luminance; NaN maps to black
    pub fn gray(luminance: f32) -> Self {
        let level = luminance.round().clamp(0.0, 255.0) as u8;
        Self::new(level, level, level)
    }
}

/// A fixed-size 2D raster target the pipeline issues draw calls against
pub trait Surface {
    /// Width and height in raster units
    fn size(&self) -> (u32, u32);

    fn clear(&mut self);

    /// Fill the closed polygon through `points`
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb);

    /// Outline the closed polygon through `points`
    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgb);
}

/// Counters collected while rendering one frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameStats {
    /// Triangles read from loaded meshes
    pub submitted: usize,
    /// Dropped by the back-face test
    pub culled: usize,
    /// Dropped entirely by the near plane
    pub near_clipped: usize,
    /// Entries in the depth-sorted draw lists
    pub projected: usize,
    /// Polygons handed to the surface after screen clipping
    pub fragments: usize,
    /// Seconds since the previous frame. Recorded only; movement is per frame.
    pub elapsed: f32,
}

/// Matrices and lighting shared by every triangle of a frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub world: Matrix4x4,
    pub view: Matrix4x4,
    pub projection: Matrix4x4,
    pub camera_position: Vector3<f32>,
    pub light_direction: Vector3<f32>,
    pub near: f32,
}

impl FrameContext {
    pub fn new(camera: &Camera, world: &Transform, light_direction: Vector3<f32>) -> Self {
        Self {
            world: world.world_matrix(),
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            camera_position: camera.position,
            light_direction,
            near: camera.near,
        }
    }
}

/// Everything that persists between frames
#[derive(Debug)]
pub struct Scene {
    pub camera: Camera,
    /// Unit vector; luminance peaks for faces whose normal points along it
    pub light_direction: Vector3<f32>,
    pub world: Transform,
    pub meshes: Vec<MeshSlot>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            light_direction: Vector3::new(-1.0, 1.0, -1.0).normalize(),
            world: Transform::default(),
            meshes: Vec::new(),
        }
    }

    pub fn with_light(mut self, direction: Vector3<f32>) -> Self {
        self.light_direction = direction.normalize();
        self
    }

    /// Register a mesh and return its index
    pub fn add_mesh(&mut self, slot: MeshSlot) -> usize {
        self.meshes.push(slot);
        self.meshes.len() - 1
    }

    pub fn mesh_mut(&mut self, index: usize) -> Option<&mut MeshSlot> {
        self.meshes.get_mut(index)
    }

    /// Advance one frame: move the camera, rebuild matrices, draw every mesh.
    pub fn render_frame<S: Surface>(
        &mut self,
        input: &InputState,
        elapsed: f32,
        surface: &mut S,
    ) -> FrameStats {
        surface.clear();

        if input.any_held() {
            self.camera = self.camera.apply_input(input);
            trace!("camera at {:?}, yaw {}", self.camera.position, self.camera.yaw);
        }
        self.camera.refresh_look_direction();
        let frame = FrameContext::new(&self.camera, &self.world, self.light_direction);

        let mut stats = FrameStats {
            elapsed,
            ..FrameStats::default()
        };

        for slot in &self.meshes {
            let draw_list = build_draw_list(&frame, slot.triangles(), &mut stats);
            stats.fragments += rasterize(&draw_list, surface);
        }

        trace!("{:?}", stats);
        stats
    }
}

/// True when the face points away from (or is edge-on to) the camera.
/// Degenerate faces, whose normal is NaN, count as back-facing.
pub fn is_back_facing(normal: &Vector3<f32>, vertex: &Vector3<f32>, camera: &Vector3<f32>) -> bool {
    let facing = normal.dot(&(vertex - camera));
    facing.is_nan() || facing >= 0.0
}

/// Lambert term remapped from -1..=1 to 0..=255
pub fn luminance(normal: &Vector3<f32>, light_direction: &Vector3<f32>) -> f32 {
    (normal.dot(light_direction) + 1.0) * 127.5
}

/// Project a view-space triangle, keeping its mean view depth for sorting
pub fn project_triangle(projection: &Matrix4x4, tri: &Triangle) -> Triangle {
    Triangle {
        p: tri.p.map(|p| projection.project_point(&p)),
        average_depth: tri.mean_z(),
        ..*tri
    }
}

/// Transform, cull, light, near-clip and project one mesh, sorted far to near
pub fn build_draw_list(
    frame: &FrameContext,
    triangles: &[Triangle],
    stats: &mut FrameStats,
) -> Vec<Triangle> {
    let near = near_plane(frame.near);
    let mut draw_list = Vec::with_capacity(triangles.len());

    for source in triangles {
        stats.submitted += 1;

        let transformed = Triangle::new(
            frame.world.transform_point(&source.p[0]),
            frame.world.transform_point(&source.p[1]),
            frame.world.transform_point(&source.p[2]),
        );

        let normal = transformed.calculate_normal();
        if is_back_facing(&normal, &transformed.p[0], &frame.camera_position) {
            stats.culled += 1;
            continue;
        }

        let viewed = Triangle {
            p: transformed.p.map(|p| frame.view.transform_point(&p)),
            luminance: luminance(&normal, &frame.light_direction),
            normal,
            average_depth: 0.0,
        };

        let clipped = clip_against_plane(&near, &viewed);
        if clipped.is_empty() {
            stats.near_clipped += 1;
        }
        draw_list.extend(clipped.iter().map(|t| project_triangle(&frame.projection, t)));
    }

    sort_by_depth(&mut draw_list);
    stats.projected += draw_list.len();
    draw_list
}

/// Stable sort, farthest first
pub fn sort_by_depth(draw_list: &mut [Triangle]) {
    draw_list.sort_by(|a, b| b.average_depth.total_cmp(&a.average_depth));
}

/// Map normalized device coordinates to raster coordinates (y down)
pub fn to_raster(p: &Vector3<f32>, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (p.x + 1.0) * width as f32 / 2.0,
        (p.y - 1.0) * height as f32 / -2.0,
    )
}

/// Clip each triangle to the screen and draw it in order.
///
/// Returns the number of polygons drawn.
pub fn rasterize<S: Surface>(draw_list: &[Triangle], surface: &mut S) -> usize {
    let (width, height) = surface.size();
    let mut fragments = 0;

    for tri in draw_list {
        let color = Rgb::gray(tri.luminance);

        for piece in clip_to_screen(tri) {
            let points = piece.p.map(|p| to_raster(&p, width, height));
            surface.fill_polygon(&points, color);
            surface.stroke_polygon(&points, color);
            fragments += 1;
        }
    }

    fragments
}
