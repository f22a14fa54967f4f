/// painter3d Core Library - Software geometry pipeline
///
/// Transforms, back-face culling, plane clipping, projection and painter's
/// algorithm ordering, drawing flat-shaded polygons onto any `Surface`.
/// No I/O happens here; hosts supply meshes, input and the surface.

pub mod clip;
pub mod geometry;
pub mod input;
pub mod mesh_source;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod stl;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use geometry::{Mesh, Triangle};
pub use input::{Control, InputState};
pub use mesh_source::{MeshError, MeshFormat, MeshSlot};
pub use pipeline::{FrameStats, Rgb, Scene, Surface};
pub use projection::{Camera, CameraConfig};
pub use transform::{Matrix4x4, RotationState, Transform};
pub use vector::{Plane, Vec2};
