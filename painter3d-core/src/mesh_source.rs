/// Mesh loading results and the per-mesh load state
use std::borrow::Cow;
use std::path::Path;

use custom_error::custom_error;
use log::{error, info, warn};

use crate::geometry::{Mesh, Triangle};
use crate::{obj, stl};

custom_error! {pub MeshError
    Io{source: std::io::Error} = "failed to read mesh: {source}",
    Parse{description: String} = "failed to parse mesh: {description}",
    UnknownFormat{extension: String} = "unsupported mesh format '{extension}'",
    Disconnected = "mesh loader stopped before delivering a result",
}

/// File formats a mesh can be decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Stl,
}

impl MeshFormat {
    /// Pick a format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<MeshFormat, MeshError> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "obj" => Ok(MeshFormat::Obj),
            "stl" => Ok(MeshFormat::Stl),
            _ => Err(MeshError::UnknownFormat { extension }),
        }
    }

    pub fn decode(self, data: &[u8]) -> Result<Mesh, MeshError> {
        match self {
            MeshFormat::Obj => {
                let text: Cow<'_, str> = String::from_utf8_lossy(data);
                Ok(obj::parse_obj(&text))
            }
            MeshFormat::Stl => stl::parse_stl(data),
        }
    }
}

/// Load state of one mesh.
///
/// Anything but [`MeshSlot::Ready`] renders as an empty mesh.
#[derive(Debug, Default)]
pub enum MeshSlot {
    #[default]
    Loading,
    Ready(Mesh),
    Failed(MeshError),
}

impl MeshSlot {
    pub fn triangles(&self) -> &[Triangle] {
        match self {
            MeshSlot::Ready(mesh) => &mesh.triangles,
            MeshSlot::Loading | MeshSlot::Failed(_) => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, MeshSlot::Loading)
    }

    /// Settle a loading slot with the source's result.
    ///
    /// A slot resolves once; later results are dropped and false is returned.
    pub fn resolve(&mut self, result: Result<Mesh, MeshError>) -> bool {
        if !self.is_loading() {
            warn!("dropping mesh result for a slot that already resolved");
            return false;
        }

        *self = match result {
            Ok(mesh) => {
                info!("mesh ready with {} triangles", mesh.len());
                MeshSlot::Ready(mesh)
            }
            Err(e) => {
                error!("{}", e);
                MeshSlot::Failed(e)
            }
        };
        true
    }
}

impl From<Mesh> for MeshSlot {
    fn from(mesh: Mesh) -> Self {
        MeshSlot::Ready(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(MeshFormat::from_path(Path::new("monke.obj")).unwrap(), MeshFormat::Obj);
        assert_eq!(MeshFormat::from_path(Path::new("part.STL")).unwrap(), MeshFormat::Stl);
        assert!(matches!(
            MeshFormat::from_path(Path::new("scene.gltf")),
            Err(MeshError::UnknownFormat { .. })
        ));
        assert!(MeshFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_decode_obj_bytes() {
        let mesh = MeshFormat::Obj
            .decode(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")
            .unwrap();
        assert_eq!(mesh.len(), 1);
    }

    #[test]
    fn test_loading_slot_is_empty() {
        let slot = MeshSlot::default();
        assert!(slot.is_loading());
        assert!(slot.triangles().is_empty());
    }

    #[test]
    fn test_resolve_once() {
        let mut slot = MeshSlot::Loading;
        assert!(slot.resolve(Ok(Mesh::cube(1.0))));
        assert_eq!(slot.triangles().len(), 12);

        assert!(!slot.resolve(Ok(Mesh::new())));
        assert_eq!(slot.triangles().len(), 12);
    }

    #[test]
    fn test_failed_load_stays_empty() {
        let mut slot = MeshSlot::Loading;
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "monke.obj");
        assert!(slot.resolve(Err(MeshError::from(err))));
        assert!(matches!(slot, MeshSlot::Failed(MeshError::Io { .. })));
        assert!(slot.triangles().is_empty());

        assert!(!slot.resolve(Ok(Mesh::cube(1.0))));
        assert!(slot.triangles().is_empty());
    }
}
