/// Background mesh loading from the file system
use log::{debug, info};
use painter3d_core::{Mesh, MeshError, MeshFormat};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Read and decode a mesh file on the calling thread
pub fn load_mesh_file(path: &Path) -> Result<Mesh, MeshError> {
    let format = MeshFormat::from_path(path)?;
    let data = fs::read(path)?;
    debug!("read {} bytes from {}", data.len(), path.display());
    format.decode(&data)
}

/// A mesh being loaded on a worker thread.
///
/// The result is delivered exactly once; poll it from the frame loop.
pub struct FileMeshSource {
    path: PathBuf,
    receiver: Option<Receiver<Result<Mesh, MeshError>>>,
}

impl FileMeshSource {
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = mpsc::channel();

        info!("loading mesh from {}", path.display());
        let worker_path = path.clone();
        thread::spawn(move || {
            // The app may have quit before we finish; nothing to report then
            let _ = sender.send(load_mesh_file(&worker_path));
        });

        Self {
            path,
            receiver: Some(receiver),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Non-blocking check for the result.
    ///
    /// Returns `None` while loading and after the result was taken.
    pub fn poll(&mut self) -> Option<Result<Mesh, MeshError>> {
        let receiver = self.receiver.as_ref()?;

        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(MeshError::Disconnected),
        };

        self.receiver = None;
        Some(result)
    }
}
