/// painter3d terminal viewer
///
/// Renders an OBJ/STL mesh (or a cube) as shaded characters.
/// Controls:
///   - Arrow Keys: Move up/down/left/right
///   - W/S: Walk along the look direction
///   - A/D: Turn
///   - Q/ESC: Quit
use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::info;
use painter3d_core::{Mesh, MeshSlot, Scene};
use painter3d_terminal::{terminal_camera, Args, FileMeshSource, TerminalApp};
use std::fs::File;
use std::io;

fn init_logging(args: &Args) -> io::Result<()> {
    // stdout belongs to the renderer, so logs go to a file
    let file = File::create(&args.log_file)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = args
        .camera_config()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let (width, height) = crossterm::terminal::size()?;
    let scene = Scene::new(terminal_camera(config, width, height)).with_light(args.light);

    let mut app = match &args.mesh {
        Some(path) => TerminalApp::with_source(scene, FileMeshSource::spawn(path), args.fps)?,
        None => {
            info!("no mesh given, showing a cube");
            let mut scene = scene;
            scene.add_mesh(MeshSlot::from(Mesh::cube(2.0)));
            TerminalApp::new(scene, args.fps)?
        }
    };

    app.run()?;
    info!("exiting");
    Ok(())
}
