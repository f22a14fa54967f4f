/// Terminal host for the painter3d pipeline
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use log::{debug, info, warn};
use painter3d_core::{Camera, CameraConfig, Control, FrameStats, InputState, MeshSlot, Scene};
use std::io::{self, stdout, Write};
use std::path::Path;
use std::time::{Duration, Instant};

pub mod args;
pub mod loader;
pub mod renderer;

pub use args::Args;
pub use loader::FileMeshSource;
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// Build a camera sized for a terminal of `width` x `height` cells
pub fn terminal_camera(config: CameraConfig, width: u16, height: u16) -> Camera {
    Camera::new(config, width.max(1) as u32, height.max(1) as u32 * CELL_ASPECT)
}

fn fit_viewport(camera: &Camera, width: u16, height: u16) -> Camera {
    camera.with_viewport(width.max(1) as u32, height.max(1) as u32 * CELL_ASPECT)
}

fn mesh_label(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}

fn control_for(code: KeyCode) -> Option<Control> {
    match code {
        KeyCode::Up => Some(Control::Up),
        KeyCode::Down => Some(Control::Down),
        KeyCode::Left => Some(Control::Left),
        KeyCode::Right => Some(Control::Right),
        KeyCode::Char(c) => Control::from_key_name(c.encode_utf8(&mut [0; 4])),
        _ => None,
    }
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    source: Option<(usize, FileMeshSource)>,
    /// Shown in the status line
    mesh_label: String,
    input: InputState,
    renderer: AsciiRenderer,
    frame_time: Duration,
    /// Whether the terminal reports key releases
    key_releases: bool,
    running: bool,
    last_frame: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
    stats: FrameStats,
}

impl TerminalApp {
    pub fn new(mut scene: Scene, fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        scene.camera = fit_viewport(&scene.camera, width, height);

        Ok(Self {
            scene,
            source: None,
            mesh_label: "cube".to_string(),
            input: InputState::new(),
            renderer: AsciiRenderer::new(width as usize, height as usize),
            frame_time: Duration::from_millis(1000 / fps.max(1) as u64),
            key_releases: false,
            running: true,
            last_frame: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            stats: FrameStats::default(),
        })
    }

    /// Build an app whose scene gets its mesh from `source` once it arrives
    pub fn with_source(mut scene: Scene, source: FileMeshSource, fps: u32) -> io::Result<Self> {
        let index = scene.add_mesh(MeshSlot::Loading);

        let mut app = Self::new(scene, fps)?;
        app.mesh_label = mesh_label(source.path());
        app.source = Some((index, source));
        Ok(app)
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        self.key_releases = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if self.key_releases {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        } else {
            info!("terminal does not report key releases; keys count as held for one frame");
        }

        let result = self.main_loop();

        // Cleanup
        if self.key_releases {
            execute!(stdout(), PopKeyboardEnhancementFlags)?;
        }
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.poll_mesh_source();

            // Render
            self.render()?;

            if !self.key_releases {
                self.input.release_all();
            }

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => {
                debug!("resized to {}x{}", width, height);
                self.renderer = AsciiRenderer::new(width as usize, height as usize);
                self.scene.camera = fit_viewport(&self.scene.camera, width, height);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, kind, .. }: KeyEvent) {
        if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
            self.running = false;
            return;
        }

        if let Some(control) = control_for(code) {
            let held = kind != KeyEventKind::Release;
            if !held {
                debug!("{} released", control);
            }
            self.input.set(control, held);
        }
    }

    fn poll_mesh_source(&mut self) {
        let Some((index, source)) = self.source.as_mut() else {
            return;
        };

        if let Some(result) = source.poll() {
            let index = *index;
            if let Some(slot) = self.scene.mesh_mut(index) {
                slot.resolve(result);
            } else {
                warn!("mesh slot {} vanished before its mesh arrived", index);
            }
            self.source = None;
        }
    }

    fn status(&self) -> String {
        let mesh = match self.scene.meshes.first() {
            Some(MeshSlot::Loading) => "loading".to_string(),
            Some(MeshSlot::Failed(_)) => "failed (see log)".to_string(),
            Some(MeshSlot::Ready(mesh)) => format!("{} tris", mesh.len()),
            None => "none".to_string(),
        };

        format!(
            "painter3d | FPS: {:.1} | {}: {} | drawn: {} | Arrows=Move W/S=Walk A/D=Turn Q=Quit",
            self.fps, self.mesh_label, mesh, self.stats.fragments
        )
    }

    fn render(&mut self) -> io::Result<()> {
        let now = Instant::now();
        let elapsed = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.stats = self.scene.render_frame(&self.input, elapsed, &mut self.renderer);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
