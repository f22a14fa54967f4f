/// painter3d Web - Canvas 2D host for the core pipeline
///
/// The page owns the `requestAnimationFrame` loop, key listeners and mesh
/// fetching; it forwards them to a [`WebRenderer`].
use log::{Level, LevelFilter, Metadata, Record};
use painter3d_core::{
    obj, stl, Camera, CameraConfig, FrameStats, InputState, Mesh, MeshError, MeshSlot, Rgb,
    Scene, Surface, Vec2,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, CanvasRenderingContext2d, HtmlCanvasElement};

/// CSS colour string for a pipeline colour
pub fn css_color(color: Rgb) -> String {
    format!("rgb({}, {}, {})", color.r, color.g, color.b)
}

/// 2D canvas context as a pipeline surface
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, context })
    }

    fn trace_path(&self, points: &[Vec2]) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };

        self.context.begin_path();
        self.context.move_to(first.u as f64, first.v as f64);
        for p in rest {
            self.context.line_to(p.u as f64, p.v as f64);
        }
        self.context.close_path();
        true
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn clear(&mut self) {
        let (width, height) = self.size();
        self.context.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb) {
        if self.trace_path(points) {
            self.context.set_fill_style_str(&css_color(color));
            self.context.fill();
        }
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgb) {
        if self.trace_path(points) {
            self.context.set_stroke_style_str(&css_color(color));
            self.context.stroke();
        }
    }
}

/// Browser renderer bound to one canvas and one mesh
#[wasm_bindgen]
pub struct WebRenderer {
    scene: Scene,
    surface: CanvasSurface,
    input: InputState,
    mesh: usize,
    last_timestamp: Option<f64>,
    stats: FrameStats,
}

#[wasm_bindgen]
impl WebRenderer {
    /// Attach to the canvas with id `canvas_id`; the mesh starts out loading
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str) -> Result<WebRenderer, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{}'", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;

        let camera = Camera::new(CameraConfig::default(), canvas.width(), canvas.height());
        let mut scene = Scene::new(camera);
        let mesh = scene.add_mesh(MeshSlot::Loading);

        Ok(WebRenderer {
            scene,
            surface: CanvasSurface::new(canvas)?,
            input: InputState::new(),
            mesh,
            last_timestamp: None,
            stats: FrameStats::default(),
        })
    }

    /// Forward a `keydown` (held) or `keyup` event; returns whether the key is a control
    pub fn set_key(&mut self, key: &str, held: bool) -> bool {
        self.input.set_key(key, held)
    }

    /// Drop every held key, e.g. when the page loses focus
    pub fn release_keys(&mut self) {
        self.input.release_all();
    }

    pub fn load_obj(&mut self, text: &str) -> bool {
        self.resolve(Ok(obj::parse_obj(text)))
    }

    pub fn load_stl(&mut self, bytes: &[u8]) -> bool {
        self.resolve(stl::parse_stl(bytes))
    }

    /// Report that fetching the mesh failed
    pub fn load_failed(&mut self, reason: &str) -> bool {
        let error = std::io::Error::new(std::io::ErrorKind::Other, reason.to_string());
        self.resolve(Err(MeshError::Io { source: error }))
    }

    /// Resize the canvas backing store and refit the camera
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.canvas.set_width(width);
        self.surface.canvas.set_height(height);
        self.scene.camera = self.scene.camera.with_viewport(width.max(1), height.max(1));
    }

    /// Draw one frame; `timestamp` is the `requestAnimationFrame` time in ms.
    /// Returns the number of polygons drawn.
    pub fn render(&mut self, timestamp: f64) -> usize {
        let elapsed = self
            .last_timestamp
            .map(|last| ((timestamp - last) / 1000.0) as f32)
            .unwrap_or(0.0);
        self.last_timestamp = Some(timestamp);

        self.stats = self
            .scene
            .render_frame(&self.input, elapsed, &mut self.surface);
        self.stats.fragments
    }

    pub fn is_loading(&self) -> bool {
        self.scene
            .meshes
            .get(self.mesh)
            .map_or(false, MeshSlot::is_loading)
    }

    pub fn culled(&self) -> usize {
        self.stats.culled
    }
}

impl WebRenderer {
    fn resolve(&mut self, result: Result<Mesh, MeshError>) -> bool {
        match self.scene.mesh_mut(self.mesh) {
            Some(slot) => slot.resolve(result),
            None => false,
        }
    }
}

/// Forwards `log` records to the browser console
struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&message),
            Level::Warn => console::warn_1(&message),
            Level::Info => console::info_1(&message),
            Level::Debug | Level::Trace => console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    log::set_logger(&LOGGER)
        .map(|()| log::set_max_level(LevelFilter::Info))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
