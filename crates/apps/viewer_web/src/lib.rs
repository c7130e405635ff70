use console_error_panic_hook::set_once;
use gloo_net::http::Request;
use std::cell::RefCell;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use foundation::math::Vec3;
use foundation::time::Millis;
use gpu::{LineVertex, OrbitCamera, Renderer, SphereMesh, ground_grid, sphere_mesh};
use runtime::tools::{Tool, ToolKind};
use runtime::{Capture, ClickOutcome, Controller, Mode, ViewerConfig};
use scene::sphere::SphereFrame;
mod wgpu;
use wgpu::{
    WgpuContext, init_wgpu_from_canvas_id, render, resize_wgpu, set_scene_geometry, upload_frame,
};

const OVERLAY_SELECTOR: &str = ".ui-overlay";
const FLASH_SELECTOR: &str = ".capture-flash";
const SPHERE_COLOR: [f32; 4] = [0.18, 0.32, 0.55, 1.0];
const GRID_COLOR: [f32; 4] = [0.45, 0.45, 0.5, 0.6];

#[derive(Debug)]
pub struct ViewerState {
    pub kind: ToolKind,
    pub config: ViewerConfig,
    pub controller: Option<Controller<Box<dyn Tool>>>,
    pub canvas_id: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub wgpu: Option<WgpuContext>,
    /// A context is being created; later inits only refresh its geometry.
    pub wgpu_pending: bool,
    pub camera: OrbitCamera,
    pub capture: Capture,
    /// Revision of the artifact list last sent to the GPU.
    pub uploaded_revision: Option<u64>,
}

impl ViewerState {
    fn new() -> Self {
        let config = ViewerConfig::default();
        let kind = ToolKind::Hopf;
        Self {
            camera: home_camera(kind, &config),
            capture: Capture::from_settings(kind.capture_prefix(&config), &config.capture),
            kind,
            config,
            controller: None,
            canvas_id: "fibration-canvas".to_string(),
            canvas_width: 1280.0,
            canvas_height: 720.0,
            wgpu: None,
            wgpu_pending: false,
            uploaded_revision: None,
        }
    }

    /// Rebuilds the controller and capture settings for the current tool and config.
    fn rebuild(&mut self) -> Result<(), JsValue> {
        let controller =
            Controller::from_config(self.kind, &self.config).map_err(|e| js_error(&e))?;
        self.controller = Some(controller);
        self.capture = Capture::from_settings(
            self.kind.capture_prefix(&self.config),
            &self.config.capture,
        );
        self.camera = home_camera(self.kind, &self.config);
        self.uploaded_revision = None;
        Ok(())
    }

    /// Claims context creation. False when a context exists or is being created.
    fn begin_gpu_init(&mut self) -> bool {
        if self.wgpu.is_some() || self.wgpu_pending {
            return false;
        }
        self.wgpu_pending = true;
        true
    }

    /// What the static scene geometry is built from.
    fn scene_key(&self) -> Option<(ToolKind, SphereFrame)> {
        self.controller
            .as_ref()
            .map(|c| (self.kind, c.tool().sphere()))
    }

    fn marker_radius(&self) -> f64 {
        match &self.controller {
            Some(c) => c.tool().sphere().radius * 0.04,
            None => 0.04,
        }
    }
}

thread_local! {
    static STATE: RefCell<ViewerState> = RefCell::new(ViewerState::new());
}

fn js_error(err: &dyn std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn warn(msg: &str) {
    web_sys::console::warn_1(&JsValue::from_str(msg));
}

fn now() -> Millis {
    Millis(js_sys::Date::now())
}

/// Initial camera framing for each tool.
fn home_camera(kind: ToolKind, config: &ViewerConfig) -> OrbitCamera {
    match kind {
        ToolKind::Hopf => {
            let base = config.hopf.base_center();
            let fibers = config.hopf.fiber_origin();
            let target = (base + fibers).scale(0.5);
            let span = base.distance(fibers) + config.hopf.base_radius + 2.0 * config.hopf.fiber_scale;
            OrbitCamera::looking_at(target, span * 1.6)
        }
        ToolKind::Stereographic => {
            let center = config.stereo.sphere_center();
            let target = Vec3::new(center.x, center.y * 0.5, center.z);
            OrbitCamera::looking_at(target, config.stereo.sphere_radius * 7.0)
        }
    }
}

/// Sphere mesh and ground grid for a tool; the Hopf scene has no grid.
fn scene_geometry(kind: ToolKind, frame: SphereFrame) -> (SphereMesh, Vec<LineVertex>) {
    let sphere = sphere_mesh(frame, SPHERE_COLOR, 32, 64);
    let grid = match kind {
        ToolKind::Hopf => Vec::new(),
        ToolKind::Stereographic => ground_grid(
            frame.center,
            frame.radius * 6.0,
            frame.radius * 0.5,
            GRID_COLOR,
        ),
    };
    (sphere, grid)
}

/// Sends the current scene geometry to the live context, if any.
fn refresh_scene_geometry() -> Result<(), JsValue> {
    STATE.with(|state_ref| {
        let mut state = state_ref.borrow_mut();
        let s = &mut *state;
        let (kind, frame) = s
            .scene_key()
            .ok_or_else(|| JsValue::from_str("viewer not initialized"))?;
        if let Some(ctx) = s.wgpu.as_mut() {
            let (sphere, grid) = scene_geometry(kind, frame);
            set_scene_geometry(ctx, &sphere, &grid);
        }
        Ok(())
    })
}

fn render_scene() -> Result<(), JsValue> {
    STATE.with(|state_ref| {
        let mut state = state_ref.borrow_mut();
        let s = &mut *state;
        let marker_radius = s.marker_radius();
        let Some(ctx) = s.wgpu.as_mut() else {
            return Ok(());
        };
        if let Some(controller) = &s.controller {
            let artifacts = controller.artifacts();
            if s.uploaded_revision != Some(artifacts.revision()) {
                upload_frame(ctx, &Renderer::collect(artifacts, marker_radius));
                s.uploaded_revision = Some(artifacts.revision());
            }
        }
        let view_proj = s.camera.view_proj(s.canvas_width, s.canvas_height);
        render(ctx, view_proj)
    })
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Selects the visualization (`"hopf"` or `"stereo"`) and starts rendering into `canvas_id`.
#[wasm_bindgen]
pub fn init_viewer(tool: &str, canvas_id: String) -> Result<(), JsValue> {
    let kind = ToolKind::parse(tool)
        .ok_or_else(|| JsValue::from_str(&format!("unknown tool: {tool}")))?;
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.kind = kind;
        s.canvas_id = canvas_id.clone();
        s.rebuild()
    })?;

    spawn_local(async move {
        if let Err(err) = init_wgpu_inner(&canvas_id).await {
            log(&format!("wgpu init error: {:?}", err));
        }
    });
    Ok(())
}

/// Creates the GPU context on first use; afterwards only the scene geometry is replaced.
async fn init_wgpu_inner(canvas_id: &str) -> Result<(), JsValue> {
    let (key, claimed) = STATE.with(|state| {
        let mut s = state.borrow_mut();
        let key = s
            .scene_key()
            .ok_or_else(|| JsValue::from_str("viewer not initialized"))?;
        Ok::<_, JsValue>((key, s.begin_gpu_init()))
    })?;
    if !claimed {
        // A pending init re-checks the scene when it lands.
        refresh_scene_geometry()?;
        return render_scene();
    }

    let (sphere, grid) = scene_geometry(key.0, key.1);
    let created = init_wgpu_from_canvas_id(canvas_id, &sphere, &grid).await;
    let stale = STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.wgpu_pending = false;
        s.wgpu = Some(created?);
        s.uploaded_revision = None;
        Ok::<_, JsValue>(s.scene_key() != Some(key))
    })?;
    if stale {
        refresh_scene_geometry()?;
    }
    render_scene()
}

#[wasm_bindgen]
pub fn set_canvas_sizes(width: f64, height: f64) -> Result<(), JsValue> {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.canvas_width = width;
        s.canvas_height = height;
        if let Some(ctx) = &mut s.wgpu {
            resize_wgpu(ctx, width as u32, height as u32);
        }
    });
    render_scene()
}

/// Intended usage: call with pointer delta in pixels.
#[wasm_bindgen]
pub fn camera_orbit(delta_x_px: f64, delta_y_px: f64) -> Result<(), JsValue> {
    STATE.with(|state| state.borrow_mut().camera.orbit(delta_x_px, delta_y_px));
    render_scene()
}

/// Intended usage: call with wheel deltaY.
#[wasm_bindgen]
pub fn camera_zoom(wheel_delta_y: f64) -> Result<(), JsValue> {
    STATE.with(|state| state.borrow_mut().camera.zoom(wheel_delta_y));
    render_scene()
}

#[wasm_bindgen]
pub fn camera_reset() -> Result<(), JsValue> {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        s.camera = home_camera(s.kind, &s.config);
    });
    render_scene()
}

/// Pointer click at canvas pixel coordinates.
///
/// Returns a warning for the page to show, or an empty string.
#[wasm_bindgen]
pub fn click(x_px: f64, y_px: f64) -> Result<String, JsValue> {
    let outcome = STATE.with(|state| {
        let mut s = state.borrow_mut();
        let ray = s.camera.screen_ray(x_px, y_px, s.canvas_width, s.canvas_height);
        let controller = s
            .controller
            .as_mut()
            .ok_or_else(|| JsValue::from_str("viewer not initialized"))?;
        Ok::<_, JsValue>(match ray {
            Some(ray) => controller.pick_and_select(ray),
            None => controller.select(None),
        })
    })?;

    match outcome {
        ClickOutcome::Warned(message) => {
            warn(&message);
            Ok(message)
        }
        ClickOutcome::Drawn { .. } => {
            render_scene()?;
            Ok(String::new())
        }
        _ => Ok(String::new()),
    }
}

/// Mode checkbox changed. `mode` is `"point"`, `"longitude"` or `"latitude"`.
#[wasm_bindgen]
pub fn set_mode(mode: &str, enabled: bool) -> Result<(), JsValue> {
    let mode = Mode::parse(mode).ok_or_else(|| JsValue::from_str(&format!("unknown mode: {mode}")))?;
    with_controller(|c| c.set_mode(mode, enabled))?;
    render_scene()
}

#[wasm_bindgen]
pub fn set_frozen(frozen: bool) -> Result<(), JsValue> {
    with_controller(|c| c.set_frozen(frozen))
}

#[wasm_bindgen]
pub fn toggle_frozen() -> Result<bool, JsValue> {
    with_controller(|c| c.toggle_frozen())
}

/// Clears everything, returns to idle and unfrozen, and re-frames the camera.
#[wasm_bindgen]
pub fn reset() -> Result<(), JsValue> {
    with_controller(|c| c.reset())?;
    camera_reset()
}

/// Returns the milliseconds since the previous frame.
#[wasm_bindgen]
pub fn advance_frame() -> Result<f64, JsValue> {
    let (frame, events) = with_controller(|c| (c.advance_frame(now()), c.drain_events()))?;
    for e in &events {
        log(&format!("[frame {}] {}: {}", e.frame_index, e.kind.label(), e.message));
    }
    render_scene()?;
    Ok(frame.dt_ms)
}

fn with_controller<R>(f: impl FnOnce(&mut Controller<Box<dyn Tool>>) -> R) -> Result<R, JsValue> {
    STATE.with(|state| {
        let mut s = state.borrow_mut();
        let controller = s
            .controller
            .as_mut()
            .ok_or_else(|| JsValue::from_str("viewer not initialized"))?;
        Ok(f(controller))
    })
}

/// Fetches a JSON config and rebuilds the viewer state from it.
#[wasm_bindgen]
pub fn load_config(url: String) {
    spawn_local(async move {
        let config = match fetch_config(&url).await {
            Ok(c) => c,
            Err(err) => {
                log(&format!("Failed to load config: {:?}", err));
                return;
            }
        };

        let rebuilt = STATE.with(|state| {
            let mut s = state.borrow_mut();
            s.config = config;
            s.rebuild()
        });
        if let Err(err) = rebuilt {
            log(&format!("Failed to apply config: {:?}", err));
            return;
        }

        let canvas_id = STATE.with(|state| state.borrow().canvas_id.clone());
        if let Err(err) = init_wgpu_inner(&canvas_id).await {
            log(&format!("wgpu init error: {:?}", err));
        }
    });
}

async fn fetch_config(url: &str) -> Result<ViewerConfig, JsValue> {
    let resp = Request::get(url)
        .send()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let text = resp
        .text()
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    ViewerConfig::from_json_str(&text).map_err(|e| js_error(&e))
}

/// Saves the current frame as a PNG without the UI overlay.
///
/// The restore timer is armed before anything that can fail, so the overlay
/// always comes back; render, export and flash failures are logged.
#[wasm_bindgen]
pub fn capture() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("document missing"))?;

    let (request, canvas_id) = STATE.with(|state| {
        let mut s = state.borrow_mut();
        (s.capture.begin(now()), s.canvas_id.clone())
    });
    let restore = Closure::once_into_js(move || {
        if let Err(err) = restore_after_capture() {
            log(&format!("capture restore error: {:?}", err));
        }
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(
        restore.unchecked_ref(),
        restore_delay_ms(request.restore_at, now()),
    )?;

    if let Err(err) = set_overlay_hidden(&document, true) {
        warn(&format!("capture could not hide overlay: {:?}", err));
    }
    if let Err(err) = render_scene() {
        warn(&format!("capture render failed: {:?}", err));
    }
    if let Err(err) = export_png(&document, &canvas_id, &request.file_name) {
        warn(&format!("capture export failed: {:?}", err));
    }
    if let Err(err) = set_flash_active(&document, true) {
        warn(&format!("capture flash failed: {:?}", err));
    }
    Ok(())
}

/// Timer delay for the overlay restore, with slack so the poll lands after the deadline.
fn restore_delay_ms(restore_at: Millis, now: Millis) -> i32 {
    (restore_at.0 - now.0).max(0.0).ceil() as i32 + 1
}

fn set_flash_active(document: &web_sys::Document, active: bool) -> Result<(), JsValue> {
    if let Some(flash) = document.query_selector(FLASH_SELECTOR)? {
        if active {
            flash.class_list().add_1("active")?;
        } else {
            flash.class_list().remove_1("active")?;
        }
    }
    Ok(())
}

fn export_png(document: &web_sys::Document, canvas_id: &str, file_name: &str) -> Result<(), JsValue> {
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str("canvas missing"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;
    let data_url = canvas.to_data_url_with_type("image/png")?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()?;
    anchor.set_href(&data_url);
    anchor.set_download(file_name);
    anchor.click();
    log(&format!("captured {file_name}"));
    Ok(())
}

fn restore_after_capture() -> Result<(), JsValue> {
    let done = STATE.with(|state| state.borrow_mut().capture.poll(now()));
    if !done {
        // A later capture moved the deadline; its own timer restores.
        return Ok(());
    }
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document missing"))?;
    let flash = set_flash_active(&document, false);
    set_overlay_hidden(&document, false)?;
    flash
}

fn set_overlay_hidden(document: &web_sys::Document, hidden: bool) -> Result<(), JsValue> {
    let nodes = document.query_selector_all(OVERLAY_SELECTOR)?;
    for i in 0..nodes.length() {
        let Some(node) = nodes.item(i) else {
            continue;
        };
        let Ok(el) = node.dyn_into::<web_sys::HtmlElement>() else {
            continue;
        };
        if hidden {
            el.style().set_property("visibility", "hidden")?;
        } else {
            el.style().remove_property("visibility")?;
        }
    }
    Ok(())
}
