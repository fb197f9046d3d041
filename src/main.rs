//! Champion Balls entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlButtonElement, HtmlCanvasElement, HtmlElement};

    use champion_balls::renderer::SdfRenderState;
    use champion_balls::sim::Command;
    use champion_balls::{Session, Settings};

    /// App instance holding all state
    struct App {
        session: Session,
        render_state: Option<SdfRenderState>,
        /// One count label per ball, positioned over the canvas
        labels: Vec<HtmlElement>,
        /// Canvas size in CSS pixels
        css_size: (f32, f32),
    }

    impl App {
        fn new(settings: Settings, seed: u64) -> Self {
            Self {
                session: Session::new(settings, seed),
                render_state: None,
                labels: Vec::new(),
                css_size: (0.0, 0.0),
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(self.session.simulation(), time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Move count labels to their balls
        fn update_labels(&self) {
            let bounds = self.session.simulation().bounds;
            let sx = self.css_size.0 / bounds.width;
            let sy = self.css_size.1 / bounds.height;

            for (label, body) in self.labels.iter().zip(self.session.bodies()) {
                label.set_text_content(Some(&body.collision_count.to_string()));
                let style = label.style();
                let _ = style.set_property("left", &format!("{}px", body.pos.x * sx));
                let _ = style.set_property("top", &format!("{}px", body.pos.y * sy));
            }
        }

        /// Show/hide the champion banner
        fn update_overlay(&self, document: &Document) {
            let Some(el) = document.get_element_by_id("champion") else {
                return;
            };
            match self.session.overlay() {
                Some(overlay) => {
                    let _ = el.set_attribute("class", "");
                    if let Some(title) = document.get_element_by_id("champion-title") {
                        title.set_text_content(Some(&overlay.headline));
                    }
                    if let Some(detail) = document.get_element_by_id("champion-count") {
                        detail.set_text_content(Some(&overlay.detail));
                    }
                }
                None => {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Apply the button table to the control buttons
        fn update_buttons(&self, document: &Document) {
            let buttons = self.session.affordances();
            if let Some(btn) = button(document, "startBtn") {
                btn.set_disabled(!buttons.start_enabled);
            }
            if let Some(btn) = button(document, "pauseBtn") {
                btn.set_disabled(!buttons.pause_enabled);
                btn.set_text_content(Some(buttons.pause_label));
            }
            if let Some(btn) = button(document, "stopBtn") {
                btn.set_disabled(!buttons.stop_enabled);
            }
        }
    }

    fn button(document: &Document, id: &str) -> Option<HtmlButtonElement> {
        document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Champion Balls starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(settings, seed)));
        app.borrow_mut().css_size = (client_w as f32, client_h as f32);

        // Initialize WebGPU (WebGL fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = SdfRenderState::new(surface, &adapter, width, height).await;
        render_state.set_start_time(js_sys::Date::now());
        app.borrow_mut().render_state = Some(render_state);

        setup_labels(&document, &app);
        setup_buttons(&document, app.clone());

        {
            let a = app.borrow();
            a.update_buttons(&document);
            a.update_overlay(&document);
        }

        request_animation_frame(app);

        log::info!("Champion Balls running!");
    }

    /// Create one count label per ball inside #labels
    fn setup_labels(document: &Document, app: &Rc<RefCell<App>>) {
        let Some(layer) = document.get_element_by_id("labels") else {
            log::warn!("No #labels element; collision counts will not be shown");
            return;
        };

        let mut a = app.borrow_mut();
        let count = a.session.bodies().len();
        for _ in 0..count {
            let Ok(el) = document.create_element("span") else {
                continue;
            };
            let _ = el.set_attribute("class", "count");
            if layer.append_child(&el).is_ok() {
                if let Ok(label) = el.dyn_into::<HtmlElement>() {
                    a.labels.push(label);
                }
            }
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        for (id, command) in [
            ("startBtn", Command::Start),
            ("pauseBtn", Command::Pause),
            ("stopBtn", Command::Stop),
        ] {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{id} button");
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                a.session.command(command);
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    a.update_buttons(&document);
                    a.update_overlay(&document);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let crowned = a.session.frame().and_then(|report| report.crowned).is_some();
            a.render(time);
            a.update_labels();

            if crowned {
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    a.update_overlay(&document);
                    a.update_buttons(&document);
                }
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

/// Frame cap for a headless run
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_MAX_FRAMES: u64 = 1_000_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use champion_balls::{Session, Settings};

    env_logger::init();
    log::info!("Champion Balls (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .unwrap_or(42);

    let mut session = Session::new(Settings::load(), seed);
    let mut frames = 0u64;
    while frames < HEADLESS_MAX_FRAMES && session.frame().is_some() {
        frames += 1;
    }

    match session.overlay() {
        Some(overlay) => println!("{} {} ({frames} frames)", overlay.headline, overlay.detail),
        None => println!("No champion after {frames} frames"),
    }
    for body in session.bodies() {
        println!(
            "  {:<7} collisions {:>3}  radius {:>5.1}",
            body.color.name(),
            body.collision_count,
            body.radius
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
