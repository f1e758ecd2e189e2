//! Hand Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlVideoElement, Window};

    use hand_dash::platform::CameraSlot;
    use hand_dash::platform::web::{CameraSession, HandDetector, acquire_camera};
    use hand_dash::renderer::RenderState;
    use hand_dash::sim::Viewport;
    use hand_dash::ui::CameraStatus;
    use hand_dash::{ControlMode, FrameOutcome, Game, KeyEvent, Tuning};

    /// Page-level state around the game
    struct App {
        game: Game,
        render_state: Option<RenderState>,
        camera: CameraSlot<CameraSession>,
        detector: Option<HandDetector>,
        /// An animation frame is scheduled
        looping: bool,
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn seed() -> u64 {
        js_sys::Date::now() as u64
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// CSS-pixel viewport; the canvas backing store is sized in device pixels
    fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> (Viewport, u32, u32) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (Viewport::new(client_w as f32, client_h as f32), width, height)
    }

    impl App {
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.draw(&self.game.snapshot()) {
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

        /// Copy the HUD snapshot into the DOM
        fn update_hud(&self, document: &Document) {
            let hud = self.game.hud();
            set_text(document, "score", &hud.score.to_string());
            set_text(document, "gesture", hud.gesture);
            set_text(document, "status", &hud.status);
            set_text(document, "best", &hud.best.to_string());
            if let Some(final_score) = hud.final_score {
                set_text(document, "final-score", &final_score.to_string());
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Hand Dash starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("game")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #game canvas on the page");
            return;
        };

        let (viewport, width, height) = fit_canvas(&window, &canvas);
        let seed = seed();
        let game = Game::new(seed, Tuning::load(), viewport);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App {
            game,
            render_state: None,
            camera: CameraSlot::default(),
            detector: None,
            looping: false,
        }));

        // Initialize WebGPU (WebGL2 fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_keyboard(&window, app.clone());
        setup_resize(&window, canvas, app.clone());
        setup_buttons(&document, app.clone());

        set_hidden(&document, "start-screen", false);
        set_hidden(&document, "gameover-screen", true);
        {
            let mut a = app.borrow_mut();
            a.render();
            a.update_hud(&document);
        }

        log::info!("Hand Dash ready");
    }

    fn setup_keyboard(window: &Window, app: Rc<RefCell<App>>) {
        for (name, pressed) in [("keydown", true), ("keyup", false)] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let code = event.code();
                let Some(key) = KeyEvent::from_code(&code, pressed) else {
                    return;
                };
                let mut a = app.borrow_mut();
                if a.game.state.is_running() && code != "KeyI" {
                    // Keep Space and the arrows from scrolling the page
                    event.prevent_default();
                }
                a.game.on_key(key);
            });
            let _ =
                window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(window: &Window, canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (viewport, width, height) = fit_canvas(&window, &canvas);
            let mut a = app.borrow_mut();
            a.game.resize(viewport);
            if let Some(ref mut render_state) = a.render_state {
                render_state.resize(width, height);
            }
            if !a.looping {
                a.render();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            on_click(document, "start-camera", move || {
                let app = app.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    start_camera(&app).await;
                    start_game(&app);
                });
            });
        }
        {
            let app = app.clone();
            on_click(document, "start-keyboard", move || {
                {
                    let mut a = app.borrow_mut();
                    stop_camera(&mut a);
                    a.game.set_control(ControlMode::Keyboard, CameraStatus::Keyboard);
                }
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    hide_camera_panel(&document);
                }
                start_game(&app);
            });
        }
        on_click(document, "restart", move || start_game(&app));
    }

    fn hide_camera_panel(document: &Document) {
        if let Some(panel) = document
            .get_element_by_id("camera-panel")
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        {
            let _ = panel.style().set_property("display", "none");
        }
    }

    /// Try gesture control; any failure leaves the game on the keyboard
    async fn start_camera(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };
        let Some(video) = document
            .get_element_by_id("camera")
            .and_then(|el| el.dyn_into::<HtmlVideoElement>().ok())
        else {
            app.borrow_mut().game.set_control(
                ControlMode::Keyboard,
                CameraStatus::Unavailable(hand_dash::platform::CameraError::Unsupported),
            );
            return;
        };

        {
            let mut a = app.borrow_mut();
            if !a.camera.begin() {
                return;
            }
            a.game.set_camera_status(CameraStatus::Initializing);
            a.update_hud(&document);
        }

        // No borrow is held across the permission prompt
        match acquire_camera(&window, &video).await {
            Ok(stream) => {
                let mut a = app.borrow_mut();
                let detector = match a.detector.clone() {
                    Some(detector) => detector,
                    None => {
                        let sink = app.clone();
                        let detector = HandDetector::new(move |json: String| {
                            sink.borrow_mut().game.on_detector_payload(&json, now());
                        });
                        a.detector = Some(detector.clone());
                        detector
                    }
                };
                let mut frames = detector.frame_source(video.clone());
                frames.start();
                let session = CameraSession::new(frames, stream, video);
                log::info!("Frame source: {:?}", session.kind());
                if a.camera.finish(session).is_err() {
                    // Keyboard was chosen while the request was pending
                    log::info!("Camera request superseded");
                    return;
                }
                a.game.set_control(ControlMode::Camera, CameraStatus::Active);
            }
            Err(e) => {
                log::warn!("Falling back to keyboard: {}", e);
                let mut a = app.borrow_mut();
                a.camera.fail();
                a.game
                    .set_control(ControlMode::Keyboard, CameraStatus::Unavailable(e));
            }
        }
    }

    /// Release the camera and cancel any pending request
    fn stop_camera(a: &mut App) {
        if a.camera.is_active() {
            log::info!("Stopping camera ({:?} control)", a.game.control());
        }
        drop(a.camera.clear());
    }

    fn start_game(app: &Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let started = app.borrow_mut().game.start(now(), seed());
        if !started {
            return;
        }
        set_hidden(&document, "start-screen", true);
        set_hidden(&document, "gameover-screen", true);

        let mut a = app.borrow_mut();
        if !a.looping {
            a.looping = true;
            drop(a);
            request_animation_frame(app.clone());
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let outcome = {
            let mut a = app.borrow_mut();
            let outcome = a.game.frame(time);
            a.render();
            a.update_hud(&document);
            if outcome != FrameOutcome::Continue {
                a.looping = false;
            }
            outcome
        };

        match outcome {
            FrameOutcome::Continue => request_animation_frame(app),
            FrameOutcome::Ended {
                final_score,
                new_best,
            } => {
                log::info!("Game over: {} (new best: {})", final_score, new_best);
                set_text(&document, "final-score", &final_score.to_string());
                set_hidden(&document, "gameover-screen", false);
            }
            FrameOutcome::Stopped => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hand_dash::game::{FrameOutcome, Game, KeyEvent};
    use hand_dash::sim::Viewport;
    use hand_dash::tuning::Tuning;

    env_logger::init();

    // Usage: hand-dash [tuning.json] [seed]
    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => match Tuning::load_file(std::path::Path::new(&path)) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    log::info!("Hand Dash headless run with seed {}", seed);

    let viewport = Viewport::new(
        hand_dash::consts::DEFAULT_VIEWPORT_WIDTH,
        hand_dash::consts::DEFAULT_VIEWPORT_HEIGHT,
    );
    let mut game = Game::new(seed, tuning, viewport);
    game.on_key(KeyEvent::ToggleAutopilot);
    game.start(0.0, seed);

    // Five simulated minutes at 60 fps
    let frame_ms = 1000.0 / 60.0;
    let mut now = 0.0;
    for _ in 0..(60 * 60 * 5) {
        now += frame_ms;
        if let FrameOutcome::Ended { final_score, .. } = game.frame(now) {
            log::info!("Autopilot crashed at score {}", final_score);
            break;
        }
    }

    let hud = game.hud();
    println!(
        "seed={} score={} speed={:.2} obstacles={}",
        seed,
        hud.score,
        game.state.speed,
        game.state.obstacles.len()
    );
}
