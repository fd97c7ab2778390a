//! Treasure Hunt entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, PointerEvent};

    use treasure_hunt::assets::AssetKey;
    use treasure_hunt::consts::*;
    use treasure_hunt::platform::{FixedStep, PointerTracker};
    use treasure_hunt::renderer::{Frame, SdfRenderState};
    use treasure_hunt::sim::{GameEvent, Session, tick};
    use treasure_hunt::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        render_state: Option<SdfRenderState>,
        canvas: HtmlCanvasElement,
        pointer: PointerTracker,
        step: FixedStep,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Last prompt written to the DOM
        shown_prompt: Option<String>,
    }

    impl Game {
        fn new(session: Session, settings: Settings, canvas: HtmlCanvasElement) -> Self {
            Self {
                session,
                settings,
                render_state: None,
                canvas,
                pointer: PointerTracker::default(),
                step: FixedStep::default(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                shown_prompt: None,
            }
        }

        /// Canvas size in CSS pixels (world units)
        fn client_size(&self) -> Vec2 {
            Vec2::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            )
        }

        /// Match the backing store to the element and tell the session
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let dpr = window.device_pixel_ratio();
            let client = self.client_size();
            let width = (client.x as f64 * dpr) as u32;
            let height = (client.y as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
            if client.x > 0.0 && client.y > 0.0 {
                self.session.set_viewport(client);
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            for _ in 0..self.step.advance(dt) {
                let input = self.pointer.take_input();
                tick(&mut self.session, &input, SIM_DT);
                if self.handle_events() {
                    break;
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// React to what the last tick emitted; true if a modal blocked the page
        fn handle_events(&mut self) -> bool {
            let mut blocked = false;
            for event in self.session.drain_events() {
                match event {
                    GameEvent::TreasureFound { message } => {
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(&message);
                        }
                        // The modal swallows the release; time spent in it is not simulated
                        self.pointer.reset();
                        self.step.reset();
                        self.last_time = 0.0;
                        blocked = true;
                    }
                    GameEvent::Restarted => {
                        log::debug!("World rebuilt for {:?}", self.session.viewport());
                    }
                    _ => {}
                }
            }
            blocked
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            if let Some(ref mut render_state) = self.render_state {
                let frame = Frame::build(
                    &self.session,
                    &self.settings,
                    render_state.size,
                    render_state.elapsed(time),
                );
                match render_state.render(&frame) {
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

        /// Update prompt and FPS elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let prompt = self.session.prompt();
            if self.shown_prompt.as_deref() != Some(prompt) {
                if let Some(el) = document.get_element_by_id("prompt") {
                    el.set_text_content(Some(prompt));
                    let class = if prompt.is_empty() { "hidden" } else { "" };
                    let _ = el.set_attribute("class", class);
                }
                self.shown_prompt = Some(prompt.to_string());
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Treasure Hunt starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        for key in AssetKey::ALL {
            let size = key.texture_size();
            log::debug!("sprite {:<10} {} ({}x{})", key.as_str(), key.path(), size.x, size.y);
        }

        let tuning = Tuning::load();
        let settings = Settings::load();
        settings.save();

        let seed = js_sys::Date::now() as u64;
        let viewport = Vec2::new(
            canvas.client_width() as f32,
            canvas.client_height() as f32,
        );
        let viewport = if viewport.x > 0.0 && viewport.y > 0.0 {
            viewport
        } else {
            Vec2::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT)
        };
        let session = Session::new(seed, viewport, tuning)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!(
            "Session initialized with seed {} ({} obstacles)",
            seed,
            session.world.obstacles.len()
        );

        let game = Rc::new(RefCell::new(Game::new(session, settings, canvas.clone())));
        game.borrow_mut().resize();

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        let mut render_state = SdfRenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        render_state.set_start_time(js_sys::Date::now());
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_resize(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Treasure Hunt running!");
        Ok(())
    }

    fn pointer_pos(event: &PointerEvent) -> Vec2 {
        Vec2::new(event.offset_x() as f32, event.offset_y() as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Pointer down - capture so the release lands here even off-canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                game.borrow_mut().pointer.down(pointer_pos(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up / cancel
        for name in ["pointerup", "pointercancel"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                game.borrow_mut().pointer.up(pointer_pos(&event));
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move - rotation follows the pointer while held
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                game.borrow_mut().pointer.moved(pointer_pos(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur - a release we will never see
        {
            let Some(window) = web_sys::window() else { return };
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.pointer.is_held() {
                    let pos = g.session.pointer;
                    g.pointer.up(pos);
                    log::info!("Pointer released (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render(time);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Treasure Hunt (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    println!("\nRunning headless playthrough...");
    headless_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Hold the pointer from the first tick and report how the session ended
#[cfg(not(target_arch = "wasm32"))]
fn headless_run() {
    use glam::Vec2;
    use treasure_hunt::Tuning;
    use treasure_hunt::consts::*;
    use treasure_hunt::sim::{GameEvent, Session, TickInput, tick};

    let viewport = Vec2::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
    let mut session = match Session::new(0x7EA5_u64, viewport, Tuning::default()) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            return;
        }
    };
    let press = TickInput {
        pointer: Some(viewport * 0.5),
        pressed: true,
        ..Default::default()
    };

    for t in 0..(60 * 60) {
        let input = if t == 0 { press.clone() } else { TickInput::default() };
        tick(&mut session, &input, SIM_DT);
        for event in session.drain_events() {
            match event {
                GameEvent::TreasureFound { message } => {
                    println!("✓ {} (tick {})", message, t);
                    return;
                }
                GameEvent::ObstacleHit { obstacle } => {
                    println!("✗ Hit obstacle {:?} at tick {}", obstacle, t);
                }
                GameEvent::Restarted => {
                    println!("Restarted after {} ticks", t);
                    return;
                }
                _ => {}
            }
        }
    }
    println!("No outcome within a minute of play");
}
