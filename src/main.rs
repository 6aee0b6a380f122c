//! Stack Attack entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use stack_attack::renderer::{RenderState, scene};
    use stack_attack::sim::{GameEvent, TickInput};
    use stack_attack::{Mode, Session, Settings, Tuning, hud_class, playfield_for_viewport};

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        render_state: Option<RenderState>,
        /// Direction keys currently held
        left_held: bool,
        right_held: bool,
        /// Last touch position in playfield pixels, cleared on touchend
        pointer_x: Option<f32>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(session: Session, settings: Settings) -> Self {
            Self {
                session,
                settings,
                render_state: None,
                left_held: false,
                right_held: false,
                pointer_x: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn input(&self) -> TickInput {
            TickInput {
                left: self.left_held,
                right: self.right_held,
                pointer_x: self.pointer_x,
            }
        }

        /// Start a run from the menu or game-over screen
        fn start(&mut self) {
            if self.session.mode() != Mode::Playing {
                self.pointer_x = None;
                self.session.start(js_sys::Date::now() as u64);
            }
        }

        /// One simulation step per animation frame
        fn update(&mut self, time: f64) {
            let input = self.input();
            for event in self.session.frame(&input) {
                match event {
                    GameEvent::BossSpawned => log::debug!("Boss spawned"),
                    GameEvent::GameOver { score } => log::info!("Final score: {}", score),
                    _ => {}
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

        /// Render the current frame
        fn render(&mut self) {
            let playfield = self.session.playfield();
            let vertices = scene::build(&self.session.snapshot(), &playfield, &self.settings);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
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

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let snapshot = self.session.snapshot();
            let mode = self.session.mode();

            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };
            // Rewrites the whole class list, so the base class has to come along
            let set_visible = |id: &str, base: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", &hud_class(base, visible));
                }
            };

            set_text("hud-score", &snapshot.score.to_string());
            set_text("hud-speed", &format!("{:.1}x", snapshot.game_speed));
            set_text("hud-best", &self.session.best_score().to_string());

            // Combo only shows once it's actually a multiplier
            set_visible("hud-combo", "", snapshot.combo > 1);
            set_text("hud-combo-value", &format!("x{}", snapshot.combo));

            set_visible("hud-fps", "", self.settings.show_fps);
            set_text("hud-fps-value", &self.fps.to_string());

            set_visible("menu", "overlay", mode == Mode::Menu);
            set_visible("game-over", "overlay", mode == Mode::GameOver);
            if mode == Mode::GameOver {
                set_text("final-score", &self.session.last_score().to_string());
                let rank = match self.session.last_rank() {
                    Some(1) => "NEW HIGH SCORE!".to_string(),
                    Some(rank) => format!("Rank #{}", rank),
                    None => String::new(),
                };
                set_text("final-rank", &rank);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Stack Attack starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Size the playfield from the viewport, once per session
        let inner_width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(stack_attack::consts::DESKTOP_WIDTH as f64);
        let inner_height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(stack_attack::consts::DESKTOP_HEIGHT as f64);
        let playfield = playfield_for_viewport(inner_width, inner_height);
        let width = playfield.width as u32;
        let height = playfield.height as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        log::info!("Playfield {}x{}", width, height);

        // Display preferences from the page URL, e.g. `?quality=low&fps`
        let query = window.location().search().unwrap_or_default();
        let settings = Settings::from_query(&query);
        log::info!("Quality preset: {}", settings.quality.as_str());

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(playfield, Tuning::default(), seed);
        let game = Rc::new(RefCell::new(Game::new(session, settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (playfield.width, playfield.height),
        )
        .await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Stack Attack running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down: held directions plus one-shot start / menu keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.left_held = true,
                    "ArrowRight" | "d" | "D" => g.right_held = true,
                    " " | "Enter" => {
                        event.prevent_default();
                        g.start();
                    }
                    "Escape" => g.session.to_menu(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.left_held = false,
                    "ArrowRight" | "d" | "D" => g.right_held = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move: player follows the finger
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let rect = canvas_clone.get_bounding_client_rect();
                    // CSS pixels to playfield pixels
                    let scale = if rect.width() > 0.0 {
                        g.session.playfield().width / rect.width() as f32
                    } else {
                        1.0
                    };
                    let x = (touch.client_x() as f32 - rect.left() as f32) * scale;
                    g.pointer_x = Some(x);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end: hand control back to the keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().pointer_x = None;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap on the canvas starts a run from the overlays
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().start();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    game.borrow_mut().start();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.to_menu();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Longest native demo run: five minutes of frames
#[cfg(not(target_arch = "wasm32"))]
const DEMO_FRAME_LIMIT: u64 = 5 * 60 * stack_attack::consts::FRAME_RATE as u64;

/// Headless demo: the autopilot plays one seeded run and the result is logged.
///
/// Usage: `stack-attack [seed] [tuning.json] [settings.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use stack_attack::renderer::scene;
    use stack_attack::sim::{GameEvent, Playfield, autopilot};
    use stack_attack::{Session, Settings, Tuning};

    env_logger::init();
    log::info!("Stack Attack (native demo) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(e) => {
                log::error!("Invalid seed {:?}: {}", arg, e);
                std::process::exit(2);
            }
        },
        None => 1,
    };
    let tuning = match args.next() {
        Some(path) => load_json(&path, Tuning::from_json),
        None => Tuning::default(),
    };
    let settings = match args.next() {
        Some(path) => load_json(&path, Settings::from_json),
        None => Settings::default(),
    };
    log::info!("Quality preset: {}", settings.quality.as_str());

    let playfield = Playfield::default();
    let mut session = Session::new(playfield, tuning, seed);
    session.start(seed);

    let (mut dodged, mut bonuses, mut bosses, mut bursts) = (0u32, 0u32, 0u32, 0u32);
    let mut peak_vertices = 0;
    while session.state().frame < DEMO_FRAME_LIMIT && !session.state().is_over() {
        let input = autopilot::steer(&session.snapshot(), playfield.width);
        for event in session.frame(&input) {
            match event {
                GameEvent::ShapeDodged { .. } => dodged += 1,
                GameEvent::BonusCollected { .. } => bonuses += 1,
                GameEvent::BossSpawned => bosses += 1,
                GameEvent::SplitterBurst { .. } => bursts += 1,
                _ => {}
            }
        }
        let vertices = scene::build(&session.snapshot(), &playfield, &settings);
        peak_vertices = peak_vertices.max(vertices.len());
    }

    let state = session.state();
    let seconds = state.frame as f32 / stack_attack::consts::FRAME_RATE as f32;
    log::info!(
        "Demo finished after {} frames ({:.1}s): score {}, speed {:.2}x",
        state.frame,
        seconds,
        state.floored_score(),
        state.game_speed
    );
    log::info!(
        "Dodged {}, bonuses {}, bosses {}, splitter bursts {}, peak vertices {}",
        dodged,
        bonuses,
        bosses,
        bursts,
        peak_vertices
    );
    if !state.is_over() {
        log::info!("Autopilot survived the frame limit");
    }
}

/// Read and parse a JSON config file, exiting on failure
#[cfg(not(target_arch = "wasm32"))]
fn load_json<T>(path: &str, parse: fn(&str) -> Result<T, serde_json::Error>) -> T {
    match std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| parse(&json).map_err(|e| e.to_string()))
    {
        Ok(value) => {
            log::info!("Loaded {}", path);
            value
        }
        Err(e) => {
            log::error!("Failed to load {}: {}", path, e);
            std::process::exit(2);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
