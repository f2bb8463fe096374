//! Shark Maze entry point
//!
//! Browser shell on wasm32; a headless autopilot run on native targets.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, KeyboardEvent, TouchEvent};

    use shark_maze::consts::*;
    use shark_maze::sim::{GamePhase, Maze};
    use shark_maze::{Session, Settings};

    // Hand-off to the JavaScript renderer and sound/dialog layer
    #[wasm_bindgen(inline_js = "
        export function render_frame(json) {
            if (typeof window.sharkMazeRender === 'function') {
                window.sharkMazeRender(JSON.parse(json));
            }
        }

        export function notify_event(json) {
            if (typeof window.sharkMazeEvent === 'function') {
                window.sharkMazeEvent(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn render_frame(json: &str);
        fn notify_event(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        last_time: f64,
    }

    impl Game {
        fn new(session: Session) -> Self {
            Self {
                session,
                last_time: 0.0,
            }
        }

        /// Hand the frame snapshot to the renderer
        fn render(&self) {
            match serde_json::to_string(&self.session.snapshot()) {
                Ok(json) => render_frame(&json),
                Err(e) => log::warn!("Snapshot not serializable: {}", e),
            }
        }

        /// Forward queued game events to JS listeners
        fn dispatch_events(&mut self) {
            for event in self.session.take_events() {
                if let Ok(json) = serde_json::to_string(&event) {
                    notify_event(&json);
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = self.session.state();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&state.score().to_string()));
            }

            let phase = state.phase();
            set_visible(document, "start-screen", phase == GamePhase::NotStarted);
            set_visible(document, "pause-menu", phase == GamePhase::Paused);
            set_visible(document, "win-dialog", phase == GamePhase::Won);
            set_visible(document, "lose-dialog", phase == GamePhase::Lost);

            if state.is_game_over() {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&state.score().to_string()));
                }
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// Settings from the host's `data-settings` attribute, defaults otherwise
    fn load_settings(host: &Element) -> Settings {
        match host.get_attribute("data-settings") {
            Some(json) => match Settings::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from data-settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring data-settings: {}", e);
                    Settings::default()
                }
            },
            None => Settings::default(),
        }
    }

    fn host_size(host: &Element) -> (f32, f32) {
        (host.client_width() as f32, host.client_height() as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Shark Maze starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let host = document.get_element_by_id("game").expect("no #game element");

        let maze = match Maze::reference() {
            Ok(maze) => maze,
            Err(e) => {
                log::error!("Built-in maze rejected: {}", e);
                return;
            }
        };

        let settings = load_settings(&host);
        let (width, height) = host_size(&host);
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(maze, settings, width, height, seed);
        let game = Rc::new(RefCell::new(Game::new(session)));

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(&host, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(host, game.clone());
        setup_auto_pause(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Shark Maze running!");
    }

    fn touch_point(event: &TouchEvent) -> Option<Vec2> {
        let touch = event.changed_touches().get(0)?;
        Some(Vec2::new(touch.client_x() as f32, touch.client_y() as f32))
    }

    fn setup_input_handlers(host: &Element, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().session.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start (also starts a waiting game)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_point(&event) {
                    game.borrow_mut().session.touch_start(pos, event.time_stamp());
                }
            });
            let _ = host
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end (swipe)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_point(&event) {
                    game.borrow_mut().session.touch_end(pos, event.time_stamp());
                }
            });
            let _ = host
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().session.start_or_reset();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.reset();
                g.session.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(host: Element, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = host_size(&host);
            game.borrow_mut().session.resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut g = game.borrow_mut();
                if g.session.state().is_active() {
                    g.session.pause();
                    log::info!("Auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
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

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.session.update(dt);
            g.dispatch_events();
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::error::Error;
    use std::time::{SystemTime, UNIX_EPOCH};

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use shark_maze::Session;
    use shark_maze::Settings;
    use shark_maze::consts::SIM_HZ;
    use shark_maze::sim::collision::occupied_cell;
    use shark_maze::sim::shark::open_directions;
    use shark_maze::sim::{GamePhase, Maze};

    /// Give up after three minutes of game time
    const MAX_TICKS: u64 = 180 * SIM_HZ as u64;

    fn load_settings() -> Result<Settings, Box<dyn Error>> {
        match std::env::args().nth(1) {
            Some(path) => {
                let json = std::fs::read_to_string(&path)?;
                let settings = Settings::from_json(&json)?;
                log::info!("Loaded settings from {}", path);
                Ok(settings)
            }
            None => Ok(Settings::default()),
        }
    }

    /// Play one game with a random autopilot that turns at junctions
    pub fn run() -> Result<(), Box<dyn Error>> {
        let settings = load_settings()?;
        let maze = Maze::reference()?;
        let clock_seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);

        // 30px tiles for the 28x31 board
        let mut session = Session::new(maze, settings, 840.0, 930.0, clock_seed);
        let mut pilot = Pcg32::seed_from_u64(session.seed() ^ 0x5eed);
        session.start();

        while session.state().is_active() && session.state().time_ticks() < MAX_TICKS {
            let tile = session.scaling().tile_size;
            let cell = occupied_cell(session.state().player().pos, tile);
            let open = open_directions(session.maze(), cell);
            if !open.is_empty() && pilot.random_range(0..30) == 0 {
                let dir = open[pilot.random_range(0..open.len())];
                session.request_turn(dir);
            }
            session.step();
        }

        let state = session.state();
        let outcome = match state.phase() {
            GamePhase::Won => "won",
            GamePhase::Lost => "caught",
            _ => "timed out",
        };
        log::info!(
            "Autopilot {} with {} points ({} of {} pellets left) after {} ticks",
            outcome,
            state.score(),
            state.pellets().len(),
            state.pellets().initial(),
            state.time_ticks()
        );
        println!(
            "seed {}: {} with {} points after {} ticks",
            session.seed(),
            outcome,
            state.score(),
            state.time_ticks()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shark Maze (native) starting...");
    log::info!("Headless autopilot run - build for wasm32 to play in the browser");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
