//! Zarathustra's Ascent entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! browser build drives the simulation and hands snapshots and sound IDs to
//! the JS canvas/audio layer; the native build runs a headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use zarathustra_ascent::consts::*;
    use zarathustra_ascent::sim::{Engine, GameStatus, SoundQueue};
    use zarathustra_ascent::{InputState, Settings};

    thread_local! {
        static GAME: RefCell<Option<Rc<RefCell<Game>>>> = const { RefCell::new(None) };
    }

    /// Game instance holding all state
    struct Game {
        engine: Engine,
        input: InputState,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        /// This frame's sound events for the audio layer
        sounds: SoundQueue,
        last_status: GameStatus,
    }

    impl Game {
        fn new(settings: Settings, seed: u64) -> Self {
            let engine = Engine::with_start_level(seed, settings.start_level());
            let last_status = engine.state().status;
            Self {
                engine,
                input: InputState::new(settings.key_bindings.clone()),
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                sounds: SoundQueue::new(),
                last_status,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;
            self.sounds.begin_frame();

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let events = self.engine.step(&mut self.input, SIM_DT);
                self.sounds.push_tick(events);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            let status = self.engine.state().status;
            if status != self.last_status {
                log::info!("Status: {:?} -> {:?}", self.last_status, status);
                self.last_status = status;
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = self.engine.state();

            if let Some(el) = document.get_element_by_id("hud-hp") {
                el.set_text_content(Some(&format!("{}/{}", state.player.hp, state.player.max_hp)));
            }
            if let Some(el) = document.get_element_by_id("hud-form") {
                el.set_text_content(Some(state.player.form.as_str()));
            }
            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(state.level.name()));
            }
            if let Some(el) = document.get_element_by_id("hud-message") {
                let visible = self.settings.show_messages && state.message_timer > 0;
                el.set_text_content(Some(if visible { state.message.as_str() } else { "" }));
            }

            let overlays = [
                ("title-screen", GameStatus::Menu),
                ("pause-menu", GameStatus::Paused),
                ("game-over", GameStatus::GameOver),
                ("victory", GameStatus::Victory),
            ];
            for (id, status) in overlays {
                if let Some(el) = document.get_element_by_id(id) {
                    let class = if state.status == status { "" } else { "hidden" };
                    let _ = el.set_attribute("class", class);
                }
            }
        }
    }

    fn with_game<R>(f: impl FnOnce(&mut Game) -> R) -> Option<R> {
        GAME.with(|slot| slot.borrow().as_ref().map(|g| f(&mut g.borrow_mut())))
    }

    /// Current state as JSON for the canvas renderer
    #[wasm_bindgen]
    pub fn snapshot_json() -> String {
        with_game(|g| g.engine.state().to_json().unwrap_or_default()).unwrap_or_default()
    }

    /// Sound IDs produced since the last call, as a JSON array
    #[wasm_bindgen]
    pub fn drain_sound_events() -> String {
        with_game(|g| serde_json::to_string(&g.sounds.drain()).unwrap_or_default())
            .unwrap_or_default()
    }

    /// Volume the audio layer should play effects at
    #[wasm_bindgen]
    pub fn sfx_volume() -> f32 {
        with_game(|g| g.settings.effective_sfx_volume()).unwrap_or(0.0)
    }

    /// Options menu volume sliders; persisted immediately
    #[wasm_bindgen]
    pub fn set_volume(master: f32, sfx: f32) {
        with_game(|g| {
            g.settings.master_volume = master.clamp(0.0, 1.0);
            g.settings.sfx_volume = sfx.clamp(0.0, 1.0);
            g.settings.save();
        });
    }

    /// Options menu mute toggle; persisted immediately
    #[wasm_bindgen]
    pub fn set_muted(muted: bool) {
        with_game(|g| {
            g.settings.muted = muted;
            g.settings.save();
        });
    }

    /// Title screen "start" button
    #[wasm_bindgen]
    pub fn start_game() {
        with_game(|g| {
            let events = g.engine.start_game();
            g.sounds.push_tick(events);
        });
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Zarathustra's Ascent starting...");

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        log::info!("Seed: {}", seed);

        let game = Rc::new(RefCell::new(Game::new(settings, seed)));
        GAME.with(|slot| *slot.borrow_mut() = Some(game.clone()));

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Zarathustra's Ascent running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.input.bindings().action_for(&key).is_some() {
                    // Keep space/arrows from scrolling the page
                    event.prevent_default();
                }
                g.input.key_down(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
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

            g.update(dt);
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.input.clear();
                    if g.engine.state().status == GameStatus::Playing {
                        g.engine.toggle_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                // Key-ups are lost while unfocused
                g.input.clear();
                if g.engine.state().status == GameStatus::Playing {
                    g.engine.toggle_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Zarathustra's Ascent (native) starting...");
    log::info!("Native mode runs a headless demo - serve the wasm build for the real game");

    let settings = zarathustra_ascent::Settings::load();
    let seed = settings.seed.unwrap_or(0x5a_4a_7a);
    run_headless_demo(settings, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Run right through the prologue, jumping and cycling forms along the way
#[cfg(not(target_arch = "wasm32"))]
fn run_headless_demo(settings: zarathustra_ascent::Settings, seed: u64) {
    use zarathustra_ascent::InputState;
    use zarathustra_ascent::consts::SIM_DT;
    use zarathustra_ascent::sim::{Engine, GameStatus};

    const DEMO_TICKS: u32 = 60 * 30;

    let mut engine = Engine::with_start_level(seed, settings.start_level());
    let mut input = InputState::new(settings.key_bindings.clone());
    let mut sounds = engine.start_game().len();
    input.key_down("ArrowRight");

    for t in 0..DEMO_TICKS {
        // Tap jump twice a second and transform every five seconds
        if t % 30 == 0 {
            input.key_down(" ");
        } else if t % 30 == 5 {
            input.key_up(" ");
        }
        if t % 300 == 150 {
            input.key_down("c");
        } else if t % 300 == 155 {
            input.key_up("c");
        }

        let events = engine.step(&mut input, SIM_DT);
        for e in &events {
            log::debug!("tick {}: {}", t, e.id());
        }
        sounds += events.len();

        if engine.state().status != GameStatus::Playing {
            break;
        }
    }

    let state = engine.state();
    println!(
        "Demo finished: status={:?} level='{}' x={:.0} hp={} form={} sounds={}",
        state.status,
        state.level.name(),
        state.player.body.pos.x,
        state.player.hp,
        state.player.form.as_str(),
        sounds
    );
}
