//! Zig Zag entry point
//!
//! The browser build runs the game in a requestAnimationFrame loop and hands
//! every snapshot to the page's renderer. The native build runs a headless
//! autopilot demo against the mocked ledger.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent, MouseEvent, PointerEvent};

    use zigzag::audio::AudioManager;
    use zigzag::ledger::MockLedger;
    use zigzag::report::{ReportWorker, report_channel};
    use zigzag::sim::{GameEvent, GameStatus, PcgSource};
    use zigzag::{GameController, Settings, Theme};

    // The page owns drawing; it registers `window.zigzagPresent`
    #[wasm_bindgen(inline_js = "
        export function zigzag_present(json) {
            if (typeof window.zigzagPresent === 'function') {
                window.zigzagPresent(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn zigzag_present(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        controller: GameController,
        reports: ReportWorker<MockLedger>,
        last_time: f64,
    }

    impl Game {
        fn new(settings: &Settings) -> Self {
            let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
            let (pickups, reports) = report_channel(MockLedger::new(settings.ledger_latency_ms));
            let mut controller = GameController::new(
                Box::new(PcgSource::new(seed)),
                Box::new(AudioManager::new(settings.sound())),
                pickups,
            );
            controller.set_autopilot(settings.autopilot);

            log::info!("Game initialized with seed: {}", seed);
            Self {
                controller,
                reports,
                last_time: 0.0,
            }
        }

        fn update(&mut self, dt: f32, document: &Document) {
            self.controller.tick(dt);
            self.reports
                .pump(|task| wasm_bindgen_futures::spawn_local(task));

            for event in self.controller.take_ui_events() {
                if let GameEvent::PickupCollected { .. } = event {
                    // Restart the CSS pop animation
                    if let Some(el) = document.get_element_by_id("score") {
                        let classes = el.class_list();
                        let _ = classes.remove_1("pop");
                        let _ = classes.add_1("pop");
                    }
                }
            }
        }

        fn present(&self) {
            match serde_json::to_string(&self.controller.snapshot()) {
                Ok(json) => zigzag_present(&json),
                Err(e) => log::warn!("Snapshot serialization failed: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let status = self.controller.status();
            let score = self.controller.score();
            let theme = Theme::for_score(score);

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&score.to_string()));
            }

            if let Some(body) = document.body() {
                let _ = body.style().set_property("background", theme.background);
                let _ = body.style().set_property("color", theme.ui);
            }

            // Show/hide the start and game over overlays
            if let Some(el) = document.get_element_by_id("start-screen") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", status != GameStatus::Start);
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", status != GameStatus::GameOver);
                if status == GameStatus::GameOver {
                    if let Some(final_el) = document.get_element_by_id("final-score") {
                        final_el.set_text_content(Some(&score.to_string()));
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("mute-indicator") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", !self.controller.muted());
            }
        }

        fn restart(&mut self) {
            match self.controller.restart() {
                Ok(()) => self.last_time = 0.0,
                Err(e) => log::debug!("Ignoring restart: {}", e),
            }
        }
    }

    /// Settings embedded in the page, defaults otherwise
    fn load_settings(document: &Document) -> Settings {
        let Some(json) = document
            .get_element_by_id("zigzag-settings")
            .and_then(|el| el.text_content())
        else {
            return Settings::default();
        };
        Settings::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Bad embedded settings, using defaults: {}", e);
            Settings::default()
        })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Zig Zag starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document to attach to");
            return;
        };

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let settings = load_settings(&document);
        let game = Rc::new(RefCell::new(Game::new(&settings)));

        setup_input_handlers(game.clone());
        setup_restart_button(&document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Zig Zag running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Pointer (mouse, touch, pen) - tap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                // Overlay buttons handle their own clicks
                let on_button = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlElement>().ok())
                    .is_some_and(|el| el.tag_name() == "BUTTON");
                if !on_button {
                    game.borrow_mut().controller.tap();
                }
            });
            let _ = window
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        g.controller.tap();
                    }
                    "Enter" | "r" | "R" => g.restart(),
                    "m" | "M" => {
                        let muted = !g.controller.muted();
                        g.controller.set_muted(muted);
                    }
                    "i" | "I" => {
                        let enabled = !g.controller.autopilot();
                        g.controller.set_autopilot(enabled);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
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
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            let mut g = game.borrow_mut();

            // Calculate delta time; the controller clamps long gaps
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            g.last_time = time;

            g.update(dt, &document);
            g.present();
            g.update_hud(&document);
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
fn main() {
    use zigzag::Settings;

    env_logger::init();
    log::info!("Zig Zag (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };

    run_demo(&settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot run with the mocked ledger
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(settings: &zigzag::Settings) {
    use zigzag::GameController;
    use zigzag::audio::SilentSink;
    use zigzag::ledger::MockLedger;
    use zigzag::report::report_channel;
    use zigzag::sim::{GameStatus, PcgSource};

    const DEMO_DT: f32 = 1.0 / 60.0;

    let seed = settings.seed.unwrap_or(42);
    let (pickups, reports) = report_channel(MockLedger::new(settings.ledger_latency_ms));
    let mut game = GameController::new(
        Box::new(PcgSource::new(seed)),
        Box::new(SilentSink::new(settings.sound())),
        pickups,
    );
    game.set_autopilot(true);
    log::info!("Demo seed {}, {} ticks", seed, settings.demo_ticks);

    let mut reported = 0;
    let mut ticks = 0;
    while ticks < settings.demo_ticks {
        game.tick(DEMO_DT);
        reported += reports.pump(|task| pollster::block_on(task));
        game.take_ui_events();
        ticks += 1;
        if game.status() == GameStatus::GameOver {
            break;
        }
    }

    println!(
        "Ran {} ticks: score {}, {} pickups reported, ledger total {}",
        ticks,
        game.score(),
        reported,
        reports.ledger().chain_value()
    );
}
