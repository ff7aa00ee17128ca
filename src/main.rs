//! Gatefall entry point
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

    use gatefall::Tuning;
    use gatefall::renderer::RenderState;
    use gatefall::sim::{FrameScheduler, FrameToken, GameLoop, GameOverNotifier, Snapshot};

    /// `requestAnimationFrame`-backed scheduler
    ///
    /// Requests are queued here and submitted by [`flush_frames`] once the
    /// game borrow is released.
    #[derive(Default)]
    struct RafScheduler {
        queued: Option<FrameToken>,
        handle: Option<i32>,
    }

    impl FrameScheduler for RafScheduler {
        fn request_frame(&mut self, token: FrameToken) {
            self.queued = Some(token);
        }

        fn cancel(&mut self) {
            self.queued = None;
            if let Some(handle) = self.handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }
    }

    /// Shows the game-over popup with the final score
    struct PopupNotifier;

    impl GameOverNotifier for PopupNotifier {
        fn game_over(&mut self, final_score: u64) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&format!("Final Score: {}", final_score)));
            }
            set_visible(&document, "game-over-popup", true);
            log::info!("Game over popup shown (score {})", final_score);
        }
    }

    /// Game instance holding all state
    struct Game {
        game_loop: GameLoop<RafScheduler, PopupNotifier>,
        render_state: Option<RenderState>,
    }

    impl Game {
        /// Draw the current state without ticking
        fn present(&mut self) {
            match self.render_state.as_mut() {
                Some(render_state) => self.game_loop.present(render_state),
                None => self.game_loop.present(&mut |_: &Snapshot| {}),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.game_loop.state().score.to_string()));
            }
        }
    }

    fn set_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gatefall starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let tuning = Tuning::load().unwrap_or_default();
        let field = glam::Vec2::new(tuning.field_width, tuning.field_height);

        // Backing store at device resolution, CSS size from the page
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            game_loop: GameLoop::new(tuning, seed, RafScheduler::default(), PopupNotifier),
            render_state: None,
        }));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, field).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {:?}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        // Idle screen: sprite shown, nothing moving
        game.borrow_mut().present();
        set_visible(&document, "start-button", true);

        log::info!("Gatefall running!");
    }

    /// Submit the frame the game loop asked for, if any
    fn flush_frames(game: &Rc<RefCell<Game>>) {
        let Some(token) = game.borrow_mut().game_loop.scheduler_mut().queued.take() else {
            return;
        };
        let Some(window) = web_sys::window() else {
            return;
        };

        let game_for_frame = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game_for_frame, token);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(handle) => game.borrow_mut().game_loop.scheduler_mut().handle = Some(handle),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, token: FrameToken) {
        {
            let mut g = game.borrow_mut();
            g.game_loop.scheduler_mut().handle = None;

            let Game {
                game_loop,
                render_state,
            } = &mut *g;
            match render_state.as_mut() {
                Some(render_state) => game_loop.on_frame(token, render_state),
                None => game_loop.on_frame(token, &mut |_: &Snapshot| {}),
            };
            g.update_hud();
        }

        flush_frames(&game);
    }

    /// Start or retry, then kick off the frame chain
    fn begin_run(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if !g.game_loop.start() {
                return;
            }
            g.update_hud();
        }
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            set_visible(&document, "start-button", false);
            set_visible(&document, "game-over-popup", false);
        }
        flush_frames(game);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        g.game_loop.flap();
                    }
                    "KeyI" => {
                        let enabled = !g.game_loop.autopilot();
                        g.game_loop.set_autopilot(enabled);
                        log::info!("Idle mode: {}", enabled);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().game_loop.flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().game_loop.flap();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        for id in ["start-button", "retry-button"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    begin_run(&game);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Upper bound on ticks per headless run (five minutes at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const MAX_DEMO_TICKS: u64 = 5 * 60 * 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gatefall::Tuning;
    use gatefall::sim::{GameLoop, ManualScheduler, Snapshot};

    env_logger::init();
    log::info!("Gatefall (native) starting...");
    log::info!("Native mode plays headless demo runs - run with `trunk serve` for the web version");

    let tuning = match Tuning::load() {
        Ok(tuning) => tuning,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let runs: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(3);
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();

    let mut game = GameLoop::new(
        tuning,
        seed,
        ManualScheduler::default(),
        |final_score: u64| log::info!("Run over: final score {}", final_score),
    );
    game.set_autopilot(true);
    let mut sink = |_: &Snapshot| {};

    for run in 1..=runs {
        game.start();
        while let Some(token) = game.scheduler_mut().take() {
            game.on_frame(token, &mut sink);
            if game.state().time_ticks >= MAX_DEMO_TICKS {
                break;
            }
        }

        let state = game.state();
        println!(
            "run {:>2}: score {:>4} in {:>6} ticks ({:?})",
            run, state.score, state.time_ticks, state.phase
        );
        if state.is_running() {
            log::warn!("Run {} hit the tick limit; stopping", run);
            break;
        }
    }
}
