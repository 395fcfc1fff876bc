//! Bounce Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::{Context, Result, anyhow};
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use bounce_breaker::consts::*;
    use bounce_breaker::highscores::HighScoreEntry;
    use bounce_breaker::persistence::LocalStore;
    use bounce_breaker::platform::dom::{self, MessageKind};
    use bounce_breaker::platform::{HeldKeys, KeyAction};
    use bounce_breaker::renderer::{RenderState, ShapeBatch};
    use bounce_breaker::sim::{GameEvent, GamePhase, GameState, tick};
    use bounce_breaker::{Difficulty, GameConfig, HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<RenderState>,
        batch: ShapeBatch,
        accumulator: f32,
        last_time: f64,
        keys: HeldKeys,
        store: LocalStore,
        high_scores: HighScores,
        /// A requestAnimationFrame callback is pending
        loop_running: bool,
        /// The current game over has already been written to the board
        score_saved: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let store = LocalStore::open();
            let settings = Settings::load(&store);
            let high_scores = HighScores::load(&store);
            Self {
                state: GameState::new(GameConfig::default(), settings, seed),
                render_state: None,
                batch: ShapeBatch::new(),
                accumulator: 0.0,
                last_time: 0.0,
                keys: HeldKeys::default(),
                store,
                high_scores,
                loop_running: false,
                score_saved: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let step = self.state.config.dt();
            self.accumulator += dt.min(0.1);

            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                let input = self.keys.take_tick_input();
                tick(&mut self.state, &input);
                self.accumulator -= step;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                // Fell too far behind (tab was in the background); drop the backlog
                self.accumulator = 0.0;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            self.batch.clear();
            self.state.draw(&mut self.batch);

            match render_state.render(self.batch.vertices()) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = render_state.size;
                    render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Push HUD values and react to this frame's events
        fn sync_ui(&mut self) {
            let hud = self.state.hud();
            dom::update_hud(&hud);
            dom::show_pause(&hud, self.state.phase == GamePhase::Paused);

            for event in self.state.drain_events() {
                match event {
                    GameEvent::LevelComplete(summary) => dom::show_level_complete(&summary),
                    GameEvent::GameOver(summary) => {
                        self.score_saved = false;
                        let rank = self.high_scores.potential_rank(summary.score);
                        dom::show_game_over(&summary, rank);
                    }
                    GameEvent::PowerUpCollected(kind) => {
                        log::debug!("Power-up: {}", kind.label());
                    }
                    GameEvent::BrickDestroyed { .. } | GameEvent::LifeLost { .. } => {}
                }
            }
        }

        fn save_score(&mut self) {
            if self.score_saved {
                return;
            }
            let Some(summary) = self.state.last_game_over else {
                return;
            };
            if !self.high_scores.qualifies(summary.score) {
                return;
            }

            let name = dom::input_value("player-name").unwrap_or_default();
            let entry = HighScoreEntry::new(
                &name,
                summary.score,
                summary.level,
                summary.elapsed_secs,
                dom::locale_date(),
            );
            self.high_scores.add(entry);

            match self.high_scores.save(&mut self.store) {
                Ok(()) => {
                    self.score_saved = true;
                    dom::set_button("save-score-btn", "Score Saved!", true);
                    dom::show_message("Score saved successfully!", MessageKind::Success);
                }
                Err(e) => {
                    log::error!("Failed to save score: {e}");
                    dom::show_message("Failed to save score. Please try again.", MessageKind::Error);
                }
            }
        }

        /// Read the settings controls, apply and persist them
        fn apply_settings_from_dom(&mut self) {
            let mut settings = self.state.settings.clone();
            if let Some(on) = dom::checkbox("sound-toggle") {
                settings.sound = on;
            }
            if let Some(on) = dom::checkbox("music-toggle") {
                settings.music = on;
            }
            if let Some(on) = dom::checkbox("particles-toggle") {
                settings.particles = on;
            }
            if let Some(difficulty) =
                dom::select_value("difficulty-select").and_then(|v| Difficulty::from_str(&v))
            {
                settings.difficulty = difficulty;
            }

            if let Err(e) = settings.save(&mut self.store) {
                log::warn!("Settings not persisted: {e}");
            }
            self.state.set_settings(settings);
        }
    }

    fn populate_settings(settings: &Settings) {
        dom::set_checkbox("sound-toggle", settings.sound);
        dom::set_checkbox("music-toggle", settings.music);
        dom::set_checkbox("particles-toggle", settings.particles);
        dom::set_select_value("difficulty-select", settings.difficulty.as_str());
    }

    pub async fn run() -> Result<()> {
        log::info!("Bounce Breaker starting...");

        let window = web_sys::window().context("no window")?;
        let document = window.document().context("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .context("no #canvas element")?
            .dyn_into()
            .map_err(|_| anyhow!("#canvas is not a canvas element"))?;

        // Backing store matches the stage at device resolution
        let dpr = window.device_pixel_ratio();
        let width = (STAGE_WIDTH as f64 * dpr) as u32;
        let height = (STAGE_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU (WebGL2 fallback)
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| anyhow!("Failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("Failed to get adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, width, height, (STAGE_WIDTH, STAGE_HEIGHT))
                .await?;
        game.borrow_mut().render_state = Some(render_state);

        populate_settings(&game.borrow().state.settings);
        setup_menu_buttons(game.clone());
        setup_game_buttons(game.clone());
        setup_settings_inputs(game.clone());
        setup_keyboard(game.clone())?;
        setup_resize(&canvas)?;

        // First frame so the canvas is not blank behind the menu
        game.borrow_mut().render();

        dom::show_screen("main-menu");
        dom::hide_overlays();
        dom::set_hidden("loading-screen", true);

        log::info!("Bounce Breaker ready!");
        Ok(())
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            dom::on_click("play-btn", move || {
                dom::hide_overlays();
                dom::show_screen("game-screen");
                {
                    let mut g = game.borrow_mut();
                    g.state.start();
                    if g.state.phase == GamePhase::LevelComplete
                        && let Some(summary) = g.state.last_level_summary
                    {
                        dom::show_level_complete(&summary);
                    }
                }
                ensure_loop(game.clone());
            });
        }

        dom::on_click("settings-btn", || dom::show_screen("settings-menu"));

        {
            let game = game.clone();
            dom::on_click("highscores-btn", move || {
                dom::render_highscores(&game.borrow().high_scores);
                dom::show_screen("highscores-menu");
            });
        }

        dom::on_click("back-to-menu", || dom::show_screen("main-menu"));
        dom::on_click("back-to-menu-2", || dom::show_screen("main-menu"));
    }

    fn setup_game_buttons(game: Rc<RefCell<Game>>) {
        for id in ["pause-btn", "resume-btn"] {
            let game = game.clone();
            dom::on_click(id, move || {
                let mut g = game.borrow_mut();
                g.state.toggle_pause();
                let hud = g.state.hud();
                dom::show_pause(&hud, g.state.phase == GamePhase::Paused);
            });
        }

        for id in ["restart-btn", "play-again-btn"] {
            let game = game.clone();
            dom::on_click(id, move || {
                let restarted = {
                    let mut g = game.borrow_mut();
                    g.keys.clear();
                    g.state.restart()
                };
                if restarted {
                    dom::hide_overlays();
                    ensure_loop(game.clone());
                }
            });
        }

        for id in ["quit-btn", "menu-btn"] {
            let game = game.clone();
            dom::on_click(id, move || {
                let mut g = game.borrow_mut();
                g.keys.clear();
                g.state.quit_to_menu();
                dom::hide_overlays();
                dom::show_screen("main-menu");
            });
        }

        {
            let game = game.clone();
            dom::on_click("next-level-btn", move || {
                if game.borrow_mut().state.next_level() {
                    dom::set_hidden("level-complete", true);
                }
            });
        }

        dom::on_click("save-score-btn", move || game.borrow_mut().save_score());
    }

    fn setup_settings_inputs(game: Rc<RefCell<Game>>) {
        for id in [
            "sound-toggle",
            "music-toggle",
            "particles-toggle",
            "difficulty-select",
        ] {
            let game = game.clone();
            dom::on_change(id, move || game.borrow_mut().apply_settings_from_dom());
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<()> {
        let window = web_sys::window().context("no window")?;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                if !matches!(g.state.phase, GamePhase::Playing | GamePhase::Paused) {
                    return;
                }
                let action = g.keys.key_down(&event.key());
                // Arrow keys and space would otherwise scroll the page
                if matches!(
                    action,
                    Some(KeyAction::MoveLeft | KeyAction::MoveRight | KeyAction::Launch)
                ) {
                    event.prevent_default();
                }
            });
            window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
                .map_err(|e| anyhow!("keydown listener: {e:?}"))?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())
                .map_err(|e| anyhow!("keyup listener: {e:?}"))?;
            closure.forget();
        }

        Ok(())
    }

    /// Scale the canvas element to the window, keeping the stage's backing size
    fn setup_resize(canvas: &HtmlCanvasElement) -> Result<()> {
        let window = web_sys::window().context("no window")?;

        let fit = {
            let canvas = canvas.clone();
            move || {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64());
                let (Some(w), Some(h)) = (inner(window.inner_width()), inner(window.inner_height()))
                else {
                    return;
                };
                let max_w = (w - 40.0).min(STAGE_WIDTH as f64).max(0.0);
                let max_h = (h - 120.0).min(STAGE_HEIGHT as f64).max(0.0);
                let style = canvas.style();
                let _ = style.set_property("width", &format!("{max_w}px"));
                let _ = style.set_property("height", &format!("{max_h}px"));
            }
        };
        fit();

        let closure = Closure::<dyn FnMut()>::new(fit);
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!("resize listener: {e:?}"))?;
        closure.forget();
        Ok(())
    }

    /// Start the frame loop unless it is already running
    fn ensure_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_running {
                return;
            }
            g.loop_running = true;
            g.last_time = 0.0;
            g.accumulator = 0.0;
        }
        request_animation_frame(game);
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
        let keep_running = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                g.state.config.dt()
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.sync_ui();

            let running = !matches!(g.state.phase, GamePhase::Menu | GamePhase::GameOver);
            g.loop_running = running;
            running
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }

    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e:#}");
        bounce_breaker::platform::dom::show_fatal_error(&format!("{e:#}"));
    }
}

/// Headless autopilot run: plays until game over or the tick limit
#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use bounce_breaker::highscores::HighScoreEntry;
    use bounce_breaker::persistence::MemoryStore;
    use bounce_breaker::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use bounce_breaker::{GameConfig, HighScores, Settings};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("seed must be an integer, got {arg:?}"))?,
        None => rand::random(),
    };
    log::info!("Bounce Breaker (native autopilot) starting with seed {seed}");

    let config = GameConfig::default();
    let max_ticks = config.ticks(10.0 * 60.0) as u64;
    let mut state = GameState::new(config, Settings::default(), seed);
    state.start();

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    while state.time_ticks < max_ticks {
        tick(&mut state, &input);
        for event in state.drain_events() {
            match event {
                GameEvent::LevelComplete(summary) => log::info!(
                    "Level {} cleared in {} with bonus {}",
                    summary.level,
                    bounce_breaker::format_time(summary.elapsed_secs),
                    summary.bonus
                ),
                GameEvent::LifeLost { lives_left } => log::info!("Life lost, {lives_left} left"),
                GameEvent::PowerUpCollected(kind) => log::debug!("Power-up: {}", kind.label()),
                GameEvent::BrickDestroyed { .. } | GameEvent::GameOver(_) => {}
            }
        }

        match state.phase {
            GamePhase::LevelComplete => {
                state.next_level();
            }
            GamePhase::GameOver => break,
            _ => {}
        }
    }

    let hud = state.hud();
    let elapsed = state.game_elapsed_secs();
    log::info!(
        "Finished: score {} on level {} after {}",
        hud.score,
        hud.level,
        bounce_breaker::format_time(elapsed)
    );

    let mut store = MemoryStore::new();
    let mut scores = HighScores::load(&store);
    if let Some(rank) = scores.potential_rank(hud.score) {
        scores.add(HighScoreEntry::new("autopilot", hud.score, hud.level, elapsed, "-"));
        scores.save(&mut store)?;
        log::info!(
            "Leaderboard rank #{rank}, best score {}",
            scores.top_score().unwrap_or_default()
        );
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
