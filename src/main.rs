//! Invaderers entry point
//!
//! The browser build runs the full game. The native build is a headless
//! runner that plays the game on autopilot and reports the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent};

    use invaderers::audio::{AudioManager, SoundEffect};
    use invaderers::consts::*;
    use invaderers::highscores::format_age;
    use invaderers::renderer::SpriteRenderState;
    use invaderers::sim::{BuiltinFormations, GamePhase, GameState, TickInput, new_game, simulate};
    use invaderers::{HighScores, Settings, Tuning};

    /// Movement keys currently held down
    #[derive(Default)]
    struct HeldKeys {
        left: bool,
        right: bool,
        up: bool,
        down: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        render_state: Option<SpriteRenderState>,
        audio: AudioManager,
        settings: Settings,
        high_scores: HighScores,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        held: HeldKeys,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        /// Set once the finished run has been offered to the leaderboard
        score_recorded: bool,
        /// Autopilot came from attract mode and ends on the first play key
        attract: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let input = TickInput {
                autopilot: settings.attract_mode,
                ..Default::default()
            };
            Self {
                state: new_game(seed, Tuning::default(), &BuiltinFormations),
                render_state: None,
                audio: AudioManager::new(&settings),
                high_scores: HighScores::load(),
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input,
                held: HeldKeys::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                score_recorded: false,
                attract: settings.attract_mode,
            }
        }

        /// Hand control back to the player after an attract-mode demo
        fn take_control(&mut self) {
            if self.attract {
                self.attract = false;
                self.input.autopilot = false;
                log::info!("Attract mode ended");
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.left = self.held.left;
                self.input.right = self.held.right;
                self.input.up = self.held.up;
                self.input.down = self.held.down;
                simulate(&mut self.state, &self.input, &BuiltinFormations);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.fire = false;
                self.input.pause = false;

                for event in self.state.drain_events() {
                    if let Some(effect) = SoundEffect::for_event(&event) {
                        self.audio.play(effect);
                    }
                }
            }

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            if self.state.is_game_over() && !self.score_recorded {
                self.record_score();
            }
        }

        fn record_score(&mut self) {
            self.score_recorded = true;
            let rank = self.high_scores.add_score(
                self.state.score,
                self.state.reached_level(),
                self.state.victory,
                js_sys::Date::now(),
            );
            if let Some(rank) = rank {
                log::info!("New high score #{}: {}", rank, self.state.score);
                self.high_scores.save();
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state) {
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

            let set_value = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };
            let set_visible = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };

            set_value("#hud-score .hud-value", &self.state.score.to_string());
            let best = self.high_scores.top_score().unwrap_or(0).max(self.state.score);
            set_value("#hud-best .hud-value", &best.to_string());
            set_value("#hud-lives .hud-value", &self.state.lives.to_string());
            set_value("#hud-level .hud-value", &self.state.reached_level().to_string());
            set_value("#hud-power .hud-value", &self.state.power.tier.index().to_string());
            set_value("#hud-fps .hud-value", &self.fps.to_string());
            set_visible("hud-fps", self.settings.show_fps);
            set_visible("autopilot-badge", self.input.autopilot);

            set_visible("pause-menu", self.state.phase == GamePhase::Paused);

            let over = self.state.phase == GamePhase::GameOver;
            set_visible("game-over", over);
            if over {
                set_value("#final-score", &self.state.score.to_string());
                set_value("#final-level", &self.state.reached_level().to_string());
                set_value(
                    "#final-result",
                    if self.state.victory { "Earth is safe!" } else { "The invaders won" },
                );
                self.render_high_scores(&document);
            }
        }

        fn render_high_scores(&self, document: &web_sys::Document) {
            let Some(list) = document.get_element_by_id("highscore-list") else {
                return;
            };
            let now = js_sys::Date::now();
            let rows: String = self
                .high_scores
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| {
                    format!(
                        "<li><span>{}.</span> {} <small>level {}{} · {}</small></li>",
                        i + 1,
                        e.score,
                        e.level,
                        if e.victory { " ★" } else { "" },
                        format_age(e.timestamp, now)
                    )
                })
                .collect();
            list.set_inner_html(&rows);
        }

        /// Reset game state for restart
        fn restart(&mut self, seed: u64) {
            self.state = new_game(seed, Tuning::default(), &BuiltinFormations);
            self.accumulator = 0.0;
            self.input = TickInput {
                autopilot: self.input.autopilot,
                ..Default::default()
            };
            self.score_recorded = false;
            log::info!("Game restarted with seed: {}", seed);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Invaderers starting...");

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

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
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
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SpriteRenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(game.clone());
        setup_restart_button(game.clone());
        setup_pause_menu(game.clone());
        setup_auto_pause(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Invaderers running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let key = event.key();
                if matches!(
                    key.as_str(),
                    "ArrowLeft" | "a" | "A" | "ArrowRight" | "d" | "D" | "ArrowUp" | "w" | "W"
                        | "ArrowDown" | "s" | "S" | " "
                ) {
                    g.take_control();
                }
                match key.as_str() {
                    "ArrowLeft" | "a" | "A" => g.held.left = true,
                    "ArrowRight" | "d" | "D" => g.held.right = true,
                    "ArrowUp" | "w" | "W" => g.held.up = true,
                    "ArrowDown" | "s" | "S" => g.held.down = true,
                    // Edge-triggered: holding space does not autofire
                    " " => {
                        if !event.repeat() {
                            g.input.fire = true;
                        }
                    }
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "i" | "I" => {
                        g.attract = false;
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    "t" | "T" => {
                        g.settings.toggle_attract_mode();
                        g.settings.save();
                    }
                    "m" | "M" => {
                        g.settings.toggle_mute();
                        g.settings.save();
                        let settings = g.settings.clone();
                        g.audio.apply_settings(&settings);
                    }
                    "r" | "R" => {
                        if g.state.is_game_over() {
                            g.restart(js_sys::Date::now() as u64);
                        }
                    }
                    _ => return,
                }
                event.prevent_default();
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.held.left = false,
                    "ArrowRight" | "d" | "D" => g.held.right = false,
                    "ArrowUp" | "w" | "W" => g.held.up = false,
                    "ArrowDown" | "s" | "S" => g.held.down = false,
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart(js_sys::Date::now() as u64);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pause_menu(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                // Toggle back to playing
                game.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document
                .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.held = HeldKeys::default();
                if g.settings.mute_on_blur {
                    g.audio.set_volume(0.0);
                }
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus restores the configured volume
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let settings = g.settings.clone();
                g.audio.apply_settings(&settings);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, bail};

    use invaderers::Tuning;
    use invaderers::sim::{
        BuiltinFormations, DirFormations, FormationSource, GameEvent, GameState, TickInput, new_game,
        simulate,
    };

    const USAGE: &str = "Usage: invaderers [--levels DIR] [--tuning FILE] [--frames N] [--seed N]";

    #[derive(Debug, Clone, PartialEq)]
    pub struct RunOptions {
        pub levels: Option<PathBuf>,
        pub tuning: Option<PathBuf>,
        pub frames: u64,
        pub seed: u64,
    }

    impl Default for RunOptions {
        fn default() -> Self {
            Self {
                levels: None,
                tuning: None,
                // Ten minutes of play at 60 Hz
                frames: 36_000,
                seed: 0,
            }
        }
    }

    pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<RunOptions> {
        let mut options = RunOptions::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || args.next().with_context(|| format!("{} needs a value\n{}", flag, USAGE));
            match flag.as_str() {
                "--levels" => options.levels = Some(PathBuf::from(value()?)),
                "--tuning" => options.tuning = Some(PathBuf::from(value()?)),
                "--frames" => {
                    options.frames = value()?.parse().context("--frames expects an integer")?
                }
                "--seed" => options.seed = value()?.parse().context("--seed expects an integer")?,
                "-h" | "--help" => bail!("{}", USAGE),
                other => bail!("Unknown argument '{}'\n{}", other, USAGE),
            }
        }
        Ok(options)
    }

    pub fn load_tuning(options: &RunOptions) -> Result<Tuning> {
        let Some(path) = &options.tuning else {
            return Ok(Tuning::default());
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tuning '{}'", path.display()))?;
        Tuning::from_json(&json).with_context(|| format!("Invalid tuning '{}'", path.display()))
    }

    /// Play on autopilot until the run ends or the frame budget is spent
    pub fn play(options: &RunOptions, tuning: Tuning, levels: &dyn FormationSource) -> GameState {
        let mut state = new_game(options.seed, tuning, levels);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut shots = 0u64;
        let mut hits_taken = 0u64;
        while state.frame < options.frames && !state.is_game_over() {
            simulate(&mut state, &input, levels);
            for event in state.drain_events() {
                match event {
                    GameEvent::MissileFired => shots += 1,
                    GameEvent::ShipHit { .. } => hits_taken += 1,
                    _ => {}
                }
            }
        }
        log::info!("{} volleys fired, {} hits taken", shots, hits_taken);
        state
    }

    pub fn run() -> Result<()> {
        let options = parse_args(std::env::args().skip(1))?;
        let tuning = load_tuning(&options)?;

        let levels: Box<dyn FormationSource> = match &options.levels {
            Some(dir) => {
                if !dir.is_dir() {
                    bail!("Level directory '{}' does not exist", dir.display());
                }
                Box::new(DirFormations::new(dir.clone()))
            }
            None => Box::new(BuiltinFormations),
        };

        log::info!("Invaderers (headless) seed {} for {} frames", options.seed, options.frames);
        let state = play(&options, tuning, levels.as_ref());

        let outcome = match (state.is_game_over(), state.victory) {
            (true, true) => "victory",
            (true, false) => "defeat",
            (false, _) => "out of time",
        };
        println!(
            "{}: score {} level {} lives {} after {} frames",
            outcome,
            state.score,
            state.reached_level(),
            state.lives,
            state.frame
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn args(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        #[test]
        fn test_defaults() {
            assert_eq!(parse_args(args(&[])).unwrap(), RunOptions::default());
        }

        #[test]
        fn test_all_flags() {
            let options =
                parse_args(args(&["--levels", "lv", "--tuning", "t.json", "--frames", "10", "--seed", "3"]))
                    .unwrap();
            assert_eq!(options.levels, Some(PathBuf::from("lv")));
            assert_eq!(options.tuning, Some(PathBuf::from("t.json")));
            assert_eq!(options.frames, 10);
            assert_eq!(options.seed, 3);
        }

        #[test]
        fn test_bad_arguments() {
            assert!(parse_args(args(&["--frames"])).is_err());
            assert!(parse_args(args(&["--frames", "many"])).is_err());
            assert!(parse_args(args(&["--bogus"])).is_err());
        }

        #[test]
        fn test_play_respects_frame_budget() {
            let options = RunOptions {
                frames: 120,
                ..Default::default()
            };
            let state = play(&options, Tuning::default(), &BuiltinFormations);
            assert!(state.frame <= 120);
            assert!(state.is_game_over() || state.frame == 120);
        }

        #[test]
        fn test_missing_tuning_file_is_an_error() {
            let options = RunOptions {
                tuning: Some(PathBuf::from("/nonexistent/tuning.json")),
                ..Default::default()
            };
            assert!(load_tuning(&options).is_err());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    env_logger::init();
    headless::run()
}
