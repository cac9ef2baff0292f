//! Target Range entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlImageElement, MouseEvent};

    use target_range::Settings;
    use target_range::assets::{LoadEvent, WeaponAsset, WeaponModel};
    use target_range::audio::{AudioManager, SoundEffect, build_web_audio};
    use target_range::camera::Camera;
    use target_range::consts::*;
    use target_range::error::AssetError;
    use target_range::hud::DomHud;
    use target_range::renderer::CanvasRenderer;
    use target_range::sim::{
        Autopilot, GameEvent, InputEvent, MatchController, MatchPhase, Presenter, Ray,
    };

    const WEAPON_SPRITE: &str = "images/weapon.png";

    /// Game instance holding all state
    struct Game {
        controller: MatchController,
        camera: Camera,
        renderer: Option<CanvasRenderer>,
        hud: DomHud,
        audio: AudioManager,
        weapon: WeaponAsset,
        autopilot: Option<Autopilot>,
        settings: Settings,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, document: Document, settings: Settings) -> Self {
            let mut camera = Camera::default();
            settings.apply_to_camera(&mut camera);

            let mut audio = build_web_audio();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_muted(settings.muted);

            let mut controller = MatchController::new(Settings::load_levels(), seed);
            let autopilot = if settings.demo_mode {
                // Attract mode plays without a real pointer lock
                controller.set_pointer_locked(true);
                Some(Autopilot::default())
            } else {
                None
            };

            Self {
                controller,
                camera,
                renderer: None,
                hud: DomHud::new(document),
                audio,
                weapon: WeaponAsset::default(),
                autopilot,
                settings,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Advance timers and simulation for one display frame
        fn update(&mut self, time: f64) {
            let elapsed_ms = if self.last_time > 0.0 {
                ((time - self.last_time).max(0.0) as u64).min(MAX_FRAME_MS)
            } else {
                0
            };
            self.last_time = time;

            if self.autopilot.is_some() && self.controller.phase().accepts_selection() {
                let first = self.controller.catalog().iter().next().map(|l| l.name.clone());
                if let Some(name) = first {
                    let _ = self.controller.select_level(&name);
                }
            }

            self.controller.advance_clock(elapsed_ms);

            let shot = self
                .autopilot
                .as_mut()
                .and_then(|pilot| pilot.update(self.controller.state(), self.camera.position));
            if let Some(ray) = shot {
                self.fire(ray);
            }

            self.controller.frame(self.camera.position);
            self.dispatch_events();

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

        fn fire(&mut self, ray: Ray) {
            if self.controller.phase() == MatchPhase::Active && self.controller.pointer_locked() {
                self.audio.play(SoundEffect::Shot);
            }
            let _ = self.controller.handle_input(InputEvent::FireShot(ray));
        }

        fn dispatch_events(&mut self) {
            for event in self.controller.drain_events() {
                self.hud.present(&event);
                self.audio.present(&event);
                match event {
                    GameEvent::PhaseChanged(MatchPhase::Countdown) => self.camera.reset_look(),
                    GameEvent::PhaseChanged(MatchPhase::Ended) if self.autopilot.is_none() => {
                        // Free the mouse for level selection
                        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                            document.exit_pointer_lock();
                        }
                    }
                    _ => {}
                }
            }
        }

        fn render(&self) {
            if self.settings.show_fps {
                self.hud.set_fps(self.fps);
            }
            if let Some(renderer) = &self.renderer {
                renderer.render(self.controller.state(), &self.camera, &self.weapon);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        log::info!("Target Range starting...");

        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .unwrap()
            .dyn_into()
            .unwrap();

        let seed = js_sys::Date::now() as u64;
        let mut settings = Settings::load();
        // ?demo forces attract mode without touching stored settings
        if let Ok(search) = window.location().search() {
            if search.contains("demo") {
                settings.demo_mode = true;
            }
        }
        if settings.demo_mode {
            log::info!("Demo mode enabled");
        }
        let game = Rc::new(RefCell::new(Game::new(seed, document.clone(), settings)));

        match CanvasRenderer::new(canvas.clone()) {
            Some(mut renderer) => {
                let (w, h) = viewport_size(&window);
                renderer.resize(w, h);
                let mut g = game.borrow_mut();
                g.camera.set_aspect(w, h);
                g.renderer = Some(renderer);
            }
            None => log::error!("Canvas 2D context unavailable"),
        }

        load_weapon_sprite(game.clone());
        build_level_menu(&document, game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_resize(game.clone());

        request_animation_frame(game);
    }

    fn viewport_size(window: &web_sys::Window) -> (u32, u32) {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0);
        (w as u32, h as u32)
    }

    /// Fetch the weapon sprite; the renderer draws a box until it arrives
    fn load_weapon_sprite(game: Rc<RefCell<Game>>) {
        let Ok(image) = HtmlImageElement::new() else {
            game.borrow_mut().weapon.on_event(LoadEvent::Failed(AssetError::Decode {
                path: WEAPON_SPRITE.to_string(),
                reason: "cannot create image element".to_string(),
            }));
            return;
        };

        {
            let game = game.clone();
            let img = image.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.weapon.on_event(LoadEvent::Loaded(WeaponModel::Sprite {
                    path: WEAPON_SPRITE.to_string(),
                    width: img.natural_width(),
                    height: img.natural_height(),
                }));
                if let Some(renderer) = g.renderer.as_mut() {
                    renderer.weapon_image = Some(img.clone());
                }
                log::info!("Weapon sprite loaded");
            });
            image.set_onload(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut()
                    .weapon
                    .on_event(LoadEvent::Failed(AssetError::NotFound(WEAPON_SPRITE.to_string())));
            });
            image.set_onerror(Some(closure.as_ref().unchecked_ref()));
            closure.forget();
        }

        image.set_src(WEAPON_SPRITE);
    }

    /// One button per level; click starts the match and grabs the pointer
    fn build_level_menu(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(list) = document.get_element_by_id("level-list") else {
            log::warn!("No #level-list element; level menu unavailable");
            return;
        };

        let levels: Vec<_> = game
            .borrow()
            .controller
            .catalog()
            .iter()
            .map(|l| (l.name.clone(), l.color.clone()))
            .collect();

        for (name, color) in levels {
            let Ok(button) = document.create_element("button") else {
                continue;
            };
            let _ = button.set_attribute("class", "level-card");
            let _ = button.set_attribute("style", &format!("border-color: {}", color));
            button.set_text_content(Some(&name));

            {
                let game = game.clone();
                let name = name.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    match g.controller.handle_input(InputEvent::SelectLevel(name.clone())) {
                        Ok(()) => {
                            if let Some(canvas) = web_sys::window()
                                .and_then(|w| w.document())
                                .and_then(|d| d.get_element_by_id("canvas"))
                            {
                                canvas.request_pointer_lock();
                            }
                        }
                        Err(e) => log::debug!("Level selection rejected: {}", e),
                    }
                    g.dispatch_events();
                });
                let _ = button
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let mut g = game.borrow_mut();
                    let _ = g.controller.handle_input(InputEvent::HoverLevel(name.clone()));
                    g.dispatch_events();
                });
                let _ = button.add_event_listener_with_callback(
                    "mouseenter",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }

            let _ = list.append_child(&button);
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Mouse look (only while locked)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.controller.pointer_locked() && g.autopilot.is_none() {
                    g.camera
                        .process_mouse(event.movement_x() as f32, event.movement_y() as f32);
                }
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Fire, or re-grab the pointer after it was released
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if !g.controller.pointer_locked() {
                    if g.controller.phase() == MatchPhase::Countdown {
                        canvas_clone.request_pointer_lock();
                    }
                    return;
                }
                let ray = g.camera.view_ray();
                g.fire(ray);
                g.dispatch_events();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer lock changes
        {
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let locked = document_clone.pointer_lock_element().is_some();
                let mut g = game.borrow_mut();
                if g.autopilot.is_some() {
                    return;
                }
                log::info!("Pointer lock {}", if locked { "engaged" } else { "released" });
                let _ = g
                    .controller
                    .handle_input(InputEvent::PointerLockChanged(locked));
                g.dispatch_events();
            });
            let _ = document.add_event_listener_with_callback(
                "pointerlockchange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let window_clone = window.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = viewport_size(&window_clone);
            let mut g = game.borrow_mut();
            g.camera.set_aspect(w, h);
            if let Some(renderer) = g.renderer.as_mut() {
                renderer.resize(w, h);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
            g.update(time);
            g.render();
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Target Range (native) starting...");
    log::info!("Native mode runs a headless autopilot match - use `trunk serve` for the web version");

    let level = std::env::args().nth(1).unwrap_or_else(|| "Easy".to_string());
    match headless::run(&level) {
        Some(summary) => println!(
            "{}: {}",
            target_range::hud::summary_title(&summary),
            target_range::hud::summary_text(&summary)
        ),
        None => std::process::exit(1),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::{SystemTime, UNIX_EPOCH};

    use target_range::Settings;
    use target_range::camera::Camera;
    use target_range::consts::COUNTDOWN_START;
    use target_range::hud::LogPresenter;
    use target_range::sim::{Autopilot, MatchController, MatchPhase, MatchSummary};

    /// Simulated display refresh
    const FRAME_HZ: u64 = 60;

    /// Play one autopilot match on `level` and return its summary
    pub fn run(level: &str) -> Option<MatchSummary> {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut controller = MatchController::new(Settings::load_levels(), seed);
        let camera = Camera::default();
        let mut pilot = Autopilot::default();
        let mut presenter = LogPresenter::default();

        controller.set_pointer_locked(true);
        if let Err(e) = controller.select_level(level) {
            log::error!("{}", e);
            return None;
        }

        let game_time = controller.state().time_left as u64;
        let max_frames = (game_time + COUNTDOWN_START as u64 + 1) * FRAME_HZ;
        // Spread 1000ms over 60 frames without drift
        let mut elapsed_total = 0u64;
        for frame in 1..=max_frames {
            let now = frame * 1000 / FRAME_HZ;
            controller.advance_clock(now - elapsed_total);
            elapsed_total = now;

            if let Some(ray) = pilot.update(controller.state(), camera.position) {
                controller.fire(&ray);
            }
            controller.frame(camera.position);
            controller.dispatch_events(&mut presenter);

            if controller.phase() == MatchPhase::Ended {
                break;
            }
        }

        presenter.last_summary
    }
}
