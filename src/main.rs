//! Turbo Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use turbo_racer::commentary::{
        GeminiCommentator, request_live_comment, request_post_race_analysis,
    };
    use turbo_racer::consts::{CANVAS_HEIGHT, CANVAS_WIDTH};
    use turbo_racer::platform::LaneInput;
    use turbo_racer::renderer::{FrameOptions, RenderState};
    use turbo_racer::shell::{CommentaryRequest, Screen, Shell};
    use turbo_racer::{Settings, THEMES, TrackTheme};

    /// Game instance holding all state
    struct Game {
        shell: Shell,
        render_state: Option<RenderState>,
        settings: Settings,
        commentator: Rc<GeminiCommentator>,
        /// Screen shown at the last DOM sync
        shown_screen: Option<Screen>,
        /// Pending animation-frame request, only while playing
        frame_handle: Option<i32>,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            Self {
                shell: Shell::new(settings.theme(), settings.commentary_enabled),
                render_state: None,
                commentator: Rc::new(GeminiCommentator::new(settings.commentary.clone())),
                settings,
                shown_screen: None,
                frame_handle: None,
            }
        }

        fn start(&mut self, theme: &'static TrackTheme) {
            let seed = js_sys::Date::now() as u64;
            self.shell.start(theme, seed);
            self.settings.remember_theme(theme);
            self.settings.save();
        }

        fn retry(&mut self) {
            self.shell.retry(js_sys::Date::now() as u64);
        }

        /// Move the menu highlight by `step` themes, wrapping
        fn cycle_theme(&mut self, step: isize) {
            let current = THEMES
                .iter()
                .position(|t| t.id == self.shell.theme().id)
                .unwrap_or(0);
            let next = (current as isize + step).rem_euclid(THEMES.len() as isize) as usize;
            self.shell.select_theme(&THEMES[next]);
        }

        /// Step the simulation and draw the result; skipped without a surface
        fn update(&mut self) {
            self.shell.present_frame(self.render_state.as_mut());
        }

        /// Withdraw the pending animation frame, if any
        fn stop_frames(&mut self) {
            if let Some(handle) = self.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
        }

        /// Update HUD, menu and game-over elements in DOM
        fn sync_dom(&mut self, document: &Document) {
            let screen = self.shell.screen();
            if self.shown_screen != Some(screen) {
                set_visible(document, "menu", screen == Screen::Menu);
                set_visible(document, "hud", screen == Screen::Playing);
                set_visible(document, "game-over", screen == Screen::GameOver);
                log::info!("Screen: {:?}", screen);
                self.shown_screen = Some(screen);
            }

            match screen {
                Screen::Menu => {
                    let selected = self.shell.theme().id;
                    for theme in THEMES.iter() {
                        let id = format!("theme-{}", theme.id);
                        if let Some(el) = document.get_element_by_id(&id) {
                            let class = if theme.id == selected {
                                "theme-btn selected"
                            } else {
                                "theme-btn"
                            };
                            let _ = el.set_attribute("class", class);
                        }
                    }
                }
                Screen::Playing => {
                    if let Some(hud) = self.shell.hud() {
                        set_text(document, "hud-score", &hud.score);
                        set_text(document, "hud-distance", &hud.distance);
                        set_text(document, "hud-speed", &hud.speed);
                        match hud.near_miss_badge {
                            Some(badge) => {
                                set_text(document, "hud-near-miss", &badge);
                                set_visible(document, "hud-near-miss", true);
                            }
                            None => set_visible(document, "hud-near-miss", false),
                        }
                    }
                    match self.shell.visible_commentary(js_sys::Date::now()) {
                        Some(text) => {
                            set_text(document, "commentary", text);
                            set_visible(document, "commentary", true);
                        }
                        None => set_visible(document, "commentary", false),
                    }
                }
                Screen::GameOver => {
                    if let Some(view) = self.shell.game_over_view() {
                        set_text(document, "final-score", &view.score);
                        set_text(document, "final-distance", &view.distance);
                        set_text(document, "final-near-misses", &view.near_misses);
                        set_text(document, "final-top-speed", &view.top_speed);
                        set_text(document, "final-analysis", &view.analysis);
                    }
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Turbo Racer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Fixed logical resolution, scaled for the display
        let dpr = window.device_pixel_ratio();
        let width = (CANVAS_WIDTH as f64 * dpr) as u32;
        let height = (CANVAS_HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let glow = !settings.reduced_motion;
        let game = Rc::new(RefCell::new(Game::new(settings)));

        // Without a GPU the menu still works, but runs never advance
        let mut render_state = init_renderer(canvas, width, height).await;
        if let Some(render_state) = render_state.as_mut() {
            render_state.options = FrameOptions { glow };
        }
        game.borrow_mut().render_state = render_state;

        setup_menu(&document, game.clone());
        setup_game_over_buttons(&document, game.clone());
        setup_input_handlers(game.clone());

        refresh(&game);

        log::info!("Turbo Racer running!");
    }

    async fn init_renderer(
        canvas: HtmlCanvasElement,
        width: u32,
        height: u32,
    ) -> Option<RenderState> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas)) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return None;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return None;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        }
    }

    /// One button per theme in `#theme-list`
    fn setup_menu(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(list) = document.get_element_by_id("theme-list") else {
            log::warn!("No #theme-list element, menu has no theme buttons");
            return;
        };

        for theme in THEMES.iter() {
            let Ok(button) = document.create_element("button") else {
                continue;
            };
            button.set_id(&format!("theme-{}", theme.id));
            let _ = button.set_attribute("class", "theme-btn");
            let _ = button.set_attribute(
                "style",
                &format!(
                    "background:{};color:{};border-color:{}",
                    theme.road_color.to_hex(),
                    theme.line_color.to_hex(),
                    theme.line_color.to_hex()
                ),
            );
            button.set_text_content(Some(&format!("{} - {}", theme.name, theme.description)));

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    if g.shell.screen() == Screen::Menu {
                        g.start(theme);
                    }
                }
                refresh(&game);
            });
            let _ =
                button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();

            let _ = list.append_child(&button);
        }
    }

    fn setup_game_over_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("retry-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().retry();
                refresh(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().shell.to_menu();
                refresh(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let input = LaneInput::from_key(&key);
                {
                    let mut g = game.borrow_mut();
                    match g.shell.screen() {
                        Screen::Playing => {
                            if let Some(input) = input {
                                event.prevent_default();
                                g.shell.handle_input(input);
                            }
                            return;
                        }
                        Screen::Menu => match input {
                            Some(LaneInput::Left) => g.cycle_theme(-1),
                            Some(LaneInput::Right) => g.cycle_theme(1),
                            _ if key == "Enter" => {
                                let theme = g.shell.theme();
                                g.start(theme);
                            }
                            _ => return,
                        },
                        Screen::GameOver => {
                            if key != "Enter" {
                                return;
                            }
                            g.retry();
                        }
                    }
                }
                refresh(&game);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: tap position against the viewport picks the lane
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if g.shell.screen() != Screen::Playing {
                    return;
                }
                let width = web_sys::window()
                    .and_then(|w| w.inner_width().ok())
                    .and_then(|v| v.as_f64())
                    .unwrap_or(0.0) as f32;
                let first_x = event.touches().get(0).map(|t| t.client_x() as f32);
                if let Some(input) = LaneInput::from_touch(first_x, width) {
                    g.shell.handle_input(input);
                }
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Run queued commentary requests in the background
    fn dispatch_commentary(game: &Rc<RefCell<Game>>) {
        let (requests, commentator) = {
            let mut g = game.borrow_mut();
            (g.shell.take_requests(), g.commentator.clone())
        };

        for request in requests {
            let game = game.clone();
            let commentator = commentator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match request {
                    CommentaryRequest::Live {
                        stats,
                        theme,
                        event,
                    } => {
                        let text =
                            request_live_comment(commentator.as_ref(), &stats, theme, event).await;
                        game.borrow_mut()
                            .shell
                            .apply_commentary(text, js_sys::Date::now());
                    }
                    CommentaryRequest::PostRace { stats, theme } => {
                        let text =
                            request_post_race_analysis(commentator.as_ref(), &stats, theme).await;
                        game.borrow_mut().shell.apply_analysis(text);
                    }
                }
                refresh(&game);
            });
        }
    }

    /// Sync the DOM, then keep the frame pump running only while playing
    fn refresh(game: &Rc<RefCell<Game>>) {
        let playing = {
            let mut g = game.borrow_mut();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.sync_dom(&document);
            }
            let playing = g.shell.screen() == Screen::Playing;
            if !playing {
                g.stop_frames();
            }
            playing
        };
        if playing {
            request_animation_frame(game);
        }
    }

    fn request_animation_frame(game: &Rc<RefCell<Game>>) {
        if game.borrow().frame_handle.is_some() {
            return;
        }
        let Some(window) = web_sys::window() else {
            return;
        };
        let next = game.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(next);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        closure.forget();
        game.borrow_mut().frame_handle = handle;
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let playing = {
            let mut g = game.borrow_mut();
            g.frame_handle = None;
            g.update();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.sync_dom(&document);
            }
            g.shell.screen() == Screen::Playing
        };

        dispatch_commentary(&game);
        if playing {
            request_animation_frame(&game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Upper bound for the headless run (ten minutes at 60 fps)
#[cfg(not(target_arch = "wasm32"))]
const HEADLESS_FRAME_LIMIT: u64 = 36_000;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Turbo Racer (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    headless_run(&turbo_racer::Settings::load(), seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive one run with no input until the first crash
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(settings: &turbo_racer::Settings, seed: u64) {
    use turbo_racer::hud::{format_distance, format_score};
    use turbo_racer::{Screen, Shell};

    let theme = settings.theme();
    let mut shell = Shell::new(theme, settings.commentary_enabled);
    shell.start(theme, seed);

    let mut requests = shell.take_requests().len();
    let mut frames = 0;
    while shell.screen() == Screen::Playing && frames < HEADLESS_FRAME_LIMIT {
        shell.frame();
        requests += shell.take_requests().len();
        frames += 1;
    }

    let stats = shell.stats();
    println!(
        "Seed {} on {}: {} frames, score {}, distance {}, near misses {}, top speed {:.1}, {} commentary requests",
        seed,
        theme.name,
        frames,
        format_score(stats.score),
        format_distance(stats.distance),
        stats.near_misses,
        stats.top_speed,
        requests
    );
}
