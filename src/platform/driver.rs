//! Frame loop driver and the handle the host page holds
//!
//! The game lives in an `Rc<RefCell<Game>>`. Input listeners only write the
//! pending `TickInput`; the requestAnimationFrame callback runs fixed
//! substeps, dispatches sound/persistence side effects and renders. The
//! callback reschedules itself only while the phase is Booting or Playing.

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, TouchEvent, Window};

use super::storage::LocalStore;
use crate::audio::{AudioManager, Cue};
use crate::consts::*;
use crate::highscore::BestScore;
use crate::hud::HostNotice;
use crate::renderer::CanvasRenderer;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{GameEvent, GameState, TickInput, Viewport, tick};
use crate::tuning::Tuning;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Game instance holding all state
struct Game {
    state: GameState,
    input: TickInput,
    accumulator: f32,
    last_time: f64,
    renderer: CanvasRenderer,
    audio: AudioManager,
    settings: Settings,
    best: BestScore,
    store: LocalStore,
    pending_frame: Option<i32>,
    /// Host page callback, invoked as `callback(kind, value)`
    on_event: Option<js_sys::Function>,
    /// Notices waiting to be delivered once the game is no longer borrowed
    notices: Vec<HostNotice>,
}

impl Game {
    /// Run simulation ticks for `dt` seconds of wall time
    fn update(&mut self, dt: f32) {
        let dt = dt.min(MAX_FRAME_GAP);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input);
            self.accumulator -= FRAME_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.viewport = None;

            self.dispatch_events();
            if !self.state.phase.is_running() {
                self.accumulator = 0.0;
                break;
            }
        }
    }

    /// One display frame. Returns whether the loop should continue.
    fn frame(&mut self, time: f64) -> bool {
        let dt = if self.last_time > 0.0 {
            ((time - self.last_time) / 1000.0) as f32
        } else {
            FRAME_DT
        };
        self.last_time = time;

        self.update(dt);
        self.renderer.render(&self.state, &self.settings, time);

        let running = self.state.phase.is_running();
        if !running {
            self.last_time = 0.0;
        }
        running
    }

    /// Turn simulation events into cues and storage writes
    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(notice) = HostNotice::from_event(&event) {
                self.notices.push(notice);
            }
            match event {
                GameEvent::BootStarted => self.audio.play(Cue::Start),
                GameEvent::LevelUp { .. } => self.audio.play(Cue::LevelUp),
                GameEvent::Collected { .. } => self.audio.play(Cue::Collect),
                GameEvent::Hit => self.audio.play(Cue::Hit),
                GameEvent::GameOver { score, .. } => {
                    self.best.commit(&mut self.store, score);
                }
                GameEvent::PlayingStarted | GameEvent::Closed => {}
            }
        }
    }

    /// Resizing wipes the canvas; a stopped loop has to repaint by hand
    fn resize(&mut self, viewport: Viewport) {
        self.renderer
            .resize(viewport.width as u32, viewport.height as u32);
        self.input.viewport = Some(viewport);
        if !self.state.phase.is_running() {
            self.state.resize(viewport);
            self.redraw();
        }
    }

    fn redraw(&self) {
        self.renderer
            .render(&self.state, &self.settings, js_sys::Date::now());
    }

    fn apply_settings(&mut self) {
        self.audio.apply_settings(&self.settings);
        self.state.max_particles = self.settings.max_particles();
        self.settings.save(&mut self.store);
    }
}

/// An event listener that can be removed again
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Handle to a mounted arcade, owned by the host page
#[wasm_bindgen]
pub struct GameHandle {
    game: Rc<RefCell<Game>>,
    frame: FrameCallback,
    listeners: Vec<Listener>,
    closed: bool,
}

#[wasm_bindgen]
impl GameHandle {
    /// Mount the arcade on the canvas with id `canvas_id`.
    ///
    /// `tuning_json` optionally overrides gameplay constants.
    pub fn open(canvas_id: &str, tuning_json: Option<String>) -> Result<GameHandle, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        let viewport = window_viewport(&window);
        let renderer = CanvasRenderer::new(canvas)?;
        renderer.resize(viewport.width as u32, viewport.height as u32);

        let tuning = tuning_json
            .as_deref()
            .map(Tuning::from_json_or_default)
            .unwrap_or_default();

        let store = LocalStore::open();
        let settings = Settings::load(&store);
        let best = BestScore::load(&store);

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed, tuning, viewport).with_best_score(best.get());
        state.max_particles = settings.max_particles();

        let game = Rc::new(RefCell::new(Game {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
            last_time: 0.0,
            renderer,
            audio: AudioManager::new(&settings),
            settings,
            best,
            store,
            pending_frame: None,
            on_event: None,
            notices: Vec::new(),
        }));
        game.borrow().redraw();

        let frame = frame_callback(&game);
        let listeners = attach_listeners(&window, &game)?;

        log::info!("Growth Rush mounted on #{canvas_id} (seed {seed})");
        Ok(Self {
            game,
            frame,
            listeners,
            closed: false,
        })
    }

    /// Start or retry a run (boot sequence first)
    pub fn start(&self) {
        if self.closed {
            log::warn!("start() on a closed game view");
            return;
        }
        self.game.borrow_mut().input.start = true;
        request_frame(&self.game, &self.frame);
    }

    /// Tear the view down: cancel the pending frame and drop all listeners
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Some(id) = self.game.borrow_mut().pending_frame.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
        for listener in self.listeners.drain(..) {
            listener.detach();
        }

        {
            let mut g = self.game.borrow_mut();
            g.state.close();
            g.dispatch_events();
            g.input = TickInput::default();
            g.renderer.clear();
        }
        log::info!("Growth Rush closed");
        deliver_notices(&self.game);
    }

    /// Register `callback(kind, value)` for "booting", "playing",
    /// "levelup" (value = level), "gameover" (value = final score) and
    /// "closed". Pass nothing to unregister.
    pub fn set_on_event(&self, callback: Option<js_sys::Function>) {
        self.game.borrow_mut().on_event = callback;
    }

    pub fn score(&self) -> f64 {
        self.game.borrow().state.score as f64
    }

    pub fn level(&self) -> u32 {
        self.game.borrow().state.level()
    }

    pub fn best_score(&self) -> f64 {
        self.game.borrow().best.get() as f64
    }

    /// "start", "booting", "playing" or "gameover"
    pub fn phase(&self) -> String {
        self.game.borrow().state.phase.as_str().to_string()
    }

    /// Progress toward the next level in [0, 1)
    pub fn level_progress(&self) -> f32 {
        self.game.borrow().state.level_progress()
    }

    pub fn level_up_visible(&self) -> bool {
        self.game.borrow().state.level_up_visible()
    }

    pub fn set_muted(&self, muted: bool) {
        let mut g = self.game.borrow_mut();
        g.settings.muted = muted;
        g.apply_settings();
    }

    /// Accepts "low", "medium" or "high"; returns false for anything else
    pub fn set_quality(&self, preset: &str) -> bool {
        let Some(preset) = QualityPreset::parse(preset) else {
            return false;
        };
        let mut g = self.game.borrow_mut();
        g.settings.apply_preset(preset);
        g.apply_settings();
        log::info!("Quality set to {}", preset.as_str());
        true
    }
}

impl Drop for GameHandle {
    fn drop(&mut self) {
        self.close();
    }
}

fn window_viewport(window: &Window) -> Viewport {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
    Viewport::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Build the self-rescheduling frame callback.
///
/// The callback only holds a weak reference to its own slot, so dropping
/// the handle frees it.
fn frame_callback(game: &Rc<RefCell<Game>>) -> FrameCallback {
    let slot: FrameCallback = Rc::new(RefCell::new(None));
    let weak_slot = Rc::downgrade(&slot);
    let game = game.clone();

    let closure = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
        let running = {
            let mut g = game.borrow_mut();
            g.pending_frame = None;
            g.frame(time)
        };
        if running {
            if let Some(slot) = weak_slot.upgrade() {
                request_frame(&game, &slot);
            }
        }
        // Last, so a callback that closes the view also cancels the new frame
        deliver_notices(&game);
    });
    *slot.borrow_mut() = Some(closure);
    slot
}

/// Hand queued notices to the host callback without holding a borrow,
/// so the callback may call back into the handle
fn deliver_notices(game: &Rc<RefCell<Game>>) {
    let (callback, notices) = {
        let mut g = game.borrow_mut();
        let notices = std::mem::take(&mut g.notices);
        (g.on_event.clone(), notices)
    };
    let Some(callback) = callback else {
        return;
    };
    for notice in notices {
        let kind = JsValue::from_str(notice.kind);
        let value = JsValue::from_f64(notice.value as f64);
        if let Err(err) = callback.call2(&JsValue::NULL, &kind, &value) {
            log::warn!("Host event callback failed: {err:?}");
        }
    }
}

fn request_frame(game: &Rc<RefCell<Game>>, slot: &FrameCallback) {
    if game.borrow().pending_frame.is_some() {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let slot = slot.borrow();
    let Some(callback) = slot.as_ref() else {
        return;
    };
    match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
        Ok(id) => game.borrow_mut().pending_frame = Some(id),
        Err(err) => log::warn!("requestAnimationFrame failed: {err:?}"),
    }
}

fn attach_listeners(window: &Window, game: &Rc<RefCell<Game>>) -> Result<Vec<Listener>, JsValue> {
    let target: &EventTarget = window.as_ref();
    let mut listeners = Vec::with_capacity(3);

    // Mouse move
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().input.target = Some(pos);
            }
        });
        listeners.push(Listener::attach(target, "mousemove", closure)?);
    }

    // Touch move (first touch steers)
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            if let Some(touch) = event.touches().get(0) {
                let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                game.borrow_mut().input.target = Some(pos);
            }
        });
        listeners.push(Listener::attach(target, "touchmove", closure)?);
    }

    // Resize
    {
        let game = game.clone();
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            game.borrow_mut().resize(window_viewport(&window));
        });
        listeners.push(Listener::attach(target, "resize", closure)?);
    }

    Ok(listeners)
}
