//! Browser host: binds a [`Session`] to a canvas, a tracking socket, and the
//! animation frame loop.
//!
//! The rig asset and its render surface stay in JS (they come from whatever
//! rendering library the page loads) and are reached through the
//! [`JsRig`] / [`JsSurface`] extern types. Every DOM callback, the socket
//! pump, and the frame callback share one `Rc<RefCell<Session>>` and borrow it
//! for the duration of a single handler.
//!
//! The rig object must provide `setPosition(x, y)`, `setScale(s)`,
//! `setParamFloat(id, value)`, `setAutoBlink(enabled)`, and the motion hook
//! pair `setMotionUpdate(fn)` / `clearMotionUpdate()`. `setMotionUpdate`
//! installs `fn` in place of the model's own per-update motion step (for a
//! Live2D model, its `motionManager.update`), so idle and breathing motions
//! stop and `fn` writes the tracked pose instead; `fn` returns whether it
//! wrote anything. `clearMotionUpdate` restores the original step.
//!
//! ```js
//! const stage = WebStage.start(canvas, rig, surface, "ws://localhost:6789",
//!     JSON.stringify({ iris_y: "centered" }), (reason) => console.error(reason));
//! // later
//! stage.stop();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::StreamExt;
use futures::channel::oneshot;
use futures::future::{Either, select};
use gloo_net::websocket::Message;
use gloo_net::websocket::futures::WebSocket;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::config::StageConfig;
use crate::input::{InputEvent, WheelDelta};
use crate::rig::{PoseProvider, Rig, RigControls, StagedPose, Surface, SurfaceError};
use crate::session::{Session, SessionError, TickStatus};
use crate::viewport::Point;

#[cfg(test)]
#[path = "web_test.rs"]
mod web_test;

#[wasm_bindgen]
extern "C" {
    /// A loaded rig model owned by the page.
    #[derive(Clone)]
    pub type JsRig;

    #[wasm_bindgen(method, js_name = setPosition)]
    fn set_position(this: &JsRig, x: f64, y: f64);

    #[wasm_bindgen(method, js_name = setScale)]
    fn set_scale(this: &JsRig, scale: f64);

    #[wasm_bindgen(method, js_name = setParamFloat)]
    fn set_param_float(this: &JsRig, id: &str, value: f64);

    #[wasm_bindgen(method, js_name = setAutoBlink)]
    fn set_auto_blink(this: &JsRig, enabled: bool);

    #[wasm_bindgen(method, js_name = setMotionUpdate)]
    fn set_motion_update(this: &JsRig, hook: &js_sys::Function);

    #[wasm_bindgen(method, js_name = clearMotionUpdate)]
    fn clear_motion_update(this: &JsRig);

    /// The offscreen target the rig draws into plus the visible canvas.
    pub type JsSurface;

    #[wasm_bindgen(method, catch, js_name = renderRig)]
    fn render_rig(this: &JsSurface, rig: &JsRig) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn composite(this: &JsSurface) -> Result<(), JsValue>;
}

// --- Rig / surface adapters ---

struct ModelControls<'a>(&'a JsRig);

impl RigControls for ModelControls<'_> {
    fn set_param(&mut self, id: &str, value: f64) {
        self.0.set_param_float(id, value);
    }
}

/// A JS rig whose motion step is replaced by the tracked pose.
///
/// Each tick stages the pose; the model's next motion update replays it
/// through the installed hook.
pub struct WebRig {
    model: JsRig,
    staged: Rc<RefCell<StagedPose>>,
    motion_hook: Closure<dyn FnMut() -> bool>,
}

impl WebRig {
    fn new(model: JsRig) -> Self {
        let staged: Rc<RefCell<StagedPose>> = Rc::default();
        let target = model.clone();
        let pending = Rc::clone(&staged);
        let motion_hook = Closure::wrap(Box::new(move || {
            let Ok(pose) = pending.try_borrow() else {
                return false;
            };
            pose.replay(&mut ModelControls(&target));
            !pose.is_empty()
        }) as Box<dyn FnMut() -> bool>);
        Self { model, staged, motion_hook }
    }

    /// Give the motion step back to the model before the hook is dropped.
    fn release(&self) {
        self.model.clear_motion_update();
    }
}

impl RigControls for WebRig {
    fn set_param(&mut self, id: &str, value: f64) {
        self.model.set_param_float(id, value);
    }
}

impl Rig for WebRig {
    fn set_position(&mut self, x: f64, y: f64) {
        self.model.set_position(x, y);
    }

    fn set_scale(&mut self, scale: f64) {
        self.model.set_scale(scale);
    }

    fn set_auto_blink(&mut self, enabled: bool) {
        self.model.set_auto_blink(enabled);
    }

    fn suppress_idle_motion(&mut self) {
        self.model.set_motion_update(self.motion_hook.as_ref().unchecked_ref());
    }

    fn update(&mut self, pose: &mut dyn PoseProvider) -> bool {
        let mut staged = StagedPose::default();
        let posed = pose.apply(&mut staged);
        if posed {
            match self.staged.try_borrow_mut() {
                Ok(mut slot) => *slot = staged,
                Err(_) => log::debug!("pose not staged: motion hook running"),
            }
        }
        posed
    }
}

pub struct WebSurface(JsSurface);

impl Surface<WebRig> for WebSurface {
    fn draw(&mut self, rig: &WebRig) -> Result<(), SurfaceError> {
        self.0.render_rig(&rig.model).map_err(|e| SurfaceError(describe(&e)))
    }

    fn composite(&mut self) -> Result<(), SurfaceError> {
        self.0.composite().map_err(|e| SurfaceError(describe(&e)))
    }
}

type WebSession = Session<WebRig, WebSurface>;
type SharedSession = Rc<RefCell<WebSession>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Canvas size in CSS pixels, the space pointer offsets are reported in.
fn css_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
    layout_size((canvas.client_width(), canvas.client_height()), (canvas.width(), canvas.height()))
}

/// Prefer the laid-out size; fall back to the backing store for a canvas
/// that is not rendered yet.
fn layout_size(client: (i32, i32), backing: (u32, u32)) -> (f64, f64) {
    if client.0 > 0 && client.1 > 0 {
        (f64::from(client.0), f64::from(client.1))
    } else {
        (f64::from(backing.0), f64::from(backing.1))
    }
}

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

// --- Event listeners ---

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: &EventTarget,
        kind: &'static str,
        passive: bool,
        callback: Closure<dyn FnMut(Event)>,
    ) -> Result<Self, JsValue> {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self { target: target.clone(), kind, callback })
    }

    fn detach(&self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref())
        {
            log::warn!("failed to remove {} listener: {}", self.kind, describe(&e));
        }
    }
}

fn pointer_point(event: &Event) -> Option<Point> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Point::new(f64::from(mouse.offset_x()), f64::from(mouse.offset_y())))
}

fn wheel_delta(event: &Event) -> Option<WheelDelta> {
    let wheel = event.dyn_ref::<WheelEvent>()?;
    Some(WheelDelta { dx: wheel.delta_x(), dy: wheel.delta_y() })
}

/// Forward DOM events through `translate` into the session.
fn input_callback(session: &SharedSession, translate: fn(&Event) -> Option<InputEvent>) -> Closure<dyn FnMut(Event)> {
    let session = Rc::clone(session);
    Closure::wrap(Box::new(move |event: Event| {
        let Some(input) = translate(&event) else {
            return;
        };
        let Ok(mut session) = session.try_borrow_mut() else {
            log::debug!("input event dropped: session busy");
            return;
        };
        if session.on_input(&input).prevent_default {
            event.prevent_default();
        }
    }) as Box<dyn FnMut(Event)>)
}

fn attach_input(window: &Window, canvas: &HtmlCanvasElement, session: &SharedSession) -> Result<Vec<Listener>, JsValue> {
    Ok(vec![
        Listener::attach(
            canvas,
            "pointerdown",
            true,
            input_callback(session, |e| pointer_point(e).map(InputEvent::PointerDown)),
        )?,
        Listener::attach(
            canvas,
            "pointermove",
            true,
            input_callback(session, |e| pointer_point(e).map(InputEvent::PointerMove)),
        )?,
        // Release anywhere ends the drag.
        Listener::attach(window, "pointerup", true, input_callback(session, |_| Some(InputEvent::PointerUp)))?,
        // Non-passive so preventDefault stops page scroll.
        Listener::attach(canvas, "wheel", false, input_callback(session, |e| wheel_delta(e).map(InputEvent::Wheel)))?,
    ])
}

// --- Frame loop ---

struct FrameLoop {
    callback: FrameCallback,
    handle: Rc<Cell<Option<i32>>>,
}

fn request_frame(window: &Window, callback: &FrameCallback, handle: &Cell<Option<i32>>) -> Result<(), JsValue> {
    if let Some(cb) = callback.borrow().as_ref() {
        handle.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
    }
    Ok(())
}

/// Tick once per animation frame until the session halts.
fn start_frame_loop(window: &Window, session: &SharedSession) -> Result<FrameLoop, JsValue> {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let handle = Rc::new(Cell::new(None));

    let session_cb = Rc::clone(session);
    let callback_cb = Rc::clone(&callback);
    let handle_cb = Rc::clone(&handle);
    let window_cb = window.clone();
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        handle_cb.set(None);
        let status = match session_cb.try_borrow_mut() {
            Ok(mut session) => session.tick(),
            Err(_) => Ok(TickStatus::Drawn { posed: false }),
        };
        match status {
            Ok(TickStatus::Halted) => {
                log::info!("frame loop halted");
                return;
            }
            Ok(TickStatus::Drawn { .. }) => {}
            Err(e) => log::warn!("tick failed: {e}"),
        }
        if let Err(e) = request_frame(&window_cb, &callback_cb, &handle_cb) {
            log::error!("requestAnimationFrame failed: {}", describe(&e));
        }
    }) as Box<dyn FnMut(f64)>));

    request_frame(window, &callback, &handle)?;
    Ok(FrameLoop { callback, handle })
}

// --- Socket pump ---

fn notify_terminated(callback: Option<&js_sys::Function>, error: &SessionError) {
    let Some(callback) = callback else {
        return;
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&error.to_string())) {
        log::warn!("termination callback threw: {}", describe(&e));
    }
}

/// Feed socket messages into the session until the socket ends or `stop`
/// fires.
async fn pump_socket(
    session: SharedSession,
    mut ws: WebSocket,
    mut stop: oneshot::Receiver<()>,
    on_terminated: Option<js_sys::Function>,
) {
    loop {
        let next = match select(Box::pin(ws.next()), &mut stop).await {
            Either::Left((message, _)) => Some(message),
            Either::Right(_) => None,
        };
        let Some(next) = next else {
            if let Err(e) = ws.close(Some(1000), Some("stage stopped")) {
                log::warn!("socket close failed: {e}");
            }
            return;
        };
        let Ok(mut session) = session.try_borrow_mut() else {
            log::debug!("tracking message dropped: session busy");
            continue;
        };
        match next {
            Some(Ok(Message::Text(text))) => {
                session.on_message(&text);
            }
            Some(Ok(Message::Bytes(bytes))) => {
                session.on_binary_message(&bytes);
            }
            Some(Err(e)) => {
                let error = session.on_connection_lost(e.to_string());
                drop(session);
                notify_terminated(on_terminated.as_ref(), &error);
                return;
            }
            None => {
                let error = session.on_connection_lost("socket closed");
                drop(session);
                notify_terminated(on_terminated.as_ref(), &error);
                return;
            }
        }
    }
}

// --- Host handle ---

/// A running stage. Dropping it (or calling [`WebStage::stop`]) tears the
/// session down.
#[wasm_bindgen]
pub struct WebStage {
    session: SharedSession,
    window: Window,
    listeners: Vec<Listener>,
    frame: FrameLoop,
    socket_stop: Option<oneshot::Sender<()>>,
}

#[wasm_bindgen]
impl WebStage {
    /// Start a session on `canvas` fed from the tracking socket at `url`.
    ///
    /// `config_json` is an optional [`StageConfig`] document; omitted fields
    /// keep their defaults. `on_terminated` is called with the error message
    /// when the socket closes or fails.
    ///
    /// # Errors
    ///
    /// Fails if the rig is missing, the config is invalid, the socket cannot
    /// be opened, or listeners cannot be attached.
    pub fn start(
        canvas: HtmlCanvasElement,
        rig: JsRig,
        surface: JsSurface,
        url: String,
        config_json: Option<String>,
        on_terminated: Option<js_sys::Function>,
    ) -> Result<WebStage, JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("console logger already installed");
        }

        if rig.is_null() || rig.is_undefined() {
            return Err(js_error(SessionError::AssetLoad("no rig model supplied".to_owned())));
        }
        let config = match config_json.as_deref() {
            Some(text) => StageConfig::from_json(text).map_err(js_error)?,
            None => StageConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;

        let (width, height) = css_size(&canvas);
        let session: SharedSession =
            Rc::new(RefCell::new(Session::new(config, WebRig::new(rig), WebSurface(surface), width, height)));

        let ws = WebSocket::open(&url).map_err(js_error)?;
        let (socket_stop, stop_rx) = oneshot::channel();
        wasm_bindgen_futures::spawn_local(pump_socket(Rc::clone(&session), ws, stop_rx, on_terminated));
        log::info!("tracking socket opening: {url}");

        let listeners = attach_input(&window, &canvas, &session)?;
        let frame = start_frame_loop(&window, &session)?;

        Ok(WebStage { session, window, listeners, frame, socket_stop: Some(socket_stop) })
    }

    /// Close the socket, remove listeners, and cancel the pending frame.
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        match self.session.try_borrow_mut() {
            Ok(mut session) => {
                session.teardown();
                session.rig().release();
            }
            Err(_) => log::warn!("stop called while session busy"),
        }
        if let Some(stop) = self.socket_stop.take() {
            if stop.send(()).is_err() {
                log::debug!("socket pump already finished");
            }
        }
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        if let Some(id) = self.frame.handle.take() {
            if let Err(e) = self.window.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame failed: {}", describe(&e));
            }
        }
        self.frame.callback.borrow_mut().take();
    }

    #[wasm_bindgen(getter, js_name = isActive)]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.try_borrow().map_or(true, |s| s.is_active())
    }

    #[wasm_bindgen(getter)]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ticks(&self) -> f64 {
        self.session.try_borrow().map_or(0.0, |s| s.ticks() as f64)
    }
}

impl Drop for WebStage {
    fn drop(&mut self) {
        self.stop();
    }
}
