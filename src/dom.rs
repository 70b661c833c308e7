// Browser host: two stacked canvases inside the mount container, DOM
// listeners feeding the engine, and a gloo interval driving ticks.
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Interval;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    CanvasRenderingContext2d, Document, Event, HtmlCanvasElement, HtmlElement, KeyboardEvent,
    MouseEvent, WheelEvent, Window,
};
use yew::Callback;

use crate::config::EngineConfig;
use crate::engine::{Command, Engine, Host};
use crate::error::EngineError;
use crate::model::ScreenPoint;
use crate::render::{Layer, StatusReadout, Stroke, Surface};
use crate::state::{Cursor, InputEvent, InputHost, PanEvent, PanListener};
use crate::util::clog;

const CONFIG_STORAGE_KEY: &str = "gl_engine_config";

type SharedEngine = Rc<RefCell<Engine<DomHost>>>;

fn dom_err(err: JsValue) -> EngineError {
    EngineError::Dom(format!("{:?}", err))
}

/// Set one inline style property, logging instead of failing.
fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        clog(&format!("style {}={} not applied: {:?}", property, value, e));
    }
}

/// Engine configuration, with an optional JSON override from localStorage.
pub fn load_config() -> EngineConfig {
    let raw = web_sys::window()
        .and_then(|win| win.local_storage().ok().flatten())
        .and_then(|store| store.get_item(CONFIG_STORAGE_KEY).ok().flatten());
    match raw {
        Some(raw) => EngineConfig::from_json(&raw).unwrap_or_else(|e| {
            clog(&format!("ignoring stored config: {}", e));
            EngineConfig::default()
        }),
        None => EngineConfig::default(),
    }
}

pub struct CanvasLayer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasLayer {
    fn create(document: &Document, container: &HtmlElement) -> Result<Self, EngineError> {
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(dom_err)?
            .dyn_into()
            .map_err(|_| EngineError::Dom("created element is not a canvas".into()))?;
        let style = canvas.style();
        style.set_property("position", "absolute").map_err(dom_err)?;
        style.set_property("left", "0").map_err(dom_err)?;
        style.set_property("top", "0").map_err(dom_err)?;
        container.append_child(&canvas).map_err(dom_err)?;
        let ctx = canvas
            .get_context("2d")
            .map_err(dom_err)?
            .ok_or_else(|| EngineError::Dom("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EngineError::Dom("context is not 2d".into()))?;
        Ok(Self { canvas, ctx })
    }

    fn set_size(&self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }
}

impl Drop for CanvasLayer {
    fn drop(&mut self) {
        self.canvas.remove();
    }
}

impl Surface for CanvasLayer {
    fn clear_region(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn stroke_line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: &Stroke) {
        self.ctx.begin_path();
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_stroke_style_str(stroke.style);
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        self.ctx.set_fill_style_str(fill);
        self.ctx.fill_rect(x, y, width, height);
    }
}

pub struct DomHost {
    engine: Weak<RefCell<Engine<DomHost>>>,
    window: Window,
    container: HtmlElement,
    mesh: CanvasLayer,
    cells: CanvasLayer,
    on_status: Callback<StatusReadout>,
}

/// Pointer position relative to the container's top-left corner. Negative
/// when the pointer is left of or above it.
fn pointer_position(event: &Event, container: &HtmlElement) -> Option<ScreenPoint> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    let rect = container.get_bounding_client_rect();
    Some(ScreenPoint::new(
        mouse.client_x() as f64 - rect.left(),
        mouse.client_y() as f64 - rect.top(),
    ))
}

fn dispatch(engine: &Weak<RefCell<Engine<DomHost>>>, event: InputEvent) {
    if let Some(engine) = engine.upgrade() {
        if let Ok(mut engine) = engine.try_borrow_mut() {
            engine.handle(event);
        }
    }
}

impl InputHost for DomHost {
    type Subscription = EventListener;

    fn subscribe(&mut self, listener: PanListener) -> EventListener {
        let engine = self.engine.clone();
        let container = self.container.clone();
        match listener {
            PanListener::Press => EventListener::new(&self.container, "mousedown", move |e| {
                if let Some(at) = pointer_position(e, &container) {
                    dispatch(&engine, InputEvent::Pan(PanEvent::Press(at)));
                }
            }),
            // Drag and release are tracked on the window so the drag keeps
            // going when the pointer leaves the container.
            PanListener::Drag => EventListener::new(&self.window, "mousemove", move |e| {
                if let Some(at) = pointer_position(e, &container) {
                    dispatch(&engine, InputEvent::Pan(PanEvent::Move(at)));
                }
            }),
            PanListener::Release => EventListener::new(&self.window, "mouseup", move |_e| {
                dispatch(&engine, InputEvent::Pan(PanEvent::Release));
            }),
        }
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        set_style(&self.container, "cursor", cursor.css());
    }
}

impl Host for DomHost {
    type Ticker = Interval;
    type Layer = CanvasLayer;

    fn start_ticker(&mut self, period_ms: u32) -> Interval {
        let engine = self.engine.clone();
        Interval::new(period_ms, move || {
            if let Some(engine) = engine.upgrade() {
                if let Ok(mut engine) = engine.try_borrow_mut() {
                    engine.tick();
                }
            }
        })
    }

    fn resize_layers(&mut self, width: f64, height: f64) {
        self.mesh.set_size(width, height);
        self.cells.set_size(width, height);
    }

    fn layer(&mut self, layer: Layer) -> &mut CanvasLayer {
        match layer {
            Layer::Mesh => &mut self.mesh,
            Layer::Cells => &mut self.cells,
        }
    }

    fn show_status(&mut self, status: &StatusReadout) {
        self.on_status.emit(status.clone());
    }
}

/// Listeners that live as long as the mount: pointer and wheel on the
/// container, keyboard, resize and blur on the window.
fn base_listeners(
    engine: &SharedEngine,
    window: &Window,
    container: &HtmlElement,
    run_toggle: String,
) -> Vec<EventListener> {
    let weak = Rc::downgrade(engine);
    let mut listeners = Vec::new();

    {
        let engine = weak.clone();
        let c = container.clone();
        listeners.push(EventListener::new(container, "mousemove", move |e| {
            let buttons = e.dyn_ref::<MouseEvent>().map(|m| m.buttons() != 0).unwrap_or(false);
            if let Some(at) = pointer_position(e, &c) {
                dispatch(&engine, InputEvent::PointerMove { at, buttons });
            }
        }));
    }
    {
        let engine = weak.clone();
        let c = container.clone();
        listeners.push(EventListener::new(container, "mousedown", move |e| {
            if let Some(at) = pointer_position(e, &c) {
                dispatch(&engine, InputEvent::PointerDown { at });
            }
        }));
    }
    {
        let engine = weak.clone();
        listeners.push(EventListener::new(container, "mouseleave", move |_e| {
            dispatch(&engine, InputEvent::PointerLeave);
        }));
    }
    {
        let engine = weak.clone();
        let c = container.clone();
        listeners.push(EventListener::new(container, "click", move |e| {
            if let Some(at) = pointer_position(e, &c) {
                dispatch(&engine, InputEvent::Click { at });
            }
        }));
    }
    {
        let engine = weak.clone();
        let options = EventListenerOptions::enable_prevent_default();
        listeners.push(EventListener::new_with_options(
            container,
            "wheel",
            options,
            move |e| {
                if let Some(wheel) = e.dyn_ref::<WheelEvent>() {
                    e.prevent_default();
                    dispatch(&engine, InputEvent::Wheel { delta_y: wheel.delta_y() });
                }
            },
        ));
    }
    {
        let engine = weak.clone();
        let options = EventListenerOptions::enable_prevent_default();
        listeners.push(EventListener::new_with_options(
            window,
            "keydown",
            options,
            move |e| {
                if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
                    let code = key.code();
                    if code == run_toggle {
                        e.prevent_default();
                    }
                    dispatch(&engine, InputEvent::KeyDown { code, repeat: key.repeat() });
                }
            },
        ));
    }
    {
        let engine = weak.clone();
        listeners.push(EventListener::new(window, "keyup", move |e| {
            if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
                dispatch(&engine, InputEvent::KeyUp { code: key.code() });
            }
        }));
    }
    {
        let engine = weak.clone();
        let c = container.clone();
        listeners.push(EventListener::new(window, "resize", move |_e| {
            let rect = c.get_bounding_client_rect();
            dispatch(
                &engine,
                InputEvent::Resize {
                    width: rect.width(),
                    height: rect.height(),
                },
            );
        }));
    }
    {
        let engine = weak;
        listeners.push(EventListener::new(window, "blur", move |_e| {
            dispatch(&engine, InputEvent::Blur);
        }));
    }
    listeners
}

struct Mounted {
    // Listeners go first so none can fire into a half-dropped engine.
    _listeners: Vec<EventListener>,
    engine: SharedEngine,
}

/// Mount handle owned by the grid view. Dropping it removes every listener,
/// cancels the simulation ticker and detaches the canvases.
pub struct GridEngine {
    config: EngineConfig,
    on_status: Callback<StatusReadout>,
    mounted: Option<Mounted>,
}

impl GridEngine {
    pub fn new(config: EngineConfig, on_status: Callback<StatusReadout>) -> Self {
        Self {
            config,
            on_status,
            mounted: None,
        }
    }

    /// Attach to `container`. Fails with `AlreadyInitialized` on a second
    /// call, before anything is created or registered.
    pub fn init(&mut self, container: &HtmlElement) -> Result<(), EngineError> {
        if self.mounted.is_some() {
            return Err(EngineError::AlreadyInitialized);
        }
        let window = web_sys::window().ok_or_else(|| EngineError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| EngineError::Dom("no document".into()))?;
        let mesh = CanvasLayer::create(&document, container)?;
        let cells = CanvasLayer::create(&document, container)?;
        set_style(container, "position", "relative");
        set_style(container, "cursor", Cursor::Pointer.css());

        let config = self.config.clone();
        let on_status = self.on_status.clone();
        let host_window = window.clone();
        let host_container = container.clone();
        let engine: SharedEngine = Rc::new_cyclic(|weak| {
            let host = DomHost {
                engine: weak.clone(),
                window: host_window,
                container: host_container,
                mesh,
                cells,
                on_status,
            };
            RefCell::new(Engine::new(host, &config))
        });

        let rect = container.get_bounding_client_rect();
        engine.borrow_mut().init(rect.width(), rect.height())?;
        let listeners = base_listeners(&engine, &window, container, self.config.run_toggle.clone());
        clog(&format!(
            "grid engine mounted ({}x{})",
            rect.width(),
            rect.height()
        ));
        self.mounted = Some(Mounted {
            _listeners: listeners,
            engine,
        });
        Ok(())
    }

    pub fn command(&self, command: Command) {
        if let Some(mounted) = &self.mounted {
            if let Ok(mut engine) = mounted.engine.try_borrow_mut() {
                engine.apply(command);
            }
        }
    }

    pub fn seed(&self) {
        if let Some(mounted) = &self.mounted {
            if let Ok(mut engine) = mounted.engine.try_borrow_mut() {
                engine.seed(js_sys::Math::random);
            }
        }
    }
}
