// Pointer/keyboard state machine: hover preview, pan-drag, click-to-toggle,
// wheel zoom and the run-toggle key.
//
// Mode-specific listener subscriptions live inside the mode they belong to.
// Leaving a mode drops its value, and dropping a subscription deregisters
// it, so every exit path releases exactly what the entry path registered.

use crate::config::EngineConfig;
use crate::model::{CellStore, ScreenPoint};
use crate::state::Viewport;

/// Listeners the controller registers only while pan-drag is armed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanListener {
    /// Pointer-down on the surface while the pan modifier is held.
    Press,
    /// Pointer-move while dragging.
    Drag,
    /// Pointer-up ending the drag.
    Release,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Pointer,
    Move,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Pointer => "pointer",
            Cursor::Move => "move",
        }
    }
}

/// Listener registration capability of the input boundary.
pub trait InputHost {
    /// Dropping a subscription deregisters its listener.
    type Subscription;

    fn subscribe(&mut self, listener: PanListener) -> Self::Subscription;
    fn set_cursor(&mut self, cursor: Cursor);
}

/// Events delivered only through the pan subscriptions.
#[derive(Clone, Debug, PartialEq)]
pub enum PanEvent {
    Press(ScreenPoint),
    Move(ScreenPoint),
    Release,
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerMove { at: ScreenPoint, buttons: bool },
    PointerDown { at: ScreenPoint },
    PointerLeave,
    Click { at: ScreenPoint },
    Wheel { delta_y: f64 },
    KeyDown { code: String, repeat: bool },
    KeyUp { code: String },
    Pan(PanEvent),
    Resize { width: f64, height: f64 },
    /// Window lost focus; any held key is considered released.
    Blur,
}

/// Observable interaction mode.
#[cfg(test)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    Idle,
    Hover,
    Panning,
    KeyHeld(String),
}

/// Which layers need repainting after an event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Redraw {
    #[default]
    None,
    Cells,
    All,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub redraw: Redraw,
    /// The run-toggle key was pressed.
    pub toggle_run: bool,
}

impl Response {
    fn redraw(redraw: Redraw) -> Self {
        Self {
            redraw,
            ..Default::default()
        }
    }
}

#[derive(Debug)]
struct PanDrag<S> {
    anchor: ScreenPoint,
    /// Offset already applied for this drag, relative to the anchor.
    travelled: (f64, f64),
    _moves: S,
    _release: S,
}

#[derive(Debug)]
enum Mode<S> {
    Idle,
    /// Snapped, offset-free origin of the hovered cell.
    Hover(ScreenPoint),
    KeyHeld {
        code: String,
        /// Present when `code` is the pan modifier.
        press: Option<S>,
    },
    Panning {
        code: String,
        press: S,
        drag: PanDrag<S>,
    },
}

/// Pointer-down seen with no key held; a later click toggles only if it
/// stayed within the click slop.
#[derive(Clone, Copy, Debug)]
struct PendingPress {
    at: ScreenPoint,
    dragged: bool,
}

#[derive(Debug)]
pub struct InteractionController<S> {
    mode: Mode<S>,
    press: Option<PendingPress>,
    pan_modifier: String,
    run_toggle: String,
    wheel_divisor: f64,
    click_slop_px: f64,
}

impl<S> InteractionController<S> {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            mode: Mode::Idle,
            press: None,
            pan_modifier: config.pan_modifier.clone(),
            run_toggle: config.run_toggle.clone(),
            wheel_divisor: config.wheel_divisor,
            click_slop_px: config.click_slop_px,
        }
    }

    #[cfg(test)]
    pub fn mode(&self) -> InteractionMode {
        match &self.mode {
            Mode::Idle => InteractionMode::Idle,
            Mode::Hover(_) => InteractionMode::Hover,
            Mode::KeyHeld { code, .. } => InteractionMode::KeyHeld(code.clone()),
            Mode::Panning { .. } => InteractionMode::Panning,
        }
    }

    /// Origin of the hover preview cell, if one is showing. Offset is not
    /// applied, so the preview stays on its cell while panning.
    pub fn hover(&self) -> Option<ScreenPoint> {
        match self.mode {
            Mode::Hover(cell) => Some(cell),
            _ => None,
        }
    }

    /// Anchor and total travel of the current pan drag.
    #[cfg(test)]
    pub fn pan_drag(&self) -> Option<(ScreenPoint, (f64, f64))> {
        match &self.mode {
            Mode::Panning { drag, .. } => Some((drag.anchor, drag.travelled)),
            _ => None,
        }
    }

    fn key_held(&self) -> bool {
        matches!(self.mode, Mode::KeyHeld { .. } | Mode::Panning { .. })
    }

    pub fn handle<H>(
        &mut self,
        event: &InputEvent,
        host: &mut H,
        viewport: &mut Viewport,
        cells: &mut CellStore,
    ) -> Response
    where
        H: InputHost<Subscription = S>,
    {
        match event {
            InputEvent::PointerMove { at, buttons } => self.pointer_move(*at, *buttons, viewport),
            InputEvent::PointerDown { at } => {
                self.press = if self.key_held() {
                    None
                } else {
                    Some(PendingPress {
                        at: *at,
                        dragged: false,
                    })
                };
                Response::default()
            }
            InputEvent::PointerLeave => match self.mode {
                Mode::Hover(_) => {
                    self.mode = Mode::Idle;
                    Response::redraw(Redraw::Cells)
                }
                _ => Response::default(),
            },
            InputEvent::Click { at } => self.click(*at, viewport, cells),
            InputEvent::Wheel { delta_y } => {
                // The snapped origin is only valid for the old scale.
                if let Mode::Hover(_) = self.mode {
                    self.mode = Mode::Idle;
                }
                viewport.zoom(-delta_y / self.wheel_divisor);
                Response::redraw(Redraw::All)
            }
            InputEvent::KeyDown { code, repeat } => self.key_down(code, *repeat, host),
            InputEvent::KeyUp { code } => self.key_up(code, host),
            InputEvent::Pan(pan) => self.pan_event(pan, host, viewport),
            InputEvent::Blur => self.release(host),
            // Resizing belongs to the engine; nothing mode-related changes.
            InputEvent::Resize { .. } => Response::default(),
        }
    }

    fn pointer_move(&mut self, at: ScreenPoint, buttons: bool, viewport: &Viewport) -> Response {
        if let Some(press) = self.press.as_mut() {
            if press.at.distance_to(at) > self.click_slop_px {
                press.dragged = true;
            }
        }
        if buttons || self.key_held() {
            return Response::default();
        }
        let origin = viewport.snap_to_cell(at);
        if self.hover() == Some(origin) {
            return Response::default();
        }
        self.mode = Mode::Hover(origin);
        Response::redraw(Redraw::Cells)
    }

    fn click(&mut self, at: ScreenPoint, viewport: &Viewport, cells: &mut CellStore) -> Response {
        let press = self.press.take();
        if self.key_held() {
            return Response::default();
        }
        match press {
            Some(p) if !p.dragged && p.at.distance_to(at) <= self.click_slop_px => {
                cells.toggle(viewport.to_grid(at));
                Response::redraw(Redraw::Cells)
            }
            _ => Response::default(),
        }
    }

    fn key_down<H>(&mut self, code: &str, repeat: bool, host: &mut H) -> Response
    where
        H: InputHost<Subscription = S>,
    {
        if code == self.run_toggle {
            return Response {
                toggle_run: !repeat,
                ..Default::default()
            };
        }
        if repeat || self.key_held() {
            return Response::default();
        }
        let had_hover = self.hover().is_some();
        let press = if code == self.pan_modifier {
            host.set_cursor(Cursor::Move);
            Some(host.subscribe(PanListener::Press))
        } else {
            None
        };
        self.mode = Mode::KeyHeld {
            code: code.to_owned(),
            press,
        };
        self.press = None;
        Response::redraw(if had_hover { Redraw::Cells } else { Redraw::None })
    }

    fn key_up<H>(&mut self, code: &str, host: &mut H) -> Response
    where
        H: InputHost<Subscription = S>,
    {
        let held = match &self.mode {
            Mode::KeyHeld { code: held, .. } | Mode::Panning { code: held, .. } => held == code,
            _ => false,
        };
        if held {
            self.release(host)
        } else {
            Response::default()
        }
    }

    /// Back to Idle from any mode, dropping every mode subscription.
    fn release<H>(&mut self, host: &mut H) -> Response
    where
        H: InputHost<Subscription = S>,
    {
        let previous = std::mem::replace(&mut self.mode, Mode::Idle);
        self.press = None;
        match previous {
            Mode::KeyHeld { press: Some(_), .. } | Mode::Panning { .. } => {
                host.set_cursor(Cursor::Pointer);
                Response::default()
            }
            Mode::Hover(_) => Response::redraw(Redraw::Cells),
            Mode::KeyHeld { press: None, .. } | Mode::Idle => Response::default(),
        }
    }

    fn pan_event<H>(&mut self, event: &PanEvent, host: &mut H, viewport: &mut Viewport) -> Response
    where
        H: InputHost<Subscription = S>,
    {
        match (std::mem::replace(&mut self.mode, Mode::Idle), event) {
            (Mode::KeyHeld { code, press: Some(press) }, PanEvent::Press(at)) => {
                let drag = PanDrag {
                    anchor: *at,
                    travelled: (0.0, 0.0),
                    _moves: host.subscribe(PanListener::Drag),
                    _release: host.subscribe(PanListener::Release),
                };
                self.mode = Mode::Panning { code, press, drag };
                Response::default()
            }
            (Mode::Panning { code, press, mut drag }, PanEvent::Move(at)) => {
                // Signed distance from the anchor minus what was already
                // applied; correct on either side of the anchor, including
                // points left of or above the surface.
                let total = (at.x - drag.anchor.x, at.y - drag.anchor.y);
                let dx = total.0 - drag.travelled.0;
                let dy = total.1 - drag.travelled.1;
                drag.travelled = total;
                viewport.pan(dx, dy);
                self.mode = Mode::Panning { code, press, drag };
                Response::redraw(Redraw::All)
            }
            (Mode::Panning { code, press, .. }, PanEvent::Release) => {
                self.mode = Mode::KeyHeld {
                    code,
                    press: Some(press),
                };
                Response::default()
            }
            // Stale delivery from a listener that no longer applies.
            (mode, _) => {
                self.mode = mode;
                Response::default()
            }
        }
    }
}
