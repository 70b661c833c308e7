// Test doubles for the engine's host boundary.
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::engine::Host;
use crate::model::ScreenPoint;
use crate::render::{Layer, StatusReadout, Stroke, Surface};
use crate::state::{Cursor, InputHost, PanListener};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Clear {
        width: f64,
        height: f64,
    },
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        stroke: Stroke,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn clears(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Clear { .. }))
            .count()
    }

    pub fn line_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear_region(&mut self, _x: f64, _y: f64, width: f64, height: f64) {
        self.calls.push(DrawCall::Clear { width, height });
    }

    fn stroke_line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: &Stroke) {
        self.calls.push(DrawCall::Line {
            from,
            to,
            stroke: *stroke,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str) {
        self.calls.push(DrawCall::Rect {
            x,
            y,
            width,
            height,
            fill: fill.to_owned(),
        });
    }
}

type LiveCounts = Rc<RefCell<HashMap<PanListener, usize>>>;

/// Counts live subscriptions per listener kind.
#[derive(Debug, Default)]
pub struct FakeInput {
    live: LiveCounts,
    subscribed: usize,
    pub cursor: Option<Cursor>,
}

#[derive(Debug)]
pub struct FakeSubscription {
    listener: PanListener,
    live: LiveCounts,
}

impl Drop for FakeSubscription {
    fn drop(&mut self) {
        if let Some(count) = self.live.borrow_mut().get_mut(&self.listener) {
            *count -= 1;
        }
    }
}

impl FakeInput {
    pub fn is_live(&self, listener: PanListener) -> bool {
        self.live.borrow().get(&listener).copied().unwrap_or(0) > 0
    }

    pub fn live_total(&self) -> usize {
        self.live.borrow().values().sum()
    }

    pub fn subscribed_total(&self) -> usize {
        self.subscribed
    }
}

impl InputHost for FakeInput {
    type Subscription = FakeSubscription;

    fn subscribe(&mut self, listener: PanListener) -> FakeSubscription {
        *self.live.borrow_mut().entry(listener).or_insert(0) += 1;
        self.subscribed += 1;
        FakeSubscription {
            listener,
            live: self.live.clone(),
        }
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = Some(cursor);
    }
}

#[derive(Debug)]
struct TimerSlot {
    period: u64,
    next_due: u64,
    cancelled: bool,
}

/// Virtual-time interval scheduler.
#[derive(Debug, Default)]
pub struct FakeScheduler {
    now: u64,
    timers: Rc<RefCell<Vec<TimerSlot>>>,
}

#[derive(Debug)]
pub struct FakeTicker {
    index: usize,
    timers: Rc<RefCell<Vec<TimerSlot>>>,
}

impl Drop for FakeTicker {
    fn drop(&mut self) {
        self.timers.borrow_mut()[self.index].cancelled = true;
    }
}

impl FakeScheduler {
    pub fn spawn(&mut self, period_ms: u32) -> FakeTicker {
        let mut timers = self.timers.borrow_mut();
        timers.push(TimerSlot {
            period: period_ms as u64,
            next_due: self.now + period_ms as u64,
            cancelled: false,
        });
        FakeTicker {
            index: timers.len() - 1,
            timers: self.timers.clone(),
        }
    }

    /// Move the clock to `now_ms`; returns how many ticks fired on the way.
    pub fn advance_to(&mut self, now_ms: u64) -> usize {
        let mut fired = 0;
        for slot in self.timers.borrow_mut().iter_mut() {
            while !slot.cancelled && slot.next_due <= now_ms {
                fired += 1;
                slot.next_due += slot.period;
            }
        }
        self.now = now_ms;
        fired
    }

    pub fn spawned(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn live(&self) -> usize {
        self.timers.borrow().iter().filter(|t| !t.cancelled).count()
    }
}

#[derive(Debug, Default)]
pub struct FakeHost {
    pub input: FakeInput,
    pub scheduler: FakeScheduler,
    pub mesh: RecordingSurface,
    pub cells: RecordingSurface,
    pub layer_size: Option<(f64, f64)>,
    pub statuses: Vec<StatusReadout>,
}

impl FakeHost {
    pub fn clear_recordings(&mut self) {
        self.mesh.calls.clear();
        self.cells.calls.clear();
        self.statuses.clear();
    }
}

impl InputHost for FakeHost {
    type Subscription = FakeSubscription;

    fn subscribe(&mut self, listener: PanListener) -> FakeSubscription {
        self.input.subscribe(listener)
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.input.set_cursor(cursor);
    }
}

impl Host for FakeHost {
    type Ticker = FakeTicker;
    type Layer = RecordingSurface;

    fn start_ticker(&mut self, period_ms: u32) -> FakeTicker {
        self.scheduler.spawn(period_ms)
    }

    fn resize_layers(&mut self, width: f64, height: f64) {
        self.layer_size = Some((width, height));
    }

    fn layer(&mut self, layer: Layer) -> &mut RecordingSurface {
        match layer {
            Layer::Mesh => &mut self.mesh,
            Layer::Cells => &mut self.cells,
        }
    }

    fn show_status(&mut self, status: &StatusReadout) {
        self.statuses.push(status.clone());
    }
}
