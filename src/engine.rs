//! Top-level coordinator. Owns the viewport, the cell store, the
//! interaction controller and the simulation clock, and turns their
//! outputs into redraws on the host's two layers.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::life;
use crate::model::{CellStore, GridCoord};
use crate::render::{self, Layer, StatusReadout, Surface};
use crate::state::{InputEvent, InputHost, InteractionController, Redraw, SimulationClock, Viewport};
use crate::util::clog;

/// Fraction of visible cells set alive by [`Engine::seed`].
pub const SEED_DENSITY: f64 = 0.25;

/// Largest seeded span per axis; wider visible ranges are seeded in a
/// centred square.
pub const SEED_MAX_SPAN: i64 = 128;

/// Everything the engine needs from its environment.
pub trait Host: InputHost {
    /// Periodic task handle; dropping it cancels the task before returning.
    type Ticker;
    type Layer: Surface;

    /// Begin calling [`Engine::tick`] every `period_ms`.
    fn start_ticker(&mut self, period_ms: u32) -> Self::Ticker;
    fn resize_layers(&mut self, width: f64, height: f64);
    fn layer(&mut self, layer: Layer) -> &mut Self::Layer;
    fn show_status(&mut self, status: &StatusReadout);
}

/// Requests coming from UI controls rather than raw input.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    ToggleRun,
    Step,
    Clear,
    ZoomBy(f64),
    PanBy { dx: f64, dy: f64 },
    ResetView,
}

pub struct Engine<H: Host> {
    host: H,
    viewport: Viewport,
    cells: CellStore,
    controller: InteractionController<H::Subscription>,
    clock: SimulationClock<H::Ticker>,
    generation: u64,
    frame: u64,
    initialized: bool,
}

impl<H: Host> Engine<H> {
    pub fn new(host: H, config: &EngineConfig) -> Self {
        Self {
            host,
            viewport: Viewport::from_config(config),
            cells: CellStore::new(),
            controller: InteractionController::new(config),
            clock: SimulationClock::new(config.tick_period_ms),
            generation: 0,
            frame: 0,
            initialized: false,
        }
    }

    /// Size the layers and paint the first frame. A second call fails.
    pub fn init(&mut self, width: f64, height: f64) -> Result<(), EngineError> {
        if self.initialized {
            return Err(EngineError::AlreadyInitialized);
        }
        self.initialized = true;
        self.resize(width, height);
        Ok(())
    }

    pub fn handle(&mut self, event: InputEvent) {
        if !self.initialized {
            return;
        }
        if let InputEvent::Resize { width, height } = event {
            self.resize(width, height);
            return;
        }
        let response =
            self.controller
                .handle(&event, &mut self.host, &mut self.viewport, &mut self.cells);
        if response.toggle_run {
            self.switch_clock();
        }
        // One redraw covers both the clock flip and the input's repaint.
        self.redraw(response.redraw);
    }

    pub fn apply(&mut self, command: Command) {
        if !self.initialized {
            return;
        }
        let redraw = match command {
            Command::ToggleRun => {
                self.switch_clock();
                Redraw::None
            }
            Command::Step => {
                self.step();
                return;
            }
            Command::Clear => {
                self.cells.replace_all(Default::default());
                self.generation = 0;
                Redraw::Cells
            }
            Command::ZoomBy(delta) => {
                self.viewport.zoom(delta);
                Redraw::All
            }
            Command::PanBy { dx, dy } => {
                self.viewport.pan(dx, dy);
                Redraw::All
            }
            Command::ResetView => {
                self.viewport.reset();
                Redraw::All
            }
        };
        self.redraw(redraw);
    }

    /// Replace the cells with a random soup covering the visible area, or
    /// its centred `SEED_MAX_SPAN` square when more cells are visible.
    pub fn seed(&mut self, random: impl FnMut() -> f64) {
        if !self.initialized {
            return;
        }
        let (first, last) = self.viewport.visible_cells();
        let (x0, x1) = centred_span(first.x, last.x, SEED_MAX_SPAN);
        let (y0, y1) = centred_span(first.y, last.y, SEED_MAX_SPAN);
        let (first, last) = (GridCoord::new(x0, y0), GridCoord::new(x1, y1));
        self.cells
            .replace_all(life::random_soup(first, last, SEED_DENSITY, random));
        self.generation = 0;
        self.redraw(Redraw::Cells);
    }

    /// Timer entry point. Returns whether a generation was computed; a tick
    /// arriving after `stop` changes nothing.
    pub fn tick(&mut self) -> bool {
        if !self.clock.is_running() {
            return false;
        }
        self.advance();
        self.redraw(Redraw::Cells);
        true
    }

    /// Start ticking. Returns false if already running. Callers redraw the
    /// status afterwards.
    pub fn start(&mut self) -> bool {
        let host = &mut self.host;
        let started = self.clock.start(|period| host.start_ticker(period));
        if started {
            clog(&format!("simulation started ({} ms)", self.clock.period_ms()));
        }
        started
    }

    /// Cancel the ticker. Returns false if not running.
    pub fn stop(&mut self) -> bool {
        let stopped = self.clock.stop();
        if stopped {
            clog(&format!("simulation paused at generation {}", self.generation));
        }
        stopped
    }

    fn switch_clock(&mut self) {
        if self.clock.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Advance exactly one generation, whether or not the clock runs.
    pub fn step(&mut self) {
        if !self.initialized {
            return;
        }
        self.advance();
        self.redraw(Redraw::Cells);
    }

    fn advance(&mut self) {
        life::step(&mut self.cells);
        self.generation += 1;
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.viewport.resize(width, height);
        self.host
            .resize_layers(self.viewport.width, self.viewport.height);
        self.redraw(Redraw::All);
    }

    /// Repaint the requested layers and refresh the status overlay.
    /// `Redraw::None` only refreshes the overlay.
    fn redraw(&mut self, redraw: Redraw) {
        if redraw == Redraw::All {
            render::draw_mesh(self.host.layer(Layer::Mesh), &self.viewport);
        }
        if redraw >= Redraw::Cells {
            let hover = self.controller.hover();
            render::draw_cells(
                self.host.layer(Layer::Cells),
                &self.viewport,
                &self.cells,
                hover,
            );
        }
        self.frame += 1;
        let status = self.status();
        self.host.show_status(&status);
    }

    pub fn status(&self) -> StatusReadout {
        StatusReadout {
            offset_x: self.viewport.offset_x,
            offset_y: self.viewport.offset_y,
            scale: self.viewport.scale(),
            running: self.clock.is_running(),
            generation: self.generation,
            population: self.cells.len(),
            frame: self.frame,
        }
    }
}

/// Inclusive `lo..=hi`, shrunk around its middle to at most `max` values.
fn centred_span(lo: i64, hi: i64, max: i64) -> (i64, i64) {
    let span = hi.saturating_sub(lo);
    if span < max {
        return (lo, hi);
    }
    let start = lo + span / 2 - max / 2;
    (start, start + max - 1)
}

#[cfg(test)]
impl<H: Host> Engine<H> {
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScreenPoint;
    use crate::state::{PanEvent, PanListener};
    use crate::testing::{DrawCall, FakeHost};

    fn engine() -> Engine<FakeHost> {
        let mut engine = Engine::new(FakeHost::default(), &EngineConfig::default());
        engine.init(800.0, 600.0).expect("first init");
        engine.host_mut().clear_recordings();
        engine
    }

    fn coords(cells: &CellStore) -> Vec<(i64, i64)> {
        let mut v: Vec<_> = cells.all().map(|c| (c.x, c.y)).collect();
        v.sort();
        v
    }

    fn click_cell(engine: &mut Engine<FakeHost>, x: i64, y: i64) {
        let at = ScreenPoint::new(x as f64 * 50.0 + 25.0, y as f64 * 50.0 + 25.0);
        engine.handle(InputEvent::PointerDown { at });
        engine.handle(InputEvent::Click { at });
    }

    fn key(engine: &mut Engine<FakeHost>, code: &str) {
        engine.handle(InputEvent::KeyDown {
            code: code.into(),
            repeat: false,
        });
        engine.handle(InputEvent::KeyUp { code: code.into() });
    }

    #[test]
    fn init_sizes_layers_and_paints_both() {
        let mut engine = Engine::new(FakeHost::default(), &EngineConfig::default());
        engine.init(640.0, 480.0).expect("init");
        let host = engine.host();
        assert_eq!(host.layer_size, Some((640.0, 480.0)));
        assert_eq!(host.mesh.clears(), 1);
        assert_eq!(host.cells.clears(), 1);
        assert!(host.mesh.line_count() > 0);
        assert_eq!(host.statuses.len(), 1);
    }

    #[test]
    fn second_init_fails_without_side_effects() {
        let mut engine = engine();
        assert_eq!(engine.init(10.0, 10.0), Err(EngineError::AlreadyInitialized));
        assert_eq!(engine.viewport().width, 800.0);
        assert_eq!(engine.host().mesh.clears(), 0);
    }

    #[test]
    fn events_before_init_are_ignored() {
        let mut engine = Engine::new(FakeHost::default(), &EngineConfig::default());
        engine.handle(InputEvent::Wheel { delta_y: -500.0 });
        engine.apply(Command::Step);
        assert_eq!(engine.viewport().scale(), 1.0);
        assert!(engine.host().statuses.is_empty());
    }

    #[test]
    fn blinker_from_clicks_and_ticks() {
        let mut engine = engine();
        for y in 0..3 {
            click_cell(&mut engine, 1, y);
        }
        key(&mut engine, "Space");
        assert!(engine.is_running());
        assert!(engine.tick());
        assert_eq!(coords(engine.cells()), vec![(0, 1), (1, 1), (2, 1)]);
        assert!(engine.tick());
        assert_eq!(coords(engine.cells()), vec![(1, 0), (1, 1), (1, 2)]);
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn tick_while_stopped_is_noop() {
        let mut engine = engine();
        click_cell(&mut engine, 5, 5);
        assert!(!engine.tick());
        assert_eq!(coords(engine.cells()), vec![(5, 5)]);
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut engine = engine();
        assert!(engine.start());
        assert!(!engine.start());
        assert_eq!(engine.host().scheduler.spawned(), 1);
        assert!(engine.stop());
        assert!(!engine.stop());
        assert!(!engine.is_running());
        assert_eq!(engine.host().scheduler.live(), 0);
    }

    #[test]
    fn stop_cancels_pending_tick() {
        let mut engine = engine();
        click_cell(&mut engine, 1, 0);
        click_cell(&mut engine, 1, 1);
        click_cell(&mut engine, 1, 2);
        let before = coords(engine.cells());

        engine.start();
        let fired = engine.host_mut().scheduler.advance_to(150);
        assert_eq!(fired, 0);
        engine.stop();
        for _ in 0..engine.host_mut().scheduler.advance_to(1_000) {
            engine.tick();
        }
        assert_eq!(coords(engine.cells()), before);
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn running_clock_fires_every_period() {
        let mut engine = engine();
        engine.start();
        assert_eq!(engine.host_mut().scheduler.advance_to(650), 3);
    }

    #[test]
    fn hover_and_toggle_repaint_cells_only() {
        let mut engine = engine();
        engine.handle(InputEvent::PointerMove {
            at: ScreenPoint::new(60.0, 60.0),
            buttons: false,
        });
        click_cell(&mut engine, 3, 3);
        let host = engine.host();
        assert_eq!(host.mesh.clears(), 0);
        assert_eq!(host.cells.clears(), 2);
        assert!(host.cells.calls.contains(&DrawCall::Rect {
            x: 50.0,
            y: 50.0,
            width: 50.0,
            height: 50.0,
            fill: render::HOVER_FILL.into(),
        }));
    }

    #[test]
    fn zoom_pan_and_resize_repaint_both_layers() {
        let mut engine = engine();
        engine.handle(InputEvent::Wheel { delta_y: 250.0 });
        engine.handle(InputEvent::KeyDown {
            code: "ShiftLeft".into(),
            repeat: false,
        });
        assert!(engine.host().input.is_live(PanListener::Press));
        engine.handle(InputEvent::Pan(PanEvent::Press(ScreenPoint::new(0.0, 0.0))));
        engine.handle(InputEvent::Pan(PanEvent::Move(ScreenPoint::new(10.0, 0.0))));
        engine.handle(InputEvent::Resize {
            width: 1024.0,
            height: 768.0,
        });
        let host = engine.host();
        assert_eq!(host.mesh.clears(), 3);
        assert_eq!(host.cells.clears(), 3);
        assert_eq!(host.layer_size, Some((1024.0, 768.0)));
        assert_eq!(engine.viewport().scale(), 0.95);
        assert_eq!(engine.viewport().offset_x, 10.0);
    }

    #[test]
    fn tick_repaints_cells_and_reports_status() {
        let mut engine = engine();
        click_cell(&mut engine, 0, 0);
        engine.start();
        engine.tick();
        let status = engine.host().statuses.last().cloned().expect("status shown");
        assert!(status.running);
        assert_eq!(status.generation, 1);
        assert_eq!(status.population, 0);
        assert_eq!(engine.host().mesh.clears(), 0);
    }

    #[test]
    fn status_frame_increases_each_redraw() {
        let mut engine = engine();
        engine.apply(Command::ZoomBy(0.1));
        engine.apply(Command::PanBy { dx: 5.0, dy: 5.0 });
        let frames: Vec<u64> = engine.host().statuses.iter().map(|s| s.frame).collect();
        assert!(frames.windows(2).all(|w| w[1] > w[0]));
        let last = engine.host().statuses.last().expect("status");
        assert_eq!((last.offset_x, last.offset_y, last.scale), (5.0, 5.0, 1.1));
    }

    #[test]
    fn commands_step_clear_and_reset() {
        let mut engine = engine();
        for y in 0..3 {
            click_cell(&mut engine, 1, y);
        }
        engine.apply(Command::Step);
        assert_eq!(coords(engine.cells()), vec![(0, 1), (1, 1), (2, 1)]);
        assert_eq!(engine.generation(), 1);
        engine.apply(Command::Clear);
        assert!(engine.cells().is_empty());
        assert_eq!(engine.generation(), 0);
        engine.apply(Command::PanBy { dx: 40.0, dy: -3.0 });
        engine.apply(Command::ZoomBy(-0.5));
        engine.apply(Command::ResetView);
        let v = engine.viewport();
        assert_eq!((v.offset_x, v.offset_y, v.scale()), (0.0, 0.0, 1.0));
    }

    #[test]
    fn toggle_run_command_matches_key() {
        let mut engine = engine();
        engine.apply(Command::ToggleRun);
        assert!(engine.is_running());
        key(&mut engine, "Space");
        assert!(!engine.is_running());
    }

    #[test]
    fn run_key_reports_status_once() {
        let mut engine = engine();
        engine.handle(InputEvent::KeyDown {
            code: "Space".into(),
            repeat: false,
        });
        assert_eq!(engine.host().statuses.len(), 1);
        assert!(engine.host().statuses[0].running);
        engine.apply(Command::ToggleRun);
        assert_eq!(engine.host().statuses.len(), 2);
        assert!(!engine.host().statuses[1].running);
    }

    #[test]
    fn seed_is_bounded_when_zoomed_out() {
        let mut engine = Engine::new(FakeHost::default(), &EngineConfig::default());
        engine.init(1920.0, 1080.0).expect("init");
        engine.apply(Command::ZoomBy(-5.0));
        assert_eq!(engine.viewport().scale(), 0.01);
        engine.seed(|| 0.0);
        let n = SEED_MAX_SPAN as usize;
        assert_eq!(engine.cells().len(), n * n);
        // half-pixel cells: visible columns 1..=3841 and rows 1..=2161
        assert!(
            engine
                .cells()
                .all()
                .all(|c| (1857..=1984).contains(&c.x) && (1017..=1144).contains(&c.y))
        );
    }

    #[test]
    fn centred_span_keeps_small_ranges() {
        assert_eq!(centred_span(-3, 10, 128), (-3, 10));
        assert_eq!(centred_span(0, 127, 128), (0, 127));
        assert_eq!(centred_span(0, 128, 128), (0, 127));
        assert_eq!(centred_span(-1000, 1000, 128), (-64, 63));
    }

    #[test]
    fn seed_fills_only_visible_cells() {
        let mut engine = engine();
        engine.seed(|| 0.0);
        // 800x600 at 50px: columns 0..=16, rows 0..=12
        assert_eq!(engine.cells().len(), 17 * 13);
        assert!(engine.cells().all().all(|c| (0..=16).contains(&c.x) && (0..=12).contains(&c.y)));
        engine.seed(|| 0.99);
        assert!(engine.cells().is_empty());
    }
}
