// Viewport state and the screen <-> grid transforms it parameterises.
use crate::config::{DEFAULT_CELL_PITCH, DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE, EngineConfig};
use crate::model::{GridCoord, ScreenPoint};
use crate::util::{quantize_px, round_to};

/// Absorbs float error from `(a + offset) - offset` when mapping a cell
/// origin back to its cell.
const PIXEL_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub offset_x: f64,
    pub offset_y: f64,
    scale: f64,
    cell_pitch: f64,
    min_scale: f64,
    max_scale: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_PITCH, DEFAULT_MIN_SCALE, DEFAULT_MAX_SCALE)
    }
}

impl Viewport {
    pub fn new(cell_pitch: f64, min_scale: f64, max_scale: f64) -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0f64.clamp(min_scale, max_scale),
            cell_pitch,
            min_scale,
            max_scale,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.cell_pitch, config.min_scale, config.max_scale)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Effective cell size in pixels.
    pub fn cell_size(&self) -> f64 {
        self.cell_pitch * self.scale
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Translate the grid. The offset is unbounded.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        if !(dx.is_finite() && dy.is_finite()) {
            return;
        }
        self.offset_x += quantize_px(dx);
        self.offset_y += quantize_px(dy);
    }

    /// Step the scale by `delta`, rounded to 3 places and clamped. Callers
    /// redraw everything afterwards.
    pub fn zoom(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.scale = round_to(self.scale + delta, 3).clamp(self.min_scale, self.max_scale);
    }

    pub fn reset(&mut self) {
        self.offset_x = 0.0;
        self.offset_y = 0.0;
        self.scale = 1.0f64.clamp(self.min_scale, self.max_scale);
    }

    /// Cell under a screen point. Inverse of the floored layout used by
    /// [`Viewport::to_screen_origin`]: returns the largest cell whose
    /// origin is at or before the point on each axis.
    pub fn to_grid(&self, p: ScreenPoint) -> GridCoord {
        let size = self.cell_size();
        GridCoord {
            x: axis_to_grid(p.x - self.offset_x, size),
            y: axis_to_grid(p.y - self.offset_y, size),
        }
    }

    /// Pixel-aligned top-left corner of a cell, offset not applied.
    pub fn to_screen_origin(&self, g: GridCoord) -> ScreenPoint {
        let size = self.cell_size();
        ScreenPoint {
            x: axis_origin(g.x, size),
            y: axis_origin(g.y, size),
        }
    }

    /// Origin of the cell under `p`, used for the hover highlight.
    pub fn snap_to_cell(&self, p: ScreenPoint) -> ScreenPoint {
        self.to_screen_origin(self.to_grid(p))
    }

    /// Where a cell lands on the surface once the offset is applied.
    pub fn cell_on_screen(&self, g: GridCoord) -> ScreenPoint {
        let origin = self.to_screen_origin(g);
        ScreenPoint {
            x: origin.x + self.offset_x,
            y: origin.y + self.offset_y,
        }
    }

    /// Grid cells that intersect the visible extent.
    pub fn visible_cells(&self) -> (GridCoord, GridCoord) {
        let first = self.to_grid(ScreenPoint::new(0.0, 0.0));
        let last = self.to_grid(ScreenPoint::new(self.width, self.height));
        (first, last)
    }
}

fn axis_origin(index: i64, size: f64) -> f64 {
    (index as f64 * size).floor()
}

fn axis_to_grid(local: f64, size: f64) -> i64 {
    let target = local + PIXEL_EPSILON;
    let mut index = (local / size).floor() as i64;
    while index > i64::MIN && axis_origin(index, size) > target {
        index -= 1;
    }
    while index < i64::MAX && axis_origin(index + 1, size) <= target {
        index += 1;
    }
    index
}
