//! Draws the mesh and cell layers onto an abstract 2D surface.

use crate::model::{CellStore, ScreenPoint};
use crate::state::Viewport;

pub const AXIS_STROKE: Stroke = Stroke {
    width: 1.0,
    style: "rgba(100,255,0,1)",
};
pub const MAJOR_STROKE: Stroke = Stroke {
    width: 1.0,
    style: "rgba(0,0,0,0.3)",
};
pub const MINOR_STROKE: Stroke = Stroke {
    width: 1.0,
    style: "rgba(0,0,0,0.1)",
};
pub const CELL_FILL: &str = "black";
pub const HOVER_FILL: &str = "rgba(0,0,0,0.1)";

/// Every `MAJOR_EVERY`th grid line is drawn heavier.
const MAJOR_EVERY: i64 = 5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub width: f64,
    pub style: &'static str,
}

/// Immediate-mode drawing target.
pub trait Surface {
    fn clear_region(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn stroke_line(&mut self, from: ScreenPoint, to: ScreenPoint, stroke: &Stroke);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &str);
}

/// The two stacked canvases the engine paints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Mesh,
    Cells,
}

/// What the status overlay shows after each redraw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusReadout {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub running: bool,
    pub generation: u64,
    pub population: usize,
    /// Bumped on every redraw; the overlay is keyed on it.
    pub frame: u64,
}

fn stroke_for(index: i64) -> &'static Stroke {
    if index == 0 {
        &AXIS_STROKE
    } else if index % MAJOR_EVERY == 0 {
        &MAJOR_STROKE
    } else {
        &MINOR_STROKE
    }
}

/// Inclusive index range of lines whose position lies inside `0..=extent`,
/// widened by one line on each side.
fn line_range(offset: f64, extent: f64, size: f64) -> (i64, i64) {
    let first = (-offset / size).floor() as i64;
    let last = ((extent - offset) / size).ceil() as i64;
    (first.saturating_sub(1), last.saturating_add(1))
}

pub fn draw_mesh(surface: &mut dyn Surface, viewport: &Viewport) {
    let (w, h) = (viewport.width, viewport.height);
    surface.clear_region(0.0, 0.0, w, h);
    let size = viewport.cell_size();

    let (first, last) = line_range(viewport.offset_x, w, size);
    for xi in first..=last {
        let x = size * xi as f64 - 0.5 + viewport.offset_x;
        surface.stroke_line(ScreenPoint::new(x, 0.0), ScreenPoint::new(x, h), stroke_for(xi));
    }

    let (first, last) = line_range(viewport.offset_y, h, size);
    for yi in first..=last {
        let y = size * yi as f64 - 0.5 + viewport.offset_y;
        surface.stroke_line(ScreenPoint::new(0.0, y), ScreenPoint::new(w, y), stroke_for(yi));
    }
}

/// Alive cells, then the hover highlight on top. `hover` is a snapped cell
/// origin without the offset applied.
pub fn draw_cells(
    surface: &mut dyn Surface,
    viewport: &Viewport,
    cells: &CellStore,
    hover: Option<ScreenPoint>,
) {
    surface.clear_region(0.0, 0.0, viewport.width, viewport.height);
    let size = viewport.cell_size();
    for cell in cells.all() {
        let at = viewport.cell_on_screen(cell);
        surface.fill_rect(at.x, at.y, size, size, CELL_FILL);
    }
    if let Some(origin) = hover {
        surface.fill_rect(
            origin.x + viewport.offset_x,
            origin.y + viewport.offset_y,
            size,
            size,
            HOVER_FILL,
        );
    }
}
