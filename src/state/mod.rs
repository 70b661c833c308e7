pub mod clock;
pub mod interaction;
pub mod viewport;

pub use clock::SimulationClock;
#[cfg(test)]
pub use interaction::InteractionMode;
pub use interaction::{
    Cursor, InputEvent, InputHost, InteractionController, PanEvent, PanListener, Redraw,
};
pub use viewport::Viewport;
