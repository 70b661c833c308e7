// Small helpers shared across the engine and the views.

/// Console log. Compiled out on native targets so unit tests can exercise
/// code paths that log.
pub fn clog(msg: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = msg;
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Lattice step for pixel deltas: 2^-20 px, well below the 1e-6 px pick
/// tolerance of the viewport.
pub const PX_LATTICE: f64 = 1.0 / 1_048_576.0;

/// Snap a pixel delta onto the `PX_LATTICE` grid. Sums of lattice values
/// below 2^33 px are exact in f64, so a pan followed by its inverse lands on
/// the same offset.
pub fn quantize_px(delta: f64) -> f64 {
    (delta / PX_LATTICE).round() * PX_LATTICE
}
