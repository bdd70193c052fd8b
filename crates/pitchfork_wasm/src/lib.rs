//! Browser bindings for the Pitchfork core: a live integrator driven by the page's
//! timer and one-shot diagram builders.

mod diagram;
mod integrator;

pub use diagram::{compute_stability_grid, default_stability_grid, equilibria, phase_line};
pub use integrator::{WasmIntegrator, WasmState};

use wasm_bindgen::prelude::*;

/// Runs when the module is instantiated, before any export is called.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

pub(crate) fn to_js_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}
