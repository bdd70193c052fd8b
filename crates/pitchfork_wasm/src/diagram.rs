//! One-shot builders for the static bifurcation diagram and the phase-line overlay.

use crate::to_js_error;
use anyhow::{Context, Result};
use pitchfork_core::equilibrium::{self, Equilibrium};
use pitchfork_core::phase::{self, PhaseLine, PhaseLineSettings};
use pitchfork_core::stability::{default_surface, EquilibriumSurface, GridSpec, SurfaceMesh};
use pitchfork_core::Parameters;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

fn serialize<T: Serialize>(value: &T, what: &str) -> Result<JsValue, JsValue> {
    to_value(value)
        .map_err(|err| JsValue::from_str(&format!("Failed to serialize {what}: {err}")))
}

fn stability_mesh(spec: &GridSpec) -> Result<SurfaceMesh> {
    let surface = EquilibriumSurface::compute(spec).context("Stability grid failed")?;
    Ok(surface.mesh())
}

fn default_mesh() -> Result<SurfaceMesh> {
    let surface = default_surface().context("Default stability grid failed")?;
    Ok(surface.mesh())
}

fn sample_phase_line(params: Parameters, settings: &PhaseLineSettings) -> Result<PhaseLine> {
    phase::phase_line(params, settings).context("Phase line failed")
}

#[wasm_bindgen]
pub fn compute_stability_grid(
    r_min: f64,
    r_max: f64,
    x_min: f64,
    x_max: f64,
    step: f64,
) -> Result<JsValue, JsValue> {
    let spec = GridSpec {
        r_min,
        r_max,
        x_min,
        x_max,
        step,
    };
    let mesh = stability_mesh(&spec).map_err(to_js_error)?;
    serialize(&mesh, "stability grid")
}

#[wasm_bindgen]
pub fn default_stability_grid() -> Result<JsValue, JsValue> {
    let mesh = default_mesh().map_err(to_js_error)?;
    serialize(&mesh, "stability grid")
}

#[wasm_bindgen]
pub fn phase_line(r: f64, h: f64, min: f64, max: f64, samples: u32) -> Result<JsValue, JsValue> {
    let settings = PhaseLineSettings {
        min,
        max,
        samples: samples as usize,
    };
    let line = sample_phase_line(Parameters::new(r, h), &settings).map_err(to_js_error)?;
    serialize(&line, "phase line")
}

#[wasm_bindgen]
pub fn equilibria(r: f64, h: f64) -> Result<JsValue, JsValue> {
    let found: Vec<Equilibrium> = equilibrium::equilibria(Parameters::new(r, h));
    serialize(&found, "equilibria")
}
