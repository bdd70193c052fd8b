//! Live integrator handle for the page's tick loop.

use crate::to_js_error;
use anyhow::{Context, Result};
use pitchfork_core::{Integrator, IntegratorSettings, Parameters, SimulationState};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WasmState {
    pub t: f64,
    pub x: f64,
}

impl From<SimulationState> for WasmState {
    fn from(state: SimulationState) -> Self {
        Self {
            t: state.t,
            x: state.x,
        }
    }
}

#[wasm_bindgen]
pub struct WasmIntegrator {
    inner: Integrator,
}

#[wasm_bindgen]
impl WasmIntegrator {
    /// Integrator with noise seeded from `Math.random`.
    #[wasm_bindgen(constructor)]
    pub fn new(dt: f64, substeps: u32, noise_std: f64) -> Result<WasmIntegrator, JsValue> {
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        Self::with_seed(dt, substeps, noise_std, seed)
    }

    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(
        dt: f64,
        substeps: u32,
        noise_std: f64,
        seed: u64,
    ) -> Result<WasmIntegrator, JsValue> {
        let inner = build_integrator(dt, substeps, noise_std, seed).map_err(to_js_error)?;
        Ok(WasmIntegrator { inner })
    }

    pub fn step(
        &mut self,
        r: f64,
        h: f64,
        noise_active: bool,
        dt: f64,
        substeps: u32,
    ) -> Result<WasmState, JsValue> {
        self.try_step(r, h, noise_active, dt, substeps)
            .map(WasmState::from)
            .map_err(to_js_error)
    }

    /// One tick with the `dt` and substep count given at construction.
    pub fn tick(&mut self, r: f64, h: f64, noise_active: bool) -> Result<WasmState, JsValue> {
        self.try_tick(r, h, noise_active)
            .map(WasmState::from)
            .map_err(to_js_error)
    }

    pub fn reset(&mut self) -> WasmState {
        self.inner.reset().into()
    }

    pub fn get_t(&self) -> f64 {
        self.inner.state().t
    }

    pub fn get_x(&self) -> f64 {
        self.inner.state().x
    }
}

fn build_integrator(dt: f64, substeps: u32, noise_std: f64, seed: u64) -> Result<Integrator> {
    let settings = IntegratorSettings {
        dt,
        substeps: substeps as usize,
        noise_std,
        ..IntegratorSettings::default()
    };
    settings
        .validate()
        .context("Invalid integrator settings")?;
    Ok(Integrator::with_seed(settings, seed))
}

impl WasmIntegrator {
    fn try_step(
        &mut self,
        r: f64,
        h: f64,
        noise_active: bool,
        dt: f64,
        substeps: u32,
    ) -> Result<SimulationState> {
        self.inner
            .step(Parameters::new(r, h), noise_active, substeps as usize, dt)
            .context("Integrator step failed")
    }

    fn try_tick(&mut self, r: f64, h: f64, noise_active: bool) -> Result<SimulationState> {
        self.inner
            .tick(Parameters::new(r, h), noise_active)
            .context("Integrator tick failed")
    }
}
