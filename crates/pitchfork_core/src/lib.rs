//! The `pitchfork_core` crate is the numeric engine behind the Pitchfork explorer for
//! dx/dt = r·x − x³ + h.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric type abstraction), `DynamicalSystem` (1-D flows), `Steppable` (Solvers).
//! - **Solvers**: the fixed-step classic RK4 stepper.
//! - **Integrator**: owns (t, x), advances one macro-tick per call with live parameters and optional noise.
//! - **Stability**: labels the cusp surface h = x³ − r·x over an (x, r) grid by its slope along x.
//! - **Equilibrium**: exact equilibria of the depressed cubic, classified by ∂f/∂x.
//! - **Phase**: the velocity curve shown next to the moving point.

pub mod equilibrium;
pub mod error;
pub mod integrator;
pub mod phase;
pub mod solvers;
pub mod stability;
pub mod system;
pub mod traits;

pub use error::{PitchforkError, Result};
pub use integrator::{Integrator, IntegratorSettings};
pub use stability::{EquilibriumSurface, GridSpec, StabilityLabel};
pub use system::{Parameters, SimulationState};
