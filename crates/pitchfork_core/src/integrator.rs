use crate::error::{PitchforkError, Result};
use crate::solvers::RK4;
use crate::system::{Parameters, SimulationState};
use crate::traits::Steppable;
use log::{debug, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Seed used when the caller does not supply one.
pub const DEFAULT_NOISE_SEED: u64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratorSettings {
    /// State restored by `reset`.
    pub initial: SimulationState,
    /// Length of one macro-tick.
    pub dt: f64,
    /// RK4 substeps per macro-tick.
    pub substeps: usize,
    /// Standard deviation of the per-tick Gaussian kick.
    pub noise_std: f64,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            initial: SimulationState::new(0.0, 0.0),
            dt: 0.05,
            substeps: 5,
            noise_std: 0.01,
        }
    }
}

impl IntegratorSettings {
    /// Checks the configured `dt` and substep count, as `Integrator::tick` would.
    pub fn validate(&self) -> Result<()> {
        check_step_config(self.dt, self.substeps)
    }
}

fn check_step_config(dt: f64, substeps: usize) -> Result<()> {
    // `!(dt > 0.0)` also rejects NaN.
    if !(dt > 0.0) || substeps < 1 {
        warn!("rejected step config dt={dt} substeps={substeps}");
        return Err(PitchforkError::InvalidStepConfig { dt, substeps });
    }
    Ok(())
}

/// Owns the live simulation state and advances it one macro-tick at a time.
///
/// Parameters are not stored: every call to [`Integrator::step`] receives the
/// current (r, h), so a slider move is seen by the very next substep.
#[derive(Debug, Clone)]
pub struct Integrator {
    settings: IntegratorSettings,
    state: SimulationState,
    solver: RK4<f64>,
    rng: StdRng,
}

impl Integrator {
    pub fn new(settings: IntegratorSettings) -> Self {
        Self::with_seed(settings, DEFAULT_NOISE_SEED)
    }

    pub fn with_seed(settings: IntegratorSettings, seed: u64) -> Self {
        Self {
            settings,
            state: settings.initial,
            solver: RK4::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn settings(&self) -> &IntegratorSettings {
        &self.settings
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Replaces the current state with the configured initial state.
    pub fn reset(&mut self) -> SimulationState {
        debug!(
            "reset integrator from t={} x={} to t={} x={}",
            self.state.t, self.state.x, self.settings.initial.t, self.settings.initial.x
        );
        self.state = self.settings.initial;
        self.state
    }

    /// Advances time by exactly `dt` using `substeps` RK4 steps of size `dt / substeps`.
    ///
    /// When `noise_active` is set, a single Gaussian draw is added to x after the
    /// substeps complete.
    pub fn step(
        &mut self,
        params: Parameters,
        noise_active: bool,
        substeps: usize,
        dt: f64,
    ) -> Result<SimulationState> {
        check_step_config(dt, substeps)?;

        let h = dt / substeps as f64;
        let mut t = self.state.t;
        let mut x = self.state.x;
        for _ in 0..substeps {
            self.solver.step(&params, &mut t, &mut x, h);
        }

        if noise_active {
            let kick: f64 = self.rng.sample(StandardNormal);
            x += self.settings.noise_std * kick;
        }

        self.state = SimulationState { t, x };
        trace!(
            "tick r={} h={} noise={} -> t={} x={}",
            params.r,
            params.h,
            noise_active,
            t,
            x
        );
        Ok(self.state)
    }

    /// One macro-tick with the configured `dt` and substep count.
    pub fn tick(&mut self, params: Parameters, noise_active: bool) -> Result<SimulationState> {
        let IntegratorSettings { dt, substeps, .. } = self.settings;
        self.step(params, noise_active, substeps, dt)
    }
}

impl Default for Integrator {
    fn default() -> Self {
        Self::new(IntegratorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{Integrator, IntegratorSettings};
    use crate::error::PitchforkError;
    use crate::system::{Parameters, SimulationState};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn starting_at(x: f64) -> Integrator {
        Integrator::new(IntegratorSettings {
            initial: SimulationState::new(0.0, x),
            ..IntegratorSettings::default()
        })
    }

    /// Closed form of dx/dt = r·x − x³ (a Bernoulli equation).
    fn bernoulli_solution(r: f64, x0: f64, t: f64) -> f64 {
        let growth = (r * t).exp();
        x0 * growth / (1.0 + x0 * x0 * (growth * growth - 1.0) / r).sqrt()
    }

    #[test]
    fn step_rejects_invalid_config() {
        init_logger();
        let mut integrator = starting_at(0.3);
        let params = Parameters::new(1.0, 0.0);
        for (dt, substeps) in [(0.0, 5), (-0.05, 5), (f64::NAN, 5), (0.05, 0)] {
            let err = integrator
                .step(params, false, substeps, dt)
                .expect_err("invalid config should fail");
            assert!(matches!(err, PitchforkError::InvalidStepConfig { .. }));
        }
        assert_eq!(integrator.state(), SimulationState::new(0.0, 0.3));
    }

    #[test]
    fn settings_validate_matches_step_rules() {
        assert!(IntegratorSettings::default().validate().is_ok());
        let zero_substeps = IntegratorSettings {
            substeps: 0,
            ..IntegratorSettings::default()
        };
        assert_eq!(
            zero_substeps.validate(),
            Err(PitchforkError::InvalidStepConfig {
                dt: 0.05,
                substeps: 0
            })
        );
        let negative_dt = IntegratorSettings {
            dt: -1.0,
            ..IntegratorSettings::default()
        };
        assert!(negative_dt.validate().is_err());
    }

    #[test]
    fn step_advances_time_by_exactly_dt() {
        let mut integrator = Integrator::default();
        let params = Parameters::new(2.0, 1.0);
        let state = integrator.step(params, false, 4, 0.5).expect("step");
        assert_eq!(state.t, 0.5);
        assert_eq!(integrator.state(), state);
        assert!(state.x > 0.0, "positive h should push x up");
    }

    #[test]
    fn trajectories_are_deterministic_without_noise() {
        let mut a = starting_at(0.2);
        let mut b = starting_at(0.2);
        let schedule = [(3.0, 0.0), (3.0, 1.5), (-2.0, 4.0), (7.5, -9.0)];
        for k in 0..200 {
            let (r, h) = schedule[k % schedule.len()];
            let sa = a.step(Parameters::new(r, h), false, 5, 0.05).expect("step");
            let sb = b.step(Parameters::new(r, h), false, 5, 0.05).expect("step");
            assert_eq!(sa.x.to_bits(), sb.x.to_bits());
            assert_eq!(sa.t.to_bits(), sb.t.to_bits());
        }
    }

    #[test]
    fn global_error_shrinks_at_fourth_order() {
        let (r, x0, horizon) = (1.0, 0.5, 1.0);
        let exact = bernoulli_solution(r, x0, horizon);
        let error_with = |substeps: usize| {
            let mut integrator = starting_at(x0);
            let state = integrator
                .step(Parameters::new(r, 0.0), false, substeps, horizon)
                .expect("step");
            (state.x - exact).abs()
        };
        let coarse = error_with(8);
        let fine = error_with(16);
        let ratio = coarse / fine;
        assert!(
            (13.0..19.0).contains(&ratio),
            "expected ~16x error reduction, got {ratio} ({coarse} -> {fine})"
        );
    }

    #[test]
    fn reset_restores_initial_state_exactly() {
        init_logger();
        let mut integrator = starting_at(0.01);
        for _ in 0..37 {
            integrator
                .step(Parameters::new(10.0, 3.0), true, 5, 0.05)
                .expect("step");
        }
        assert_ne!(integrator.state(), SimulationState::new(0.0, 0.01));
        let state = integrator.reset();
        assert_eq!(state, SimulationState::new(0.0, 0.01));
        assert_eq!(integrator.state(), state);
    }

    #[test]
    fn unstable_origin_grows_to_stable_branch() {
        let mut integrator = starting_at(0.01);
        let params = Parameters::new(10.0, 0.0);
        let mut previous = integrator.state().x.abs();
        for _ in 0..50 {
            let state = integrator.step(params, false, 5, 0.05).expect("step");
            assert!(
                state.x.abs() >= previous - 1e-12,
                "|x| shrank from {previous} to {}",
                state.x.abs()
            );
            previous = state.x.abs();
        }
        let state = integrator.state();
        assert!((state.t - 2.5).abs() < 1e-12);
        assert!(
            (state.x - 10.0f64.sqrt()).abs() < 1e-3,
            "x = {} did not saturate near sqrt(r)",
            state.x
        );
    }

    #[test]
    fn parameter_changes_apply_on_next_call() {
        let mut integrator = starting_at(1.0);
        let up = integrator.step(Parameters::new(0.0, 5.0), false, 5, 0.05).expect("step");
        let down = integrator
            .step(Parameters::new(0.0, -50.0), false, 5, 0.05)
            .expect("step");
        assert!(up.x > 1.0);
        assert!(down.x < up.x);
    }

    #[test]
    fn noise_is_one_gaussian_draw_per_tick() {
        let settings = IntegratorSettings::default();
        let mut integrator = Integrator::with_seed(settings, 7);
        let mut reference = StdRng::seed_from_u64(7);

        // The origin is a fixed point of r = h = 0, so only the kick moves x.
        let params = Parameters::new(0.0, 0.0);
        let first = integrator.step(params, true, 5, 0.05).expect("step");
        let draw: f64 = reference.sample(StandardNormal);
        assert_eq!(first.x, settings.noise_std * draw);
        assert!(first.x.abs() < 0.1);

        let quiet = integrator.step(params, false, 5, 0.05).expect("step");
        assert!(quiet.x.abs() <= first.x.abs());
    }

    #[test]
    fn tick_uses_configured_dt_and_substeps() {
        let mut by_tick = starting_at(0.4);
        let mut by_step = starting_at(0.4);
        let params = Parameters::new(-1.0, 0.25);
        let a = by_tick.tick(params, false).expect("tick");
        let b = by_step.step(params, false, 5, 0.05).expect("step");
        assert_eq!(a, b);
    }
}
