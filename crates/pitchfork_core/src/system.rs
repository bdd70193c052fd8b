use crate::traits::DynamicalSystem;
use serde::{Deserialize, Serialize};

/// Control parameters of the normal form dx/dt = r·x − x³ + h.
///
/// Passed by value on every step so that live changes take effect on the very next
/// substep.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Parameters {
    pub r: f64,
    pub h: f64,
}

impl Parameters {
    pub fn new(r: f64, h: f64) -> Self {
        Self { r, h }
    }

    /// f(x; r, h) = r·x − x³ + h
    pub fn rate(&self, x: f64) -> f64 {
        self.r * x - x * x * x + self.h
    }

    /// ∂f/∂x = r − 3x²
    pub fn rate_slope(&self, x: f64) -> f64 {
        self.r - 3.0 * x * x
    }
}

impl DynamicalSystem<f64> for Parameters {
    fn apply(&self, _t: f64, x: f64) -> f64 {
        self.rate(x)
    }
}

/// Position and time of the running simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationState {
    pub t: f64,
    pub x: f64,
}

impl SimulationState {
    pub fn new(t: f64, x: f64) -> Self {
        Self { t, x }
    }
}

#[cfg(test)]
mod tests {
    use super::Parameters;
    use crate::traits::DynamicalSystem;

    #[test]
    fn rate_is_time_invariant() {
        let params = Parameters::new(2.0, 1.0);
        assert_eq!(params.apply(0.0, 1.5), params.apply(123.0, 1.5));
        assert_eq!(params.rate(1.5), 2.0 * 1.5 - 1.5f64.powi(3) + 1.0);
    }

    #[test]
    fn rate_slope_matches_finite_difference() {
        let params = Parameters::new(-3.0, 0.5);
        let x = 0.7;
        let eps = 1e-6;
        let numeric = (params.rate(x + eps) - params.rate(x - eps)) / (2.0 * eps);
        assert!((numeric - params.rate_slope(x)).abs() < 1e-6);
    }
}
