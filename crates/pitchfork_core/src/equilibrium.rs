use crate::system::Parameters;
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const DEDUP_TOLERANCE: f64 = 1e-6;
const MARGINAL_TOLERANCE: f64 = 1e-6;
const POLISH_STEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    Stable,
    Unstable,
    /// Fold point: two branches meet and ∂f/∂x vanishes.
    Marginal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    pub x: f64,
    /// Linearization ∂f/∂x = r − 3x² at the equilibrium.
    pub eigenvalue: f64,
    pub classification: Classification,
}

/// Discriminant 4r³ − 27h² of x³ − r·x − h: positive for three distinct real roots,
/// negative for one, zero on the fold curve.
pub fn discriminant(params: Parameters) -> f64 {
    4.0 * params.r * params.r * params.r - 27.0 * params.h * params.h
}

/// Real equilibria of dx/dt = r·x − x³ + h, in ascending order.
///
/// Roots of the depressed cubic x³ − r·x − h are taken in closed form and refined with
/// a few Newton steps. Roots closer than the dedup tolerance collapse into one, so the
/// pitchfork point and its immediate neighbourhood report a single equilibrium. Unlike
/// the grid, the classification uses the sign of ∂f/∂x directly.
pub fn equilibria(params: Parameters) -> Vec<Equilibrium> {
    let mut roots: Vec<f64> = cubic_roots(params)
        .into_iter()
        .map(|x| polish_root(params, x))
        .collect();

    roots.sort_by(|a, b| a.total_cmp(b));
    roots.dedup_by(|a, b| (*a - *b).abs() <= DEDUP_TOLERANCE * (1.0 + a.abs().max(b.abs())));

    debug!(
        "found {} equilibria for r={} h={}",
        roots.len(),
        params.r,
        params.h
    );

    roots
        .into_iter()
        .map(|x| {
            let eigenvalue = params.rate_slope(x);
            Equilibrium {
                x,
                eigenvalue,
                classification: classify(eigenvalue, params.r),
            }
        })
        .collect()
}

/// Real roots of x³ − r·x − h, repeated roots listed once.
fn cubic_roots(params: Parameters) -> Vec<f64> {
    let Parameters { r, h } = params;
    let delta = discriminant(params);

    if delta > 0.0 {
        // Three real roots, r > 0.
        let scale = 2.0 * (r / 3.0).sqrt();
        let arg = (1.5 * h / r * (3.0 / r).sqrt()).clamp(-1.0, 1.0);
        let theta = arg.acos() / 3.0;
        return (0..3)
            .map(|k| scale * (theta - 2.0 * PI * k as f64 / 3.0).cos())
            .collect();
    }

    if delta == 0.0 {
        if r == 0.0 {
            return vec![0.0];
        }
        return vec![3.0 * h / r, -1.5 * h / r];
    }

    let x = if r > 0.0 {
        let arg = 1.5 * h.abs() / r * (3.0 / r).sqrt();
        2.0 * h.signum() * (r / 3.0).sqrt() * (arg.acosh() / 3.0).cosh()
    } else if r < 0.0 {
        let arg = 1.5 * h / r * (-3.0 / r).sqrt();
        -2.0 * (-r / 3.0).sqrt() * (arg.asinh() / 3.0).sinh()
    } else {
        h.cbrt()
    };
    // Vanishing |r| can overflow the hyperbolic form; x ≈ ∛h there.
    if x.is_finite() {
        vec![x]
    } else {
        vec![h.cbrt()]
    }
}

fn polish_root(params: Parameters, mut x: f64) -> f64 {
    for _ in 0..POLISH_STEPS {
        // g(x) = x³ − r·x − h = −f(x), g'(x) = −∂f/∂x
        let derivative = -params.rate_slope(x);
        if derivative.abs() <= f64::EPSILON {
            break;
        }
        x -= -params.rate(x) / derivative;
    }
    x
}

fn classify(eigenvalue: f64, r: f64) -> Classification {
    if eigenvalue.abs() <= MARGINAL_TOLERANCE * (1.0 + r.abs()) {
        Classification::Marginal
    } else if eigenvalue < 0.0 {
        Classification::Stable
    } else {
        Classification::Unstable
    }
}
