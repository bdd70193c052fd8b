//! Stability diagram of the cusp surface h(x, r) = x³ − r·x.
//!
//! Every lattice cell gets a label from the sign of ∂h/∂x along x at fixed r.
//! Equilibria of dx/dt = r·x − x³ + h sit where h(x, r) equals the forcing, and they
//! are stable where the surface rises with x. Labels are resolution-limited: the
//! boundary between them is only accurate to about one `step`.

use crate::error::{PitchforkError, Result};
use log::debug;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub r_min: f64,
    pub r_max: f64,
    /// The x axis doubles as the h axis of the rendered diagram.
    pub x_min: f64,
    pub x_max: f64,
    pub step: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            r_min: -10.0,
            r_max: 10.0,
            x_min: -10.0,
            x_max: 10.0,
            step: 0.05,
        }
    }
}

impl GridSpec {
    pub fn x_samples(&self) -> usize {
        arange_len(self.x_min, self.x_max, self.step)
    }

    pub fn r_samples(&self) -> usize {
        arange_len(self.r_min, self.r_max, self.step)
    }
}

/// Number of samples `min + i·step` strictly below `max`.
fn arange_len(min: f64, max: f64, step: f64) -> usize {
    if !(min.is_finite() && max.is_finite() && step.is_finite()) || step <= 0.0 {
        return 0;
    }
    let raw = (max - min) / step;
    if raw <= 0.0 {
        return 0;
    }
    // Absorb rounding so 20 / 0.05 yields 400 samples, not 401.
    (raw - 1e-9 * raw.max(1.0)).ceil() as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StabilityLabel {
    Unstable,
    Stable,
}

impl StabilityLabel {
    pub fn from_slope(slope: f64) -> Self {
        if slope < 0.0 {
            StabilityLabel::Unstable
        } else {
            StabilityLabel::Stable
        }
    }

    /// Colour index used by the diagram: 0 for unstable, 1 for stable.
    pub fn as_index(self) -> u8 {
        match self {
            StabilityLabel::Unstable => 0,
            StabilityLabel::Stable => 1,
        }
    }
}

/// Midpoint between two x-adjacent cells whose labels differ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub x: f64,
    pub r: f64,
}

/// Row-per-r arrays in the orientation the diagram is drawn: r across, h up, x deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub r: Vec<Vec<f64>>,
    pub h: Vec<Vec<f64>>,
    pub x: Vec<Vec<f64>>,
    pub stability: Vec<Vec<u8>>,
}

/// Surface heights, slopes and labels over the (x, r) lattice.
///
/// Matrices have one row per r sample and one column per x sample. Immutable once
/// computed.
#[derive(Debug, Clone, PartialEq)]
pub struct EquilibriumSurface {
    spec: GridSpec,
    x_values: Vec<f64>,
    r_values: Vec<f64>,
    heights: DMatrix<f64>,
    slopes: DMatrix<f64>,
    labels: DMatrix<StabilityLabel>,
}

impl EquilibriumSurface {
    pub fn compute(spec: &GridSpec) -> Result<Self> {
        let nx = spec.x_samples();
        let nr = spec.r_samples();
        if nx < 2 || nr < 1 {
            return Err(PitchforkError::DegenerateGrid {
                x_samples: nx,
                r_samples: nr,
            });
        }

        let x_values: Vec<f64> = (0..nx).map(|i| spec.x_min + spec.step * i as f64).collect();
        let r_values: Vec<f64> = (0..nr).map(|j| spec.r_min + spec.step * j as f64).collect();

        let heights = DMatrix::from_fn(nr, nx, |j, i| {
            let x = x_values[i];
            x * x * x - r_values[j] * x
        });

        let step = spec.step;
        let slopes = DMatrix::from_fn(nr, nx, |j, i| {
            if i == 0 {
                (heights[(j, 1)] - heights[(j, 0)]) / step
            } else if i == nx - 1 {
                (heights[(j, nx - 1)] - heights[(j, nx - 2)]) / step
            } else {
                (heights[(j, i + 1)] - heights[(j, i - 1)]) / (2.0 * step)
            }
        });

        let labels = slopes.map(StabilityLabel::from_slope);

        debug!("computed stability grid: {nr} r samples x {nx} x samples (step {step})");

        Ok(Self {
            spec: *spec,
            x_values,
            r_values,
            heights,
            slopes,
            labels,
        })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// (x samples, r samples)
    pub fn dims(&self) -> (usize, usize) {
        (self.x_values.len(), self.r_values.len())
    }

    pub fn x_values(&self) -> &[f64] {
        &self.x_values
    }

    pub fn r_values(&self) -> &[f64] {
        &self.r_values
    }

    pub fn heights(&self) -> &DMatrix<f64> {
        &self.heights
    }

    pub fn labels(&self) -> &DMatrix<StabilityLabel> {
        &self.labels
    }

    pub fn height(&self, ix: usize, jr: usize) -> f64 {
        self.heights[(jr, ix)]
    }

    pub fn slope(&self, ix: usize, jr: usize) -> f64 {
        self.slopes[(jr, ix)]
    }

    pub fn label(&self, ix: usize, jr: usize) -> StabilityLabel {
        self.labels[(jr, ix)]
    }

    /// Indices (ix, jr) of the lattice cell closest to (x, r), clamped to the grid.
    pub fn nearest_cell(&self, x: f64, r: f64) -> (usize, usize) {
        let nearest = |value: f64, min: f64, len: usize| -> usize {
            let idx = ((value - min) / self.spec.step).round();
            if idx.is_nan() || idx <= 0.0 {
                0
            } else {
                (idx as usize).min(len - 1)
            }
        };
        (
            nearest(x, self.spec.x_min, self.x_values.len()),
            nearest(r, self.spec.r_min, self.r_values.len()),
        )
    }

    /// (stable, unstable) cell counts.
    pub fn label_counts(&self) -> (usize, usize) {
        let stable = self
            .labels
            .iter()
            .filter(|label| **label == StabilityLabel::Stable)
            .count();
        (stable, self.labels.len() - stable)
    }

    /// Labels present anywhere in the grid, in ascending order.
    pub fn distinct_labels(&self) -> Vec<StabilityLabel> {
        let (stable, unstable) = self.label_counts();
        let mut present = Vec::with_capacity(2);
        if unstable > 0 {
            present.push(StabilityLabel::Unstable);
        }
        if stable > 0 {
            present.push(StabilityLabel::Stable);
        }
        present
    }

    /// Label changes along x, row by row. Traces the fold curve r = 3x² at grid resolution.
    pub fn boundary(&self) -> Vec<BoundaryPoint> {
        let (nx, nr) = self.dims();
        let mut points = Vec::new();
        for jr in 0..nr {
            for ix in 0..nx - 1 {
                if self.labels[(jr, ix)] != self.labels[(jr, ix + 1)] {
                    points.push(BoundaryPoint {
                        x: 0.5 * (self.x_values[ix] + self.x_values[ix + 1]),
                        r: self.r_values[jr],
                    });
                }
            }
        }
        points
    }

    pub fn mesh(&self) -> SurfaceMesh {
        let (nx, nr) = self.dims();
        let mut mesh = SurfaceMesh {
            r: Vec::with_capacity(nr),
            h: Vec::with_capacity(nr),
            x: Vec::with_capacity(nr),
            stability: Vec::with_capacity(nr),
        };
        for jr in 0..nr {
            mesh.r.push(vec![self.r_values[jr]; nx]);
            mesh.h.push((0..nx).map(|ix| self.heights[(jr, ix)]).collect());
            mesh.x.push(self.x_values.clone());
            mesh.stability
                .push((0..nx).map(|ix| self.labels[(jr, ix)].as_index()).collect());
        }
        mesh
    }
}

static DEFAULT_SURFACE: OnceLock<Result<EquilibriumSurface>> = OnceLock::new();

/// The surface for `GridSpec::default()`, computed on first use and shared afterwards.
pub fn default_surface() -> Result<&'static EquilibriumSurface> {
    DEFAULT_SURFACE
        .get_or_init(|| EquilibriumSurface::compute(&GridSpec::default()))
        .as_ref()
        .map_err(Clone::clone)
}
