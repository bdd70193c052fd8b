use thiserror::Error;

/// Errors surfaced by the integrator, the stability grid and the phase line.
///
/// Every operation is all-or-nothing: when one of these is returned no state has been
/// mutated and no partial result exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PitchforkError {
    /// The macro step `dt` must be positive and at least one RK4 substep is required.
    #[error("invalid step configuration: dt must be positive and substeps at least 1 (dt = {dt}, substeps = {substeps})")]
    InvalidStepConfig { dt: f64, substeps: usize },

    /// The finite difference along x needs two samples; the r axis needs one.
    #[error("degenerate grid: need at least 2 x samples and 1 r sample (got {x_samples} x, {r_samples} r)")]
    DegenerateGrid { x_samples: usize, r_samples: usize },

    #[error("phase line needs at least 2 samples (got {samples})")]
    InvalidSampling { samples: usize },

    #[error("range must be finite with max > min (min = {min}, max = {max})")]
    InvalidRange { min: f64, max: f64 },
}

pub type Result<T> = std::result::Result<T, PitchforkError>;
