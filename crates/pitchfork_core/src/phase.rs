use crate::error::{PitchforkError, Result};
use crate::system::Parameters;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseLineSettings {
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

impl Default for PhaseLineSettings {
    fn default() -> Self {
        Self {
            min: -5.0,
            max: 5.0,
            samples: 100,
        }
    }
}

/// Velocity curve dx/dt over a range of positions, drawn next to the moving point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseLine {
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
}

/// Samples f(x; r, h) at `samples` evenly spaced positions spanning [min, max].
pub fn phase_line(params: Parameters, settings: &PhaseLineSettings) -> Result<PhaseLine> {
    let PhaseLineSettings { min, max, samples } = *settings;
    if samples < 2 {
        return Err(PitchforkError::InvalidSampling { samples });
    }
    if !min.is_finite() || !max.is_finite() || max <= min {
        return Err(PitchforkError::InvalidRange { min, max });
    }

    let step = (max - min) / (samples - 1) as f64;
    let positions: Vec<f64> = (0..samples).map(|i| min + step * i as f64).collect();
    let velocities = positions.iter().map(|&x| params.rate(x)).collect();
    Ok(PhaseLine {
        positions,
        velocities,
    })
}
