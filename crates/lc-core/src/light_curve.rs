use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Time series of brightness measurements: `time`, `flux`, `flux_error`.
///
/// Arrays are equal length, non-empty and finite. There are no mutators;
/// a new file load replaces the whole curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightCurve {
    time: Vec<f64>,
    flux: Vec<f64>,
    flux_error: Vec<f64>,
}

impl LightCurve {
    pub fn new(time: Vec<f64>, flux: Vec<f64>, flux_error: Vec<f64>) -> Result<Self> {
        if time.len() != flux.len() || time.len() != flux_error.len() {
            return Err(EngineError::DataLoad(format!(
                "column length mismatch: time={}, flux={}, error={}",
                time.len(),
                flux.len(),
                flux_error.len()
            )));
        }
        if time.is_empty() {
            return Err(EngineError::DataLoad("light curve has no rows".to_string()));
        }
        for (name, column) in [("time", &time), ("flux", &flux), ("error", &flux_error)] {
            if let Some(i) = column.iter().position(|v| !v.is_finite()) {
                return Err(EngineError::DataLoad(format!(
                    "non-finite {name} value at row {}",
                    i + 1
                )));
            }
        }
        Ok(Self {
            time,
            flux,
            flux_error,
        })
    }

    /// Curve without error bars (errors set to zero).
    pub fn without_errors(time: Vec<f64>, flux: Vec<f64>) -> Result<Self> {
        let flux_error = vec![0.0; time.len()];
        Self::new(time, flux, flux_error)
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn flux_error(&self) -> &[f64] {
        &self.flux_error
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}
