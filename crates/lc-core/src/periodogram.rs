use serde::{Deserialize, Serialize};

use crate::constants::NYQUIST_FREQUENCY;
use crate::error::{EngineError, Result};

/// Frequency/amplitude pair produced by the external DFT tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Periodogram {
    frequency: Vec<f64>,
    amplitude: Vec<f64>,
}

/// A single periodogram sample.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub index: usize,
    pub frequency: f64,
    pub amplitude: f64,
}

impl Periodogram {
    pub fn new(frequency: Vec<f64>, amplitude: Vec<f64>) -> Result<Self> {
        if frequency.len() != amplitude.len() {
            return Err(EngineError::ExternalTool(format!(
                "periodogram column mismatch: frequency={}, amplitude={}",
                frequency.len(),
                amplitude.len()
            )));
        }
        if frequency.is_empty() {
            return Err(EngineError::ExternalTool("periodogram is empty".to_string()));
        }
        if frequency
            .iter()
            .chain(amplitude.iter())
            .any(|v| !v.is_finite())
        {
            return Err(EngineError::ExternalTool(
                "periodogram contains non-finite values".to_string(),
            ));
        }
        Ok(Self {
            frequency,
            amplitude,
        })
    }

    pub fn frequency(&self) -> &[f64] {
        &self.frequency
    }

    pub fn amplitude(&self) -> &[f64] {
        &self.amplitude
    }

    pub fn len(&self) -> usize {
        self.frequency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequency.is_empty()
    }

    /// Index of the frequency closest to `target`. First index wins on ties.
    pub fn nearest_index(&self, target: f64) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, f) in self.frequency.iter().enumerate() {
            let dist = (f - target).abs();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }

    /// Highest-amplitude sample at or after the grid point nearest 0.5.
    ///
    /// This is not a global maximum: everything below the search origin is
    /// ignored, which biases the pick toward shorter periods. The first
    /// sample wins among equal amplitudes.
    pub fn dominant(&self) -> Peak {
        let start = self.nearest_index(NYQUIST_FREQUENCY);
        let mut best = start;
        for i in start + 1..self.amplitude.len() {
            if self.amplitude[i] > self.amplitude[best] {
                best = i;
            }
        }
        self.peak(best)
    }

    fn peak(&self, index: usize) -> Peak {
        Peak {
            index,
            frequency: self.frequency[index],
            amplitude: self.amplitude[index],
        }
    }
}
