use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::SUMMARY_DECIMALS;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

/// Row of the frequency/period table shown next to the phase plot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub frequency: f64,
    pub period: f64,
}

impl SummaryRecord {
    /// Summary for an effective fold period, rounded for display.
    pub fn from_period(period: f64) -> Self {
        Self {
            frequency: round_to(1.0 / period, SUMMARY_DECIMALS),
            period: round_to(period, SUMMARY_DECIMALS),
        }
    }
}

impl fmt::Display for SummaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = SUMMARY_DECIMALS as usize;
        write!(
            f,
            "frequency={:.p$} period={:.p$}",
            self.frequency, self.period
        )
    }
}
