use serde::{Deserialize, Serialize};

use crate::light_curve::LightCurve;
use crate::smooth::Smoother;

/// Position of `time` within one cycle of `period`, in [0, 1).
///
/// Uses floor-modulo so observations before the epoch still land in
/// [0, 1). `period` must be positive.
pub fn phase_of(time: f64, period: f64) -> f64 {
    let phase = time.rem_euclid(period) / period;
    // rem_euclid can round up to exactly `period`
    if phase >= 1.0 { 0.0 } else { phase }
}

/// Light curve folded at `period` and sorted by phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoldState {
    pub period: f64,
    pub window: usize,
    pub phase: Vec<f64>,
    pub folded_flux: Vec<f64>,
    pub folded_error: Vec<f64>,
    pub smoothed_flux: Vec<f64>,
}

impl FoldState {
    pub fn len(&self) -> usize {
        self.phase.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phase.is_empty()
    }

    /// The fold repeated over `[0, 2)` for display: every sample appears
    /// twice, the second time with its phase shifted by one.
    pub fn two_cycles(&self) -> FoldState {
        fn twice(v: &[f64]) -> Vec<f64> {
            v.iter().chain(v.iter()).copied().collect()
        }
        FoldState {
            period: self.period,
            window: self.window,
            phase: self
                .phase
                .iter()
                .copied()
                .chain(self.phase.iter().map(|p| p + 1.0))
                .collect(),
            folded_flux: twice(&self.folded_flux),
            folded_error: twice(&self.folded_error),
            smoothed_flux: twice(&self.smoothed_flux),
        }
    }
}

/// Fold `curve` at `period`, stably sort by phase, then smooth.
///
/// Samples with equal phase keep their original order. Flux errors follow
/// the same permutation as the flux.
pub fn fold_curve<S: Smoother + ?Sized>(
    curve: &LightCurve,
    period: f64,
    window: usize,
    smoother: &S,
) -> FoldState {
    let mut order: Vec<(f64, usize)> = curve
        .time()
        .iter()
        .enumerate()
        .map(|(i, &t)| (phase_of(t, period), i))
        .collect();
    // sort_by is stable
    order.sort_by(|a, b| a.0.total_cmp(&b.0));

    let phase: Vec<f64> = order.iter().map(|&(p, _)| p).collect();
    let folded_flux: Vec<f64> = order.iter().map(|&(_, i)| curve.flux()[i]).collect();
    let folded_error: Vec<f64> = order.iter().map(|&(_, i)| curve.flux_error()[i]).collect();
    let smoothed_flux = smoother.smooth(&folded_flux, window);

    FoldState {
        period,
        window,
        phase,
        folded_flux,
        folded_error,
        smoothed_flux,
    }
}
