use crate::constants::{DEFAULT_SMOOTH_WINDOW, FINE_STEP};
use crate::error::{EngineError, Result};
use crate::fold::{FoldState, fold_curve};
use crate::light_curve::LightCurve;
use crate::periodogram::{Peak, Periodogram};
use crate::smooth::{Boxcar, Smoother};
use crate::summary::SummaryRecord;

/// Lifecycle of the engine. There is no terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Empty,
    Loaded,
    Folded,
}

/// Light curve and periodogram, always replaced together.
#[derive(Clone, Debug)]
struct Dataset {
    curve: LightCurve,
    periodogram: Periodogram,
}

/// Phase-folding and period-refinement state machine.
///
/// `reference_period` is the slider baseline, set by the dominant-period
/// pick or a periodogram click. `effective_period` is what the fold
/// actually uses; the slider moves it without touching the baseline.
pub struct PhaseFoldEngine<S: Smoother = Boxcar> {
    data: Option<Dataset>,
    reference_period: Option<f64>,
    effective_period: Option<f64>,
    slider: i32,
    smooth_window: usize,
    peak: Option<Peak>,
    fold: Option<FoldState>,
    smoother: S,
}

impl Default for PhaseFoldEngine<Boxcar> {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseFoldEngine<Boxcar> {
    pub fn new() -> Self {
        Self::with_smoother(Boxcar)
    }
}

impl<S: Smoother> PhaseFoldEngine<S> {
    pub fn with_smoother(smoother: S) -> Self {
        Self {
            data: None,
            reference_period: None,
            effective_period: None,
            slider: 0,
            smooth_window: DEFAULT_SMOOTH_WINDOW,
            peak: None,
            fold: None,
            smoother,
        }
    }

    pub fn state(&self) -> EngineState {
        match (&self.data, &self.fold) {
            (None, _) => EngineState::Empty,
            (Some(_), None) => EngineState::Loaded,
            (Some(_), Some(_)) => EngineState::Folded,
        }
    }

    pub fn light_curve(&self) -> Option<&LightCurve> {
        self.data.as_ref().map(|d| &d.curve)
    }

    pub fn periodogram(&self) -> Option<&Periodogram> {
        self.data.as_ref().map(|d| &d.periodogram)
    }

    pub fn reference_period(&self) -> Option<f64> {
        self.reference_period
    }

    pub fn effective_period(&self) -> Option<f64> {
        self.effective_period
    }

    pub fn slider(&self) -> i32 {
        self.slider
    }

    pub fn smooth_window(&self) -> usize {
        self.smooth_window
    }

    /// Set the window the next refold uses without folding now.
    pub fn set_smooth_window(&mut self, window: usize) {
        self.smooth_window = window;
    }

    pub fn fold(&self) -> Option<&FoldState> {
        self.fold.as_ref()
    }

    /// Amplitude of the peak found by the last `select_dominant_period`.
    pub fn peak_amplitude(&self) -> Option<f64> {
        self.peak.map(|p| p.amplitude)
    }

    /// Install a new light curve and periodogram, discarding all derived
    /// state. The engine is `Loaded` afterwards and must be folded again.
    pub fn load(&mut self, curve: LightCurve, periodogram: Periodogram) {
        self.data = Some(Dataset { curve, periodogram });
        self.reference_period = None;
        self.effective_period = None;
        self.slider = 0;
        self.peak = None;
        self.fold = None;
    }

    /// Install a new dataset and select its dominant period. If the new
    /// periodogram has no usable peak the engine is left as it was.
    pub fn load_and_select(
        &mut self,
        curve: LightCurve,
        periodogram: Periodogram,
    ) -> Result<f64> {
        checked_period(periodogram.dominant().frequency)?;
        self.load(curve, periodogram);
        self.select_dominant_period()
    }

    /// Pick the highest peak at or above the grid point nearest 0.5 and make
    /// its period both the reference and the effective period.
    pub fn select_dominant_period(&mut self) -> Result<f64> {
        let periodogram = self.periodogram().ok_or(EngineError::NoData)?;
        let peak = periodogram.dominant();
        let period = checked_period(peak.frequency)?;

        self.peak = Some(peak);
        self.reference_period = Some(period);
        self.effective_period = Some(period);
        self.slider = 0;
        Ok(period)
    }

    /// Take the period from a clicked periodogram frequency and refold.
    /// The slider offset goes back to zero.
    pub fn set_period_from_click(&mut self, frequency: f64) -> Result<()> {
        let period = checked_period(frequency)?;
        if self.data.is_none() {
            return Err(EngineError::NoData);
        }

        self.reference_period = Some(period);
        self.effective_period = Some(period);
        self.slider = 0;
        self.recompute_fold(self.smooth_window)?;
        Ok(())
    }

    /// Shift the effective frequency by `slider * FINE_STEP` from the
    /// reference frequency and refold. The reference period stays put.
    pub fn adjust_period_fine(&mut self, slider: i32) -> Result<()> {
        let reference = self.reference_period.ok_or(EngineError::NoData)?;
        let frequency = 1.0 / reference + f64::from(slider) * FINE_STEP;
        let period = checked_period(frequency)?;
        if self.data.is_none() {
            return Err(EngineError::InsufficientData);
        }

        self.slider = slider;
        self.effective_period = Some(period);
        self.recompute_fold(self.smooth_window)?;
        Ok(())
    }

    /// Fold the light curve at the effective period and smooth it with
    /// `window`. The window becomes the engine's current smoothing window.
    pub fn recompute_fold(&mut self, window: usize) -> Result<&FoldState> {
        let data = self.data.as_ref().ok_or(EngineError::InsufficientData)?;
        let period = self.effective_period.ok_or(EngineError::NoData)?;

        let fold = fold_curve(&data.curve, period, window, &self.smoother);
        self.smooth_window = window;
        Ok(self.fold.insert(fold))
    }

    pub fn summary(&self) -> Result<SummaryRecord> {
        let period = self.effective_period.ok_or(EngineError::NoData)?;
        Ok(SummaryRecord::from_period(period))
    }
}

fn checked_period(frequency: f64) -> Result<f64> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(EngineError::InvalidPeriod(frequency));
    }
    let period = 1.0 / frequency;
    if !period.is_finite() {
        return Err(EngineError::InvalidPeriod(frequency));
    }
    Ok(period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve() -> LightCurve {
        LightCurve::new(
            vec![0.0, 0.5, 1.0, 1.5],
            vec![1.0, 2.0, 1.0, 2.0],
            vec![0.1, 0.1, 0.1, 0.1],
        )
        .unwrap()
    }

    fn periodogram() -> Periodogram {
        Periodogram::new(
            vec![0.1, 0.4, 0.5, 0.6, 0.9],
            vec![5.0, 3.0, 1.0, 9.0, 2.0],
        )
        .unwrap()
    }

    fn loaded() -> PhaseFoldEngine {
        let mut engine = PhaseFoldEngine::new();
        engine.load(curve(), periodogram());
        engine
    }

    #[test]
    fn test_starts_empty() {
        let engine = PhaseFoldEngine::new();
        assert_eq!(engine.state(), EngineState::Empty);
        assert_eq!(engine.smooth_window(), DEFAULT_SMOOTH_WINDOW);
        assert!(engine.light_curve().is_none());
    }

    #[test]
    fn test_load_moves_to_loaded() {
        let engine = loaded();
        assert_eq!(engine.state(), EngineState::Loaded);
        assert_eq!(engine.light_curve().unwrap().len(), 4);
        assert_eq!(engine.periodogram().unwrap().len(), 5);
    }

    #[test]
    fn test_select_dominant_without_data() {
        let mut engine = PhaseFoldEngine::new();
        assert_eq!(engine.select_dominant_period(), Err(EngineError::NoData));
    }

    #[test]
    fn test_select_dominant_sets_both_periods() {
        let mut engine = loaded();
        let period = engine.select_dominant_period().unwrap();
        assert_relative_eq!(period, 1.0 / 0.6);
        assert_eq!(engine.reference_period(), Some(period));
        assert_eq!(engine.effective_period(), Some(period));
        assert_eq!(engine.peak_amplitude(), Some(9.0));
        // selecting does not fold
        assert_eq!(engine.state(), EngineState::Loaded);
    }

    #[test]
    fn test_recompute_without_curve_is_reported() {
        let mut engine = PhaseFoldEngine::new();
        assert_eq!(
            engine.recompute_fold(3).unwrap_err(),
            EngineError::InsufficientData
        );
        assert_eq!(engine.state(), EngineState::Empty);
    }

    #[test]
    fn test_recompute_without_period() {
        let mut engine = loaded();
        assert_eq!(engine.recompute_fold(3).unwrap_err(), EngineError::NoData);
        assert_eq!(engine.state(), EngineState::Loaded);
    }

    #[test]
    fn test_click_folds_and_resets_slider() {
        let mut engine = loaded();
        engine.select_dominant_period().unwrap();
        engine.adjust_period_fine(7).unwrap();
        assert_eq!(engine.slider(), 7);

        engine.set_period_from_click(1.0).unwrap();
        assert_eq!(engine.slider(), 0);
        assert_eq!(engine.reference_period(), Some(1.0));
        assert_eq!(engine.effective_period(), Some(1.0));
        assert_eq!(engine.state(), EngineState::Folded);
        let fold = engine.fold().unwrap();
        assert_eq!(fold.phase, vec![0.0, 0.0, 0.5, 0.5]);
        assert_eq!(fold.folded_flux, vec![1.0, 1.0, 2.0, 2.0]);
    }

    #[test]
    fn test_click_rejects_bad_frequency_without_mutation() {
        let mut engine = loaded();
        engine.set_period_from_click(2.0).unwrap();
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                engine.set_period_from_click(bad),
                Err(EngineError::InvalidPeriod(_))
            ));
        }
        assert_eq!(engine.effective_period(), Some(0.5));
    }

    #[test]
    fn test_click_without_data() {
        let mut engine = PhaseFoldEngine::new();
        assert_eq!(engine.set_period_from_click(0.5), Err(EngineError::NoData));
        assert_eq!(engine.reference_period(), None);
    }

    #[test]
    fn test_slider_keeps_reference() {
        let mut engine = loaded();
        engine.set_period_from_click(0.5).unwrap();
        engine.adjust_period_fine(10).unwrap();
        assert_eq!(engine.reference_period(), Some(2.0));
        assert_relative_eq!(engine.effective_period().unwrap(), 1.0 / 0.501, epsilon = 1e-12);
        assert_relative_eq!(engine.effective_period().unwrap(), 1.996_008, epsilon = 1e-6);
        assert_eq!(engine.fold().unwrap().period, engine.effective_period().unwrap());
    }

    #[test]
    fn test_slider_is_relative_to_reference_not_cumulative() {
        let mut engine = loaded();
        engine.set_period_from_click(0.5).unwrap();
        engine.adjust_period_fine(10).unwrap();
        engine.adjust_period_fine(10).unwrap();
        assert_relative_eq!(engine.effective_period().unwrap(), 1.0 / 0.501, epsilon = 1e-12);
        engine.adjust_period_fine(0).unwrap();
        assert_relative_eq!(engine.effective_period().unwrap(), 2.0);
    }

    #[test]
    fn test_slider_rejects_non_positive_frequency() {
        let mut engine = loaded();
        engine.set_period_from_click(0.5).unwrap();
        let err = engine.adjust_period_fine(-5000).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPeriod(_)));
        assert_eq!(engine.effective_period(), Some(2.0));
        assert_eq!(engine.slider(), 0);
    }

    #[test]
    fn test_slider_without_reference() {
        let mut engine = loaded();
        assert_eq!(engine.adjust_period_fine(3), Err(EngineError::NoData));
    }

    #[test]
    fn test_recompute_updates_window() {
        let mut engine = loaded();
        engine.set_period_from_click(1.0).unwrap();
        let fold = engine.recompute_fold(2).unwrap();
        assert_eq!(fold.window, 2);
        assert_eq!(fold.smoothed_flux, vec![0.5, 1.0, 1.5, 2.0]);
        assert_eq!(engine.smooth_window(), 2);
    }

    #[test]
    fn test_set_smooth_window_applies_on_next_fold() {
        let mut engine = loaded();
        engine.set_smooth_window(2);
        assert_eq!(engine.state(), EngineState::Loaded);
        engine.set_period_from_click(1.0).unwrap();
        assert_eq!(engine.fold().unwrap().window, 2);
    }

    #[test]
    fn test_load_discards_fold_state() {
        let mut engine = loaded();
        engine.select_dominant_period().unwrap();
        engine.recompute_fold(1).unwrap();
        assert_eq!(engine.state(), EngineState::Folded);

        engine.load(curve(), periodogram());
        assert_eq!(engine.state(), EngineState::Loaded);
        assert!(engine.fold().is_none());
        assert_eq!(engine.reference_period(), None);
        assert_eq!(engine.summary(), Err(EngineError::NoData));
    }

    #[test]
    fn test_load_and_select_installs_dataset() {
        let mut engine = PhaseFoldEngine::new();
        let period = engine.load_and_select(curve(), periodogram()).unwrap();
        assert_relative_eq!(period, 1.0 / 0.6);
        assert_eq!(engine.peak_amplitude(), Some(9.0));
        assert_eq!(engine.state(), EngineState::Loaded);
    }

    #[test]
    fn test_load_and_select_rejects_zero_frequency_peak() {
        let mut engine = loaded();
        engine.set_period_from_click(1.0).unwrap();

        // nearest grid point to 0.5 is frequency 0
        let bad = Periodogram::new(vec![0.0, 1.0], vec![5.0, 1.0]).unwrap();
        let short = LightCurve::without_errors(vec![0.0, 1.0], vec![1.0, 1.0]).unwrap();
        assert_eq!(
            engine.load_and_select(short, bad),
            Err(EngineError::InvalidPeriod(0.0))
        );
        assert_eq!(engine.light_curve().unwrap().len(), 4);
        assert_eq!(engine.periodogram().unwrap().len(), 5);
        assert_eq!(engine.effective_period(), Some(1.0));
        assert_eq!(engine.state(), EngineState::Folded);
    }

    #[test]
    fn test_summary_tracks_effective_period() {
        let mut engine = loaded();
        engine.set_period_from_click(0.5).unwrap();
        engine.adjust_period_fine(10).unwrap();
        let summary = engine.summary().unwrap();
        assert_eq!(summary.period, 1.996_01);
        assert_eq!(summary.frequency, 0.501);
    }

    #[test]
    fn test_custom_smoother() {
        let mut engine =
            PhaseFoldEngine::with_smoother(|s: &[f64], _w: usize| vec![0.0; s.len()]);
        engine.load(curve(), periodogram());
        engine.set_period_from_click(1.0).unwrap();
        assert_eq!(engine.fold().unwrap().smoothed_flux, vec![0.0; 4]);
    }
}
