//! Light-curve phase folding and period refinement engine.
//!
//! Holds a light curve with its DFT periodogram, picks a dominant period,
//! folds the curve at that period and lets callers refine it from a
//! periodogram click or a fine-adjustment slider. A boxcar smoother runs
//! over the folded flux and a rounded frequency/period summary is kept in
//! sync with every period change.
//!
//! Zero I/O — the periodogram itself comes from an external tool driven by
//! `lc-io`.

pub mod constants;
pub mod engine;
pub mod error;
pub mod fold;
pub mod light_curve;
pub mod periodogram;
pub mod smooth;
pub mod summary;

pub use constants::{DEFAULT_SMOOTH_WINDOW, FINE_STEP, NYQUIST_FREQUENCY, SUMMARY_DECIMALS};
pub use engine::{EngineState, PhaseFoldEngine};
pub use error::{EngineError, Result};
pub use fold::{FoldState, fold_curve, phase_of};
pub use light_curve::LightCurve;
pub use periodogram::{Peak, Periodogram};
pub use smooth::{Boxcar, Smoother};
pub use summary::{SummaryRecord, round_to};
