//! Plain-text tables: the frequency/period summary and the folded points.

use std::fmt::Write;

use lc_core::{FoldState, SUMMARY_DECIMALS, SummaryRecord};

const COL: usize = 12;

/// One numbered row under a `Frequency Period` header.
pub fn render_summary(summary: &SummaryRecord) -> String {
    let p = SUMMARY_DECIMALS as usize;
    let mut out = String::new();
    let _ = writeln!(out, "{:>3}  {:>COL$}  {:>COL$}", "", "Frequency", "Period");
    let _ = writeln!(
        out,
        "{:>3}  {:>COL$.p$}  {:>COL$.p$}",
        1, summary.frequency, summary.period
    );
    out
}

/// Phase-sorted points; error and smoothed columns follow the display toggles.
pub fn render_points(fold: &FoldState, show_errors: bool, show_smoothed: bool) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:>COL$}  {:>COL$}", "phase", "flux");
    if show_errors {
        let _ = write!(out, "  {:>COL$}", "error");
    }
    if show_smoothed {
        let _ = write!(out, "  {:>COL$}", "smoothed");
    }
    out.push('\n');

    for i in 0..fold.len() {
        let _ = write!(out, "{:>COL$.6}  {:>COL$.6}", fold.phase[i], fold.folded_flux[i]);
        if show_errors {
            let _ = write!(out, "  {:>COL$.6}", fold.folded_error[i]);
        }
        if show_smoothed {
            let _ = write!(out, "  {:>COL$.6}", fold.smoothed_flux[i]);
        }
        out.push('\n');
    }
    out
}
