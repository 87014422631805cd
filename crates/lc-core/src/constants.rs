/// Reference frequency of the tool's normalized grid. The dominant-period
/// search starts at the grid point nearest to it.
pub const NYQUIST_FREQUENCY: f64 = 0.5;

/// Frequency increment per slider step.
pub const FINE_STEP: f64 = 1e-4;

/// Decimal places kept in the summary table.
pub const SUMMARY_DECIMALS: u32 = 5;

/// Smoothing window used until a caller picks another.
pub const DEFAULT_SMOOTH_WINDOW: usize = 10;
