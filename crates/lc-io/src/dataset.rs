use std::path::Path;

use lc_core::{LightCurve, Periodogram, Result};

use crate::reader::read_light_curve;
use crate::tool::PeriodogramSource;

/// Read a light curve and obtain its periodogram.
///
/// Nothing is returned unless both succeed, so callers can install the
/// pair into the engine atomically.
pub async fn load_dataset<P: PeriodogramSource>(
    path: &Path,
    source: &P,
) -> Result<(LightCurve, Periodogram)> {
    let curve = read_light_curve(path)?;
    tracing::debug!("read {} samples from {}", curve.len(), path.display());
    let periodogram = source.periodogram(path).await?;
    Ok((curve, periodogram))
}
