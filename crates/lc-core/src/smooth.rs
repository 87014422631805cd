/// Pure smoothing routine applied to the phase-sorted flux.
///
/// Implementations must return a series with the same length as the input.
pub trait Smoother {
    fn smooth(&self, series: &[f64], window: usize) -> Vec<f64>;
}

/// Moving average with a flat box of `window` samples.
///
/// Equivalent to a "same"-mode convolution with `window` ones scaled by
/// `1/window`: samples outside the series count as zero, so the ends sag
/// toward zero. The box covers `[i - window/2, i - window/2 + window - 1]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Boxcar;

impl Smoother for Boxcar {
    fn smooth(&self, series: &[f64], window: usize) -> Vec<f64> {
        boxcar(series, window)
    }
}

impl<F> Smoother for F
where
    F: Fn(&[f64], usize) -> Vec<f64>,
{
    fn smooth(&self, series: &[f64], window: usize) -> Vec<f64> {
        self(series, window)
    }
}

pub fn boxcar(series: &[f64], window: usize) -> Vec<f64> {
    if window <= 1 || series.is_empty() {
        return series.to_vec();
    }

    let n = series.len() as isize;
    // any box of 2n or more covers the whole series at every position
    let w = window.min(2 * series.len()) as isize;

    // prefix[k] = sum of series[..k]
    let mut prefix = Vec::with_capacity(series.len() + 1);
    prefix.push(0.0);
    let mut acc = 0.0;
    for v in series {
        acc += v;
        prefix.push(acc);
    }

    let scale = 1.0 / window as f64;
    (0..n)
        .map(|i| {
            let lo = (i - w / 2).clamp(0, n) as usize;
            let hi = (i - w / 2 + w).clamp(0, n) as usize;
            (prefix[hi] - prefix[lo]) * scale
        })
        .collect()
}
