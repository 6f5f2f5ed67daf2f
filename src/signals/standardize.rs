//! Standardization primitives: cross-sectional z-score, rolling z-score,
//! and winsorization.

use crate::core::error::{AlphaError, Result};
use crate::core::panel::Panel;

/// Mean and population standard deviation over the valid entries of a slice.
///
/// Returns None with fewer than `min_count` valid entries.
fn valid_mean_std(values: &[f64], min_count: usize) -> Option<(f64, f64)> {
    let mut count = 0usize;
    let mut sum = 0.0;
    for &v in values {
        if !v.is_nan() {
            count += 1;
            sum += v;
        }
    }
    if count < min_count {
        return None;
    }
    let mean = sum / count as f64;
    let mut sum_sq = 0.0;
    for &v in values {
        if !v.is_nan() {
            sum_sq += (v - mean) * (v - mean);
        }
    }
    Some((mean, (sum_sq / count as f64).sqrt()))
}

/// Cross-sectional z-score: standardize each date row across assets.
///
/// Uses the population standard deviation. Rows with fewer than two valid
/// entries or a zero standard deviation become all-NaN rather than raising
/// a division error; NaN inputs stay NaN.
pub fn cross_sectional_zscore(panel: &Panel) -> Panel {
    let mut out = panel.clone();
    for d in 0..out.n_dates() {
        let row = out.row_mut(d);
        match valid_mean_std(row, 2) {
            Some((mean, std)) if std > 0.0 => {
                for v in row.iter_mut() {
                    if !v.is_nan() {
                        *v = (*v - mean) / std;
                    }
                }
            }
            _ => row.fill(f64::NAN),
        }
    }
    out
}

/// Rolling time-series z-score per asset over a trailing window.
///
/// At each date the window covers the trailing `window` observations,
/// current date included. Positions with fewer than `min_periods` valid
/// observations in the window, or a zero window standard deviation, are
/// NaN. The standard deviation is population (ddof 0).
pub fn rolling_zscore(panel: &Panel, window: usize, min_periods: usize) -> Result<Panel> {
    if window == 0 {
        return Err(AlphaError::invalid_parameter("rolling window must be at least 1"));
    }
    if min_periods == 0 || min_periods > window {
        return Err(AlphaError::invalid_parameter(format!(
            "min_periods must be in 1..={window}, got {min_periods}"
        )));
    }

    let mut out = panel.map(|_| f64::NAN);
    for a in 0..panel.n_assets() {
        let column = panel.column(a);
        for d in 0..column.len() {
            let x = column[d];
            if x.is_nan() {
                continue;
            }
            let start = (d + 1).saturating_sub(window);
            if let Some((mean, std)) = valid_mean_std(&column[start..=d], min_periods) {
                if std > 0.0 {
                    out.set(d, a, (x - mean) / std);
                }
            }
        }
    }
    Ok(out)
}

/// Linearly interpolated quantile over the valid entries of a row.
///
/// Matches the pandas default interpolation. Returns NaN when the row has
/// no valid entries. `q` outside [0, 1] is the caller's validation burden.
pub fn row_quantile(values: &[f64], q: f64) -> f64 {
    let mut valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return f64::NAN;
    }
    valid.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let pos = q * (valid.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        valid[lo]
    } else {
        let frac = pos - lo as f64;
        valid[lo] * (1.0 - frac) + valid[hi] * frac
    }
}

/// Winsorize each date row at the given quantile bounds.
///
/// Bounds are computed per row, independently, over valid entries only.
/// NaN cells pass through unchanged.
pub fn winsorize(panel: &Panel, lower_q: f64, upper_q: f64) -> Result<Panel> {
    if !(0.0..=1.0).contains(&lower_q) || !(0.0..=1.0).contains(&upper_q) || lower_q >= upper_q {
        return Err(AlphaError::invalid_parameter(format!(
            "winsorize quantiles must satisfy 0 <= lower < upper <= 1, got ({lower_q}, {upper_q})"
        )));
    }

    let mut out = panel.clone();
    for d in 0..out.n_dates() {
        let row = out.row_mut(d);
        let lo = row_quantile(row, lower_q);
        let hi = row_quantile(row, upper_q);
        if lo.is_nan() || hi.is_nan() {
            continue;
        }
        for v in row.iter_mut() {
            if !v.is_nan() {
                *v = v.clamp(lo, hi);
            }
        }
    }
    Ok(out)
}
