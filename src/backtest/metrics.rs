//! Performance metrics over return and equity series.

/// Annualized Sharpe ratio: `sqrt(periods) * mean / population_std`.
///
/// NaN returns are excluded. NaN when there are no observations or the
/// standard deviation is zero.
pub fn annualized_sharpe(returns: &[f64], periods_per_year: f64) -> f64 {
    let valid: Vec<f64> = returns.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return f64::NAN;
    }
    let n = valid.len() as f64;
    let mean = valid.iter().sum::<f64>() / n;
    let var = valid.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    let std = var.sqrt();
    if std == 0.0 {
        return f64::NAN;
    }
    periods_per_year.sqrt() * mean / std
}

/// Drawdown at each point: `equity[t] / running_peak[t] - 1` (<= 0).
///
/// NaN equity points yield NaN drawdown and do not advance the peak.
pub fn drawdown_curve(equity: &[f64]) -> Vec<f64> {
    let mut peak = f64::NAN;
    equity
        .iter()
        .map(|&e| {
            if e.is_nan() {
                return f64::NAN;
            }
            if peak.is_nan() || e > peak {
                peak = e;
            }
            e / peak - 1.0
        })
        .collect()
}

/// Maximum drawdown: the minimum of the drawdown curve.
///
/// Returns a non-positive fraction (e.g., -0.25 for a 25% drawdown), or
/// NaN for an empty/all-NaN equity series.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let curve = drawdown_curve(equity);
    let valid: Vec<f64> = curve.into_iter().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return f64::NAN;
    }
    valid.into_iter().fold(f64::INFINITY, f64::min)
}
