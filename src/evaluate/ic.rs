//! Information coefficient: per-date Spearman rank correlation between a
//! signal and forward returns.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::panel::Panel;

/// Configuration for IC computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IcConfig {
    /// Minimum valid assets on a date for the correlation to be defined.
    pub min_valid: usize,
}

impl Default for IcConfig {
    fn default() -> Self {
        Self { min_valid: 30 }
    }
}

/// Per-date IC values; NaN where a date failed the valid-count gate.
#[derive(Debug, Clone)]
pub struct IcSeries {
    /// Date index, matching the aligned panels.
    pub dates: Vec<NaiveDate>,
    /// Spearman correlation per date, NaN when undefined.
    pub values: Vec<f64>,
}

/// Aggregate IC statistics over the non-missing dates.
#[derive(Debug, Clone, Serialize)]
pub struct IcSummary {
    /// Mean IC.
    pub mean_ic: f64,
    /// Population standard deviation of IC.
    pub ic_std: f64,
    /// `mean / (std / sqrt(n))` over non-missing dates.
    pub t_stat: f64,
    /// Percentage of non-missing dates with positive IC.
    pub pct_positive: f64,
    /// Number of non-missing dates.
    pub n_dates: usize,
}

/// Average ranks (1-based) with ties sharing their mean rank.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap());

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        // Positions i..=j hold tied values; assign the mean of their ranks.
        let mean_rank = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = mean_rank;
        }
        i = j + 1;
    }
    ranks
}

/// Spearman rank correlation: Pearson correlation of average ranks.
fn spearman(x: &[f64], y: &[f64]) -> f64 {
    let rx = average_ranks(x);
    let ry = average_ranks(y);
    let n = rx.len() as f64;

    let mean_x: f64 = rx.iter().sum::<f64>() / n;
    let mean_y: f64 = ry.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in rx.iter().zip(&ry) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x * var_y).sqrt()
}

/// Per-date Spearman IC between a signal panel and a forward-return panel.
///
/// Panels are aligned first (fatal if they share no dates or assets). Each
/// date restricts to assets defined in both panels; dates below
/// `min_valid` record NaN. Dates are independent, so the date axis is
/// computed in parallel.
pub fn ic_series(signal: &Panel, forward: &Panel, config: &IcConfig) -> Result<IcSeries> {
    let (signal, forward) = signal.align(forward)?;
    let min_valid = config.min_valid.max(2);

    let values: Vec<f64> = (0..signal.n_dates())
        .into_par_iter()
        .map(|d| {
            let sig_row = signal.row(d);
            let fwd_row = forward.row(d);

            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for a in 0..sig_row.len() {
                if !sig_row[a].is_nan() && !fwd_row[a].is_nan() {
                    xs.push(sig_row[a]);
                    ys.push(fwd_row[a]);
                }
            }
            if xs.len() < min_valid {
                return f64::NAN;
            }
            spearman(&xs, &ys)
        })
        .collect();

    Ok(IcSeries { dates: signal.dates().to_vec(), values })
}

/// Summarize an IC series over its non-missing dates.
///
/// With no observations every statistic is NaN and `n_dates` is zero; a
/// zero standard deviation leaves the t-stat NaN.
pub fn summarize_ic(ic: &[f64]) -> IcSummary {
    let valid: Vec<f64> = ic.iter().copied().filter(|v| !v.is_nan()).collect();
    let n = valid.len();
    if n == 0 {
        return IcSummary {
            mean_ic: f64::NAN,
            ic_std: f64::NAN,
            t_stat: f64::NAN,
            pct_positive: f64::NAN,
            n_dates: 0,
        };
    }

    let mean = valid.iter().sum::<f64>() / n as f64;
    let var = valid.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    let std = var.sqrt();
    let t_stat = if std > 0.0 { mean / (std / (n as f64).sqrt()) } else { f64::NAN };
    let positive = valid.iter().filter(|&&v| v > 0.0).count();

    IcSummary {
        mean_ic: mean,
        ic_std: std,
        t_stat,
        pct_positive: positive as f64 / n as f64 * 100.0,
        n_dates: n,
    }
}
