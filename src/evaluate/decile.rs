//! Decile-bucket evaluation of a signal against forward returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::{AlphaError, Result};
use crate::core::panel::Panel;

/// Configuration for decile bucketing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecileConfig {
    /// Number of rank buckets.
    pub n_buckets: usize,
    /// Minimum valid assets on a date for it to contribute observations.
    pub min_valid: usize,
}

impl Default for DecileConfig {
    fn default() -> Self {
        Self { n_buckets: 10, min_valid: 50 }
    }
}

impl DecileConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.n_buckets == 0 {
            return Err(AlphaError::invalid_config("n_buckets must be at least 1"));
        }
        Ok(())
    }
}

/// Per-date and aggregate mean forward returns by signal decile.
#[derive(Debug, Clone, Serialize)]
pub struct DecileReport {
    /// Dates that met the minimum valid-asset count.
    pub dates: Vec<NaiveDate>,
    /// Mean forward return per bucket for each used date
    /// (`bucket_returns[d][b]`, bucket 0 = lowest signal values).
    pub bucket_returns: Vec<Vec<f64>>,
    /// Simple mean across used dates, per bucket.
    pub mean_by_bucket: Vec<f64>,
    /// Mean of top bucket minus mean of bottom bucket.
    pub top_bottom_spread: f64,
}

/// Bucket assets by ascending signal rank per date and record each bucket's
/// mean forward return.
///
/// Per date the computation restricts to assets with defined values in both
/// panels, skips the date entirely below `min_valid`, and ranks with ties
/// broken by asset column order so bucket membership is deterministic.
/// Bucket for rank r (1-based) is `floor((r - 1) / (count / n)) + 1`,
/// clipped into [1, n].
pub fn decile_returns(signal: &Panel, forward: &Panel, config: &DecileConfig) -> Result<DecileReport> {
    config.validate()?;
    let (signal, forward) = signal.align(forward)?;

    let n = config.n_buckets;
    let mut dates = Vec::new();
    let mut bucket_returns = Vec::new();

    for d in 0..signal.n_dates() {
        let sig_row = signal.row(d);
        let fwd_row = forward.row(d);

        let valid: Vec<usize> = (0..sig_row.len())
            .filter(|&a| !sig_row[a].is_nan() && !fwd_row[a].is_nan())
            .collect();
        if valid.len() < config.min_valid.max(1) {
            continue;
        }

        // Ascending signal order; ties broken by asset column order.
        let mut order = valid.clone();
        order.sort_by(|&x, &y| {
            sig_row[x].partial_cmp(&sig_row[y]).unwrap().then(x.cmp(&y))
        });

        let bin_size = valid.len() as f64 / n as f64;
        let mut sums = vec![0.0; n];
        let mut counts = vec![0usize; n];
        for (rank0, &a) in order.iter().enumerate() {
            let bucket = ((rank0 as f64 / bin_size).floor() as usize).min(n - 1);
            sums[bucket] += fwd_row[a];
            counts[bucket] += 1;
        }

        let row: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(&s, &c)| if c > 0 { s / c as f64 } else { f64::NAN })
            .collect();
        dates.push(signal.dates()[d]);
        bucket_returns.push(row);
    }

    let mut mean_by_bucket = vec![f64::NAN; n];
    for b in 0..n {
        let valid: Vec<f64> = bucket_returns.iter().map(|r| r[b]).filter(|v| !v.is_nan()).collect();
        if !valid.is_empty() {
            mean_by_bucket[b] = valid.iter().sum::<f64>() / valid.len() as f64;
        }
    }
    let top_bottom_spread = mean_by_bucket[n - 1] - mean_by_bucket[0];

    Ok(DecileReport { dates, bucket_returns, mean_by_bucket, top_bottom_spread })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel_from_rows(rows: &[Vec<f64>]) -> Panel {
        let n_assets = rows[0].len();
        let dates: Vec<NaiveDate> = (0..rows.len() as i64)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(d))
            .collect();
        let assets: Vec<String> = (0..n_assets).map(|i| format!("A{i:03}")).collect();
        let values: Vec<f64> = rows.iter().flatten().copied().collect();
        Panel::new(dates, assets, values).unwrap()
    }

    #[test]
    fn test_equal_population_buckets() {
        // 100 assets, strictly increasing signal and return.
        let signal_row: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let fwd_row: Vec<f64> = (0..100).map(|i| i as f64 / 1000.0).collect();
        let signal = panel_from_rows(&[signal_row]);
        let forward = panel_from_rows(&[fwd_row]);

        let config = DecileConfig { n_buckets: 10, min_valid: 10 };
        let report = decile_returns(&signal, &forward, &config).unwrap();

        assert_eq!(report.dates.len(), 1);
        // Each bucket holds exactly 10 members: bucket means are the means
        // of consecutive 10-value blocks of the return row.
        for b in 0..10 {
            let block_mean: f64 = (0..10).map(|i| (b * 10 + i) as f64 / 1000.0).sum::<f64>() / 10.0;
            assert!((report.bucket_returns[0][b] - block_mean).abs() < 1e-12);
        }
        // Monotone signal implies monotone bucket means.
        for b in 1..10 {
            assert!(report.mean_by_bucket[b] >= report.mean_by_bucket[b - 1]);
        }
        assert!(report.top_bottom_spread > 0.0);
    }

    #[test]
    fn test_date_below_min_valid_is_skipped() {
        let signal = panel_from_rows(&[vec![1.0, 2.0, 3.0], vec![1.0, f64::NAN, f64::NAN]]);
        let forward = panel_from_rows(&[vec![0.1, 0.2, 0.3], vec![0.1, 0.2, 0.3]]);

        let config = DecileConfig { n_buckets: 3, min_valid: 2 };
        let report = decile_returns(&signal, &forward, &config).unwrap();
        assert_eq!(report.dates.len(), 1);
    }

    #[test]
    fn test_ties_broken_by_asset_order() {
        // All signals tie: bucket membership must follow column order.
        let signal = panel_from_rows(&[vec![1.0, 1.0, 1.0, 1.0]]);
        let forward = panel_from_rows(&[vec![0.01, 0.02, 0.03, 0.04]]);

        let config = DecileConfig { n_buckets: 2, min_valid: 1 };
        let report = decile_returns(&signal, &forward, &config).unwrap();
        assert!((report.bucket_returns[0][0] - 0.015).abs() < 1e-12);
        assert!((report.bucket_returns[0][1] - 0.035).abs() < 1e-12);
    }

    #[test]
    fn test_zero_buckets_rejected() {
        let signal = panel_from_rows(&[vec![1.0]]);
        let forward = panel_from_rows(&[vec![0.1]]);
        let config = DecileConfig { n_buckets: 0, min_valid: 1 };
        assert!(decile_returns(&signal, &forward, &config).is_err());
    }
}
