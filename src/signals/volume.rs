//! Volume-shock signal: abnormal traded volume versus an asset's own
//! trailing history.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::panel::Panel;
use crate::signals::standardize::{cross_sectional_zscore, rolling_zscore, winsorize};

/// Parameters for the volume-shock signal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeShockParams {
    /// Trailing window for the rolling z-score, in trading days.
    pub window: usize,
    /// Minimum valid observations before the rolling z is defined.
    pub min_periods: usize,
    /// Whether to winsorize log-volume rows before z-scoring.
    pub winsorize: bool,
    /// Lower winsorization quantile.
    pub lower_q: f64,
    /// Upper winsorization quantile.
    pub upper_q: f64,
}

impl Default for VolumeShockParams {
    fn default() -> Self {
        Self { window: 60, min_periods: 40, winsorize: true, lower_q: 0.01, upper_q: 0.99 }
    }
}

/// Rolling z-score of log traded volume.
///
/// Zero or negative volume is treated as missing before the log transform.
/// Winsorization clips each cross-sectional log-volume row at the
/// configured quantiles to bound the influence of outliers.
pub fn volume_shock(volume: &Panel, params: &VolumeShockParams) -> Result<Panel> {
    let log_volume = volume.map(|v| if v > 0.0 { v.ln() } else { f64::NAN });
    let clipped = if params.winsorize {
        winsorize(&log_volume, params.lower_q, params.upper_q)?
    } else {
        log_volume
    };
    rolling_zscore(&clipped, params.window, params.min_periods)
}

/// Volume shock re-standardized cross-sectionally, for ranking assets
/// against each other on a given date.
pub fn volume_shock_cross_sectional(volume: &Panel, params: &VolumeShockParams) -> Result<Panel> {
    Ok(cross_sectional_zscore(&volume_shock(volume, params)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn volume_panel(column: Vec<f64>) -> Panel {
        let dates: Vec<NaiveDate> = (0..column.len() as i64)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(d))
            .collect();
        Panel::new(dates, vec!["A".to_string()], column).unwrap()
    }

    #[test]
    fn test_nonpositive_volume_is_missing() {
        let p = volume_panel(vec![0.0, -5.0, 1000.0, 2000.0]);
        let params = VolumeShockParams { window: 2, min_periods: 2, winsorize: false, ..Default::default() };
        let shock = volume_shock(&p, &params).unwrap();

        // First two inputs are invalid, so no window ever includes them;
        // date 3 is the first with two valid log-volume observations.
        assert!(shock.get(0, 0).is_nan());
        assert!(shock.get(1, 0).is_nan());
        assert!(shock.get(2, 0).is_nan());
        assert!(!shock.get(3, 0).is_nan());
    }

    #[test]
    fn test_shock_positive_on_volume_spike() {
        let mut column = vec![1000.0; 10];
        column[9] = 5000.0;
        let p = volume_panel(column);
        let params = VolumeShockParams { window: 5, min_periods: 3, winsorize: false, ..Default::default() };
        let shock = volume_shock(&p, &params).unwrap();
        assert!(shock.get(9, 0) > 0.0);
    }
}
