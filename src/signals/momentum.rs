//! Cross-sectional price momentum.

use serde::{Deserialize, Serialize};

use crate::core::error::{AlphaError, Result};
use crate::core::panel::Panel;
use crate::signals::standardize::cross_sectional_zscore;

/// Momentum lookback parameters.
///
/// The defaults give classic 12-1 momentum on a daily calendar: the return
/// from 252 trading days ago to 21 trading days ago, skipping the most
/// recent month to sidestep short-term reversal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MomentumParams {
    /// Recent days skipped (short leg of the return).
    pub short_gap: usize,
    /// Total lookback in trading days (long leg of the return).
    pub lookback: usize,
}

impl Default for MomentumParams {
    fn default() -> Self {
        Self { short_gap: 21, lookback: 252 }
    }
}

impl MomentumParams {
    /// Validate the parameters.
    pub fn validate(&self) -> Result<()> {
        if self.short_gap == 0 || self.lookback <= self.short_gap {
            return Err(AlphaError::invalid_config(format!(
                "momentum requires 0 < short_gap < lookback, got short_gap={}, lookback={}",
                self.short_gap, self.lookback
            )));
        }
        Ok(())
    }
}

/// Raw momentum per asset: `price[t - short_gap] / price[t - lookback] - 1`.
///
/// NaN during the warmup period and wherever either price is missing.
pub fn raw_momentum(prices: &Panel, params: &MomentumParams) -> Result<Panel> {
    params.validate()?;

    let p_short = prices.shift(params.short_gap as isize);
    let p_long = prices.shift(params.lookback as isize);

    let mut out = p_short;
    for d in 0..out.n_dates() {
        for a in 0..out.n_assets() {
            let short = out.get(d, a);
            let long = p_long.get(d, a);
            let v = if short.is_nan() || long.is_nan() || long == 0.0 {
                f64::NAN
            } else {
                short / long - 1.0
            };
            out.set(d, a, v);
        }
    }
    Ok(out)
}

/// Momentum signal: raw momentum standardized cross-sectionally per date.
pub fn momentum_zscore(prices: &Panel, params: &MomentumParams) -> Result<Panel> {
    Ok(cross_sectional_zscore(&raw_momentum(prices, params)?))
}
