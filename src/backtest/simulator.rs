//! Single-pass, time-ordered portfolio simulation.
//!
//! The simulator owns the weight lag: callers hand it target weights and
//! prices, and the one-day lag is applied internally and unconditionally.
//! Same-day weights against same-day returns are not reachable through the
//! public contract.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::backtest::metrics::{annualized_sharpe, max_drawdown};
use crate::core::error::{AlphaError, Result};
use crate::core::panel::Panel;
use crate::signals::returns::simple_returns;

/// Backtest configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Linear transaction cost in basis points per unit turnover.
    /// Zero or negative disables cost accounting.
    pub cost_bps: f64,
    /// Periods per year used to annualize the Sharpe ratio.
    pub periods_per_year: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self { cost_bps: 0.0, periods_per_year: 252.0 }
    }
}

impl BacktestConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.periods_per_year > 0.0) {
            return Err(AlphaError::invalid_config(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }
        Ok(())
    }
}

/// Aggregate backtest statistics.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestSummary {
    /// Annualized Sharpe of gross returns.
    pub sharpe_gross: f64,
    /// Annualized Sharpe of net returns.
    pub sharpe_net: f64,
    /// Max drawdown of gross equity (non-positive fraction).
    pub max_drawdown_gross: f64,
    /// Max drawdown of net equity.
    pub max_drawdown_net: f64,
    /// Mean daily turnover.
    pub avg_turnover: f64,
    /// Annualized Sharpe of the equal-weight benchmark.
    pub benchmark_sharpe: f64,
    /// Max drawdown of the equal-weight benchmark equity.
    pub benchmark_max_drawdown: f64,
}

/// Per-date series and summary statistics from a backtest run.
#[derive(Debug, Clone)]
pub struct BacktestOutput {
    /// Simulation dates (the aligned weight/price calendar).
    pub dates: Vec<NaiveDate>,
    /// Gross portfolio return per date.
    pub gross_returns: Vec<f64>,
    /// Net (cost-adjusted) portfolio return per date.
    pub net_returns: Vec<f64>,
    /// Turnover per date: sum of absolute day-over-day weight changes.
    pub turnover: Vec<f64>,
    /// Cumulative product of one plus gross return, from 1.0.
    pub gross_equity: Vec<f64>,
    /// Cumulative product of one plus net return, from 1.0.
    pub net_equity: Vec<f64>,
    /// Equal-weight benchmark return per date (NaN with no valid returns).
    pub benchmark_returns: Vec<f64>,
    /// Benchmark equity curve; NaN benchmark dates compound as flat.
    pub benchmark_equity: Vec<f64>,
    /// Summary statistics.
    pub summary: BacktestSummary,
}

/// Simulate a long-only portfolio from target weights and prices.
///
/// Weights and prices are aligned on their common dates and assets (fatal
/// if the overlap is empty). Realized one-day returns are derived from the
/// aligned prices, and the weights applied on date t are date t-1's
/// targets; the first date carries all-zero lagged weights and so earns
/// exactly zero.
///
/// Missing-return convention: an asset whose realized return is missing on
/// a date contributes zero to that date's portfolio return. The position
/// is treated as flat rather than dropped, and the remaining weights are
/// not renormalized.
pub fn run_backtest(weights: &Panel, prices: &Panel, config: &BacktestConfig) -> Result<BacktestOutput> {
    config.validate()?;
    let (weights, prices) = weights.align(prices)?;
    let returns = simple_returns(&prices);

    let n_dates = weights.n_dates();
    let n_assets = weights.n_assets();

    let mut gross_returns = vec![0.0; n_dates];
    let mut net_returns = vec![0.0; n_dates];
    let mut turnover = vec![0.0; n_dates];
    let mut gross_equity = vec![1.0; n_dates];
    let mut net_equity = vec![1.0; n_dates];
    let mut benchmark_returns = vec![f64::NAN; n_dates];
    let mut benchmark_equity = vec![1.0; n_dates];

    let cost_rate = if config.cost_bps > 0.0 { config.cost_bps / 10_000.0 } else { 0.0 };

    for d in 0..n_dates {
        // Mandatory one-day lag: today's PnL accrues to yesterday's targets.
        let mut gross = 0.0;
        if d > 0 {
            let lagged = weights.row(d - 1);
            let ret_row = returns.row(d);
            for a in 0..n_assets {
                let w = lagged[a];
                let r = ret_row[a];
                if w != 0.0 && !r.is_nan() {
                    gross += w * r;
                }
            }
        }
        gross_returns[d] = gross;

        // Turnover on un-lagged weights: the trade from yesterday's targets
        // to today's. Day one trades from nothing and is counted as zero,
        // matching the reference accounting.
        if d > 0 {
            let prev = weights.row(d - 1);
            let cur = weights.row(d);
            let mut to = 0.0;
            for a in 0..n_assets {
                to += (cur[a] - prev[a]).abs();
            }
            turnover[d] = to;
        }

        net_returns[d] = gross - cost_rate * turnover[d];

        let valid: Vec<f64> = returns.row(d).iter().copied().filter(|v| !v.is_nan()).collect();
        if !valid.is_empty() {
            benchmark_returns[d] = valid.iter().sum::<f64>() / valid.len() as f64;
        }

        let prev_gross = if d > 0 { gross_equity[d - 1] } else { 1.0 };
        let prev_net = if d > 0 { net_equity[d - 1] } else { 1.0 };
        let prev_bench = if d > 0 { benchmark_equity[d - 1] } else { 1.0 };
        gross_equity[d] = prev_gross * (1.0 + gross_returns[d]);
        net_equity[d] = prev_net * (1.0 + net_returns[d]);
        benchmark_equity[d] = if benchmark_returns[d].is_nan() {
            prev_bench
        } else {
            prev_bench * (1.0 + benchmark_returns[d])
        };
    }

    let avg_turnover = if n_dates > 0 {
        turnover.iter().sum::<f64>() / n_dates as f64
    } else {
        f64::NAN
    };

    let summary = BacktestSummary {
        sharpe_gross: annualized_sharpe(&gross_returns, config.periods_per_year),
        sharpe_net: annualized_sharpe(&net_returns, config.periods_per_year),
        max_drawdown_gross: max_drawdown(&gross_equity),
        max_drawdown_net: max_drawdown(&net_equity),
        avg_turnover,
        benchmark_sharpe: annualized_sharpe(&benchmark_returns, config.periods_per_year),
        benchmark_max_drawdown: max_drawdown(&benchmark_equity),
    };

    Ok(BacktestOutput {
        dates: weights.dates().to_vec(),
        gross_returns,
        net_returns,
        turnover,
        gross_equity,
        net_equity,
        benchmark_returns,
        benchmark_equity,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Panel whose rows are given per date, assets named A0, A1, ...
    fn panel_from_rows(rows: &[Vec<f64>]) -> Panel {
        let n_assets = rows[0].len();
        let dates: Vec<NaiveDate> = (0..rows.len() as i64)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(d))
            .collect();
        let assets: Vec<String> = (0..n_assets).map(|i| format!("A{i}")).collect();
        let values: Vec<f64> = rows.iter().flatten().copied().collect();
        Panel::new(dates, assets, values).unwrap()
    }

    /// Price paths with per-asset constant daily returns.
    fn constant_return_prices(n_dates: usize, daily: &[f64]) -> Panel {
        let mut rows = vec![vec![100.0; daily.len()]];
        for d in 1..n_dates {
            let prev = rows[d - 1].clone();
            rows.push(prev.iter().zip(daily).map(|(p, r)| p * (1.0 + r)).collect());
        }
        panel_from_rows(&rows)
    }

    #[test]
    fn test_offsetting_returns_hold_equity_flat() {
        let prices = constant_return_prices(6, &[0.01, -0.01]);
        let weights = panel_from_rows(&vec![vec![0.5, 0.5]; 6]);

        let out = run_backtest(&weights, &prices, &BacktestConfig::default()).unwrap();
        for d in 0..6 {
            assert!(out.gross_returns[d].abs() < 1e-12);
            assert!((out.gross_equity[d] - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_first_date_has_no_position() {
        let prices = constant_return_prices(4, &[0.10]);
        let weights = panel_from_rows(&vec![vec![1.0]; 4]);

        let out = run_backtest(&weights, &prices, &BacktestConfig::default()).unwrap();
        assert_eq!(out.gross_returns[0], 0.0);
        // Return at t uses t-1 weights; price return at t=1 exists.
        assert!((out.gross_returns[1] - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_lag_prevents_lookahead() {
        // Weights switch on only for the last date: they can never be
        // applied, so PnL is identically zero.
        let prices = constant_return_prices(5, &[0.05]);
        let mut rows = vec![vec![0.0]; 5];
        rows[4] = vec![1.0];
        let weights = panel_from_rows(&rows);

        let out = run_backtest(&weights, &prices, &BacktestConfig::default()).unwrap();
        assert!(out.gross_returns.iter().all(|&r| r == 0.0));
        assert!((out.gross_equity[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_turnover_and_costs() {
        let prices = constant_return_prices(3, &[0.0, 0.0]);
        let weights = panel_from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]]);

        let config = BacktestConfig { cost_bps: 10.0, ..Default::default() };
        let out = run_backtest(&weights, &prices, &config).unwrap();

        assert_eq!(out.turnover[0], 0.0);
        assert!((out.turnover[1] - 2.0).abs() < 1e-12);
        assert_eq!(out.turnover[2], 0.0);

        // 10 bps on turnover 2.0 costs 20 bps that day.
        assert!((out.net_returns[1] + 0.002).abs() < 1e-12);
        assert_eq!(out.net_returns[2], 0.0);
    }

    #[test]
    fn test_nonpositive_cost_rate_is_noop() {
        let prices = constant_return_prices(3, &[0.01]);
        let weights = panel_from_rows(&[vec![1.0], vec![0.0], vec![1.0]]);

        let config = BacktestConfig { cost_bps: -5.0, ..Default::default() };
        let out = run_backtest(&weights, &prices, &config).unwrap();
        assert_eq!(out.gross_returns, out.net_returns);
    }

    #[test]
    fn test_missing_return_contributes_zero() {
        // Asset B has a missing price on the last date: its return is NaN
        // and its position is treated as flat that day.
        let prices = panel_from_rows(&[
            vec![100.0, 100.0],
            vec![101.0, 102.0],
            vec![102.01, f64::NAN],
        ]);
        let weights = panel_from_rows(&vec![vec![0.5, 0.5]; 3]);

        let out = run_backtest(&weights, &prices, &BacktestConfig::default()).unwrap();
        assert!((out.gross_returns[1] - 0.5 * (0.01 + 0.02)).abs() < 1e-12);
        assert!((out.gross_returns[2] - 0.5 * 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_benchmark_is_equal_weight() {
        let prices = constant_return_prices(3, &[0.02, 0.04]);
        let weights = panel_from_rows(&vec![vec![1.0, 0.0]; 3]);

        let out = run_backtest(&weights, &prices, &BacktestConfig::default()).unwrap();
        assert!(out.benchmark_returns[0].is_nan());
        assert!((out.benchmark_returns[1] - 0.03).abs() < 1e-12);
        // NaN first date compounds as flat.
        assert!((out.benchmark_equity[0] - 1.0).abs() < 1e-12);
        assert!((out.benchmark_equity[1] - 1.03).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_panels_fail() {
        let prices = constant_return_prices(3, &[0.01]);
        let dates: Vec<NaiveDate> = (0..3)
            .map(|d| NaiveDate::from_ymd_opt(2025, 6, 1).unwrap() + chrono::Duration::days(d))
            .collect();
        let weights = Panel::new(dates, vec!["A0".to_string()], vec![1.0; 3]).unwrap();
        assert!(run_backtest(&weights, &prices, &BacktestConfig::default()).is_err());
    }

    #[test]
    fn test_rerun_is_bit_identical() {
        let prices = constant_return_prices(10, &[0.01, -0.005, 0.002]);
        let weights = panel_from_rows(&vec![vec![0.3, 0.3, 0.4]; 10]);

        let config = BacktestConfig { cost_bps: 5.0, ..Default::default() };
        let a = run_backtest(&weights, &prices, &config).unwrap();
        let b = run_backtest(&weights, &prices, &config).unwrap();
        assert_eq!(a.gross_returns, b.gross_returns);
        assert_eq!(a.net_equity, b.net_equity);
        assert_eq!(a.turnover, b.turnover);
    }

    #[test]
    fn test_invalid_periods_per_year() {
        let prices = constant_return_prices(3, &[0.01]);
        let weights = panel_from_rows(&vec![vec![1.0]; 3]);
        let config = BacktestConfig { cost_bps: 0.0, periods_per_year: 0.0 };
        assert!(run_backtest(&weights, &prices, &config).is_err());
    }
}
