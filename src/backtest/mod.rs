//! Portfolio backtest: lagged-weight simulation and performance metrics.

pub mod metrics;
pub mod simulator;

pub use metrics::{annualized_sharpe, drawdown_curve, max_drawdown};
pub use simulator::{run_backtest, BacktestConfig, BacktestOutput, BacktestSummary};
