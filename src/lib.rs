//! AlphaPanel - cross-sectional alpha research core.
//!
//! This crate turns sparse, irregularly-timed fundamental events and raw
//! market panels into dense daily cross-sectional signals, evaluates their
//! predictive power, and simulates a long-only portfolio built from them:
//! - Date x asset panel store with alignment primitives
//! - Event-decay aggregation (exponential forgetting over a trading calendar)
//! - Cross-sectional, rolling, and expanding standardization
//! - Decile-bucket and rank-correlation (IC) signal evaluation
//! - Long-only weight construction with per-name caps
//! - No-lookahead backtest with turnover and transaction-cost accounting
//!
//! All stages are pure transformations over in-memory panels. `f64::NAN`
//! is the first-class missing marker and propagates through aggregation as
//! "excluded from this statistic"; it never causes a crash.

pub mod backtest;
pub mod core;
pub mod evaluate;
pub mod events;
pub mod portfolio;
pub mod signals;

pub use crate::core::error::{AlphaError, Result};
pub use crate::core::panel::Panel;
