//! Signal-quality evaluation against forward returns.
//!
//! Diagnostic only: nothing here feeds the portfolio constructor.

pub mod decile;
pub mod ic;

pub use decile::{decile_returns, DecileConfig, DecileReport};
pub use ic::{ic_series, summarize_ic, IcConfig, IcSeries, IcSummary};
