//! Signal construction: standardization primitives and concrete signals.
//!
//! All functions are pure panel-in, panel-out transformations. Cross-
//! sectional operations work per date row; rolling operations work per
//! asset column, date-ordered ascending.

pub mod momentum;
pub mod returns;
pub mod standardize;
pub mod volume;

pub use momentum::{momentum_zscore, raw_momentum, MomentumParams};
pub use returns::{forward_returns, simple_returns};
pub use standardize::{cross_sectional_zscore, rolling_zscore, row_quantile, winsorize};
pub use volume::{volume_shock, volume_shock_cross_sectional, VolumeShockParams};
