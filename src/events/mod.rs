//! Sparse event ingestion and the decay aggregator.
//!
//! Events arrive as (asset, date, actual, estimate) rows from an external
//! provider-merge step. This module computes standardized surprise
//! magnitudes and spreads them across a trading calendar with exponential
//! forgetting.

pub mod decay;
pub mod surprise;
pub mod table;

pub use decay::{decay_panel, DecayConfig};
pub use surprise::{eps_surprise, standardize_within_asset};
pub use table::{Event, EventRecord};
