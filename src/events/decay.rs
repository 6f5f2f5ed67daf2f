//! Decay aggregator: sparse events to a dense daily signal panel.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::error::{AlphaError, Result};
use crate::core::panel::Panel;
use crate::events::table::Event;

/// Configuration for exponential event decay.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Trading days after which an event's contribution halves.
    pub half_life_days: f64,
    /// Maximum number of trading days an event stays active.
    pub active_window_days: usize,
}

impl Default for DecayConfig {
    fn default() -> Self {
        // Post-earnings drift parameters: 2-month half-life, 6-month window.
        Self { half_life_days: 42.0, active_window_days: 126 }
    }
}

impl DecayConfig {
    /// Validate the configuration before any computation.
    pub fn validate(&self) -> Result<()> {
        if !(self.half_life_days > 0.0) || !self.half_life_days.is_finite() {
            return Err(AlphaError::invalid_config(format!(
                "half_life_days must be a positive finite number, got {}",
                self.half_life_days
            )));
        }
        if self.active_window_days == 0 {
            return Err(AlphaError::invalid_config("active_window_days must be at least 1"));
        }
        Ok(())
    }

    /// Decay constant lambda = ln(2) / half_life.
    #[inline]
    pub fn lambda(&self) -> f64 {
        std::f64::consts::LN_2 / self.half_life_days
    }
}

/// Spread event magnitudes across a trading calendar with exponential decay.
///
/// An event landing on calendar index `i0` contributes
/// `magnitude * exp(-lambda * (i - i0))` to every date `i` with
/// `i0 <= i < i0 + active_window_days`, truncated at the calendar end.
/// Contributions from multiple events for the same asset add up.
///
/// Events whose date is not a calendar entry, and events with a NaN
/// magnitude, are dropped without error. Output columns are exactly the
/// sorted distinct assets appearing in `events` (the emergent universe);
/// assets without events are absent, and cells default to 0.0 rather than
/// NaN because contributions are additive.
///
/// Cost is O(events x active_window); no event triggers a full-panel scan.
pub fn decay_panel(events: &[Event], calendar: &[NaiveDate], config: &DecayConfig) -> Result<Panel> {
    config.validate()?;
    if calendar.is_empty() {
        return Err(AlphaError::empty_data("decay aggregator trading calendar"));
    }
    if calendar.windows(2).any(|w| w[0] >= w[1]) {
        return Err(AlphaError::invalid_parameter(
            "trading calendar must be strictly increasing and deduplicated",
        ));
    }

    let assets: Vec<String> = events
        .iter()
        .map(|e| e.asset.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut panel = Panel::filled(calendar.to_vec(), assets, 0.0)?;
    let lambda = config.lambda();
    let n_dates = calendar.len();

    for event in events {
        if event.magnitude.is_nan() {
            continue;
        }
        let Ok(i0) = calendar.binary_search(&event.date) else {
            // Non-trading day or outside the panel range: defined no-op.
            continue;
        };
        // Asset is present by construction.
        let a = panel.asset_position(&event.asset).unwrap();

        let end = (i0 + config.active_window_days).min(n_dates);
        for i in i0..end {
            let decayed = event.magnitude * (-lambda * (i - i0) as f64).exp();
            let cur = panel.get(i, a);
            panel.set(i, a, cur + decayed);
        }
    }

    Ok(panel)
}
