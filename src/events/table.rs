//! Event table row types.

use chrono::NaiveDate;

use crate::core::parse::coerce_numeric;

/// A raw earnings observation after provider merge/dedup.
///
/// The merge itself (provider priority, de-duplication by asset and date)
/// is an external collaborator's responsibility; at most one record per
/// (asset, date) is expected here. Missing actual or estimate is NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    /// Asset identifier.
    pub asset: String,
    /// Announcement date.
    pub date: NaiveDate,
    /// Reported value (e.g., actual EPS).
    pub actual: f64,
    /// Consensus estimate.
    pub estimate: f64,
}

impl EventRecord {
    /// Create a record from already-numeric fields.
    pub fn new(asset: impl Into<String>, date: NaiveDate, actual: f64, estimate: f64) -> Self {
        Self { asset: asset.into(), date, actual, estimate }
    }

    /// Create a record from textual actual/estimate fields.
    ///
    /// Unparseable fields become missing via [`coerce_numeric`], which logs
    /// each lossy coercion.
    pub fn from_raw(asset: impl Into<String>, date: NaiveDate, actual: &str, estimate: &str) -> Self {
        Self {
            asset: asset.into(),
            date,
            actual: coerce_numeric(actual),
            estimate: coerce_numeric(estimate),
        }
    }
}

/// A canonical (asset, date, magnitude) triple.
///
/// This is the unit the decay aggregator consumes. A NaN magnitude is a
/// defined state: the event exists but contributes nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Asset identifier.
    pub asset: String,
    /// Event date.
    pub date: NaiveDate,
    /// Standardized magnitude, NaN if undefined.
    pub magnitude: f64,
}

impl Event {
    /// Create an event.
    pub fn new(asset: impl Into<String>, date: NaiveDate, magnitude: f64) -> Self {
        Self { asset: asset.into(), date, magnitude }
    }
}
