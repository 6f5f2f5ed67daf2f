//! Earnings surprise computation and within-asset standardization.

use std::collections::BTreeMap;

use crate::events::table::{Event, EventRecord};

/// Default denominator floor for surprise computation.
pub const DEFAULT_DENOM_FLOOR: f64 = 1e-6;

/// Raw EPS surprise per event: `(actual - estimate) / (|estimate| + floor)`.
///
/// The floor keeps near-zero estimates from producing unbounded surprises.
/// Events with a missing actual or estimate get a NaN magnitude.
pub fn eps_surprise(records: &[EventRecord], denom_floor: f64) -> Vec<Event> {
    records
        .iter()
        .map(|r| {
            let magnitude = if r.actual.is_nan() || r.estimate.is_nan() {
                f64::NAN
            } else {
                (r.actual - r.estimate) / (r.estimate.abs() + denom_floor)
            };
            Event::new(r.asset.clone(), r.date, magnitude)
        })
        .collect()
}

/// Standardize each event's magnitude against the asset's own prior events.
///
/// For the n-th event of an asset (events ordered by date), the mean and
/// sample standard deviation are computed over the valid magnitudes of
/// events strictly before it. Fewer than `min_prior` prior observations, or
/// a zero standard deviation, leave the magnitude undefined (NaN). The
/// strict expanding window guarantees no future event informs a past one.
///
/// Output events keep their input order.
pub fn standardize_within_asset(events: &[Event], min_prior: usize) -> Vec<Event> {
    // Event indices grouped per asset, ordered by date (stable on ties).
    let mut by_asset: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, e) in events.iter().enumerate() {
        by_asset.entry(e.asset.as_str()).or_default().push(i);
    }

    let mut out: Vec<Event> = events.to_vec();
    for indices in by_asset.values() {
        let mut ordered = indices.clone();
        ordered.sort_by_key(|&i| events[i].date);

        // Running sums over valid prior magnitudes.
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut sum_sq = 0.0;

        for &i in &ordered {
            let x = events[i].magnitude;

            out[i].magnitude = if x.is_nan() || count < min_prior {
                f64::NAN
            } else {
                let mean = sum / count as f64;
                let var = (sum_sq - sum * sum / count as f64) / (count - 1) as f64;
                let std = var.max(0.0).sqrt();
                if std > 0.0 {
                    (x - mean) / std
                } else {
                    f64::NAN
                }
            };

            if !x.is_nan() {
                count += 1;
                sum += x;
                sum_sq += x * x;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn test_eps_surprise_basic() {
        let records = vec![EventRecord::new("A", d(1, 10), 1.2, 1.0)];
        let events = eps_surprise(&records, DEFAULT_DENOM_FLOOR);
        assert!((events[0].magnitude - 0.2 / (1.0 + 1e-6)).abs() < 1e-9);
    }

    #[test]
    fn test_eps_surprise_missing_estimate() {
        let records = vec![EventRecord::new("A", d(1, 10), 1.2, f64::NAN)];
        let events = eps_surprise(&records, DEFAULT_DENOM_FLOOR);
        assert!(events[0].magnitude.is_nan());
    }

    #[test]
    fn test_expanding_needs_min_prior() {
        let events: Vec<Event> = (1..=5)
            .map(|i| Event::new("A", d(1, i as u32), i as f64))
            .collect();
        let z = standardize_within_asset(&events, 3);

        // First three events have fewer than 3 priors.
        assert!(z[0].magnitude.is_nan());
        assert!(z[1].magnitude.is_nan());
        assert!(z[2].magnitude.is_nan());

        // Fourth event: priors [1, 2, 3], mean 2, sample std 1.
        assert!((z[3].magnitude - 2.0).abs() < 1e-9);
        // Fifth event: priors [1, 2, 3, 4], mean 2.5, sample std ~1.2910.
        let expected = (5.0 - 2.5) / (5.0f64 / 3.0).sqrt();
        assert!((z[4].magnitude - expected).abs() < 1e-9);
    }

    #[test]
    fn test_expanding_ignores_future_events() {
        // Changing a later event's magnitude must not affect earlier z-scores.
        let mut events: Vec<Event> = (1..=5)
            .map(|i| Event::new("A", d(1, i as u32), i as f64))
            .collect();
        let base = standardize_within_asset(&events, 3);

        events[4].magnitude = 100.0;
        let bumped = standardize_within_asset(&events, 3);

        assert!((base[3].magnitude - bumped[3].magnitude).abs() < 1e-12);
    }

    #[test]
    fn test_zero_prior_std_is_missing() {
        let events = vec![
            Event::new("A", d(1, 1), 1.0),
            Event::new("A", d(1, 2), 1.0),
            Event::new("A", d(1, 3), 1.0),
            Event::new("A", d(1, 4), 2.0),
        ];
        let z = standardize_within_asset(&events, 3);
        assert!(z[3].magnitude.is_nan());
    }

    #[test]
    fn test_invalid_magnitudes_excluded_from_history() {
        let events = vec![
            Event::new("A", d(1, 1), 1.0),
            Event::new("A", d(1, 2), f64::NAN),
            Event::new("A", d(1, 3), 2.0),
            Event::new("A", d(1, 4), 3.0),
            Event::new("A", d(1, 5), 4.0),
        ];
        let z = standardize_within_asset(&events, 3);
        // Priors for the last event are [1, 2, 3]: the NaN event is skipped.
        assert!((z[4].magnitude - 2.0).abs() < 1e-9);
    }
}
