//! Dated, asset-keyed numeric panels.
//!
//! A [`Panel`] is an ordered sequence of trading dates by a set of asset
//! identifiers mapping to `f64` values, stored row-major (one contiguous
//! row per date). NaN marks a missing value. All transformations return a
//! new panel; nothing mutates input panels in place.

use chrono::NaiveDate;

use crate::core::error::{AlphaError, Result};

/// A date x asset matrix of real values with NaN as the missing marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    /// Row-major: `values[d * assets.len() + a]`.
    values: Vec<f64>,
}

impl Panel {
    /// Create a panel from a date index, asset ids, and row-major values.
    ///
    /// Fails if the value buffer does not match `dates.len() * assets.len()`,
    /// if dates are not strictly increasing, or if asset ids repeat.
    pub fn new(dates: Vec<NaiveDate>, assets: Vec<String>, values: Vec<f64>) -> Result<Self> {
        let expected = dates.len() * assets.len();
        if values.len() != expected {
            return Err(AlphaError::length_mismatch(expected, values.len()));
        }
        if dates.windows(2).any(|w| w[0] >= w[1]) {
            return Err(AlphaError::invalid_parameter(
                "panel date index must be strictly increasing",
            ));
        }
        for (i, a) in assets.iter().enumerate() {
            if assets[..i].contains(a) {
                return Err(AlphaError::invalid_parameter(format!(
                    "duplicate asset id in panel: {a}"
                )));
            }
        }
        Ok(Self { dates, assets, values })
    }

    /// Create a panel with every cell set to `fill`.
    pub fn filled(dates: Vec<NaiveDate>, assets: Vec<String>, fill: f64) -> Result<Self> {
        let n = dates.len() * assets.len();
        Self::new(dates, assets, vec![fill; n])
    }

    /// Number of dates (rows).
    #[inline]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of assets (columns).
    #[inline]
    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    /// Date index.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Asset ids, in column order.
    #[inline]
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Value at (date index, asset index).
    #[inline]
    pub fn get(&self, date_idx: usize, asset_idx: usize) -> f64 {
        self.values[date_idx * self.assets.len() + asset_idx]
    }

    /// Set value at (date index, asset index).
    #[inline]
    pub fn set(&mut self, date_idx: usize, asset_idx: usize, value: f64) {
        self.values[date_idx * self.assets.len() + asset_idx] = value;
    }

    /// Cross-sectional row for one date.
    #[inline]
    pub fn row(&self, date_idx: usize) -> &[f64] {
        let w = self.assets.len();
        &self.values[date_idx * w..(date_idx + 1) * w]
    }

    /// Mutable cross-sectional row for one date.
    #[inline]
    pub fn row_mut(&mut self, date_idx: usize) -> &mut [f64] {
        let w = self.assets.len();
        &mut self.values[date_idx * w..(date_idx + 1) * w]
    }

    /// Time series for one asset column.
    pub fn column(&self, asset_idx: usize) -> Vec<f64> {
        (0..self.dates.len()).map(|d| self.get(d, asset_idx)).collect()
    }

    /// Position of a date in the index, via binary search.
    pub fn date_position(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    /// Column index of an asset id.
    pub fn asset_position(&self, asset: &str) -> Option<usize> {
        self.assets.iter().position(|a| a == asset)
    }

    /// Apply a function to every cell, producing a new panel.
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            dates: self.dates.clone(),
            assets: self.assets.clone(),
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Shift each asset column along the date axis.
    ///
    /// Positive `n` moves values forward in time (value at date t becomes
    /// the value observed at t-n); negative `n` pulls future values back.
    /// Vacated positions are NaN.
    pub fn shift(&self, n: isize) -> Self {
        let rows = self.dates.len();
        let cols = self.assets.len();
        let mut values = vec![f64::NAN; rows * cols];

        for d in 0..rows {
            let src = d as isize - n;
            if src >= 0 && (src as usize) < rows {
                let src = src as usize;
                values[d * cols..(d + 1) * cols].copy_from_slice(self.row(src));
            }
        }

        Self { dates: self.dates.clone(), assets: self.assets.clone(), values }
    }

    /// One-period simple return per asset: `v[t]/v[t-1] - 1`.
    ///
    /// NaN where either value is missing or the prior value is zero.
    pub fn pct_change(&self) -> Self {
        let rows = self.dates.len();
        let cols = self.assets.len();
        let mut values = vec![f64::NAN; rows * cols];

        for d in 1..rows {
            for a in 0..cols {
                let prev = self.get(d - 1, a);
                let cur = self.get(d, a);
                if !prev.is_nan() && !cur.is_nan() && prev != 0.0 {
                    values[d * cols + a] = cur / prev - 1.0;
                }
            }
        }

        Self { dates: self.dates.clone(), assets: self.assets.clone(), values }
    }

    /// Restrict the panel to a subset of dates and assets, by index.
    fn select(&self, date_idx: &[usize], asset_idx: &[usize]) -> Self {
        let cols = asset_idx.len();
        let mut values = Vec::with_capacity(date_idx.len() * cols);
        for &d in date_idx {
            for &a in asset_idx {
                values.push(self.get(d, a));
            }
        }
        Self {
            dates: date_idx.iter().map(|&d| self.dates[d]).collect(),
            assets: asset_idx.iter().map(|&a| self.assets[a].clone()).collect(),
            values,
        }
    }

    /// Align two panels on the intersection of their dates and assets.
    ///
    /// Both returned panels share an identical date index and asset order.
    /// Fails if the panels have no common dates or no common assets at all:
    /// an empty intersection would silently produce a misleading "successful"
    /// empty result downstream.
    pub fn align(&self, other: &Panel) -> Result<(Panel, Panel)> {
        let (self_dates, other_dates) = intersect_sorted(&self.dates, &other.dates);
        if self_dates.is_empty() {
            return Err(AlphaError::alignment("panels share no dates"));
        }

        let mut self_assets = Vec::new();
        let mut other_assets = Vec::new();
        for (i, a) in self.assets.iter().enumerate() {
            if let Some(j) = other.asset_position(a) {
                self_assets.push(i);
                other_assets.push(j);
            }
        }
        if self_assets.is_empty() {
            return Err(AlphaError::alignment("panels share no assets"));
        }

        Ok((
            self.select(&self_dates, &self_assets),
            other.select(&other_dates, &other_assets),
        ))
    }

    /// Align three panels on their common dates and assets.
    pub fn align3(a: &Panel, b: &Panel, c: &Panel) -> Result<(Panel, Panel, Panel)> {
        let (a1, b1) = a.align(b)?;
        let (a2, c2) = a1.align(c)?;
        // b1 already shares a1's index; restrict it to a2's.
        let (b2, _) = b1.align(&a2)?;
        Ok((a2, b2, c2))
    }
}

/// Index pairs of equal elements in two strictly increasing sequences.
fn intersect_sorted(a: &[NaiveDate], b: &[NaiveDate]) -> (Vec<usize>, Vec<usize>) {
    let mut ia = Vec::new();
    let mut ib = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                ia.push(i);
                ib.push(j);
                i += 1;
                j += 1;
            }
        }
    }
    (ia, ib)
}
