//! Sleeve selection: cross-sectional threshold masks and additive scoring.
//!
//! A sleeve is a rule-based membership set (e.g., "top-quintile momentum
//! with neutral sentiment") plus the raw score its members receive before
//! normalization. Multiple sleeves contribute additively, so an asset
//! flagged by several sleeves carries a higher raw score.

use chrono::NaiveDate;

use crate::core::error::{AlphaError, Result};
use crate::core::panel::Panel;
use crate::signals::standardize::row_quantile;

/// A boolean date x asset grid aligned with a panel's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    values: Vec<bool>,
}

impl Mask {
    fn from_panel<F>(panel: &Panel, predicate: F) -> Self
    where
        F: Fn(usize, f64) -> bool,
    {
        let mut values = Vec::with_capacity(panel.n_dates() * panel.n_assets());
        for d in 0..panel.n_dates() {
            for &v in panel.row(d) {
                values.push(predicate(d, v));
            }
        }
        Self { dates: panel.dates().to_vec(), assets: panel.assets().to_vec(), values }
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

    /// Membership at (date index, asset index).
    #[inline]
    pub fn get(&self, date_idx: usize, asset_idx: usize) -> bool {
        self.values[date_idx * self.assets.len() + asset_idx]
    }

    /// Count of members on one date.
    pub fn count_row(&self, date_idx: usize) -> usize {
        let w = self.assets.len();
        self.values[date_idx * w..(date_idx + 1) * w].iter().filter(|&&v| v).count()
    }

    fn check_shape(&self, other: &Mask) -> Result<()> {
        if self.dates != other.dates || self.assets != other.assets {
            return Err(AlphaError::alignment("masks do not share a date/asset index"));
        }
        Ok(())
    }

    /// Logical AND with another mask of the same shape.
    pub fn and(&self, other: &Mask) -> Result<Mask> {
        self.check_shape(other)?;
        Ok(Mask {
            dates: self.dates.clone(),
            assets: self.assets.clone(),
            values: self.values.iter().zip(&other.values).map(|(&a, &b)| a && b).collect(),
        })
    }

    /// Logical OR with another mask of the same shape.
    pub fn or(&self, other: &Mask) -> Result<Mask> {
        self.check_shape(other)?;
        Ok(Mask {
            dates: self.dates.clone(),
            assets: self.assets.clone(),
            values: self.values.iter().zip(&other.values).map(|(&a, &b)| a || b).collect(),
        })
    }

    /// Logical NOT.
    pub fn not(&self) -> Mask {
        Mask {
            dates: self.dates.clone(),
            assets: self.assets.clone(),
            values: self.values.iter().map(|&v| !v).collect(),
        }
    }
}

/// Per-row upper quantiles of a panel, one value per date.
fn row_quantiles(panel: &Panel, q: f64) -> Result<Vec<f64>> {
    if !(0.0..=1.0).contains(&q) {
        return Err(AlphaError::invalid_parameter(format!(
            "quantile threshold must be in [0, 1], got {q}"
        )));
    }
    Ok((0..panel.n_dates()).map(|d| row_quantile(panel.row(d), q)).collect())
}

/// Members: value >= the date's q-quantile. NaN never qualifies.
pub fn top_quantile_mask(panel: &Panel, q: f64) -> Result<Mask> {
    let thresholds = row_quantiles(panel, q)?;
    Ok(Mask::from_panel(panel, |d, v| !v.is_nan() && v >= thresholds[d]))
}

/// Members: value <= the date's q-quantile. NaN never qualifies.
pub fn bottom_quantile_mask(panel: &Panel, q: f64) -> Result<Mask> {
    let thresholds = row_quantiles(panel, q)?;
    Ok(Mask::from_panel(panel, |d, v| !v.is_nan() && v <= thresholds[d]))
}

/// Members: |value| <= the date's q-quantile of |row|.
///
/// Selects assets in the middle of the distribution by magnitude (the
/// "neutral" filter: not strongly positive or negative).
pub fn abs_below_quantile_mask(panel: &Panel, q: f64) -> Result<Mask> {
    let abs_panel = panel.map(f64::abs);
    let thresholds = row_quantiles(&abs_panel, q)?;
    Ok(Mask::from_panel(&abs_panel, |d, v| !v.is_nan() && v <= thresholds[d]))
}

/// A sleeve: membership mask plus the raw score each member receives.
#[derive(Debug, Clone)]
pub struct Sleeve {
    /// Which (date, asset) cells belong to the sleeve.
    pub mask: Mask,
    /// Raw pre-normalization score added to each member.
    pub score: f64,
}

impl Sleeve {
    /// Create a sleeve.
    pub fn new(mask: Mask, score: f64) -> Self {
        Self { mask, score }
    }
}

/// Combine sleeves into a raw score panel by additive contribution.
///
/// All sleeves must share one date/asset index. The result is a dense
/// panel of non-negative scores (assuming non-negative sleeve scores)
/// ready for [`crate::portfolio::long_only_weights`].
pub fn combine_sleeves(sleeves: &[Sleeve]) -> Result<Panel> {
    let first = sleeves
        .first()
        .ok_or_else(|| AlphaError::empty_data("sleeve combination"))?;
    for s in &sleeves[1..] {
        first.mask.check_shape(&s.mask)?;
    }

    let mut panel = Panel::filled(first.mask.dates.to_vec(), first.mask.assets.to_vec(), 0.0)?;
    for sleeve in sleeves {
        for d in 0..panel.n_dates() {
            for a in 0..panel.n_assets() {
                if sleeve.mask.get(d, a) {
                    let cur = panel.get(d, a);
                    panel.set(d, a, cur + sleeve.score);
                }
            }
        }
    }
    Ok(panel)
}
