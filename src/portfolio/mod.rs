//! Long-only portfolio construction from signal sleeves.

pub mod sleeves;
pub mod weights;

pub use sleeves::{
    abs_below_quantile_mask, bottom_quantile_mask, combine_sleeves, top_quantile_mask, Mask, Sleeve,
};
pub use weights::{long_only_weights, WeightConfig};
