//! Realized and forward return panels.

use crate::core::error::{AlphaError, Result};
use crate::core::panel::Panel;

/// Forward return over a fixed horizon: `price[t+h] / price[t] - 1`.
///
/// The value at date t is the realized future return being predicted; it
/// must only ever sit on the right-hand side of an evaluation, never feed a
/// signal. The final `horizon` rows are NaN.
pub fn forward_returns(prices: &Panel, horizon: usize) -> Result<Panel> {
    if horizon == 0 {
        return Err(AlphaError::invalid_parameter("forward return horizon must be at least 1"));
    }

    let future = prices.shift(-(horizon as isize));
    let mut out = future;
    for d in 0..out.n_dates() {
        for a in 0..out.n_assets() {
            let fut = out.get(d, a);
            let cur = prices.get(d, a);
            let v = if fut.is_nan() || cur.is_nan() || cur == 0.0 {
                f64::NAN
            } else {
                fut / cur - 1.0
            };
            out.set(d, a, v);
        }
    }
    Ok(out)
}

/// One-day simple returns per asset.
pub fn simple_returns(prices: &Panel) -> Panel {
    prices.pct_change()
}
