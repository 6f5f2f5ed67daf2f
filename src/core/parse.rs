//! Lossy numeric coercion with an audit trail.
//!
//! Raw fundamental feeds carry textual sentinels ("NULL", empty cells) and
//! the occasional garbage token. Coercion to a missing marker is deliberate
//! and must be observable, so every failed parse is logged.

/// Parse a textual numeric field, returning NaN on failure.
///
/// Empty strings and the literal "NULL" are treated as ordinary missing
/// values and are not logged; anything else that fails to parse is recorded
/// via `tracing::warn!` for auditability.
pub fn coerce_numeric(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        return f64::NAN;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(field = trimmed, "coercing unparseable numeric field to missing");
            f64::NAN
        }
    }
}
