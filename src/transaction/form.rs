//! Helpers for turning raw form input into transaction fields.

/// Parse the amount typed into a form.
///
/// Input that is not a finite number becomes `0.0` rather than an error, so
/// that a record is always created.
pub fn parse_amount(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
        .unwrap_or(0.0)
}
