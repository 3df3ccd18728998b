/// Parses a numeric CSV field, empty or malformed values become NaN
pub fn parse_f64(raw: &str) -> f64 {
    let value = raw.trim();
    if value.is_empty() {
        return f64::NAN;
    }
    value.parse::<f64>().unwrap_or(f64::NAN)
}

/// Formats a value for CSV output, NaN is written as an empty field
pub fn format_f64(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Converts NaN/inf to `None` for JSON output
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
