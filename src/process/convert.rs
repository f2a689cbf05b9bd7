// src/process/convert.rs

/// Numeric cell, or `None` when the text is not a number (NaN included).
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Integer coercion: fractional values truncate, anything unparseable is 0.
pub fn to_int(raw: &str) -> i64 {
    parse_number(raw).map(float_to_int).unwrap_or(0)
}

/// Truncate toward zero; NaN maps to 0.
pub fn float_to_int(v: f64) -> i64 {
    if v.is_nan() {
        0
    } else {
        v as i64
    }
}

/// Float coercion, unparseable is 0.0.
pub fn to_float(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

/// Float coercion after dropping thousands separators.
pub fn to_float_grouped(raw: &str) -> f64 {
    to_float(&raw.replace(',', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints() {
        assert_eq!(to_int("2021"), 2021);
        assert_eq!(to_int(" 73.9 "), 73);
        assert_eq!(to_int("N/A"), 0);
        assert_eq!(to_int(""), 0);
        assert_eq!(to_int("NaN"), 0);
        // no separator stripping for integer columns
        assert_eq!(to_int("1,000"), 0);
        assert_eq!(float_to_int(2.426e11), 242_600_000_000);
    }

    #[test]
    fn floats() {
        assert_eq!(to_float("95.1"), 95.1);
        assert_eq!(to_float("N/A"), 0.0);
        assert_eq!(to_float("1,000"), 0.0);
        assert_eq!(to_float_grouped("7,125.8"), 7125.8);
        assert_eq!(to_float_grouped("N/A"), 0.0);
    }
}
