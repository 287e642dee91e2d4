// Parsing and formatting helpers shared across the pipeline.
//
// All the forgiving CSV/number handling lives here so the loader and the
// report builders can work with clean `Option<f64>` values.
use num_format::{Locale, ToFormattedString};

/// Coerce a raw CSV cell into `f64`, tolerating the formatting noise that
/// shows up in spreadsheet exports.
///
/// - Accepts `Option<&str>` so callers can pass optional fields straight in.
/// - Trims surrounding whitespace.
/// - Rejects cells containing alphabetic characters (e.g. "N/A", "tbd").
/// - Strips thousands separators (`","`) before parsing.
/// - Returns `None` for anything that does not parse cleanly; a bad cell
///   must never abort the batch.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

/// Arithmetic mean, 0.0 for an empty slice so callers never see NaN.
pub fn average(v: &[f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Render a float with fixed decimals and locale thousands separators,
/// e.g. `12345.678` at 2 decimals becomes `12,345.68`.
pub fn format_number(n: f64, decimals: usize) -> String {
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Thousands-separated integer rendering for console counts
/// (e.g. `12,480 rows loaded`).
pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parse_f64_safe_accepts_plain_and_separated_numbers() {
        assert_eq!(parse_f64_safe(Some("95")), Some(95.0));
        assert_eq!(parse_f64_safe(Some("  102.5 ")), Some(102.5));
        assert_eq!(parse_f64_safe(Some("1,250.75")), Some(1250.75));
        assert_eq!(parse_f64_safe(Some("-3.5")), Some(-3.5));
    }

    #[test]
    fn parse_f64_safe_coerces_garbage_to_none() {
        assert_eq!(parse_f64_safe(None), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("   ")), None);
        assert_eq!(parse_f64_safe(Some("N/A")), None);
        assert_eq!(parse_f64_safe(Some("12abc")), None);
        assert_eq!(parse_f64_safe(Some("--")), None);
    }

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
        assert_relative_eq!(average(&[80.0, 120.0]), 100.0);
    }

    #[test]
    fn format_number_inserts_separators_and_decimals() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(0.0, 2), "0.00");
        assert_eq!(format_number(-4500.5, 1), "-4,500.5");
        assert_eq!(format_number(99.0, 0), "99");
    }
}
