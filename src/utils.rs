//! Small helpers.

/// Parse a form field as a finite number. Blank, garbage, `inf` and `NaN` all give `None`.
pub fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn sanitize_pair_id(id: &str) -> String {
    id.trim().to_string()
}

/// Render an optional average the way the read-only field shows it.
pub fn format_average(avg: Option<f64>) -> String {
    match avg {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_plain_decimals() {
        assert_eq!(parse_number("100"), Some(100.0));
        assert_eq!(parse_number(" 0.00012 "), Some(0.00012));
        assert_eq!(parse_number("-3.5"), Some(-3.5));
    }

    #[test]
    fn parse_number_rejects_blank_and_non_finite() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn format_average_four_decimals_or_dash() {
        assert_eq!(format_average(Some(50.0)), "50.0000");
        assert_eq!(format_average(None), "-");
        assert_eq!(sanitize_pair_id("  0xabc \n"), "0xabc");
    }
}
