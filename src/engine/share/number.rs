//! Number formatting for SVG attribute values.

/// Formats a number with at most three decimals and no trailing zeros.
///
/// `360.0` → `"360"`, `0.5` → `"0.5"`, `-0.0` → `"0"`.
pub fn fmt_num(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{:.3}", rounded);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

/// Parses a CSS number, accepting forms like `.5` and `-1.25`.
pub fn parse_number(input: &str) -> Option<f32> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    input.parse::<f32>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_compactly() {
        assert_eq!(fmt_num(360.0), "360");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(-0.0), "0");
        assert_eq!(fmt_num(12.34567), "12.346");
        assert_eq!(fmt_num(-45.1), "-45.1");
        assert_eq!(fmt_num(f32::NAN), "0");
    }

    #[test]
    fn parses_css_numbers() {
        assert_eq!(parse_number(".5"), Some(0.5));
        assert_eq!(parse_number(" -2 "), Some(-2.0));
        assert_eq!(parse_number("2px"), None);
        assert_eq!(parse_number(""), None);
    }
}
