/// Placeholder shown for absent or non-numeric amounts.
pub const PLACEHOLDER: &str = "—";

/// Formats an amount with `symbol`, thousands separators and two decimals.
pub fn format_money(value: Option<f64>, symbol: &str) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if v < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{symbol}{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Some(0.0), "$"), "$0.00");
        assert_eq!(format_money(Some(120.5), "$"), "$120.50");
        assert_eq!(format_money(Some(1234567.891), "$"), "$1,234,567.89");
        assert_eq!(format_money(Some(999.999), "$"), "$1,000.00");
        assert_eq!(format_money(Some(-42.1), "€"), "€-42.10");
    }

    #[test]
    fn test_absent_values_use_placeholder() {
        assert_eq!(format_money(None, "$"), "—");
        assert_eq!(format_money(Some(f64::NAN), "$"), "—");
    }
}
