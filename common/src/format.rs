//! Display formatting for the document export
//!
//! Single fixed convention: naira glyph, comma thousands separator,
//! dates as `DD-Mon-YYYY`.

use chrono::NaiveDate;

/// Currency glyph prefixed to amounts
pub const CURRENCY_SYMBOL: &str = "₦";

/// Date format used in the rendered document and the Institution sheet
pub const DISPLAY_DATE_FORMAT: &str = "%d-%b-%Y";

/// `1234567.891` with 2 decimals → `1,234,567.89`
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn with_symbol(body: String) -> String {
    match body.strip_prefix('-') {
        Some(rest) => format!("-{}{}", CURRENCY_SYMBOL, rest),
        None => format!("{}{}", CURRENCY_SYMBOL, body),
    }
}

/// Project table amounts: `₦1,234,567`
pub fn format_currency_whole(value: f64) -> String {
    with_symbol(format_thousands(value, 0))
}

/// Summary amounts: `₦1,234,567.00`
pub fn format_currency(value: f64) -> String {
    with_symbol(format_thousands(value, 2))
}

/// `50` → `50.0%`
pub fn format_percent(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{:.1}%", value)
}

/// `2025-03-07` → `07-Mar-2025`
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_whole() {
        assert_eq!(format_currency_whole(1_234_567.0), "₦1,234,567");
        assert_eq!(format_currency_whole(999.0), "₦999");
        assert_eq!(format_currency_whole(1000.0), "₦1,000");
        assert_eq!(format_currency_whole(0.0), "₦0");
        assert_eq!(format_currency_whole(-2500.0), "-₦2,500");
    }

    #[test]
    fn test_format_currency_two_decimals() {
        assert_eq!(format_currency(215_013.0), "₦215,013.00");
        assert_eq!(format_currency(1_234_567.891), "₦1,234,567.89");
        assert_eq!(format_currency(12.5), "₦12.50");
        assert_eq!(format_currency(-0.001), "₦0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(50.0), "50.0%");
        assert_eq!(format_percent(33.333), "33.3%");
        assert_eq!(format_percent(100.0), "100.0%");
        assert_eq!(format_percent(f64::NAN), "0.0%");
    }

    #[test]
    fn test_format_display_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_display_date(date), "07-Mar-2025");
    }
}
