//! Two-decimal rounding and currency display.

/// Round to 2 decimal places.
///
/// Rounds the exact binary value, so `2.675` (stored just below) gives
/// `2.67`, and exact ties go to the even digit: `0.125` gives `0.12`.
/// Scaling by 100 first would round the product instead and turn
/// `140.125` into `140.13`.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// `$1,234.50`, or `-$1,234.50` for negative amounts.
pub fn format_money(value: f64) -> String {
    let rounded = round2(value);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{cents}")
}
