//! Display formatting for report values.

/// Insert thousands separators into a non-negative integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Whole-unit currency, e.g. `$2,297,201`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(&format!("{:.0}", rounded.abs())))
}

pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Escape text for interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(2297200.86), "$2,297,201");
        assert_eq!(format_currency(-1234.5), "-$1,235");
        assert_eq!(format_currency(-0.2), "$0");
    }

    #[test]
    fn test_count_and_percent() {
        assert_eq!(format_count(4922), "4,922");
        assert_eq!(format_count(12), "12");
        assert_eq!(format_count(1_000_000), "1,000,000");
        assert_eq!(format_percent(12.34), "12.3%");
        assert_eq!(format_percent(30.0), "30.0%");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_html("Tom & \"Jerry\" <x>"), "Tom &amp; &quot;Jerry&quot; &lt;x&gt;");
    }
}
