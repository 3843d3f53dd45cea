//! Numeral normalization for dates written in Japanese text.
//!
//! Registry excerpts mix full-width (全角) and half-width digits freely,
//! sometimes inside a single date. Everything is folded to ASCII before
//! parsing.

/// Full-width digit character → ASCII digit. Other characters pass through.
fn half_width(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        _ => c,
    }
}

/// Translate every full-width digit in `s` to its half-width form.
pub fn to_half_width_digits(s: &str) -> String {
    s.chars().map(half_width).collect()
}

/// Parse a run of (full- or half-width) digits.
///
/// Returns `None` for empty input, non-digits, or values that overflow.
pub fn parse_digits(s: &str) -> Option<u32> {
    let ascii = to_half_width_digits(s);
    if ascii.is_empty() || !ascii.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    ascii.parse().ok()
}

/// Parse an era year: digits, or 元 for the first year of an era.
pub fn parse_era_year(s: &str) -> Option<u32> {
    if s == "元" {
        return Some(1);
    }
    parse_digits(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_half_width_digits() {
        assert_eq!(to_half_width_digits("０１２３４５６７８９"), "0123456789");
        assert_eq!(to_half_width_digits("令和４年7月４日"), "令和4年7月4日");
        assert_eq!(to_half_width_digits("abc"), "abc");
        assert_eq!(to_half_width_digits(""), "");
    }

    #[test]
    fn test_parse_digits_mixed_width() {
        assert_eq!(parse_digits("４"), Some(4));
        assert_eq!(parse_digits("1２"), Some(12));
        assert_eq!(parse_digits("2023"), Some(2023));
        assert_eq!(parse_digits("007"), Some(7));
    }

    #[test]
    fn test_parse_digits_invalid() {
        assert_eq!(parse_digits(""), None);
        assert_eq!(parse_digits("四"), None);
        assert_eq!(parse_digits("1a"), None);
        assert_eq!(parse_digits("99999999999999"), None);
    }

    #[test]
    fn test_parse_era_year_gannen() {
        assert_eq!(parse_era_year("元"), Some(1));
        assert_eq!(parse_era_year("３１"), Some(31));
        assert_eq!(parse_era_year("元元"), None);
    }
}
