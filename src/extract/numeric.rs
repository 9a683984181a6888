/// Numeric parsing helpers for extracted captures.
///
/// Italian sources mix `.` and `,` freely as thousands and decimal
/// separators ("13.000.000", "13,000 milioni"), so integer parsing strips
/// both before casting.

/// Parse an integer out of a captured string, tolerating thousands and
/// decimal separators, currency symbols and surrounding whitespace.
/// Returns `None` when nothing numeric remains.
pub fn parse_int_normalized(raw: &str) -> Option<i64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '-')
        .collect();

    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }

    cleaned.parse::<i64>().ok()
}

/// Parse a possibly compact-suffixed count ("5k", "1.2M", "3000").
/// Used for follower/traffic style figures where sources abbreviate.
pub fn parse_compact_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    let (digits, multiplier) = if let Some(stripped) = lower.strip_suffix('m') {
        (stripped, 1_000_000.0)
    } else if let Some(stripped) = lower.strip_suffix('k') {
        (stripped, 1_000.0)
    } else {
        (lower.as_str(), 1.0)
    };

    // Within the digit part, treat separators as decimal points only when a
    // multiplier is in play ("1.2M"); otherwise strip them ("12.500").
    if multiplier > 1.0 {
        let normalized = digits.trim().replace(',', ".");
        normalized.parse::<f64>().ok().map(|v| (v * multiplier) as i64)
    } else {
        parse_int_normalized(digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_separators() {
        assert_eq!(parse_int_normalized("13,000"), Some(13000));
        assert_eq!(parse_int_normalized("13.000.000"), Some(13000000));
        assert_eq!(parse_int_normalized("€ 100.000"), Some(100000));
        assert_eq!(parse_int_normalized("120"), Some(120));
    }

    #[test]
    fn test_parse_failure_yields_none() {
        assert_eq!(parse_int_normalized(""), None);
        assert_eq!(parse_int_normalized("n/a"), None);
        assert_eq!(parse_int_normalized("€"), None);
    }

    #[test]
    fn test_compact_counts() {
        assert_eq!(parse_compact_count("5k"), Some(5_000));
        assert_eq!(parse_compact_count("1.2M"), Some(1_200_000));
        assert_eq!(parse_compact_count("1,2m"), Some(1_200_000));
        assert_eq!(parse_compact_count("12.500"), Some(12_500));
        assert_eq!(parse_compact_count("abc"), None);
    }
}
