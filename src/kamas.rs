//! Operator-friendly kamas amounts: forgiving parsing of the shorthand
//! people actually type ("50k", "2kk", "1,5m") and grouped formatting.

use crate::Kamas;

/// Parse a kamas amount from free text.
///
/// Accepts plain integers, decimal commas, and the trailing multipliers
/// `k` (thousand), `m` (million), `g` (billion). Doubled suffixes (`kk`,
/// `mk`) collapse to their single form before the multiplier applies.
/// Spaces, non-breaking spaces, and underscores are ignored. The result is
/// rounded and clamped to `[0, i32::MAX]`; unparseable input is `None` so
/// callers pick their own fallback.
pub fn parse(raw: &str) -> Option<Kamas> {
    let cleaned = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{a0}' && *c != '_')
        .collect::<String>()
        .replace("kk", "k")
        .replace("mk", "m")
        .replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    let (digits, multiplier) = match cleaned.chars().last() {
        Some('k') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some('m') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('g') => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1e0),
    };
    let base = digits.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some((base * multiplier).round().clamp(0.0, Kamas::MAX as f64) as Kamas)
}

/// Format with a space every three digits, the way the tables show pots.
pub fn format(value: Kamas) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_integers() {
        assert_eq!(parse("1500"), Some(1500));
        assert_eq!(parse("  42  "), Some(42));
    }

    #[test]
    fn suffix_multipliers() {
        assert_eq!(parse("50k"), Some(50_000));
        assert_eq!(parse("3m"), Some(3_000_000));
        assert_eq!(parse("1g"), Some(1_000_000_000));
    }

    #[test]
    fn doubled_suffixes_collapse() {
        assert_eq!(parse("2kk"), Some(2_000));
        assert_eq!(parse("1mk"), Some(1_000_000));
    }

    #[test]
    fn decimal_comma() {
        assert_eq!(parse("1,5m"), Some(1_500_000));
        assert_eq!(parse("0.5k"), Some(500));
    }

    #[test]
    fn separators_ignored() {
        assert_eq!(parse("1 000 000"), Some(1_000_000));
        assert_eq!(parse("1_000k"), Some(1_000_000));
        assert_eq!(parse("1\u{a0}000"), Some(1000));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("abc"), None);
        assert_eq!(parse("k"), None);
    }

    #[test]
    fn clamps_to_i32_range() {
        assert_eq!(parse("-500"), Some(0));
        assert_eq!(parse("99g"), Some(Kamas::MAX));
    }

    #[test]
    fn grouped_formatting() {
        assert_eq!(format(0), "0");
        assert_eq!(format(999), "999");
        assert_eq!(format(1500), "1 500");
        assert_eq!(format(20_000_000), "20 000 000");
        assert_eq!(format(-1500), "-1 500");
    }
}
