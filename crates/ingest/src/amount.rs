use rust_decimal::Decimal;
use std::str::FromStr;

/// Convert a locale-formatted monetary string into a signed decimal.
///
/// Handles currency symbols, comma thousands separators, surrounding
/// whitespace, and accounting-style parenthesized negatives. Never fails:
/// an unparseable string yields `0`, and the caller distinguishes a true
/// zero from a parse failure via [`is_zero_literal`] on the original text.
pub fn normalize_amount(raw: &str) -> Decimal {
    // Parenthesized-negative is detected on the original string, before any
    // stripping, and requires both halves of the pair.
    let parenthesized = raw.contains('(') && raw.contains(')');

    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | '¥' | ',' | '(' | ')') && !c.is_whitespace())
        .collect();

    match Decimal::from_str(&cleaned) {
        // Accounting convention wins over any explicit sign character.
        Ok(value) if parenthesized => -value.abs(),
        Ok(value) => value,
        Err(_) => Decimal::ZERO,
    }
}

/// Whether the source literal spells an actual zero. An amount that
/// normalizes to `0` without passing this check is a parse failure, not a
/// zero-value transaction.
pub fn is_zero_literal(raw: &str) -> bool {
    matches!(raw.trim(), "0" | "0.00")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn plain_decimal() {
        assert_eq!(normalize_amount("123.45"), dec("123.45"));
    }

    #[test]
    fn currency_symbols_stripped() {
        assert_eq!(normalize_amount("$99.99"), dec("99.99"));
        assert_eq!(normalize_amount("£10.00"), dec("10.00"));
        assert_eq!(normalize_amount("€5"), dec("5"));
        assert_eq!(normalize_amount("¥1200"), dec("1200"));
    }

    #[test]
    fn comma_thousands_separators() {
        assert_eq!(normalize_amount("1,234.56"), dec("1234.56"));
        assert_eq!(normalize_amount("1,234,567.89"), dec("1234567.89"));
    }

    #[test]
    fn parenthesized_is_negative() {
        assert_eq!(normalize_amount("(75.25)"), dec("-75.25"));
        assert_eq!(normalize_amount("$(1,234.56)"), dec("-1234.56"));
    }

    #[test]
    fn parentheses_override_explicit_sign() {
        // Accounting convention forces the negative even with a minus inside.
        assert_eq!(normalize_amount("(-50.00)"), dec("-50.00"));
    }

    #[test]
    fn explicit_negative_sign_kept() {
        assert_eq!(normalize_amount("-50.00"), dec("-50.00"));
    }

    #[test]
    fn surrounding_whitespace_ignored() {
        assert_eq!(normalize_amount("  42.00  "), dec("42.00"));
        assert_eq!(normalize_amount("$ 7.50"), dec("7.50"));
    }

    #[test]
    fn empty_and_garbage_yield_zero() {
        assert_eq!(normalize_amount(""), Decimal::ZERO);
        assert_eq!(normalize_amount("   "), Decimal::ZERO);
        assert_eq!(normalize_amount("not a number"), Decimal::ZERO);
    }

    #[test]
    fn zero_literal_detection() {
        assert!(is_zero_literal("0"));
        assert!(is_zero_literal("0.00"));
        assert!(is_zero_literal(" 0.00 "));
        assert!(!is_zero_literal("0.0"));
        assert!(!is_zero_literal(""));
        assert!(!is_zero_literal("garbage"));
    }
}
