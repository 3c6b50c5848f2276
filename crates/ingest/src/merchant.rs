use crate::re;

re!(re_txn_prefix, r"(?i)^(?:POS|ATM|ACH|CHECK|TRANSFER|PAYMENT|DEPOSIT)\s+");
re!(re_masked_card, r"\d{4}\*+\d{4}");
re!(re_embedded_date, r"\b\d{1,2}/\d{1,2}(?:/\d{2,4})?\b");

/// Heuristically pull a short merchant label out of a raw transaction
/// description. Best effort: the only contract is determinism over
/// identical input, never correctness.
pub fn extract_merchant(description: &str) -> Option<String> {
    let mut text = description.trim().to_string();

    // Strip leading transaction-type tokens, which may stack ("ACH PAYMENT ...").
    loop {
        let stripped = re_txn_prefix().replace(&text, "");
        if stripped == text {
            break;
        }
        text = stripped.into_owned();
    }

    let text = re_masked_card().replace_all(&text, " ");
    let text = re_embedded_date().replace_all(&text, " ");

    let words: Vec<&str> = text.split_whitespace().collect();
    let first = words.first()?;
    if first.chars().count() <= 2 {
        return None;
    }

    Some(words.iter().take(3).copied().collect::<Vec<_>>().join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_up_to_three_words() {
        assert_eq!(
            extract_merchant("WHOLE FOODS MARKET 10260 SEATTLE WA"),
            Some("WHOLE FOODS MARKET".to_string())
        );
        assert_eq!(extract_merchant("STARBUCKS"), Some("STARBUCKS".to_string()));
    }

    #[test]
    fn strips_transaction_type_prefix() {
        assert_eq!(extract_merchant("POS STARBUCKS #1234"), Some("STARBUCKS #1234".to_string()));
        assert_eq!(extract_merchant("atm WITHDRAWAL MAIN ST"), Some("WITHDRAWAL MAIN ST".to_string()));
    }

    #[test]
    fn strips_stacked_prefixes() {
        assert_eq!(extract_merchant("ACH PAYMENT VERIZON WIRELESS"), Some("VERIZON WIRELESS".to_string()));
    }

    #[test]
    fn removes_masked_card_numbers() {
        assert_eq!(
            extract_merchant("AMAZON MKTPL 1234****5678 WA"),
            Some("AMAZON MKTPL WA".to_string())
        );
    }

    #[test]
    fn removes_embedded_dates() {
        assert_eq!(
            extract_merchant("SHELL OIL 01/15/2024 HOUSTON TX"),
            Some("SHELL OIL HOUSTON".to_string())
        );
        assert_eq!(
            extract_merchant("SHELL OIL 01/15 HOUSTON TX"),
            Some("SHELL OIL HOUSTON".to_string())
        );
    }

    #[test]
    fn short_first_token_yields_none() {
        assert_eq!(extract_merchant("AB"), None);
        assert_eq!(extract_merchant("TRANSFER TO"), None);
        assert_eq!(extract_merchant(""), None);
    }

    #[test]
    fn deterministic_over_identical_input() {
        let input = "POS WHOLE FOODS 1111**2222 01/15";
        assert_eq!(extract_merchant(input), extract_merchant(input));
    }
}
