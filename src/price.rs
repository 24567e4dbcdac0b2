//! Price normalization for heterogeneous source representations.
//!
//! Sources hand back prices as bare numbers, currency-prefixed strings
//! ("₹1,299"), or nested objects (`{"price": {"raw": "₹499"}}`). Everything
//! is normalized to a whole display-unit integer (rupees, not paise).
//! Sub-unit precision is intentionally discarded: comparison does not need
//! it, and the text path truncates at the first decimal point rather than
//! concatenating digits across it ("49.99" parses as 49, never 4999).

use serde_json::Value;

/// Key paths probed on object-shaped prices, in priority order.
const PRICE_KEYS: &[&str] =
    &["raw", "value", "amount", "price", "current_price", "price_value", "sale_price", "deal_price"];

/// Normalizes a raw JSON price value into a whole display-unit price.
///
/// Never fails: anything that does not resolve to a non-negative number is
/// `None`.
pub fn parse(raw: &Value) -> Option<u64> {
    match raw {
        Value::Null => None,
        Value::Number(n) => {
            let f = n.as_f64()?;
            if f.is_finite() && f >= 0.0 {
                Some(f.trunc() as u64)
            } else {
                None
            }
        }
        Value::String(s) => parse_text(s),
        Value::Object(map) => {
            for key in PRICE_KEYS {
                match map.get(*key) {
                    Some(Value::Null) | None => continue,
                    Some(Value::String(s)) if s.is_empty() => continue,
                    Some(nested) => return parse(nested),
                }
            }
            None
        }
        _ => None,
    }
}

/// Normalizes price text like "₹1,299" or "Rs. 499.00" into an integer.
///
/// Currency symbols and thousands separators are stripped; the digit run
/// stops at the first decimal point so fractional units never inflate the
/// value.
pub fn parse_text(text: &str) -> Option<u64> {
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if c == '.' && !digits.is_empty() {
            // Decimal point after the integer part: done.
            break;
        }
    }

    if digits.is_empty() {
        return None;
    }

    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_null() {
        assert_eq!(parse(&Value::Null), None);
    }

    #[test]
    fn test_parse_empty_text() {
        assert_eq!(parse_text(""), None);
        assert_eq!(parse_text("   "), None);
        assert_eq!(parse(&json!("")), None);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(parse(&json!(1999)), Some(1999));
        assert_eq!(parse(&json!(0)), Some(0));
        assert_eq!(parse(&json!(49.99)), Some(49));
        assert_eq!(parse(&json!(-5)), None);
        assert_eq!(parse(&json!(-0.5)), None);
    }

    #[test]
    fn test_parse_currency_text() {
        assert_eq!(parse_text("₹1,299"), Some(1299));
        assert_eq!(parse_text("Rs. 499"), Some(499));
        assert_eq!(parse_text("$ 29"), Some(29));
        assert_eq!(parse_text("1,23,456"), Some(123456));
    }

    #[test]
    fn test_parse_text_truncates_decimals() {
        assert_eq!(parse_text("49.99"), Some(49));
        assert_eq!(parse_text("₹1,299.50"), Some(1299));
        assert_eq!(parse_text("0.99"), Some(0));
    }

    #[test]
    fn test_parse_text_leading_dot_is_not_a_decimal() {
        // "Rs. 499" style: the dot before any digit must not end the run.
        assert_eq!(parse_text(".499"), Some(499));
    }

    #[test]
    fn test_parse_text_no_digits() {
        assert_eq!(parse_text("N/A"), None);
        assert_eq!(parse_text("call for price"), None);
        assert_eq!(parse_text("₹"), None);
    }

    #[test]
    fn test_parse_object_keys() {
        assert_eq!(parse(&json!({"raw": "₹499"})), Some(499));
        assert_eq!(parse(&json!({"amount": 50})), Some(50));
        assert_eq!(parse(&json!({"value": "1,299"})), Some(1299));
        assert_eq!(parse(&json!({"price": {"raw": "₹799"}})), Some(799));
        assert_eq!(parse(&json!({"unrelated": 10})), None);
        assert_eq!(parse(&json!({})), None);
    }

    #[test]
    fn test_parse_object_key_priority() {
        // "raw" wins over "amount" regardless of map iteration order.
        assert_eq!(parse(&json!({"amount": 50, "raw": "₹499"})), Some(499));
    }

    #[test]
    fn test_parse_object_skips_null_and_empty_values() {
        assert_eq!(parse(&json!({"raw": null, "amount": 50})), Some(50));
        assert_eq!(parse(&json!({"raw": "", "amount": 50})), Some(50));
    }

    #[test]
    fn test_parse_other_shapes() {
        assert_eq!(parse(&json!(true)), None);
        assert_eq!(parse(&json!([499])), None);
    }
}
