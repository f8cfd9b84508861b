//! Coercion of loosely typed JSON field values
//!
//! Clients send numbers as strings and dates with time components, so each
//! helper accepts the forms a form-encoded client would produce and returns
//! `None` when the value cannot be used.

use chrono::NaiveDate;
use serde_json::Value;

/// Why a required text field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextError {
    Missing,
    TooLong,
}

/// Render a scalar as text; `None` for null, booleans, arrays and objects
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Trimmed, non-empty text of at most `max_len` characters
pub fn required_text(value: Option<&Value>, max_len: usize) -> Result<String, TextError> {
    let text = scalar_text(value).unwrap_or_default();
    let text = text.trim();

    if text.is_empty() {
        return Err(TextError::Missing);
    }
    if text.chars().count() > max_len {
        return Err(TextError::TooLong);
    }
    Ok(text.to_string())
}

/// Trimmed text, or empty when the value is absent or falsy
pub fn optional_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        other => scalar_text(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Integer from a JSON number or a numeric string
pub fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Positive integer id; zero and negatives are rejected like malformed input
pub fn positive_id(value: Option<&Value>) -> Option<i64> {
    integer(value).filter(|id| *id > 0)
}

/// Parse an ISO date string, ignoring any time component after `T`
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    let date_part = text.split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Calendar date from a JSON string
pub fn date(value: Option<&Value>) -> Option<NaiveDate> {
    match value? {
        Value::String(s) => parse_iso_date(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_text_trims_and_counts_characters() {
        assert_eq!(required_text(Some(&json!("  Safety  ")), 50), Ok("Safety".to_string()));
        assert_eq!(required_text(Some(&json!(2024)), 50), Ok("2024".to_string()));

        // 50 multi-byte characters are within the limit
        let accented = "é".repeat(50);
        assert_eq!(required_text(Some(&json!(accented)), 50), Ok(accented.clone()));
        assert_eq!(
            required_text(Some(&json!(format!("{}x", accented))), 50),
            Err(TextError::TooLong)
        );
    }

    #[test]
    fn test_required_text_missing_forms() {
        for value in [json!(null), json!("   "), json!(true), json!(["a"]), json!({})] {
            assert_eq!(required_text(Some(&value), 50), Err(TextError::Missing), "{}", value);
        }
        assert_eq!(required_text(None, 50), Err(TextError::Missing));
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None), "");
        assert_eq!(optional_text(Some(&json!(null))), "");
        assert_eq!(optional_text(Some(&json!(""))), "");
        assert_eq!(optional_text(Some(&json!(0))), "");
        assert_eq!(optional_text(Some(&json!(" keen learner "))), "keen learner");
        assert_eq!(optional_text(Some(&json!(17))), "17");
    }

    #[test]
    fn test_integer_forms() {
        assert_eq!(integer(Some(&json!(12))), Some(12));
        assert_eq!(integer(Some(&json!(" 12 "))), Some(12));
        assert_eq!(integer(Some(&json!("12a"))), None);
        assert_eq!(integer(Some(&json!(1.5))), None);
        assert_eq!(integer(Some(&json!(12.0))), None);
        assert_eq!(integer(Some(&json!(true))), None);
        assert_eq!(integer(None), None);
    }

    #[test]
    fn test_positive_id() {
        assert_eq!(positive_id(Some(&json!(3))), Some(3));
        assert_eq!(positive_id(Some(&json!(0))), None);
        assert_eq!(positive_id(Some(&json!("-4"))), None);
    }

    #[test]
    fn test_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert_eq!(date(Some(&json!("2024-03-01"))), expected);
        assert_eq!(date(Some(&json!("2024-03-01T09:30:00Z"))), expected);
        assert_eq!(date(Some(&json!("01/03/2024"))), None);
        assert_eq!(date(Some(&json!("2024-02-30"))), None);
        assert_eq!(date(Some(&json!(20240301))), None);
        assert_eq!(date(None), None);
    }
}
