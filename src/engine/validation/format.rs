//! Value recognizers used by field checks

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// 24 hexadecimal characters
pub fn is_object_id(value: &str) -> bool {
    value.len() == 24 && value.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Timestamp strings, or integer epoch milliseconds
pub fn is_date(value: &Value) -> bool {
    match value {
        Value::String(s) => parses_as_date(s.trim()),
        Value::Number(n) => n.is_i64() || n.is_u64(),
        _ => false,
    }
}

fn parses_as_date(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    DateTime::parse_from_rfc3339(s).is_ok()
        || DateTime::parse_from_rfc2822(s).is_ok()
        || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
}

/// Length in UTF-16 code units
pub fn text_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Render allowed values as `a, b, c`
pub fn join_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_email() {
        assert!(is_email("a@b.com"));
        assert!(is_email("first.last+tag@mail.example.org"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("@b.com"));
        assert!(!is_email(" a@b.com"));
    }

    #[test]
    fn test_object_id() {
        assert!(is_object_id("507f1f77bcf86cd799439011"));
        assert!(is_object_id("507F1F77BCF86CD799439011"));
        assert!(!is_object_id("507f1f77bcf86cd79943901"));
        assert!(!is_object_id("507f1f77bcf86cd79943901z"));
        assert!(!is_object_id("mock-user-id"));
    }

    #[test]
    fn test_date() {
        assert!(is_date(&json!("2024-05-01T10:00:00Z")));
        assert!(is_date(&json!("2024-05-01T10:00:00.123+02:00")));
        assert!(is_date(&json!("2024-05-01")));
        assert!(is_date(&json!("2024-05-01T10:00:00")));
        assert!(is_date(&json!("Wed, 01 May 2024 10:00:00 GMT")));
        assert!(is_date(&json!(1714557600000i64)));
        assert!(!is_date(&json!("yesterday")));
        assert!(!is_date(&json!("")));
        assert!(!is_date(&json!(1.5)));
        assert!(!is_date(&json!(true)));
    }

    #[test]
    fn test_text_length_counts_utf16_units() {
        assert_eq!(text_length("abc"), 3);
        assert_eq!(text_length("é"), 1);
        assert_eq!(text_length("😀"), 2);
    }

    #[test]
    fn test_join_values() {
        assert_eq!(join_values(&[json!("member"), json!("owner")]), "member, owner");
        assert_eq!(join_values(&[json!(1), json!(true)]), "1, true");
    }
}
