//! Lenient field deserializers for loosely-typed listing input
//!
//! Parsers upstream hand over numbers as JSON numbers, formatted strings
//! ("$250,000") or nulls. These helpers fold all of them into `Option`s so
//! a bad value degrades to "missing" instead of rejecting the whole payload.

use crate::property::clean_numeric;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Deserialize a number, numeric string, or null into `Option<f64>`
pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(match value {
        Some(Loose::Number(n)) if n.is_finite() => Some(n),
        Some(Loose::Text(s)) => clean_numeric(&s),
        _ => None,
    })
}

/// Deserialize a string or number into `Option<String>` (zip codes arrive as both)
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(match value {
        Some(Loose::Text(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Some(Loose::Number(n)) if n.fract() == 0.0 => Some(format!("{}", n as i64)),
        Some(Loose::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "number")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "text")]
        zip: Option<String>,
    }

    fn probe(json: &str) -> Probe {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_number_accepts_formatted_strings() {
        assert_eq!(probe(r#"{"price": "$250,000"}"#).price, Some(250_000.0));
        assert_eq!(probe(r#"{"price": 199000}"#).price, Some(199_000.0));
        assert_eq!(probe(r#"{"price": null}"#).price, None);
        assert_eq!(probe(r#"{}"#).price, None);
    }

    #[test]
    fn test_number_degrades_garbage_to_none() {
        assert_eq!(probe(r#"{"price": "call for price"}"#).price, None);
        assert_eq!(probe(r#"{"price": true}"#).price, None);
        assert_eq!(probe(r#"{"price": [1, 2]}"#).price, None);
    }

    #[test]
    fn test_text_accepts_numbers() {
        assert_eq!(probe(r#"{"zip": 30301}"#).zip.as_deref(), Some("30301"));
        assert_eq!(probe(r#"{"zip": "  30301 "}"#).zip.as_deref(), Some("30301"));
        assert_eq!(probe(r#"{"zip": ""}"#).zip, None);
    }
}
