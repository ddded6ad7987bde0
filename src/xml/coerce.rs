//! Serde helpers that read typed fields out of [`XmlNode::to_value`] output.
//!
//! XML carries every leaf as text, so numbers and flags arrive as strings and an
//! element that is present but empty arrives as an empty object. These helpers
//! accept all of those shapes. Numeric fields that fail to parse read as zero,
//! which matches how the platform's own clients cast values.
//!
//! [`list`] is the annotation for repeatable elements: it always yields a
//! `Vec`, whether the document contained zero, one or many siblings.
//!
//! [`XmlNode::to_value`]: super::XmlNode::to_value

use serde::de::{DeserializeOwned, Error as DeError};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::TEXT_KEY;

/// Text content of a normalized value.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(true) => "1".to_owned(),
        Value::Bool(false) | Value::Null => String::new(),
        Value::Object(map) => map.get(TEXT_KEY).map(text_of).unwrap_or_default(),
        Value::Array(items) => items.first().map(text_of).unwrap_or_default(),
    }
}

/// Parse an integer the lenient way: decimals are truncated, garbage is zero.
pub fn parse_int(text: &str) -> i64 {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().map(|value| value.trunc() as i64))
        .unwrap_or(0)
}

/// Parse a float the lenient way: garbage is zero.
pub fn parse_float(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(0.0)
}

/// Interpret `1`, `true` and `yes` (any case) as `true`; everything else is `false`.
pub fn parse_flag(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(&value))
}

pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(&value).trim().to_owned())
}

pub fn int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_int(&text_of(&value)))
}

pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_float(&text_of(&value)))
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_flag(&text_of(&value)))
}

/// `None` when the element is missing or blank.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = text_of(&value);
    Ok((!text.trim().is_empty()).then_some(text))
}

/// `None` when the element is missing or blank.
pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = text_of(&value);
    Ok((!text.trim().is_empty()).then(|| parse_int(&text)))
}

/// Optional reference: `None` when missing, blank or `0`.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_int(deserializer)?.filter(|id| *id != 0))
}

/// `None` when the element is missing or blank.
pub fn opt_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = text_of(&value);
    Ok((!text.trim().is_empty()).then(|| parse_float(&text)))
}

/// Repeatable element: missing → empty, one sibling → one item, many → all in order.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::String(text) if text.is_empty() => Vec::new(),
        other => vec![other],
    };
    items
        .into_iter()
        .map(|item| T::deserialize(item).map_err(D::Error::custom))
        .collect()
}

/// Optional repeatable element: `None` when missing, otherwise as [`list`].
pub fn opt_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    list(deserializer).map(Some)
}
