//! Forgiving field deserializers for rows coming off the wire.
//!
//! Each helper deserializes to `Option<T>` and maps anything it cannot make
//! sense of to `None` rather than failing the surrounding row.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ValueOr<T> {
    Value(T),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextLike {
    Text(String),
    Other(IgnoredAny),
}

/// A JSON number or numeric string. Non-finite results are dropped.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<NumberLike>::deserialize(deserializer)? {
        Some(NumberLike::Number(n)) => Some(n),
        Some(NumberLike::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(NumberLike::Other(_)) | None => None,
    };
    Ok(value.filter(|n| n.is_finite()))
}

/// A JSON string. Other JSON types are dropped.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TextLike>::deserialize(deserializer)? {
        Some(TextLike::Text(s)) => Some(s),
        Some(TextLike::Other(_)) | None => None,
    })
}

/// An RFC 3339 timestamp string.
pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// A nested value of type `T`. Anything of the wrong shape is dropped.
pub(crate) fn nested<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<ValueOr<T>>::deserialize(deserializer)? {
        Some(ValueOr::Value(v)) => Some(v),
        Some(ValueOr::Other(_)) | None => None,
    })
}
