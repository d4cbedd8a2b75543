//! Lenient deserializers for query-string input.
//!
//! List endpoints must never reject a request because a numeric or enum
//! query parameter is malformed. These helpers turn empty or unparseable
//! values into `None` so the caller falls back to its default.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Deserializes an optional string and parses it with [`FromStr`].
///
/// Empty strings and values that fail to parse become `None`.
pub fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            trimmed.parse::<T>().ok()
        }
    }))
}

/// Deserializes an optional string, treating blank input as absent.
pub fn deserialize_non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}
