//! Small parsing helpers shared by the record transcoders.

use std::str::FromStr;

use super::types::error::{Result, TranscodeError};

/// Parses a decimal integer, tolerating surrounding whitespace.
///
/// `field` names the value in the error message.
pub fn parse_integer<T: FromStr>(field: &'static str, raw: &str) -> Result<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| TranscodeError::NotAnInteger {
            field,
            value: raw.to_string(),
        })
}

/// Parses an optional attribute or child value.
pub fn parse_optional_integer<T: FromStr>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<T>> {
    raw.map(|value| parse_integer(field, value)).transpose()
}
