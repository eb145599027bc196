//! Field-level type coercion
//!
//! Every function here reports failure as [`ParseError`]; the normalizer
//! turns those into `None` (or the fallback date) and never surfaces them.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::record::Degree;

/// A raw value could not be coerced into its canonical type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("not a number: {0:?}")]
    NotANumber(String),

    #[error("out of range: {0:?}")]
    OutOfRange(String),

    #[error("not a degree answer: {0:?}")]
    NotADegree(String),

    #[error("not a date: {0:?}")]
    NotADate(String),
}

/// Parse a non-negative decimal, ignoring thousands separators
pub fn decimal(raw: &str) -> Result<f64, ParseError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let value: f64 = cleaned
        .parse()
        .map_err(|_| ParseError::NotANumber(raw.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ParseError::OutOfRange(raw.to_string()));
    }
    Ok(value)
}

/// Parse a non-negative whole number; fractional input is truncated
/// ("3.0" and "3.5" both give 3)
pub fn whole(raw: &str) -> Result<u32, ParseError> {
    let value = decimal(raw)?;
    if value > u32::MAX as f64 {
        return Err(ParseError::OutOfRange(raw.to_string()));
    }
    Ok(value.trunc() as u32)
}

/// Parse a strictly positive whole number
pub fn positive_whole(raw: &str) -> Result<u32, ParseError> {
    match whole(raw)? {
        0 => Err(ParseError::OutOfRange(raw.to_string())),
        n => Ok(n),
    }
}

pub fn degree(raw: &str) -> Result<Degree, ParseError> {
    match raw.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(Degree::Yes),
        "no" | "n" | "false" | "0" => Ok(Degree::No),
        _ => Err(ParseError::NotADegree(raw.to_string())),
    }
}

pub fn date(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    crate::time::parse_date(raw).ok_or_else(|| ParseError::NotADate(raw.to_string()))
}
