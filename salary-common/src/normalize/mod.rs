//! Schema normalization
//!
//! Reconciles rows from any known source shape (historical CSV exports,
//! form submissions, database rows) into one [`SalaryRecord`]:
//!
//! 1. Each canonical field is resolved through the ordered alias table;
//!    the first alias present with a non-blank value wins.
//! 2. Values are coerced to their canonical types. Failures become `None`
//!    (`submission_date` falls back to the supplied timestamp).
//! 3. Categorical text is cleaned up via a static synonym table.
//!
//! Normalization is pure and never fails.

pub mod aliases;
pub mod coerce;
pub mod text;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

use crate::record::{Field, SalaryRecord};

pub use aliases::aliases_for;
pub use coerce::ParseError;

/// One raw input row: header name to string value
pub type RawRow = HashMap<String, String>;

/// Highest-priority non-blank value for `field`, trimmed
pub fn resolve(raw: &RawRow, field: Field) -> Option<&str> {
    aliases_for(field)
        .iter()
        .filter_map(|name| raw.get(*name))
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
}

/// Normalize one raw row into a canonical record
///
/// `fallback` stamps records whose submission date is missing or
/// unparseable; pass the ingestion/load time.
pub fn normalize(raw: &RawRow, fallback: DateTime<Utc>) -> SalaryRecord {
    let text = |field: Field| {
        resolve(raw, field)
            .map(|v| text::canonical(field, v))
            .unwrap_or_default()
    };

    SalaryRecord {
        role: text(Field::Role),
        company_location: text(Field::CompanyLocation),
        monthly_gross_salary: coerced(raw, Field::MonthlyGrossSalary, coerce::decimal),
        salary_gross_usd: coerced(raw, Field::SalaryGrossUsd, coerce::decimal),
        years_of_experience: coerced(raw, Field::YearsOfExperience, coerce::whole),
        degree: coerced(raw, Field::Degree, coerce::degree),
        company_size: coerced(raw, Field::CompanySize, coerce::positive_whole),
        your_location: text(Field::YourLocation),
        nationality: text(Field::Nationality),
        industry: text(Field::Industry),
        submission_date: coerced(raw, Field::SubmissionDate, coerce::date).unwrap_or(fallback),
        exchange_rate: coerced(raw, Field::ExchangeRate, coerce::decimal),
    }
}

fn coerced<T>(
    raw: &RawRow,
    field: Field,
    parse: fn(&str) -> Result<T, ParseError>,
) -> Option<T> {
    let value = resolve(raw, field)?;
    match parse(value) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("Nulling {}: {}", field.header(), e);
            None
        }
    }
}
