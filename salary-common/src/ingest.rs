//! Submission ingestion
//!
//! Validates a submitted form, normalizes it into a [`SalaryRecord`],
//! fills derived attributes and appends it to the configured store.

use chrono::SubsecRound;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::fx::FxClient;
use crate::normalize::{coerce, normalize, resolve, RawRow};
use crate::record::{Field, SalaryRecord};
use crate::store::RecordStore;
use crate::time;

/// Placeholder option values that mean "nothing chosen"
const SENTINELS: &[&str] = &["please select...", "select", "select...", "-- select --", "choose..."];

/// A submission that failed required-field checks
///
/// Lists every offending field by its display label, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub missing: Vec<String>,
    pub invalid: Vec<String>,
}

impl ValidationError {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("Missing required fields: {}", self.missing.join(", ")));
        }
        if !self.invalid.is_empty() {
            parts.push(format!("Invalid values for: {}", self.invalid.join(", ")));
        }
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to save submission: {0}")]
    Persistence(String),
}

/// Form fields as submitted by the browser
#[derive(Debug, Clone, Default)]
pub struct FormInput(RawRow);

impl FormInput {
    /// Flatten a JSON object into string fields
    ///
    /// Strings are kept as-is, numbers use their JSON text, booleans map to
    /// `Yes`/`No`. `null` and nested values are treated as blank.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let fields = object
            .iter()
            .filter_map(|(key, value)| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(true) => "Yes".to_string(),
                    Value::Bool(false) => "No".to_string(),
                    Value::Null | Value::Array(_) | Value::Object(_) => return None,
                };
                Some((key.clone(), text))
            })
            .collect();
        Self(fields)
    }

    pub fn as_raw(&self) -> &RawRow {
        &self.0
    }
}

/// True for values a form sends when no option was picked
pub fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    SENTINELS.iter().any(|s| value.eq_ignore_ascii_case(s))
}

/// Check every required field, collecting all failures
pub fn validate(form: &RawRow) -> Result<(), ValidationError> {
    let mut error = ValidationError::default();

    for field in Field::REQUIRED {
        let Some(value) = resolve(form, field) else {
            error.missing.push(field.label().to_string());
            continue;
        };

        let coercible = match field {
            Field::MonthlyGrossSalary => coerce::decimal(value).is_ok(),
            Field::YearsOfExperience => coerce::whole(value).is_ok(),
            Field::Degree => coerce::degree(value).is_ok(),
            Field::CompanySize => coerce::positive_whole(value).is_ok(),
            _ => true,
        };
        if !coercible {
            error.invalid.push(field.label().to_string());
        }
    }

    if error.is_empty() {
        Ok(())
    } else {
        Err(error)
    }
}

/// Drop blank and placeholder values so alias resolution skips them
fn strip_placeholders(form: &RawRow) -> RawRow {
    form.iter()
        .filter(|(_, value)| !value.trim().is_empty() && !is_sentinel(value))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

pub struct Ingestor {
    store: Arc<dyn RecordStore>,
    fx: Option<Arc<FxClient>>,
}

impl Ingestor {
    pub fn new(store: Arc<dyn RecordStore>, fx: Option<Arc<FxClient>>) -> Self {
        Self { store, fx }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Validate, normalize and persist one submission
    pub async fn submit(&self, form: &RawRow) -> Result<SalaryRecord, SubmitError> {
        let form = strip_placeholders(form);

        if let Err(e) = validate(&form) {
            info!("Rejected submission: {}", e);
            return Err(e.into());
        }

        // Whole seconds so the stored date reads back unchanged
        let received_at = time::now().trunc_subsecs(0);
        let mut record = normalize(&form, received_at);

        if record.salary_gross_usd == Some(0.0) {
            record.salary_gross_usd = None;
        }

        if record.exchange_rate.is_none() {
            if let Some(fx) = &self.fx {
                record.exchange_rate = fx.cached().await.map(|q| q.rate);
            }
        }

        if let Err(e) = self.store.append(&record).await {
            warn!("Submission not saved: {}", e);
            return Err(SubmitError::Persistence(e.to_string()));
        }

        info!(
            "Accepted submission: role='{}' location='{}' backend={}",
            record.role,
            record.company_location,
            self.store.backend()
        );
        Ok(record)
    }
}
