//! Salary submission endpoint

use axum::{extract::State, http::StatusCode, Json};
use salary_common::{FormInput, SalaryRecord};
use serde_json::{Map, Value};

use crate::error::ApiResult;
use crate::AppState;

/// POST /api/submissions
///
/// Body is a flat JSON object keyed by field name. Returns 201 with the
/// stored record, 422 listing every missing or invalid field, or 500 when
/// the store rejects the write.
pub async fn create_submission(
    State(state): State<AppState>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<(StatusCode, Json<SalaryRecord>)> {
    let form = FormInput::from_json(&body);
    let record = state.ingestor.submit(form.as_raw()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
