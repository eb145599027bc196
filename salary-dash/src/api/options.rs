use axum::{extract::State, Json};
use salary_common::summary::{filter_options, FilterOptions};
use salary_common::ReferenceLists;

use crate::error::ApiResult;
use crate::AppState;

/// GET /api/filters/options
///
/// Choices for the filter controls, always computed over the full dataset.
pub async fn get_filter_options(State(state): State<AppState>) -> ApiResult<Json<FilterOptions>> {
    let records = state.store.load_all().await?;
    Ok(Json(filter_options(&records)))
}

/// GET /api/form/choices
///
/// Reference lists for the submission form; empty lists when the
/// reference files are absent.
pub async fn get_form_choices(State(state): State<AppState>) -> Json<ReferenceLists> {
    Json(state.choices.as_ref().clone())
}
