//! Summary metrics and chart series

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use salary_common::summary::{RecordFilter, Summary};

use crate::error::ApiResult;
use crate::AppState;

/// GET /api/summary
pub async fn get_summary(
    State(state): State<AppState>,
    filter: Result<Query<RecordFilter>, QueryRejection>,
) -> ApiResult<Json<Summary>> {
    let Query(filter) = filter?;
    filter.validate()?;
    let records = filter.apply(state.store.load_all().await?);
    Ok(Json(Summary::compute(&records)))
}
