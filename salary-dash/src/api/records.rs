//! Filtered, paginated record table

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use salary_common::summary::{sort_newest_first, RecordFilter};
use salary_common::SalaryRecord;
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::pagination::{calculate_pagination, PAGE_SIZE};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub total_results: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub records: Vec<SalaryRecord>,
}

/// GET /api/records
///
/// Newest submissions first. Out-of-range pages are clamped.
pub async fn list_records(
    State(state): State<AppState>,
    filter: Result<Query<RecordFilter>, QueryRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<Json<RecordsResponse>> {
    let Query(filter) = filter?;
    let Query(query) = query?;
    filter.validate()?;

    let mut records = filter.apply(state.store.load_all().await?);
    sort_newest_first(&mut records);

    let total_results = records.len();
    let p = calculate_pagination(total_results, query.page);
    let records = records
        .into_iter()
        .skip(p.offset)
        .take(PAGE_SIZE)
        .collect();

    Ok(Json(RecordsResponse {
        total_results,
        page: p.page,
        page_size: PAGE_SIZE,
        total_pages: p.total_pages,
        records,
    }))
}
