//! Integration tests for salary-dash API endpoints
//!
//! Each test builds the router over a fresh store in a temp directory and
//! drives it with `oneshot` requests.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use salary_common::{CsvStore, RecordStore, ReferenceLists, SqliteStore};
use salary_dash::{build_router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app over an empty CSV store
fn setup_csv_app() -> (TempDir, Arc<CsvStore>, axum::Router) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CsvStore::open(dir.path().join("new_salary.csv")).unwrap());
    let app = build_router(AppState::new(store.clone(), None));
    (dir, store, app)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn submission(role: &str, location: &str, salary: u32, years: u32) -> Value {
    json!({
        "role": role,
        "company_location": location,
        "monthly_gross_salary": salary,
        "years_of_experience": years,
        "degree": "Yes",
        "company_size": 50,
        "your_location": "Zambia",
        "nationality": "Zambian",
        "industry": "Banking"
    })
}

// =============================================================================
// Health and static pages
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_dir, _store, app) = setup_csv_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "salary-dash");
    assert_eq!(body["backend"], "csv");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_index_and_script_served() {
    let (_dir, _store, app) = setup_csv_app();

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/static/app.js")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("application/javascript"));
}

// =============================================================================
// Submissions
// =============================================================================

#[tokio::test]
async fn test_submission_created() {
    let (_dir, store, app) = setup_csv_app();

    let response = app
        .oneshot(post_json(
            "/api/submissions",
            &submission("Accountant", "Lusaka", 12000, 4),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["role"], "Accountant");
    assert_eq!(body["company_location"], "Lusaka");
    assert_eq!(body["monthly_gross_salary"], 12000.0);
    assert_eq!(body["degree"], "Yes");

    assert_eq!(store.load_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_submission_validation_lists_fields() {
    let (_dir, store, app) = setup_csv_app();

    let mut body = submission("Accountant", "", 12000, 4);
    body["company_size"] = json!("lots");
    body["nationality"] = json!("Please select...");

    let response = app
        .oneshot(post_json("/api/submissions", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
    assert_eq!(
        body["error"]["missing_fields"],
        json!(["Company Location", "Nationality"])
    );
    assert_eq!(body["error"]["invalid_fields"], json!(["Company Size"]));

    assert!(store.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submission_persistence_failure_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new_salary.csv");
    let store = Arc::new(CsvStore::open(&path).unwrap());
    let app = build_router(AppState::new(store, None));

    // A directory where the file should be makes every append fail
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let response = app
        .oneshot(post_json(
            "/api/submissions",
            &submission("Accountant", "Lusaka", 12000, 4),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "PERSISTENCE_FAILED");
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let (_dir, store, app) = setup_csv_app();

    let mut body = submission("Accountant", "Lusaka", 12000, 4);
    body["role"] = json!("x".repeat(salary_dash::MAX_BODY_BYTES + 1));

    let response = app
        .oneshot(post_json("/api/submissions", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(store.load_all().await.unwrap().is_empty());
}

// =============================================================================
// Records, summary and filter options
// =============================================================================

async fn seed(app: &axum::Router) {
    for (role, location, salary, years) in [
        ("Accountant", "Lusaka", 10000, 1),
        ("Accountant", "Lusaka", 20000, 4),
        ("Engineer", "Kitwe", 30000, 8),
    ] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/submissions",
                &submission(role, location, salary, years),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_records_filtered_by_country() {
    let (_dir, _store, app) = setup_csv_app();
    seed(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/records?country=Lusaka"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_results"], 2);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 100);

    let response = app
        .oneshot(get("/api/records?country=All%20Countries&page=9"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_results"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["records"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_records_bad_query_is_400() {
    let (_dir, _store, app) = setup_csv_app();

    let response = app
        .clone()
        .oneshot(get("/api/records?degree=maybe"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let response = app
        .clone()
        .oneshot(get("/api/records?min_salary=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let response = app
        .clone()
        .oneshot(get("/api/records?page=first"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let response = app
        .oneshot(get("/api/summary?max_experience=-x"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_summary_over_filtered_set() {
    let (_dir, _store, app) = setup_csv_app();
    seed(&app).await;

    let response = app
        .clone()
        .oneshot(get("/api/summary?min_experience=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_entries"], 2);
    assert_eq!(body["average_salary"], 25000.0);
    assert_eq!(body["unique_roles"], 2);

    let response = app
        .oneshot(get("/api/summary?country=Nowhere"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_entries"], 0);
    assert_eq!(body["average_salary"], 0.0);
}

#[tokio::test]
async fn test_filter_options() {
    let (_dir, _store, app) = setup_csv_app();
    seed(&app).await;

    let response = app.oneshot(get("/api/filters/options")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["countries"], json!(["All Countries", "Kitwe", "Lusaka"]));
    assert_eq!(body["industries"], json!(["Banking"]));
    assert_eq!(body["degrees"], json!(["Yes"]));
}

#[tokio::test]
async fn test_form_choices_from_reference_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Industries.csv"), "Industry\nMining\nFinance\n").unwrap();
    std::fs::write(dir.path().join("worldcities.csv"), "city,country\nNdola,Zambia\n").unwrap();
    let store = Arc::new(CsvStore::open(dir.path().join("new_salary.csv")).unwrap());
    let state = AppState::new(store, None).with_choices(ReferenceLists::load(dir.path()));
    let app = build_router(state);

    let response = app.oneshot(get("/api/form/choices")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["industries"], json!(["Finance", "Mining"]));
    assert_eq!(body["locations"], json!(["Ndola"]));
    assert_eq!(body["nationalities"], json!([]));
}

#[tokio::test]
async fn test_form_choices_empty_by_default() {
    let (_dir, _store, app) = setup_csv_app();

    let response = app.oneshot(get("/api/form/choices")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["industries"], json!([]));
}

// =============================================================================
// Exchange rate and SQLite backend
// =============================================================================

#[tokio::test]
async fn test_exchange_rate_unavailable_without_client() {
    let (_dir, _store, app) = setup_csv_app();

    let response = app.oneshot(get("/api/exchange-rate")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["available"], false);
    assert_eq!(body["rate"], Value::Null);
}

#[tokio::test]
async fn test_sqlite_backend_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(&dir.path().join("salary.db")).await.unwrap());
    let app = build_router(AppState::new(store, None));

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["backend"], "sqlite");

    seed(&app).await;

    let response = app.oneshot(get("/api/records")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total_results"], 3);

    let dates: Vec<&str> = body["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["submission_date"].as_str().unwrap())
        .collect();
    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted, "records should be newest first");
}
