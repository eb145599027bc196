//! salary-dash library: HTTP dashboard over the salary record store

use axum::{extract::DefaultBodyLimit, Router};
use salary_common::fx::FxClient;
use salary_common::{Ingestor, RecordStore, ReferenceLists};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod error;
pub mod pagination;

/// Largest accepted request body; a submission is a dozen short fields
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub ingestor: Arc<Ingestor>,
    /// `None` when exchange-rate lookups are disabled
    pub fx: Option<Arc<FxClient>>,
    /// Submission-form choices, read once at startup
    pub choices: Arc<ReferenceLists>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, fx: Option<Arc<FxClient>>) -> Self {
        let ingestor = Arc::new(Ingestor::new(store.clone(), fx.clone()));
        Self {
            store,
            ingestor,
            fx,
            choices: Arc::new(ReferenceLists::default()),
        }
    }

    pub fn with_choices(mut self, choices: ReferenceLists) -> Self {
        self.choices = Arc::new(choices);
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/records", get(api::list_records))
        .route("/api/summary", get(api::get_summary))
        .route("/api/filters/options", get(api::get_filter_options))
        .route("/api/form/choices", get(api::get_form_choices))
        .route("/api/submissions", post(api::create_submission))
        .route("/api/exchange-rate", get(api::get_exchange_rate))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    let pages = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(pages)
        .layer(TraceLayer::new_for_http())
        // The mobile client calls the API cross-origin
        .layer(CorsLayer::permissive())
        .with_state(state)
}
