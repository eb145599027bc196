//! Exchange-rate lookup for the submission form

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use salary_common::fx::FxQuote;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ExchangeRateResponse {
    pub available: bool,
    pub base: Option<String>,
    pub quote: Option<String>,
    pub rate: Option<f64>,
    pub as_of: Option<DateTime<Utc>>,
}

impl From<Option<FxQuote>> for ExchangeRateResponse {
    fn from(quote: Option<FxQuote>) -> Self {
        match quote {
            Some(q) => Self {
                available: true,
                base: Some(q.base),
                quote: Some(q.quote),
                rate: Some(q.rate),
                as_of: Some(q.as_of),
            },
            None => Self {
                available: false,
                base: None,
                quote: None,
                rate: None,
                as_of: None,
            },
        }
    }
}

/// GET /api/exchange-rate
///
/// Best effort: a failed lookup falls back to the last good quote, and
/// reports `available: false` when there is none. Never an error status.
pub async fn get_exchange_rate(State(state): State<AppState>) -> Json<ExchangeRateResponse> {
    let quote = match &state.fx {
        Some(fx) => fx.refresh().await,
        None => None,
    };
    Json(quote.into())
}
