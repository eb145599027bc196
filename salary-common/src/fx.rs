//! Exchange-rate client
//!
//! Best-effort lookup of the USD to local-currency rate. Failures are
//! reported as [`FxError`] and callers treat them as "no rate"; nothing on
//! the ingestion or display path depends on a lookup succeeding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::FxConfig;

const USER_AGENT: &str = concat!("salary-transparency/", env!("CARGO_PKG_VERSION"));

/// Exchange-rate lookup errors
#[derive(Debug, Error)]
pub enum FxError {
    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Rate service returned a non-success status
    #[error("API error {0}")]
    Api(u16),

    /// Response did not contain a usable rate for the currency
    #[error("No rate for {0}")]
    MissingRate(String),

    /// Failed to parse response JSON
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One observed rate: 1 `base` = `rate` `quote`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FxQuote {
    pub base: String,
    pub quote: String,
    pub rate: f64,
    pub as_of: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// Extract the `quote` rate from a rates response body
pub fn parse_rate(body: &str, quote: &str) -> Result<f64, FxError> {
    let response: RatesResponse =
        serde_json::from_str(body).map_err(|e| FxError::Parse(e.to_string()))?;

    let rate = response
        .rates
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(quote))
        .map(|(_, rate)| *rate)
        .ok_or_else(|| FxError::MissingRate(quote.to_string()))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(FxError::MissingRate(quote.to_string()));
    }
    Ok(rate)
}

pub struct FxClient {
    http: reqwest::Client,
    endpoint: String,
    base: String,
    quote: String,
    last_quote: RwLock<Option<FxQuote>>,
}

impl FxClient {
    pub fn new(config: &FxConfig) -> Result<Self, FxError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FxError::Network(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            base: config.base_currency.to_uppercase(),
            quote: config.quote_currency.to_uppercase(),
            last_quote: RwLock::new(None),
        })
    }

    /// Query the rate service and cache the result
    pub async fn fetch(&self) -> Result<FxQuote, FxError> {
        debug!("Fetching {}/{} rate from {}", self.base, self.quote, self.endpoint);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("base", self.base.as_str()), ("symbols", self.quote.as_str())])
            .send()
            .await
            .map_err(|e| FxError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FxError::Api(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FxError::Network(e.to_string()))?;
        let rate = parse_rate(&body, &self.quote)?;

        let quote = FxQuote {
            base: self.base.clone(),
            quote: self.quote.clone(),
            rate,
            as_of: crate::time::now(),
        };
        *self.last_quote.write().await = Some(quote.clone());
        info!("{}/{} rate updated: {:.4}", self.base, self.quote, rate);
        Ok(quote)
    }

    /// Fetch, falling back to the cached quote (if any) on failure
    pub async fn refresh(&self) -> Option<FxQuote> {
        match self.fetch().await {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!("Exchange rate lookup failed: {}", e);
                self.cached().await
            }
        }
    }

    /// Last successfully fetched quote; never touches the network
    pub async fn cached(&self) -> Option<FxQuote> {
        self.last_quote.read().await.clone()
    }

    /// Replace the cached quote
    pub async fn set_cached(&self, quote: FxQuote) {
        *self.last_quote.write().await = Some(quote);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate() {
        let body = r#"{"base":"USD","date":"2024-05-01","rates":{"ZMW":26.85,"EUR":0.93}}"#;
        assert_eq!(parse_rate(body, "ZMW").unwrap(), 26.85);
        assert_eq!(parse_rate(body, "zmw").unwrap(), 26.85);
    }

    #[test]
    fn test_parse_rate_missing_currency() {
        let body = r#"{"rates":{"EUR":0.93}}"#;
        assert!(matches!(parse_rate(body, "ZMW"), Err(FxError::MissingRate(_))));
        assert!(matches!(parse_rate("{}", "ZMW"), Err(FxError::MissingRate(_))));
    }

    #[test]
    fn test_parse_rate_rejects_zero_and_junk() {
        assert!(matches!(
            parse_rate(r#"{"rates":{"ZMW":0}}"#, "ZMW"),
            Err(FxError::MissingRate(_))
        ));
        assert!(matches!(parse_rate("<html>", "ZMW"), Err(FxError::Parse(_))));
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_cached_quote() {
        let config = FxConfig {
            // Nothing listens on the discard port
            endpoint: "http://127.0.0.1:9/latest".to_string(),
            timeout_ms: 500,
            ..FxConfig::default()
        };
        let client = FxClient::new(&config).unwrap();
        assert!(client.refresh().await.is_none());

        let quote = FxQuote {
            base: "USD".to_string(),
            quote: "ZMW".to_string(),
            rate: 27.1,
            as_of: crate::time::now(),
        };
        client.set_cached(quote.clone()).await;
        assert_eq!(client.refresh().await, Some(quote));
    }
}
