//! HTTP client for a remote exchange rate service.
//!
//! The service is expected to answer `GET {base_url}/latest` and
//! `GET {base_url}/{YYYY-MM-DD}` with a JSON body of the form
//! `{"base": "USD", "rates": {"CLP": 950.12, ...}}`.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::RatesSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::RateTable;

use super::{RateProvider, RateQuery};

/// Fetches rate tables over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    base_currency: String,
}

impl HttpRateProvider {
    /// Creates a provider requesting rates relative to `base_currency`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ServerError`] if the HTTP client cannot be built.
    pub fn new(settings: &RatesSettings, base_currency: impl Into<String>) -> EngineResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| EngineError::ServerError {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            base_currency: base_currency.into(),
        })
    }

    fn url_for(&self, query: RateQuery) -> String {
        format!("{}/{}", self.base_url, query)
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rates(&self, query: RateQuery) -> EngineResult<RateTable> {
        let url = self.url_for(query);
        let failed = |message: String| EngineError::RateFetchFailed {
            query: query.to_string(),
            message,
        };

        let mut params = vec![("base", self.base_currency.as_str())];
        if let Some(key) = &self.api_key {
            params.push(("access_key", key.as_str()));
        }

        debug!(%url, base = %self.base_currency, "fetching exchange rates");
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| failed(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "rate service returned an error status");
            return Err(failed(format!("HTTP {}", status)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| failed(format!("invalid JSON body: {}", e)))?;

        let table = parse_rates_payload(&payload, &self.base_currency).map_err(failed)?;
        debug!(%query, currencies = table.rates.len(), "exchange rates fetched");
        Ok(table)
    }
}

/// Turns a rate service response body into a [`RateTable`].
///
/// A missing `base` falls back to `requested_base`.
///
/// # Errors
///
/// Returns a description of the problem when the body is not an object,
/// reports `success: false` or carries an `error` member, or when `rates`
/// is missing, not an object, or holds a non-numeric or non-positive value.
///
/// # Example
///
/// ```
/// use expense_policy::rates::parse_rates_payload;
/// use rust_decimal::Decimal;
///
/// let body = serde_json::json!({"base": "USD", "rates": {"CLP": 950.5}});
/// let table = parse_rates_payload(&body, "USD").unwrap();
/// assert_eq!(table.rate_for("CLP"), Some(Decimal::new(9505, 1)));
///
/// let error = serde_json::json!({"success": false, "error": {"info": "quota exceeded"}});
/// assert!(parse_rates_payload(&error, "USD").is_err());
/// ```
pub fn parse_rates_payload(payload: &Value, requested_base: &str) -> Result<RateTable, String> {
    let object = payload
        .as_object()
        .ok_or_else(|| "response body is not a JSON object".to_string())?;

    if let Some(error) = object.get("error").filter(|e| !e.is_null()) {
        return Err(format!("service reported an error: {}", describe_error(error)));
    }
    if object.get("success").and_then(Value::as_bool) == Some(false) {
        return Err("service reported success: false".to_string());
    }

    let rates = object
        .get("rates")
        .ok_or_else(|| "response has no 'rates' member".to_string())?
        .as_object()
        .ok_or_else(|| "'rates' is not an object".to_string())?;

    let mut parsed = HashMap::with_capacity(rates.len());
    for (code, value) in rates {
        let rate = match value {
            Value::Number(n) => parse_decimal(&n.to_string()),
            _ => None,
        }
        .ok_or_else(|| format!("rate for {} is not a number: {}", code, value))?;
        if rate <= Decimal::ZERO {
            return Err(format!("rate for {} must be positive, got {}", code, rate));
        }
        parsed.insert(code.clone(), rate);
    }

    let base = object
        .get("base")
        .and_then(Value::as_str)
        .unwrap_or(requested_base)
        .to_string();

    Ok(RateTable { base, rates: parsed })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn describe_error(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(fields) => fields
            .get("info")
            .or_else(|| fields.get("message"))
            .or_else(|| fields.get("type"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}
