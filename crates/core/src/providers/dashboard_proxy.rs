use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::price::{normalize_candles, Candle};

const PROVIDER: &str = "Dashboard proxy";

/// Provider backed by the dashboard's local market-data proxy.
///
/// The proxy exposes three JSON endpoints:
/// - `GET /api/quote?symbol=X` → `{"c": 123.4, "_resolvedSymbol": "X.L"}`
/// - `GET /api/candles?symbol=X&start=YYYY-MM-DD` → `{"s": "ok", "t": [...], "c": [...]}`
/// - `GET /api/health` → `{"ok": true}`
///
/// Failures come back as a non-2xx status with `{"error": "..."}`.
/// Payload fields are loosely typed, so every number is checked here
/// before anything reaches the core.
pub struct DashboardProxyProvider {
    client: Client,
    base_url: String,
}

impl DashboardProxyProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(20));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// True when the proxy answers its health endpoint with `{"ok": true}`.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/api/health", self.base_url);
        let resp = match self.client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => resp,
            _ => return false,
        };
        match resp.json::<HealthResponse>().await {
            Ok(health) => health.ok.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Fetch an endpoint and return its JSON body, turning non-2xx answers
    /// into the proxy's own error message when it sent one.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, String> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| CoreError::from(e).to_string())?;

        let status = resp.status();
        let body: Value = resp
            .json()
            .await
            .map_err(|e| format!("invalid JSON ({status}): {e}"))?;

        if !status.is_success() {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(message);
        }
        Ok(body)
    }
}

// ── Proxy response types ────────────────────────────────────────────

#[derive(Deserialize)]
struct HealthResponse {
    ok: Option<bool>,
}

#[derive(Deserialize)]
struct QuoteResponse {
    c: Option<Value>,
}

#[derive(Deserialize)]
struct CandleResponse {
    s: Option<String>,
    #[serde(default)]
    t: Vec<Value>,
    #[serde(default)]
    c: Vec<Value>,
}

/// Validate a quote payload into a positive price.
pub fn parse_quote_payload(body: &Value) -> Result<f64, String> {
    let quote = QuoteResponse::deserialize(body).map_err(|e| format!("invalid quote: {e}"))?;
    match quote.c.as_ref().and_then(Value::as_f64) {
        Some(price) if price.is_finite() && price > 0.0 => Ok(price),
        _ => Err("Invalid quote".to_string()),
    }
}

/// Validate a candles payload into dated closes.
///
/// Entries whose timestamp or close is missing, non-numeric or non-positive
/// are dropped; a payload whose status is not `"ok"` is rejected.
pub fn parse_candle_payload(body: &Value) -> Result<Vec<Candle>, String> {
    let payload =
        CandleResponse::deserialize(body).map_err(|e| format!("invalid candles: {e}"))?;
    if payload.s.as_deref() != Some("ok") {
        return Err("No candle data".to_string());
    }

    let candles = payload
        .c
        .iter()
        .zip(payload.t.iter())
        .filter_map(|(close, ts)| {
            let close = close.as_f64()?;
            let date = chrono::DateTime::from_timestamp(ts.as_i64()?, 0)?.date_naive();
            Some(Candle::new(date, close))
        })
        .collect();

    Ok(normalize_candles(candles))
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for DashboardProxyProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let unavailable = |reason: String| CoreError::QuoteUnavailable {
            symbol: symbol.to_string(),
            reason: format!("{PROVIDER}: {reason}"),
        };
        let body = self
            .get_json("/api/quote", &[("symbol", symbol)])
            .await
            .map_err(unavailable)?;
        parse_quote_payload(&body).map_err(unavailable)
    }

    async fn get_historical_closes(
        &self,
        symbol: &str,
        since: NaiveDate,
    ) -> Result<Vec<Candle>, CoreError> {
        let unavailable = |reason: String| CoreError::HistoryUnavailable {
            symbol: symbol.to_string(),
            reason: format!("{PROVIDER}: {reason}"),
        };
        let start = since.format("%Y-%m-%d").to_string();
        let body = self
            .get_json("/api/candles", &[("symbol", symbol), ("start", &start)])
            .await
            .map_err(unavailable)?;
        let candles = parse_candle_payload(&body).map_err(unavailable)?;
        if candles.is_empty() {
            return Err(unavailable("no closes in range".to_string()));
        }
        Ok(candles)
    }
}
