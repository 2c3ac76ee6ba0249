use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use log::debug;
use time::OffsetDateTime;

use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::price::{normalize_candles, Candle};

/// Exchange suffixes tried for bare tickers, in order. UCITS ETFs such as
/// "VUAG" or "SX5S" only resolve on Yahoo with their listing suffix.
pub const EXCHANGE_SUFFIXES: [&str; 6] = [".L", ".DE", ".PA", ".AS", ".MI", ".SW"];

/// Maximum number of search hits considered as extra candidates.
const SEARCH_RESULT_LIMIT: usize = 12;

/// Yahoo Finance provider for ETF/equity prices.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities and ETFs, daily history.
/// - **Symbol resolution**: the raw ticker first, then the ticker with each
///   European exchange suffix, then whatever Yahoo search suggests.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Candidates that need no network lookup: the normalized ticker, plus
    /// exchange-suffixed variants when the ticker carries no exchange marker.
    pub fn static_candidates(symbol: &str) -> Vec<String> {
        let symbol = symbol.trim().to_uppercase();
        let mut out = vec![symbol.clone()];
        if !symbol.contains('.') && !symbol.contains(':') {
            out.extend(EXCHANGE_SUFFIXES.iter().map(|s| format!("{symbol}{s}")));
        }
        out
    }

    /// Extra candidates from Yahoo search, excluding any already tried.
    /// Search failures yield no candidates.
    async fn search_candidates(&self, symbol: &str, tried: &[String]) -> Vec<String> {
        let result = match self.connector.search_ticker(symbol).await {
            Ok(result) => result,
            Err(e) => {
                debug!("Yahoo search for {symbol} failed: {e}");
                return Vec::new();
            }
        };

        let mut out: Vec<String> = Vec::new();
        for item in result.quotes.iter().take(SEARCH_RESULT_LIMIT) {
            let candidate = item.symbol.trim().to_uppercase();
            if candidate.is_empty() || tried.contains(&candidate) || out.contains(&candidate) {
                continue;
            }
            out.push(candidate);
        }
        out
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let invalid = |e: time::error::ComponentRange| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Invalid date {date}: {e}"),
        };
        let month = time::Month::try_from(date.month() as u8).map_err(invalid)?;
        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(invalid)?
            .midnight()
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    async fn latest_price(&self, candidate: &str) -> Result<f64, String> {
        let resp = self
            .connector
            .get_latest_quotes(candidate, "1d")
            .await
            .map_err(|e| e.to_string())?;
        let quote = resp.last_quote().map_err(|e| e.to_string())?;
        if quote.close.is_finite() && quote.close > 0.0 {
            Ok(quote.close)
        } else {
            Err(format!("invalid close {}", quote.close))
        }
    }

    async fn closes(
        &self,
        candidate: &str,
        since: NaiveDate,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Candle>, String> {
        let resp = self
            .connector
            .get_quote_history(candidate, start, end)
            .await
            .map_err(|e| e.to_string())?;
        let quotes = resp.quotes().map_err(|e| e.to_string())?;

        let candles: Vec<Candle> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                (date >= since).then_some(Candle::new(date, q.close))
            })
            .collect();

        let candles = normalize_candles(candles);
        if candles.is_empty() {
            Err("no closes in range".to_string())
        } else {
            Ok(candles)
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        let mut tried = Self::static_candidates(symbol);
        let mut last_reason = String::from("no candidates");

        for candidate in &tried {
            match self.latest_price(candidate).await {
                Ok(price) => return Ok(price),
                Err(reason) => last_reason = reason,
            }
        }

        let extra = self.search_candidates(symbol, &tried).await;
        for candidate in &extra {
            match self.latest_price(candidate).await {
                Ok(price) => return Ok(price),
                Err(reason) => last_reason = reason,
            }
        }
        tried.extend(extra);

        Err(CoreError::QuoteUnavailable {
            symbol: symbol.to_string(),
            reason: format!("Yahoo: tried {} symbols, last error: {last_reason}", tried.len()),
        })
    }

    async fn get_historical_closes(
        &self,
        symbol: &str,
        since: NaiveDate,
    ) -> Result<Vec<Candle>, CoreError> {
        let start = Self::to_offset_datetime(since)?;
        let end = OffsetDateTime::now_utc();

        let mut tried = Self::static_candidates(symbol);
        let mut last_reason = String::from("no candidates");

        for candidate in &tried {
            match self.closes(candidate, since, start, end).await {
                Ok(candles) => return Ok(candles),
                Err(reason) => last_reason = reason,
            }
        }

        let extra = self.search_candidates(symbol, &tried).await;
        for candidate in &extra {
            match self.closes(candidate, since, start, end).await {
                Ok(candles) => return Ok(candles),
                Err(reason) => last_reason = reason,
            }
        }
        tried.extend(extra);

        Err(CoreError::HistoryUnavailable {
            symbol: symbol.to_string(),
            reason: format!("Yahoo: tried {} symbols, last error: {last_reason}", tried.len()),
        })
    }
}
