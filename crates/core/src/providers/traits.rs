use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::price::Candle;

/// Trait abstraction for all quote/candle sources.
///
/// Each source (Yahoo Finance, the local dashboard proxy, test mocks)
/// implements this trait; the valuation and series code only ever sees
/// `&dyn QuoteProvider`.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest price for a ticker. Fails with `QuoteUnavailable` when the
    /// ticker cannot be resolved or priced.
    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError>;

    /// Daily closes for a ticker from `since` up to today, sorted by date.
    /// Fails with `HistoryUnavailable` when there is no data in range.
    async fn get_historical_closes(
        &self,
        symbol: &str,
        since: NaiveDate,
    ) -> Result<Vec<Candle>, CoreError>;
}
