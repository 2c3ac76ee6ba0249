use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use crate::errors::CoreError;
use crate::models::price::{normalize_candles, Candle};
use crate::providers::registry::ProviderRegistry;
use crate::providers::traits::QuoteProvider;

/// Fetches quotes and closes from the registered providers with fallback.
///
/// Providers are tried in registration order; the first valid answer wins.
/// Every answer is validated here (finite positive price; closes filtered,
/// sorted by date) so the core only sees well-formed data.
/// Whatever a provider fails with, the caller gets `QuoteUnavailable` or
/// `HistoryUnavailable` (or `NoProvider` for an empty registry).
pub struct PriceService {
    registry: ProviderRegistry,
}

impl PriceService {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Names of the registered providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.names()
    }

    pub fn has_providers(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Latest price of `symbol` from the first provider that can price it.
    pub async fn fetch_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        if self.registry.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in self.registry.providers() {
            match provider.get_current_price(symbol).await {
                Ok(price) if price.is_finite() && price > 0.0 => return Ok(price),
                Ok(price) => {
                    last_error = Some(CoreError::QuoteUnavailable {
                        symbol: symbol.to_string(),
                        reason: format!("{} returned invalid price {price}", provider.name()),
                    });
                }
                Err(e) => {
                    debug!("{} could not price {symbol}: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e) if e.is_provider_unavailable() => e,
            Some(e) => CoreError::QuoteUnavailable {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            },
            None => CoreError::NoProvider,
        })
    }

    /// Daily closes of `symbol` since `since`, from the first provider with data.
    pub async fn fetch_historical_closes(
        &self,
        symbol: &str,
        since: NaiveDate,
    ) -> Result<Vec<Candle>, CoreError> {
        if self.registry.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in self.registry.providers() {
            match provider.get_historical_closes(symbol, since).await {
                Ok(candles) => {
                    let candles = normalize_candles(candles);
                    if !candles.is_empty() {
                        return Ok(candles);
                    }
                    last_error = Some(CoreError::HistoryUnavailable {
                        symbol: symbol.to_string(),
                        reason: format!("{} returned no valid closes", provider.name()),
                    });
                }
                Err(e) => {
                    debug!("{} has no history for {symbol}: {e}", provider.name());
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e) if e.is_provider_unavailable() => e,
            Some(e) => CoreError::HistoryUnavailable {
                symbol: symbol.to_string(),
                reason: e.to_string(),
            },
            None => CoreError::NoProvider,
        })
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for PriceService {
    fn name(&self) -> &str {
        "Provider chain"
    }

    async fn get_current_price(&self, symbol: &str) -> Result<f64, CoreError> {
        self.fetch_current_price(symbol).await
    }

    async fn get_historical_closes(
        &self,
        symbol: &str,
        since: NaiveDate,
    ) -> Result<Vec<Candle>, CoreError> {
        self.fetch_historical_closes(symbol, since).await
    }
}
