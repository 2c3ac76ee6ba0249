use chrono::NaiveDate;
use futures::future::join;
use log::{info, warn};

use crate::errors::CoreError;
use crate::models::owner::Owner;
use crate::models::portfolio::PortfolioStore;
use crate::models::price::Candle;
use crate::providers::traits::QuoteProvider;

/// How many failures the status line spells out before eliding the rest.
const LISTED_FAILURES: usize = 4;

/// A ticker whose live refresh failed.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedTicker {
    pub owner: Owner,
    pub ticker: String,
    pub message: String,
}

/// Summary of one live price refresh across every portfolio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    pub updated: usize,
    pub failed: Vec<FailedTicker>,
}

impl RefreshReport {
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl std::fmt::Display for RefreshReport {
    /// The status line shown after a refresh, e.g.
    /// `Live price refresh finished. Updated: 10, failed: 2. Failed tickers: A (x) | B (y)`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Live price refresh finished. Updated: {}, failed: {}.",
            self.updated,
            self.failed.len()
        )?;
        if self.failed.is_empty() {
            return Ok(());
        }

        let listed: Vec<String> = self
            .failed
            .iter()
            .take(LISTED_FAILURES)
            .map(|t| format!("{} ({})", t.ticker, t.message))
            .collect();
        write!(f, " Failed tickers: {}", listed.join(" | "))?;
        if self.failed.len() > LISTED_FAILURES {
            f.write_str(" ...")?;
        }
        Ok(())
    }
}

/// Pulls live prices into the store.
///
/// For each holding the quote and the history are requested together.
/// When both arrive, `current_price` becomes the quote and `buy_price` the
/// first close since the start date. Any failure leaves that holding
/// untouched and is recorded in the report; the refresh carries on.
pub struct RefreshService;

impl RefreshService {
    pub fn new() -> Self {
        Self
    }

    pub async fn refresh_prices(
        &self,
        store: &mut PortfolioStore,
        provider: &dyn QuoteProvider,
        since: NaiveDate,
    ) -> RefreshReport {
        let mut report = RefreshReport::default();

        for owner in Owner::ALL {
            for holding in store.holdings_mut(owner).iter_mut() {
                let (quote, closes) = join(
                    provider.get_current_price(&holding.ticker),
                    provider.get_historical_closes(&holding.ticker, since),
                )
                .await;

                match Self::combine(quote, closes) {
                    Ok((price, first_close)) => {
                        holding.current_price = price;
                        if let Some(close) = first_close {
                            holding.buy_price = close;
                        }
                        report.updated += 1;
                    }
                    Err(e) => {
                        warn!("Live refresh of {} for {owner} failed: {e}", holding.ticker);
                        report.failed.push(FailedTicker {
                            owner,
                            ticker: holding.ticker.clone(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        info!("{report}");
        report
    }

    /// Both requests must succeed; the quote error wins when both fail.
    fn combine(
        quote: Result<f64, CoreError>,
        closes: Result<Vec<Candle>, CoreError>,
    ) -> Result<(f64, Option<f64>), CoreError> {
        let price = quote?;
        let candles = closes?;
        let first_close = candles
            .iter()
            .min_by_key(|c| c.date)
            .map(|c| c.close)
            .filter(|c| c.is_finite() && *c > 0.0);
        Ok((price, first_close))
    }
}

impl Default for RefreshService {
    fn default() -> Self {
        Self::new()
    }
}
