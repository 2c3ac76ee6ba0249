use chrono::{Months, NaiveDate, Utc};
use futures::future::join_all;
use log::{debug, warn};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::models::chart::{PerformancePoint, Series};
use crate::models::holding::Holding;
use crate::models::price::{normalize_candles, Candle};
use crate::models::settings::{FetchMode, Settings};
use crate::providers::traits::QuoteProvider;
use crate::services::valuation_service::ValuationService;

/// Outcome of one series build, for callers that report partial failures
/// ("2 of 6 holdings failed").
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesReport {
    pub series: Series,
    /// Holdings whose history contributed to the series
    pub succeeded: usize,
    /// Holdings skipped because their history could not be fetched
    pub failed: usize,
    /// True when the series is the deterministic fallback
    pub used_fallback: bool,
}

/// Builds a portfolio's weighted return series from each holding's daily closes.
///
/// Each holding contributes `weight/total * (close/base - 1) * 100` to every
/// close its own history reports, where `base` is its first close. Closes
/// sharing a date all add to that date. Dates are not aligned across
/// holdings: a date's value is the sum over whichever holdings reported it. Provider failures only drop the failing holding.
/// With no usable history at all, the series is a straight line from 0 to
/// the current P/L% over monthly marks (see `fallback_series`).
pub struct SeriesService {
    valuation: ValuationService,
    start_date: NaiveDate,
    fetch_mode: FetchMode,
}

impl SeriesService {
    pub fn new(start_date: NaiveDate, starting_capital: f64, fetch_mode: FetchMode) -> Self {
        Self {
            valuation: ValuationService::new(starting_capital),
            start_date,
            fetch_mode,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.start_date,
            settings.starting_capital,
            settings.fetch_mode,
        )
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Build the series as of today (UTC).
    pub async fn build_series(&self, holdings: &[Holding], provider: &dyn QuoteProvider) -> Series {
        self.build_series_at(holdings, provider, Utc::now().date_naive())
            .await
    }

    /// Build the series with an explicit evaluation date (used by the fallback).
    pub async fn build_series_at(
        &self,
        holdings: &[Holding],
        provider: &dyn QuoteProvider,
        today: NaiveDate,
    ) -> Series {
        self.build_series_report(holdings, provider, today)
            .await
            .series
    }

    /// Build the series and report how many holdings contributed.
    pub async fn build_series_report(
        &self,
        holdings: &[Holding],
        provider: &dyn QuoteProvider,
        today: NaiveDate,
    ) -> SeriesReport {
        if holdings.is_empty() {
            return SeriesReport {
                series: Vec::new(),
                succeeded: 0,
                failed: 0,
                used_fallback: false,
            };
        }

        let histories = self.fetch_histories(holdings, provider).await;

        let total_weight: f64 = holdings.iter().map(|h| h.weight).sum();
        let total_weight = if total_weight == 0.0 { 1.0 } else { total_weight };

        let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut succeeded = 0;
        let mut failed = 0;

        // Merge in holding order regardless of fetch completion order
        for (holding, history) in holdings.iter().zip(histories) {
            let candles = match history {
                Ok(candles) => normalize_candles(candles),
                Err(e) => {
                    warn!("Skipping {} in series: {e}", holding.ticker);
                    failed += 1;
                    continue;
                }
            };
            let Some(base) = candles.first().map(|c| c.close) else {
                warn!("Skipping {} in series: no closes since {}", holding.ticker, self.start_date);
                failed += 1;
                continue;
            };

            succeeded += 1;
            let share = holding.weight / total_weight;
            for candle in &candles {
                let contribution = share * ((candle.close / base) - 1.0) * 100.0;
                *by_date.entry(candle.date).or_insert(0.0) += contribution;
            }
        }

        if succeeded == 0 || by_date.is_empty() {
            debug!(
                "No history for any of {} holdings, using fallback series",
                holdings.len()
            );
            return SeriesReport {
                series: self.fallback_series(holdings, today),
                succeeded,
                failed,
                used_fallback: true,
            };
        }

        let series = by_date
            .into_iter()
            .map(|(date, value)| PerformancePoint::new(date, value))
            .collect();

        SeriesReport {
            series,
            succeeded,
            failed,
            used_fallback: false,
        }
    }

    /// Deterministic substitute series: monthly marks from the start date up
    /// to `today`, interpolated linearly from 0 to the current P/L%.
    ///
    /// The last point is always `(today, aggregate_stats(holdings).pl_percent)`.
    pub fn fallback_series(&self, holdings: &[Holding], today: NaiveDate) -> Series {
        let marks = self.month_marks(today);
        let drift = self.valuation.aggregate_stats(holdings).pl_percent;
        let denominator = marks.len().saturating_sub(1).max(1) as f64;

        marks
            .into_iter()
            .enumerate()
            .map(|(i, date)| PerformancePoint::new(date, drift * (i as f64 / denominator)))
            .collect()
    }

    /// Calendar-month marks from the start date while ≤ `today`, ending at `today`.
    ///
    /// Each mark is `start + n months` clamped to the month's last day, so
    /// Jan 30 is followed by Feb 28, Mar 30, Apr 30, … This deliberately
    /// differs from the browser dashboard, whose `Date.setMonth` rolls
    /// Jan 30 over to Mar 2 and therefore yields fewer marks early in a
    /// month.
    pub fn month_marks(&self, today: NaiveDate) -> Vec<NaiveDate> {
        let mut marks = Vec::new();
        let mut step = 0u32;
        while let Some(mark) = self.start_date.checked_add_months(Months::new(step)) {
            if mark > today {
                break;
            }
            marks.push(mark);
            step += 1;
        }

        if marks.last() != Some(&today) {
            marks.push(today);
        }
        marks
    }

    async fn fetch_histories(
        &self,
        holdings: &[Holding],
        provider: &dyn QuoteProvider,
    ) -> Vec<Result<Vec<Candle>, CoreError>> {
        match self.fetch_mode {
            FetchMode::Sequential => {
                let mut out = Vec::with_capacity(holdings.len());
                for holding in holdings {
                    out.push(
                        provider
                            .get_historical_closes(&holding.ticker, self.start_date)
                            .await,
                    );
                }
                out
            }
            FetchMode::Concurrent => {
                // join_all keeps input order and lets every request settle
                join_all(
                    holdings
                        .iter()
                        .map(|h| provider.get_historical_closes(&h.ticker, self.start_date)),
                )
                .await
            }
        }
    }
}

impl Default for SeriesService {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
