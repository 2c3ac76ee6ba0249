use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily close (date → close).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub close: f64,
}

impl Candle {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }

    /// A close can enter the core only when it is finite and positive.
    pub fn is_valid(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

/// Bring a raw provider history into canonical shape: invalid closes
/// dropped, sorted by date.
///
/// Several closes may share a date (Yahoo appends an intraday row to the
/// daily chart). All of them are kept, in provider order, and each one
/// contributes to the return series.
pub fn normalize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    candles.retain(Candle::is_valid);
    // Stable: same-date closes keep provider order, so the base stays the first close.
    candles.sort_by_key(|c| c.date);
    candles
}
