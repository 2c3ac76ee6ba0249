use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One weighted position within a portfolio.
///
/// Field names serialize in camelCase (`buyPrice`, `currentPrice`, `buyDate`)
/// to stay compatible with blobs written by the browser dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    /// Opaque identifier, stable for the holding's lifetime.
    pub id: String,

    /// Display name (e.g., "Vanguard S&P 500")
    pub asset: String,

    /// Symbol used to query price providers (e.g., "VUAG")
    pub ticker: String,

    /// Relative allocation factor. Normalized against the portfolio's sum,
    /// so {25,25,25,25} and {1,1,1,1} allocate identically.
    pub weight: f64,

    /// Reference price at the start date. `<= 0` means "unset".
    pub buy_price: f64,

    /// Latest known price. `<= 0` means "unknown".
    pub current_price: f64,

    /// The global start date, recorded per holding for display.
    pub buy_date: NaiveDate,
}

impl Holding {
    pub fn new(
        asset: impl Into<String>,
        ticker: impl Into<String>,
        weight: f64,
        buy_price: f64,
        current_price: f64,
        buy_date: NaiveDate,
    ) -> Self {
        Self {
            id: new_holding_id(),
            asset: asset.into(),
            ticker: ticker.into(),
            weight,
            buy_price,
            current_price,
            buy_date,
        }
    }

    /// A holding with unit prices, as the provided portfolios are seeded.
    pub fn seeded(
        asset: impl Into<String>,
        ticker: impl Into<String>,
        weight: f64,
        buy_date: NaiveDate,
    ) -> Self {
        Self::new(asset, ticker, weight, 1.0, 1.0, buy_date)
    }

    /// Start price used for valuation: `buy_price`, or 1 when unset.
    pub fn effective_start_price(&self) -> f64 {
        if self.buy_price > 0.0 {
            self.buy_price
        } else {
            1.0
        }
    }

    /// Current price used for valuation: `current_price`, or the effective
    /// start price when unknown.
    pub fn effective_current_price(&self) -> f64 {
        if self.current_price > 0.0 {
            self.current_price
        } else {
            self.effective_start_price()
        }
    }

    /// Percentage move of this holding since the start date.
    pub fn return_pct(&self) -> f64 {
        let start = self.effective_start_price();
        (self.effective_current_price() - start) / start * 100.0
    }
}

/// Generate a fresh holding identifier.
pub fn new_holding_id() -> String {
    Uuid::new_v4().to_string()
}
