use serde::{Deserialize, Serialize};

use super::chart::{ChartPath, Series};
use super::owner::Owner;

/// Aggregate valuation of one portfolio, derived from its holdings at read time.
///
/// Never persisted: recomputing from the holdings always gives the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Starting capital allocated across the holdings
    pub start_value: f64,

    /// Value of the same allocation at current prices
    pub current_value: f64,

    /// Absolute profit/loss: current_value - start_value
    pub pl_dollar: f64,

    /// Percentage profit/loss: pl_dollar / start_value * 100
    pub pl_percent: f64,
}

impl AggregateStats {
    /// The all-zero result for a portfolio with no allocatable weight.
    pub const ZERO: AggregateStats = AggregateStats {
        start_value: 0.0,
        current_value: 0.0,
        pl_dollar: 0.0,
        pl_percent: 0.0,
    };

    /// True when the portfolio is flat or up.
    pub fn is_gain(&self) -> bool {
        self.pl_percent >= 0.0
    }
}

/// Everything the dashboard shows for one owner's column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioView {
    pub owner: Owner,

    /// KPI block
    pub stats: AggregateStats,

    /// Return series behind the chart
    pub series: Series,

    /// Chart polyline in the configured viewport
    pub path: ChartPath,

    /// Holdings whose history could not be fetched
    pub failed_holdings: usize,

    /// True when `series` is the fallback line
    pub used_fallback: bool,
}
