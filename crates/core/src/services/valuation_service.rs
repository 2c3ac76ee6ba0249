use crate::models::analytics::AggregateStats;
use crate::models::holding::Holding;
use crate::models::settings::STARTING_CAPITAL;

/// Values a portfolio against the starting capital.
///
/// Pure business logic: no I/O, no provider calls, no failure modes.
/// Malformed prices are coerced by the holding's sentinel rules
/// (start price ≤ 0 → 1, current price ≤ 0 → start price).
pub struct ValuationService {
    starting_capital: f64,
}

impl ValuationService {
    pub fn new(starting_capital: f64) -> Self {
        Self { starting_capital }
    }

    pub fn starting_capital(&self) -> f64 {
        self.starting_capital
    }

    /// Compute start value, current value and P/L for a set of holdings.
    ///
    /// The starting capital is split by `weight / total_weight`, so only the
    /// ratios between weights matter. A zero total weight (including no
    /// holdings at all) yields all-zero stats.
    pub fn aggregate_stats(&self, holdings: &[Holding]) -> AggregateStats {
        let total_weight: f64 = holdings.iter().map(|h| h.weight).sum();
        if total_weight == 0.0 {
            return AggregateStats::ZERO;
        }

        let mut start_value = 0.0;
        let mut current_value = 0.0;

        for h in holdings {
            let allocation = self.starting_capital * (h.weight / total_weight);
            start_value += allocation;
            current_value += allocation * (h.effective_current_price() / h.effective_start_price());
        }

        let pl_dollar = current_value - start_value;
        let pl_percent = if start_value != 0.0 {
            pl_dollar / start_value * 100.0
        } else {
            0.0
        };

        AggregateStats {
            start_value,
            current_value,
            pl_dollar,
            pl_percent,
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new(STARTING_CAPITAL)
    }
}
