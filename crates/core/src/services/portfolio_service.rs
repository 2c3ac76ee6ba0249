use log::info;

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::owner::Owner;
use crate::models::portfolio::PortfolioStore;

/// Mutations on the portfolio store.
///
/// Pure business logic, no I/O, no API calls. Easy to test.
/// Holdings are never removed one by one: portfolios are replaced or cleared whole.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Seed the provided portfolios when no owner holds anything.
    /// Returns `true` if the store was seeded.
    pub fn ensure_data(&self, store: &mut PortfolioStore) -> bool {
        if !store.is_empty() {
            return false;
        }
        store.reset_to_defaults();
        info!(
            "Seeded default portfolios ({} holdings)",
            store.holding_count()
        );
        true
    }

    /// Find a holding by its id within one owner's portfolio.
    pub fn find_holding<'a>(
        &self,
        store: &'a PortfolioStore,
        owner: Owner,
        holding_id: &str,
    ) -> Option<&'a Holding> {
        store.holdings(owner).iter().find(|h| h.id == holding_id)
    }

    /// Manually override a holding's current price.
    ///
    /// The price must be finite and positive; sentinel values are only
    /// tolerated when they come from stored data, never from an edit.
    pub fn set_current_price(
        &self,
        store: &mut PortfolioStore,
        owner: Owner,
        holding_id: &str,
        price: f64,
    ) -> Result<(), CoreError> {
        Self::validate_price(price)?;
        let holding = store
            .holdings_mut(owner)
            .iter_mut()
            .find(|h| h.id == holding_id)
            .ok_or_else(|| CoreError::HoldingNotFound(format!("{owner}/{holding_id}")))?;
        holding.current_price = price;
        Ok(())
    }

    /// Manually override a holding's start price.
    pub fn set_buy_price(
        &self,
        store: &mut PortfolioStore,
        owner: Owner,
        holding_id: &str,
        price: f64,
    ) -> Result<(), CoreError> {
        Self::validate_price(price)?;
        let holding = store
            .holdings_mut(owner)
            .iter_mut()
            .find(|h| h.id == holding_id)
            .ok_or_else(|| CoreError::HoldingNotFound(format!("{owner}/{holding_id}")))?;
        holding.buy_price = price;
        Ok(())
    }

    /// Replace one owner's portfolio wholesale.
    /// Weights must be finite and non-negative.
    pub fn replace_portfolio(
        &self,
        store: &mut PortfolioStore,
        owner: Owner,
        holdings: Vec<Holding>,
    ) -> Result<(), CoreError> {
        if let Some(bad) = holdings
            .iter()
            .find(|h| !h.weight.is_finite() || h.weight < 0.0)
        {
            return Err(CoreError::ValidationError(format!(
                "Weight of {} must be a non-negative number, got {}",
                bad.ticker, bad.weight
            )));
        }
        store.replace(owner, holdings);
        Ok(())
    }

    fn validate_price(price: f64) -> Result<(), CoreError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Price must be a positive number, got {price}"
            )));
        }
        Ok(())
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
