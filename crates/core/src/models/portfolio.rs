use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::holding::Holding;
use super::owner::Owner;
use super::settings::Settings;

/// The main data container: every owner's portfolio plus settings.
///
/// Serialized as the dashboard's store blob. Every owner is always present;
/// an empty `Vec` means "no starting allocation".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStore {
    /// Owner → ordered holdings
    pub portfolios: BTreeMap<Owner, Vec<Holding>>,

    /// Game settings (start date, capital, providers, chart size)
    #[serde(default)]
    pub settings: Settings,
}

impl PortfolioStore {
    /// A store where every owner has an empty portfolio.
    pub fn empty(settings: Settings) -> Self {
        Self {
            portfolios: Owner::ALL.into_iter().map(|o| (o, Vec::new())).collect(),
            settings,
        }
    }

    /// A store seeded with the provided portfolios.
    pub fn with_defaults(settings: Settings) -> Self {
        let portfolios = default_portfolios(settings.start_date);
        Self { portfolios, settings }
    }

    /// Holdings of one owner (empty slice if the owner has none).
    pub fn holdings(&self, owner: Owner) -> &[Holding] {
        self.portfolios.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn holdings_mut(&mut self, owner: Owner) -> &mut Vec<Holding> {
        self.portfolios.entry(owner).or_default()
    }

    /// Replace one owner's portfolio wholesale.
    pub fn replace(&mut self, owner: Owner, holdings: Vec<Holding>) {
        self.portfolios.insert(owner, holdings);
    }

    /// Replace every portfolio with the provided seed.
    pub fn reset_to_defaults(&mut self) {
        self.portfolios = default_portfolios(self.settings.start_date);
    }

    /// Empty every portfolio. Owners stay present.
    pub fn clear_all(&mut self) {
        for owner in Owner::ALL {
            self.portfolios.insert(owner, Vec::new());
        }
    }

    /// True when no owner holds anything.
    pub fn is_empty(&self) -> bool {
        self.portfolios.values().all(Vec::is_empty)
    }

    /// Total number of holdings across all owners.
    pub fn holding_count(&self) -> usize {
        self.portfolios.values().map(Vec::len).sum()
    }
}

impl Default for PortfolioStore {
    fn default() -> Self {
        Self::empty(Settings::default())
    }
}

/// The provided starting portfolios. Each owner splits the starting capital
/// by these weights; prices start at 1 until a live refresh sets them.
pub fn default_portfolios(start: NaiveDate) -> BTreeMap<Owner, Vec<Holding>> {
    let seed = |entries: &[(&str, &str, f64)]| -> Vec<Holding> {
        entries
            .iter()
            .map(|(asset, ticker, weight)| Holding::seeded(*asset, *ticker, *weight, start))
            .collect()
    };

    let mut portfolios = BTreeMap::new();
    portfolios.insert(
        Owner::Tom,
        seed(&[
            ("Invesco EURO STOXX 50", "SX5S", 50.0),
            ("SPDR S&P 500", "SPXL", 50.0),
        ]),
    );
    portfolios.insert(
        Owner::Joe,
        seed(&[
            ("HSBC EURO STOXX 50", "H50A", 20.0),
            ("J.P. Morgan GBP Ultra-Short Income", "JGST", 20.0),
            ("iShares UK Dividend", "IUKD", 15.0),
            ("JPM Global High Yield Corporate Bond Multi-Factor", "JHYP", 15.0),
            ("VanEck Morningstar Developed Market Dividend Leaders", "TDGB", 15.0),
            ("Xtrackers FTSE 100 Income", "XUKX", 15.0),
        ]),
    );
    portfolios.insert(
        Owner::Nic,
        seed(&[
            ("Franklin FTSE India", "FRIN", 25.0),
            ("HSBC MSCI China", "HMCH", 25.0),
            ("Invesco FTSE All-World", "FWRG", 25.0),
            ("Vanguard S&P 500", "VUAG", 25.0),
        ]),
    );
    portfolios
}
