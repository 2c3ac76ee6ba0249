pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{NaiveDate, Utc};
use models::{
    analytics::{AggregateStats, PortfolioView},
    chart::{ChartPath, PerformancePoint, Series},
    holding::Holding,
    owner::Owner,
    portfolio::PortfolioStore,
    settings::{FetchMode, Settings},
};
use providers::registry::ProviderRegistry;
use services::{
    chart_service::ChartService,
    portfolio_service::PortfolioService,
    price_service::PriceService,
    refresh_service::{RefreshReport, RefreshService},
    series_service::{SeriesReport, SeriesService},
    valuation_service::ValuationService,
};
use storage::manager::StorageManager;

use errors::CoreError;

/// Main entry point for the stock game core library.
/// Holds the portfolio store and all services needed to operate on it.
#[must_use]
pub struct StockGame {
    store: PortfolioStore,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    valuation_service: ValuationService,
    series_service: SeriesService,
    chart_service: ChartService,
    refresh_service: RefreshService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for StockGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockGame")
            .field("holdings", &self.store.holding_count())
            .field("settings", &self.store.settings)
            .field("providers", &self.price_service.provider_names())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl StockGame {
    /// Start a new game with the provided portfolios and default settings.
    pub fn create_new() -> Self {
        let mut game = Self::from_store(PortfolioStore::with_defaults(Settings::default()));
        game.dirty = true;
        game
    }

    /// Wrap an existing store, with providers built from its settings.
    pub fn from_store(store: PortfolioStore) -> Self {
        let registry = ProviderRegistry::new_with_defaults(&store.settings);
        Self::build(store, registry)
    }

    /// Wrap an existing store with an explicit provider registry.
    pub fn with_registry(store: PortfolioStore, registry: ProviderRegistry) -> Self {
        Self::build(store, registry)
    }

    /// Load from a JSON store blob. Empty portfolios are left as they are;
    /// call `ensure_data` to seed them.
    pub fn load_from_str(json: &str) -> Result<Self, CoreError> {
        let store = StorageManager::load_from_str(json)?;
        Ok(Self::from_store(store))
    }

    /// Serialize the store to its JSON blob. Clears the unsaved-changes flag.
    pub fn save_to_string(&mut self) -> Result<String, CoreError> {
        let json = StorageManager::save_to_string(&self.store)?;
        self.dirty = false;
        Ok(json)
    }

    /// Load from a file, seeding the provided portfolios when the file is
    /// missing, unreadable or empty (native only, not WASM).
    /// Only a missing or empty file marks the game unsaved; an unreadable
    /// file is never flagged for overwrite.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &str) -> Self {
        let (store, seeded) = StorageManager::load_or_default(path);
        let mut game = Self::from_store(store);
        game.dirty = seeded;
        game
    }

    /// Save to a file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.store, path)?;
        self.dirty = false;
        Ok(())
    }

    // ── Portfolios ──────────────────────────────────────────────────

    #[must_use]
    pub fn store(&self) -> &PortfolioStore {
        &self.store
    }

    /// Holdings of one owner, in display order.
    #[must_use]
    pub fn holdings(&self, owner: Owner) -> &[Holding] {
        self.store.holdings(owner)
    }

    /// One holding by id, if the owner holds it.
    #[must_use]
    pub fn holding(&self, owner: Owner, holding_id: &str) -> Option<&Holding> {
        self.portfolio_service
            .find_holding(&self.store, owner, holding_id)
    }

    /// Seed the provided portfolios if every portfolio is empty.
    /// Returns `true` if it seeded.
    pub fn ensure_data(&mut self) -> bool {
        let seeded = self.portfolio_service.ensure_data(&mut self.store);
        self.dirty |= seeded;
        seeded
    }

    /// Replace every portfolio with the provided ones.
    pub fn load_provided(&mut self) {
        self.store.reset_to_defaults();
        self.dirty = true;
    }

    /// Empty every portfolio.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
        self.dirty = true;
    }

    /// Replace one owner's portfolio wholesale.
    pub fn replace_portfolio(
        &mut self,
        owner: Owner,
        holdings: Vec<Holding>,
    ) -> Result<(), CoreError> {
        self.portfolio_service
            .replace_portfolio(&mut self.store, owner, holdings)?;
        self.dirty = true;
        Ok(())
    }

    /// Manually override a holding's current price.
    pub fn set_current_price(
        &mut self,
        owner: Owner,
        holding_id: &str,
        price: f64,
    ) -> Result<(), CoreError> {
        self.portfolio_service
            .set_current_price(&mut self.store, owner, holding_id, price)?;
        self.dirty = true;
        Ok(())
    }

    /// Manually override a holding's start price.
    pub fn set_buy_price(
        &mut self,
        owner: Owner,
        holding_id: &str,
        price: f64,
    ) -> Result<(), CoreError> {
        self.portfolio_service
            .set_buy_price(&mut self.store, owner, holding_id, price)?;
        self.dirty = true;
        Ok(())
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Start value, current value and P/L of one owner's portfolio.
    #[must_use]
    pub fn aggregate_stats(&self, owner: Owner) -> AggregateStats {
        self.valuation_service
            .aggregate_stats(self.store.holdings(owner))
    }

    // ── Series & Charts ─────────────────────────────────────────────

    /// Return series for one owner as of today.
    pub async fn build_series(&self, owner: Owner) -> Series {
        self.series_service
            .build_series(self.store.holdings(owner), &self.price_service)
            .await
    }

    /// Return series for one owner with partial-failure counts.
    pub async fn build_series_report(&self, owner: Owner, today: NaiveDate) -> SeriesReport {
        self.series_service
            .build_series_report(self.store.holdings(owner), &self.price_service, today)
            .await
    }

    /// Fallback series for one owner, as used when no history is available.
    #[must_use]
    pub fn fallback_series(&self, owner: Owner, today: NaiveDate) -> Series {
        self.series_service
            .fallback_series(self.store.holdings(owner), today)
    }

    /// Chart polyline for a series in the configured viewport.
    #[must_use]
    pub fn chart_path(&self, series: &[PerformancePoint]) -> ChartPath {
        self.chart_service
            .build_path_for(series, &self.store.settings.chart)
    }

    /// Stats, series and chart for one owner's column.
    pub async fn dashboard(&self, owner: Owner) -> PortfolioView {
        self.dashboard_at(owner, Utc::now().date_naive()).await
    }

    pub async fn dashboard_at(&self, owner: Owner, today: NaiveDate) -> PortfolioView {
        let report = self.build_series_report(owner, today).await;
        PortfolioView {
            owner,
            stats: self.aggregate_stats(owner),
            path: self.chart_path(&report.series),
            series: report.series,
            failed_holdings: report.failed,
            used_fallback: report.used_fallback,
        }
    }

    /// Every owner's column, in display order.
    pub async fn dashboards(&self) -> Vec<PortfolioView> {
        let today = Utc::now().date_naive();
        let mut views = Vec::with_capacity(Owner::ALL.len());
        for owner in Owner::ALL {
            views.push(self.dashboard_at(owner, today).await);
        }
        views
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Pull live quotes and start prices for every holding.
    /// Per-ticker failures are reported, never returned as an error.
    pub async fn refresh_prices(&mut self) -> RefreshReport {
        let since = self.store.settings.start_date;
        let report = self
            .refresh_service
            .refresh_prices(&mut self.store, &self.price_service, since)
            .await;
        if report.updated > 0 {
            self.dirty = true;
        }
        report
    }

    /// Names of the configured providers, in fallback order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<String> {
        self.price_service.provider_names()
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.store.settings
    }

    /// Point the game at a local quote proxy (or remove it with `None`).
    /// Rebuilds the provider registry so the change takes effect immediately.
    pub fn set_proxy_base_url(&mut self, base_url: Option<String>) {
        self.store.settings.proxy_base_url = base_url;
        let registry = ProviderRegistry::new_with_defaults(&self.store.settings);
        self.price_service = PriceService::new(registry);
        self.dirty = true;
    }

    /// Choose sequential or concurrent history requests.
    pub fn set_fetch_mode(&mut self, mode: FetchMode) {
        self.store.settings.fetch_mode = mode;
        self.series_service = SeriesService::from_settings(&self.store.settings);
        self.dirty = true;
    }

    /// Returns `true` if the store has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(store: PortfolioStore, registry: ProviderRegistry) -> Self {
        let settings = &store.settings;
        let valuation_service = ValuationService::new(settings.starting_capital);
        let series_service = SeriesService::from_settings(settings);

        Self {
            portfolio_service: PortfolioService::new(),
            price_service: PriceService::new(registry),
            valuation_service,
            series_service,
            chart_service: ChartService::new(),
            refresh_service: RefreshService::new(),
            store,
            dirty: false,
        }
    }
}
