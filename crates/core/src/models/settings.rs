use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed inception date of the game: every portfolio starts here.
pub const START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2026, 1, 30) {
    Some(date) => date,
    None => panic!("invalid start date"),
};

/// Notional capital every portfolio is deemed to start with.
pub const STARTING_CAPITAL: f64 = 100.0;

/// Default chart viewport used by the dashboard.
pub const DEFAULT_CHART_WIDTH: f64 = 360.0;
pub const DEFAULT_CHART_HEIGHT: f64 = 130.0;
pub const DEFAULT_CHART_PAD: f64 = 8.0;

/// How the series aggregator schedules per-holding history requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FetchMode {
    /// One holding at a time, each request awaited before the next.
    #[default]
    Sequential,
    /// All holdings of a portfolio requested at once (all-settled).
    Concurrent,
}

/// Viewport for the performance chart polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub pad: f64,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            pad: DEFAULT_CHART_PAD,
        }
    }
}

/// User-configurable settings, stored alongside the portfolios in the store blob.
///
/// Every field has a default so blobs written before a field existed still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Inception date for valuation, history requests and the fallback series.
    pub start_date: NaiveDate,

    /// Capital distributed across each portfolio's holdings by weight.
    pub starting_capital: f64,

    /// Display currency label. Values are never converted.
    pub currency: String,

    /// Base URL of the local quote/candle proxy (e.g. "http://127.0.0.1:8787").
    /// When set, the proxy is tried before Yahoo Finance.
    pub proxy_base_url: Option<String>,

    /// Chart viewport.
    pub chart: ChartDimensions,

    /// Scheduling of history requests while building series.
    pub fetch_mode: FetchMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_date: START_DATE,
            starting_capital: STARTING_CAPITAL,
            currency: "GBP".to_string(),
            proxy_base_url: None,
            chart: ChartDimensions::default(),
            fetch_mode: FetchMode::default(),
        }
    }
}
