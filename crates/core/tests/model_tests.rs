// ═══════════════════════════════════════════════════════════════════
// Model Tests: Holding, Owner, Candle, ChartPath, PortfolioStore, Settings
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::str::FromStr;

use stock_game_core::errors::CoreError;
use stock_game_core::models::analytics::AggregateStats;
use stock_game_core::models::chart::{ChartPath, PathCommand};
use stock_game_core::models::holding::Holding;
use stock_game_core::models::owner::Owner;
use stock_game_core::models::portfolio::{default_portfolios, PortfolioStore};
use stock_game_core::models::price::{normalize_candles, Candle};
use stock_game_core::models::settings::{FetchMode, Settings, START_DATE};

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Holding
// ═══════════════════════════════════════════════════════════════════

mod holding {
    use super::*;

    #[test]
    fn new_generates_unique_ids() {
        let a = Holding::new("Vanguard S&P 500", "VUAG", 25.0, 1.0, 1.0, START_DATE);
        let b = Holding::new("Vanguard S&P 500", "VUAG", 25.0, 1.0, 1.0, START_DATE);
        assert_ne!(a.id, b.id);
        assert!(!a.id.is_empty());
    }

    #[test]
    fn seeded_has_unit_prices() {
        let h = Holding::seeded("HSBC MSCI China", "HMCH", 25.0, START_DATE);
        assert_eq!(h.buy_price, 1.0);
        assert_eq!(h.current_price, 1.0);
        assert_eq!(h.buy_date, START_DATE);
    }

    #[test]
    fn start_price_sentinel() {
        let mut h = Holding::seeded("X", "X", 1.0, START_DATE);
        h.buy_price = 0.0;
        assert_eq!(h.effective_start_price(), 1.0);
        h.buy_price = -4.0;
        assert_eq!(h.effective_start_price(), 1.0);
        h.buy_price = 12.5;
        assert_eq!(h.effective_start_price(), 12.5);
    }

    #[test]
    fn current_price_sentinel_uses_effective_start() {
        let mut h = Holding::seeded("X", "X", 1.0, START_DATE);
        h.buy_price = 8.0;
        h.current_price = 0.0;
        assert_eq!(h.effective_current_price(), 8.0);

        h.buy_price = 0.0;
        assert_eq!(h.effective_current_price(), 1.0);
    }

    #[test]
    fn return_pct() {
        let h = Holding::new("X", "X", 1.0, 10.0, 12.5, START_DATE);
        assert_eq!(h.return_pct(), 25.0);

        let flat = Holding::new("X", "X", 1.0, 0.0, 0.0, START_DATE);
        assert_eq!(flat.return_pct(), 0.0);
    }

    #[test]
    fn serializes_in_camel_case() {
        let h = Holding::new("Xtrackers FTSE 100 Income", "XUKX", 15.0, 2.0, 3.0, START_DATE);
        let json = serde_json::to_value(&h).unwrap();

        assert_eq!(json["buyPrice"], 2.0);
        assert_eq!(json["currentPrice"], 3.0);
        assert_eq!(json["buyDate"], "2026-01-30");
        assert!(json.get("buy_price").is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Owner
// ═══════════════════════════════════════════════════════════════════

mod owner {
    use super::*;

    #[test]
    fn display_order() {
        assert_eq!(Owner::ALL, [Owner::Tom, Owner::Joe, Owner::Nic]);
        assert!(Owner::Tom < Owner::Joe && Owner::Joe < Owner::Nic);
    }

    #[test]
    fn display_names() {
        let names: Vec<String> = Owner::ALL.iter().map(|o| o.to_string()).collect();
        assert_eq!(names, vec!["Tom", "Joe", "Nic"]);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Owner::from_str("tom").unwrap(), Owner::Tom);
        assert_eq!(Owner::from_str(" JOE ").unwrap(), Owner::Joe);
        assert_eq!("Nic".parse::<Owner>().unwrap(), Owner::Nic);
    }

    #[test]
    fn parse_unknown_owner() {
        match Owner::from_str("Ann") {
            Err(CoreError::UnknownOwner(name)) => assert_eq!(name, "Ann"),
            other => panic!("Expected UnknownOwner, got {:?}", other),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Candle normalization
// ═══════════════════════════════════════════════════════════════════

mod candles {
    use super::*;

    #[test]
    fn validity() {
        assert!(Candle::new(START_DATE, 0.01).is_valid());
        assert!(!Candle::new(START_DATE, 0.0).is_valid());
        assert!(!Candle::new(START_DATE, -1.0).is_valid());
        assert!(!Candle::new(START_DATE, f64::NAN).is_valid());
        assert!(!Candle::new(START_DATE, f64::INFINITY).is_valid());
    }

    #[test]
    fn normalize_drops_invalid_and_sorts() {
        let raw = vec![
            Candle::new(make_date(2026, 2, 4), 12.0),
            Candle::new(make_date(2026, 2, 2), 10.0),
            Candle::new(make_date(2026, 2, 3), f64::NAN),
            Candle::new(make_date(2026, 2, 2), 10.5),
            Candle::new(make_date(2026, 2, 5), 0.0),
        ];

        // Same-date closes are kept in provider order
        assert_eq!(
            normalize_candles(raw),
            vec![
                Candle::new(make_date(2026, 2, 2), 10.0),
                Candle::new(make_date(2026, 2, 2), 10.5),
                Candle::new(make_date(2026, 2, 4), 12.0),
            ]
        );
    }

    #[test]
    fn normalize_empty() {
        assert!(normalize_candles(Vec::new()).is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// ChartPath
// ═══════════════════════════════════════════════════════════════════

mod chart_path {
    use super::*;

    #[test]
    fn renders_svg_path_data() {
        let path = ChartPath {
            commands: vec![
                PathCommand::MoveTo { x: 8.0, y: 122.0 },
                PathCommand::LineTo { x: 180.0, y: 65.5 },
                PathCommand::LineTo { x: 352.0, y: 8.0 },
            ],
        };
        assert_eq!(path.to_string(), "M8.00 122.00 L180.00 65.50 L352.00 8.00");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn coordinates_round_to_two_decimals() {
        let cmd = PathCommand::LineTo {
            x: 1.0 / 3.0,
            y: 2.0 / 3.0,
        };
        assert_eq!(cmd.to_string(), "L0.33 0.67");
    }

    #[test]
    fn default_is_empty() {
        let path = ChartPath::default();
        assert!(path.is_empty());
        assert_eq!(path.to_string(), "");
    }
}

// ═══════════════════════════════════════════════════════════════════
// PortfolioStore & default portfolios
// ═══════════════════════════════════════════════════════════════════

mod portfolio_store {
    use super::*;

    fn tickers(holdings: &[Holding]) -> Vec<&str> {
        holdings.iter().map(|h| h.ticker.as_str()).collect()
    }

    #[test]
    fn default_portfolios_contents() {
        let portfolios = default_portfolios(START_DATE);

        assert_eq!(tickers(&portfolios[&Owner::Tom]), vec!["SX5S", "SPXL"]);
        assert_eq!(
            tickers(&portfolios[&Owner::Joe]),
            vec!["H50A", "JGST", "IUKD", "JHYP", "TDGB", "XUKX"]
        );
        assert_eq!(
            tickers(&portfolios[&Owner::Nic]),
            vec!["FRIN", "HMCH", "FWRG", "VUAG"]
        );
    }

    #[test]
    fn default_weights_sum_to_100() {
        for (owner, holdings) in default_portfolios(START_DATE) {
            let total: f64 = holdings.iter().map(|h| h.weight).sum();
            assert_eq!(total, 100.0, "weights of {owner}");
        }
    }

    #[test]
    fn empty_store_has_every_owner() {
        let store = PortfolioStore::default();
        assert!(store.is_empty());
        assert_eq!(store.holding_count(), 0);
        for owner in Owner::ALL {
            assert!(store.holdings(owner).is_empty());
        }
    }

    #[test]
    fn reset_and_clear() {
        let mut store = PortfolioStore::default();
        store.reset_to_defaults();
        assert_eq!(store.holding_count(), 12);

        store.clear_all();
        assert!(store.is_empty());
    }

    #[test]
    fn reset_uses_configured_start_date() {
        let settings = Settings {
            start_date: make_date(2026, 3, 2),
            ..Settings::default()
        };
        let store = PortfolioStore::with_defaults(settings);
        assert!(store
            .holdings(Owner::Joe)
            .iter()
            .all(|h| h.buy_date == make_date(2026, 3, 2)));
    }

    #[test]
    fn replace_one_owner() {
        let mut store = PortfolioStore::with_defaults(Settings::default());
        store.replace(Owner::Tom, Vec::new());
        assert!(store.holdings(Owner::Tom).is_empty());
        assert_eq!(store.holdings(Owner::Nic).len(), 4);
        assert!(!store.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Settings & stats
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.start_date, make_date(2026, 1, 30));
        assert_eq!(s.starting_capital, 100.0);
        assert_eq!(s.currency, "GBP");
        assert_eq!(s.proxy_base_url, None);
        assert_eq!(s.fetch_mode, FetchMode::Sequential);
        assert_eq!(s.chart.width, 360.0);
        assert_eq!(s.chart.height, 130.0);
        assert_eq!(s.chart.pad, 8.0);
    }

    #[test]
    fn partial_settings_fill_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{ "proxyBaseUrl": "http://127.0.0.1:8787" }"#).unwrap();
        assert_eq!(s.proxy_base_url.as_deref(), Some("http://127.0.0.1:8787"));
        assert_eq!(s.start_date, START_DATE);
        assert_eq!(s.starting_capital, 100.0);
    }

    #[test]
    fn stats_gain_flag() {
        assert!(AggregateStats::ZERO.is_gain());
        let loss = AggregateStats {
            pl_percent: -0.5,
            ..AggregateStats::ZERO
        };
        assert!(!loss.is_gain());
    }
}
