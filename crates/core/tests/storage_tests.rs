// ═══════════════════════════════════════════════════════════════════
// Storage Tests: JSON blob round trips, tolerant loading, files
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use serde_json::json;

use stock_game_core::errors::CoreError;
use stock_game_core::models::holding::Holding;
use stock_game_core::models::owner::Owner;
use stock_game_core::models::portfolio::PortfolioStore;
use stock_game_core::models::settings::{FetchMode, Settings, START_DATE};
use stock_game_core::storage::format::{parse_holding, read_store, write_store, STORAGE_KEY};
use stock_game_core::storage::manager::StorageManager;

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
// Round trips
// ═══════════════════════════════════════════════════════════════════

mod round_trip {
    use super::*;

    #[test]
    fn default_store_survives() {
        let store = PortfolioStore::with_defaults(Settings::default());
        let json = StorageManager::save_to_string(&store).unwrap();
        let loaded = StorageManager::load_from_str(&json).unwrap();
        assert_eq!(loaded, store);
    }

    #[test]
    fn edited_prices_and_settings_survive() {
        let mut store = PortfolioStore::with_defaults(Settings {
            proxy_base_url: Some("http://127.0.0.1:8787".into()),
            fetch_mode: FetchMode::Concurrent,
            ..Settings::default()
        });
        store.holdings_mut(Owner::Nic)[3].current_price = 93.17;
        store.holdings_mut(Owner::Nic)[3].buy_price = 88.02;

        let loaded = read_store(&write_store(&store).unwrap()).unwrap();
        assert_eq!(loaded.holdings(Owner::Nic)[3].current_price, 93.17);
        assert_eq!(loaded.holdings(Owner::Nic)[3].buy_price, 88.02);
        assert_eq!(loaded.settings.fetch_mode, FetchMode::Concurrent);
        assert_eq!(
            loaded.settings.proxy_base_url.as_deref(),
            Some("http://127.0.0.1:8787")
        );
    }

    #[test]
    fn blob_layout() {
        let store = PortfolioStore::with_defaults(Settings::default());
        let value: serde_json::Value = serde_json::from_str(&write_store(&store).unwrap()).unwrap();

        assert!(value["portfolios"]["Tom"].is_array());
        assert_eq!(value["portfolios"]["Joe"][0]["ticker"], "H50A");
        assert_eq!(value["portfolios"]["Joe"][0]["buyDate"], "2026-01-30");
        assert_eq!(value["settings"]["startDate"], "2026-01-30");
    }

    #[test]
    fn storage_key() {
        assert_eq!(STORAGE_KEY, "stockGameDashboardV2");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Tolerant loading
// ═══════════════════════════════════════════════════════════════════

mod tolerant_load {
    use super::*;

    #[test]
    fn invalid_json_is_an_error() {
        let result = read_store("{ not json");
        assert!(matches!(result, Err(CoreError::Deserialization(_))));
    }

    #[test]
    fn non_object_root_is_an_error() {
        let result = read_store("[1, 2, 3]");
        assert!(matches!(result, Err(CoreError::Deserialization(_))));
    }

    #[test]
    fn missing_portfolios_give_empty_store() {
        let store = read_store("{}").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.settings, Settings::default());
    }

    #[test]
    fn browser_blob_without_settings() {
        let blob = json!({
            "portfolios": {
                "Tom": [
                    { "id": 1738000000001u64, "asset": "SPDR S&P 500", "ticker": "SPXL",
                      "weight": 50, "buyPrice": 61.2, "currentPrice": 64.0, "buyDate": "2026-01-30" }
                ],
                "Joe": "broken",
                "Nic": []
            }
        });

        let store = read_store(&blob.to_string()).unwrap();
        let tom = store.holdings(Owner::Tom);
        assert_eq!(tom.len(), 1);
        assert_eq!(tom[0].id, "1738000000001");
        assert_eq!(tom[0].weight, 50.0);
        assert_eq!(tom[0].buy_price, 61.2);
        assert!(store.holdings(Owner::Joe).is_empty());
        assert!(store.holdings(Owner::Nic).is_empty());
        assert_eq!(store.settings, Settings::default());
    }

    #[test]
    fn unreadable_settings_fall_back() {
        let blob = json!({ "portfolios": {}, "settings": { "startDate": "not a date" } });
        let store = read_store(&blob.to_string()).unwrap();
        assert_eq!(store.settings, Settings::default());
    }

    #[test]
    fn holding_without_ticker_is_dropped() {
        assert!(parse_holding(&json!({ "asset": "Nothing", "weight": 10 }), START_DATE).is_none());
        assert!(parse_holding(&json!({ "ticker": "  " }), START_DATE).is_none());
        assert!(parse_holding(&json!("VUAG"), START_DATE).is_none());
    }

    #[test]
    fn holding_fields_are_repaired() {
        let h: Holding = parse_holding(
            &json!({
                "ticker": " FRIN ",
                "weight": -5,
                "buyPrice": "12",
                "currentPrice": null,
                "buyDate": "30/01/2026"
            }),
            make_date(2026, 2, 2),
        )
        .unwrap();

        assert_eq!(h.ticker, "FRIN");
        assert_eq!(h.asset, "FRIN");
        assert!(!h.id.is_empty());
        assert_eq!(h.weight, 0.0);
        assert_eq!(h.buy_price, 0.0);
        assert_eq!(h.current_price, 0.0);
        assert_eq!(h.buy_date, make_date(2026, 2, 2));
        // The sentinels take over from here
        assert_eq!(h.effective_start_price(), 1.0);
        assert_eq!(h.effective_current_price(), 1.0);
    }

    #[test]
    fn string_id_is_kept() {
        let h = parse_holding(&json!({ "id": "abc-123", "ticker": "HMCH" }), START_DATE).unwrap();
        assert_eq!(h.id, "abc-123");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Files
// ═══════════════════════════════════════════════════════════════════

mod files {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.json");
        let path = path.to_str().unwrap();

        let store = PortfolioStore::with_defaults(Settings::default());
        StorageManager::save_to_file(&store, path).unwrap();
        assert_eq!(StorageManager::load_from_file(path).unwrap(), store);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let result = StorageManager::load_from_file(path.to_str().unwrap());
        assert!(matches!(result, Err(CoreError::FileIO(_))));
    }

    #[test]
    fn load_or_default_seeds_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let (store, seeded) = StorageManager::load_or_default(path.to_str().unwrap());
        assert!(seeded);
        assert_eq!(store.holding_count(), 12);
    }

    #[test]
    fn load_or_default_leaves_corrupt_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corrupt.json");
        std::fs::write(&path, "garbage").unwrap();

        let (store, seeded) = StorageManager::load_or_default(path.to_str().unwrap());
        assert!(!seeded);
        assert_eq!(store.holding_count(), 12);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "garbage");
    }

    #[test]
    fn load_or_default_keeps_settings_of_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        let empty = PortfolioStore::empty(Settings {
            fetch_mode: FetchMode::Concurrent,
            ..Settings::default()
        });
        StorageManager::save_to_file(&empty, path.to_str().unwrap()).unwrap();

        let (store, seeded) = StorageManager::load_or_default(path.to_str().unwrap());
        assert!(seeded);
        assert_eq!(store.holding_count(), 12);
        assert_eq!(store.settings.fetch_mode, FetchMode::Concurrent);
    }

    #[test]
    fn load_or_default_keeps_saved_portfolios() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("saved.json");
        let mut saved = PortfolioStore::default();
        saved.replace(
            Owner::Joe,
            vec![Holding::new("Custom", "CSTM", 1.0, 2.0, 3.0, START_DATE)],
        );
        StorageManager::save_to_file(&saved, path.to_str().unwrap()).unwrap();

        let (store, seeded) = StorageManager::load_or_default(path.to_str().unwrap());
        assert!(!seeded);
        assert_eq!(store, saved);
    }
}
