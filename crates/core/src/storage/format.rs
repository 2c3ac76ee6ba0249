use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::CoreError;
use crate::models::holding::{new_holding_id, Holding};
use crate::models::owner::Owner;
use crate::models::portfolio::PortfolioStore;
use crate::models::settings::Settings;

/// Storage key the browser dashboard used for this blob.
pub const STORAGE_KEY: &str = "stockGameDashboardV2";

/// Serialize a store to the JSON blob layout:
///
/// ```text
/// {
///   "portfolios": { "Tom": [holding...], "Joe": [...], "Nic": [...] },
///   "settings": { "startDate": "2026-01-30", ... }
/// }
/// ```
pub fn write_store(store: &PortfolioStore) -> Result<String, CoreError> {
    serde_json::to_string_pretty(store)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize store: {e}")))
}

/// Parse a store blob, repairing what can be repaired.
///
/// Only invalid JSON or a non-object root is an error. Otherwise:
/// - a missing or non-array owner entry becomes an empty portfolio
/// - holdings without a ticker are dropped
/// - bad numbers become 0 (the valuation sentinels take it from there),
///   negative weights become 0
/// - a missing id gets a fresh one, a missing date gets the start date
/// - unreadable settings fall back to defaults
pub fn read_store(data: &str) -> Result<PortfolioStore, CoreError> {
    let root: Value = serde_json::from_str(data)?;
    let root = root.as_object().ok_or_else(|| {
        CoreError::Deserialization("Store blob must be a JSON object".into())
    })?;

    let settings = match root.get("settings") {
        Some(value) => Settings::deserialize(value).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings: {e}");
            Settings::default()
        }),
        None => Settings::default(),
    };

    let mut store = PortfolioStore::empty(settings);
    let Some(portfolios) = root.get("portfolios").and_then(Value::as_object) else {
        return Ok(store);
    };

    let start_date = store.settings.start_date;
    for owner in Owner::ALL {
        let holdings = portfolios
            .get(owner.as_str())
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| parse_holding(item, start_date))
                    .collect()
            })
            .unwrap_or_default();
        store.replace(owner, holdings);
    }

    Ok(store)
}

/// Validate one stored holding. Returns `None` when it cannot be used at all.
pub fn parse_holding(value: &Value, start_date: NaiveDate) -> Option<Holding> {
    let obj = value.as_object()?;

    let ticker = obj.get("ticker")?.as_str()?.trim().to_string();
    if ticker.is_empty() {
        warn!("Dropping stored holding without a ticker");
        return None;
    }

    let asset = obj
        .get("asset")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| ticker.clone());

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => new_holding_id(),
    };

    let buy_date = obj
        .get("buyDate")
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .unwrap_or(start_date);

    Some(Holding {
        id,
        asset,
        ticker,
        weight: number(obj, "weight").max(0.0),
        buy_price: number(obj, "buyPrice"),
        current_price: number(obj, "currentPrice"),
        buy_date,
    })
}

/// A finite number field, or 0.
fn number(obj: &Map<String, Value>, key: &str) -> f64 {
    obj.get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
