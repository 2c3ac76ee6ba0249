use log::warn;

use crate::errors::CoreError;
use crate::models::portfolio::PortfolioStore;
use crate::models::settings::Settings;

use super::format;

/// High-level storage operations: save/load the portfolio store to/from a
/// JSON string or file.
pub struct StorageManager;

impl StorageManager {
    /// Serialize the store to its JSON blob.
    pub fn save_to_string(store: &PortfolioStore) -> Result<String, CoreError> {
        format::write_store(store)
    }

    /// Parse a JSON blob into a store (see `format::read_store` for the repair rules).
    pub fn load_from_str(data: &str) -> Result<PortfolioStore, CoreError> {
        format::read_store(data)
    }

    /// Save the store to a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(store: &PortfolioStore, path: &str) -> Result<(), CoreError> {
        let json = Self::save_to_string(store)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load the store from a file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str) -> Result<PortfolioStore, CoreError> {
        let data = std::fs::read_to_string(path)?;
        Self::load_from_str(&data)
    }

    /// Load the store from `path`, or fall back to the provided portfolios.
    ///
    /// Returns the store and whether it was seeded; callers save a seeded
    /// store right away.
    /// - missing file: default seed, `true`
    /// - every portfolio empty: default seed keeping the file's settings, `true`
    /// - file present but unreadable: default seed, `false`, so the file on
    ///   disk is left for the user to recover
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &str) -> (PortfolioStore, bool) {
        if !std::path::Path::new(path).exists() {
            return (PortfolioStore::with_defaults(Settings::default()), true);
        }

        let store = match Self::load_from_file(path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Could not read saved data from {path}, leaving it untouched: {e}");
                return (PortfolioStore::with_defaults(Settings::default()), false);
            }
        };

        if store.is_empty() {
            (PortfolioStore::with_defaults(store.settings), true)
        } else {
            (store, false)
        }
    }
}
