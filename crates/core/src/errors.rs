use thiserror::Error;

/// Unified error type for the entire stock-game-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// Valuation, series aggregation and chart building never surface these:
/// errors only originate at the provider and storage boundaries.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Provider boundary ───────────────────────────────────────────
    #[error("Quote unavailable for {symbol}: {reason}")]
    QuoteUnavailable { symbol: String, reason: String },

    #[error("History unavailable for {symbol}: {reason}")]
    HistoryUnavailable { symbol: String, reason: String },

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No price provider registered")]
    NoProvider,

    // ── Storage / File ──────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    #[error("Unknown portfolio owner: {0}")]
    UnknownOwner(String),
}

impl CoreError {
    /// True for the two provider-boundary kinds a caller may count as
    /// "ticker failed" rather than as a broken setup.
    pub fn is_provider_unavailable(&self) -> bool {
        matches!(
            self,
            CoreError::QuoteUnavailable { .. } | CoreError::HistoryUnavailable { .. }
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; drop the query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
