//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

/// Result from a ticker/symbol search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMatch {
    /// Symbol to request quotes with (e.g., "AAPL")
    pub symbol: String,

    /// Symbol as displayed by the provider
    pub display_symbol: String,

    /// Short description (e.g., "Apple Inc")
    pub description: String,

    /// Security type (e.g., "Stock", "ETF")
    pub security_type: String,
}
