use serde::{Deserialize, Serialize};

use super::price::PriceSeries;
use super::transaction::Transaction;

/// Everything the analyzer needs to know about one holding: its identity,
/// full transaction history and daily price series. Supplied by the data
/// collaborator; this core never fetches anything itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingInput {
    /// Ticker symbol, uppercased (e.g. "AAPL")
    pub symbol: String,

    /// Human-readable name (e.g. "Apple Inc.")
    pub name: String,

    /// Transaction history; date order is not required
    pub transactions: Vec<Transaction>,

    /// Daily close series for the holding, date ascending
    pub prices: PriceSeries,
}

impl HoldingInput {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        transactions: Vec<Transaction>,
        prices: PriceSeries,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            transactions,
            prices,
        }
    }
}
