use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type of portfolio transaction.
///
/// Only `Buy`, `Sell`, `Reinvest` and `Split` affect open lots; `Dividend`
/// and `Distribution` feed the dividend analyzer; the remaining types are
/// carried for completeness and ignored by the analytics core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Buying / acquiring shares
    Buy,
    /// Selling / disposing of shares
    Sell,
    /// Cash dividend payment
    Dividend,
    /// Fund/ETF distribution (treated like a dividend)
    Distribution,
    /// Withholding or other tax
    Tax,
    /// Brokerage or management fee
    Fee,
    /// Dividend reinvested into new shares
    Reinvest,
    /// Stock split (ratio carried in `split_ratio`)
    Split,
    /// Transfer between accounts
    Transfer,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "Buy"),
            TransactionType::Sell => write!(f, "Sell"),
            TransactionType::Dividend => write!(f, "Dividend"),
            TransactionType::Distribution => write!(f, "Distribution"),
            TransactionType::Tax => write!(f, "Tax"),
            TransactionType::Fee => write!(f, "Fee"),
            TransactionType::Reinvest => write!(f, "Reinvest"),
            TransactionType::Split => write!(f, "Split"),
            TransactionType::Transfer => write!(f, "Transfer"),
        }
    }
}

/// A single transaction in a holding's history.
///
/// Immutable and externally supplied. Date order is NOT guaranteed on
/// input — the lot matcher re-sorts before folding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: Uuid,

    /// What kind of transaction this is
    pub transaction_type: TransactionType,

    /// Date of the transaction (no time component — daily granularity)
    pub date: NaiveDate,

    /// Number of shares involved (0 for cash-only types)
    pub shares: f64,

    /// Price per share in the transaction's currency
    pub price: f64,

    /// Total cash amount in the transaction's currency
    pub amount: f64,

    /// ISO currency code of `price` and `amount` (e.g. "USD")
    pub currency: String,

    /// Split ratio for `Split` transactions (e.g. 2.0 for a 2:1 split)
    #[serde(default)]
    pub split_ratio: Option<f64>,
}

impl Transaction {
    pub fn new(
        transaction_type: TransactionType,
        date: NaiveDate,
        shares: f64,
        price: f64,
        amount: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction_type,
            date,
            shares,
            price,
            amount,
            currency: currency.into().to_uppercase(),
            split_ratio: None,
        }
    }

    /// Convenience constructors for the common transaction types

    pub fn buy(date: NaiveDate, shares: f64, price: f64, currency: impl Into<String>) -> Self {
        Self::new(TransactionType::Buy, date, shares, price, shares * price, currency)
    }

    pub fn sell(date: NaiveDate, shares: f64, price: f64, currency: impl Into<String>) -> Self {
        Self::new(TransactionType::Sell, date, shares, price, shares * price, currency)
    }

    pub fn dividend(date: NaiveDate, amount: f64, currency: impl Into<String>) -> Self {
        Self::new(TransactionType::Dividend, date, 0.0, 0.0, amount, currency)
    }

    pub fn split(date: NaiveDate, ratio: f64) -> Self {
        let mut tx = Self::new(TransactionType::Split, date, 0.0, 0.0, 0.0, "USD");
        tx.split_ratio = Some(ratio);
        tx
    }
}

/// The unsold remainder of a single buy transaction, tracked for FIFO
/// cost-basis matching.
///
/// Derived and transient — rebuilt on every analysis call, never persisted.
/// Invariants: `remaining_shares <= source.shares` and `remaining_amount <=
/// source.amount` (in base currency); both only decrease as later sells
/// consume the lot. A split rescales `remaining_shares` but leaves
/// `remaining_amount` untouched — a split never changes cost basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenLot {
    /// The buy (or reinvest) transaction this lot came from
    pub source: Transaction,

    /// Shares of the source transaction not yet consumed by sells
    pub remaining_shares: f64,

    /// Cost basis of the remaining shares, in the base currency
    pub remaining_amount: f64,
}

impl OpenLot {
    pub fn new(source: Transaction, shares: f64, amount: f64) -> Self {
        Self {
            source,
            remaining_shares: shares,
            remaining_amount: amount,
        }
    }

    /// Date the lot was opened.
    pub fn opened_on(&self) -> NaiveDate {
        self.source.date
    }
}
