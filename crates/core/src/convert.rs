use chrono::NaiveDate;

/// Injected currency conversion: `(currency, amount, date)` → amount in the
/// base reporting currency.
///
/// Implementations must be side-effect-free and referentially stable for a
/// given triple within one analysis pass — the same lot is priced several
/// times (cost basis, opportunity cost, metrics) and must convert
/// identically each time. Rate lookup and caching live with the caller,
/// outside this core.
pub trait CurrencyConverter: Send + Sync {
    fn convert(&self, currency: &str, amount: f64, date: NaiveDate) -> f64;
}

/// No-op converter for callers whose transactions are already in the base
/// currency.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityConverter;

impl CurrencyConverter for IdentityConverter {
    fn convert(&self, _currency: &str, amount: f64, _date: NaiveDate) -> f64 {
        amount
    }
}

/// Fixed-rate converter keyed by currency code. Handy for tests and for
/// callers with a flat rate table.
#[derive(Debug, Clone, Default)]
pub struct FixedRateConverter {
    rates: std::collections::HashMap<String, f64>,
}

impl FixedRateConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, currency: impl Into<String>, rate: f64) -> Self {
        self.rates.insert(currency.into().to_uppercase(), rate);
        self
    }
}

impl CurrencyConverter for FixedRateConverter {
    fn convert(&self, currency: &str, amount: f64, _date: NaiveDate) -> f64 {
        let rate = self
            .rates
            .get(&currency.to_uppercase())
            .copied()
            .unwrap_or(1.0);
        amount * rate
    }
}
