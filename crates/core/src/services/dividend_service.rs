use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};

use crate::models::metrics::DividendTrend;
use crate::models::transaction::{Transaction, TransactionType};

/// Growth at or above this (%) classifies as `Growing`; at or below the
/// negative as `Declining`.
const TREND_GROWTH_CUTOFF_PCT: f64 = 3.0;

/// Dividend yield, growth rate and trend classification for one holding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividendAnalysis {
    /// Trailing-12-month dividends / current price, %
    pub yield_pct: f64,
    /// CAGR between the first and last dividend-paying calendar years, %
    pub growth_pct: f64,
    pub trend: DividendTrend,
}

impl DividendAnalysis {
    /// The all-zero analysis for holdings with no dividend history.
    pub fn none() -> Self {
        Self {
            yield_pct: 0.0,
            growth_pct: 0.0,
            trend: DividendTrend::None,
        }
    }
}

/// Classifies a holding's dividend trajectory from its `Dividend` and
/// `Distribution` transactions.
pub struct DividendService;

impl DividendService {
    pub fn new() -> Self {
        Self
    }

    /// Analyze dividends as of `now` (normally the last price date).
    /// `current_price` of 0 short-circuits the yield to 0.
    pub fn analyze(
        &self,
        transactions: &[Transaction],
        current_price: f64,
        now: NaiveDate,
    ) -> DividendAnalysis {
        let dividends: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| {
                matches!(
                    tx.transaction_type,
                    TransactionType::Dividend | TransactionType::Distribution
                )
            })
            .collect();

        if dividends.is_empty() {
            return DividendAnalysis::none();
        }

        let yield_pct = self.trailing_yield(&dividends, current_price, now);
        let growth_pct = self.annual_growth(&dividends);
        let trend = self.classify(&dividends, growth_pct, now);

        DividendAnalysis {
            yield_pct,
            growth_pct,
            trend,
        }
    }

    /// Trailing-12-month dividend sum ÷ current price, in percent.
    fn trailing_yield(&self, dividends: &[&Transaction], current_price: f64, now: NaiveDate) -> f64 {
        if current_price <= 0.0 {
            return 0.0;
        }
        let cutoff = match now.checked_sub_months(Months::new(12)) {
            Some(d) => d,
            None => return 0.0,
        };
        let trailing_sum: f64 = dividends
            .iter()
            .filter(|tx| tx.date > cutoff && tx.date <= now)
            .map(|tx| tx.amount)
            .sum();
        trailing_sum / current_price * 100.0
    }

    /// CAGR between the first and last calendar years with nonzero
    /// dividends: `(last/first)^(1/span) − 1`, in percent. 0 with fewer
    /// than two distinct years.
    fn annual_growth(&self, dividends: &[&Transaction]) -> f64 {
        let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
        for tx in dividends {
            if tx.amount != 0.0 {
                *by_year.entry(tx.date.year()).or_insert(0.0) += tx.amount;
            }
        }

        let (Some((&first_year, &first_total)), Some((&last_year, &last_total))) =
            (by_year.iter().next(), by_year.iter().next_back())
        else {
            return 0.0;
        };
        let span = last_year - first_year;
        if span < 1 || first_total <= 0.0 || last_total <= 0.0 {
            return 0.0;
        }
        ((last_total / first_total).powf(1.0 / span as f64) - 1.0) * 100.0
    }

    fn classify(&self, dividends: &[&Transaction], growth_pct: f64, now: NaiveDate) -> DividendTrend {
        let cutoff = now.checked_sub_months(Months::new(12)).unwrap_or(now);
        let paid_recently = dividends.iter().any(|tx| tx.date > cutoff && tx.date <= now);
        if !paid_recently {
            return DividendTrend::Suspended;
        }
        if growth_pct >= TREND_GROWTH_CUTOFF_PCT {
            DividendTrend::Growing
        } else if growth_pct <= -TREND_GROWTH_CUTOFF_PCT {
            DividendTrend::Declining
        } else {
            DividendTrend::Flat
        }
    }
}

impl Default for DividendService {
    fn default() -> Self {
        Self::new()
    }
}
