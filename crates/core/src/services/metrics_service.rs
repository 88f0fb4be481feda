use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};

use crate::models::metrics::HealthMetrics;
use crate::models::price::PriceSeries;
use crate::models::transaction::OpenLot;
use crate::services::dividend_service::DividendAnalysis;
use crate::services::lot_service::LotService;

/// Annual risk-free rate used in the Sharpe ratio, in percent.
const RISK_FREE_RATE_PCT: f64 = 4.0;

/// Trading days per year, for annualizing daily volatility.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Computes the return and risk side of `HealthMetrics` from the open lots
/// and the holding's price series.
///
/// Benchmark fields are filled afterwards by `BenchmarkService`, and the
/// position-sizing fields by the aggregator — this service only knows about
/// one holding in isolation.
pub struct MetricsService;

impl MetricsService {
    pub fn new() -> Self {
        Self
    }

    /// Build the holding-side metrics. "Now" is the last available price
    /// date, which keeps the whole computation deterministic for a given
    /// input series.
    ///
    /// Empty lots or an empty price series produce all-zero metrics rather
    /// than an error; scoring downstream tolerates zeros.
    pub fn compute(
        &self,
        lots: &[OpenLot],
        prices: &PriceSeries,
        dividends: &DividendAnalysis,
        xirr_pct: f64,
    ) -> HealthMetrics {
        let mut metrics = HealthMetrics {
            xirr_pct,
            dividend_yield_pct: dividends.yield_pct,
            dividend_growth_pct: dividends.growth_pct,
            dividend_trend: dividends.trend,
            cost_basis: LotService::total_cost_basis(lots),
            ..HealthMetrics::default()
        };

        let (Some(first_lot), Some(latest)) = (lots.first(), prices.latest()) else {
            return metrics;
        };
        let inception = first_lot.opened_on();
        let now = latest.date;

        metrics.market_value = LotService::total_shares(lots) * latest.close;
        metrics.holding_period_days = (now - inception).num_days();

        metrics.return_1y_pct = self.total_return(prices, inception, now, Some(1), dividends);
        metrics.return_3y_pct = self.total_return(prices, inception, now, Some(3), dividends);
        metrics.return_5y_pct = self.total_return(prices, inception, now, Some(5), dividends);
        metrics.return_inception_pct = self.total_return(prices, inception, now, None, dividends);

        metrics.volatility_pct = self.annualized_volatility(prices);
        // Sharpe is a price-series statistic: the dividend add-on in the
        // total returns stays out of the numerator
        let price_return_1y = self
            .price_return(prices, inception, now, Some(1))
            .unwrap_or(0.0);
        metrics.sharpe_ratio = if metrics.volatility_pct == 0.0 {
            0.0
        } else {
            (price_return_1y - RISK_FREE_RATE_PCT) / metrics.volatility_pct
        };

        let (max_dd, current_dd) = self.drawdowns(prices);
        metrics.max_drawdown_pct = max_dd;
        metrics.current_drawdown_pct = current_dd;

        metrics.days_underwater = self.days_underwater(lots, prices);

        metrics
    }

    /// Total return over a horizon ending at `now`: price return plus the
    /// trailing-12-month dividend yield as an approximation of income. The
    /// yield is added whenever the window is live, so a flat price still
    /// earns its dividends.
    fn total_return(
        &self,
        prices: &PriceSeries,
        inception: NaiveDate,
        now: NaiveDate,
        horizon_years: Option<u32>,
        dividends: &DividendAnalysis,
    ) -> f64 {
        match self.price_return(prices, inception, now, horizon_years) {
            Some(price_return) => price_return + dividends.yield_pct,
            None => 0.0,
        }
    }

    /// Price-only return over a horizon ending at `now`. `None` for a
    /// window that starts before the first open lot — returns must never
    /// imply ownership before the holding began.
    fn price_return(
        &self,
        prices: &PriceSeries,
        inception: NaiveDate,
        now: NaiveDate,
        horizon_years: Option<u32>,
    ) -> Option<f64> {
        let start = match horizon_years {
            Some(years) => now.checked_sub_months(Months::new(12 * years))?,
            None => inception,
        };
        if start < inception {
            return None;
        }
        Some(prices.return_between(start, now))
    }

    /// Annualized standard deviation of daily close-to-close changes:
    /// `stddev(daily returns) × √252`, in percent. 0 with fewer than two
    /// daily returns.
    fn annualized_volatility(&self, prices: &PriceSeries) -> f64 {
        let daily = prices.daily_returns();
        if daily.len() < 2 {
            return 0.0;
        }
        let n = daily.len() as f64;
        let mean = daily.iter().sum::<f64>() / n;
        let variance = daily.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / (n - 1.0);
        variance.sqrt() * TRADING_DAYS_PER_YEAR.sqrt()
    }

    /// (max drawdown, current drawdown), both in percent and ≤ 0.
    ///
    /// Max drawdown is the most negative decline from a running peak across
    /// the whole series; current drawdown compares only the latest close to
    /// the all-time peak.
    fn drawdowns(&self, prices: &PriceSeries) -> (f64, f64) {
        let points = prices.points();
        if points.is_empty() {
            return (0.0, 0.0);
        }

        let mut peak = points[0].close;
        let mut max_dd = 0.0_f64;
        for point in points {
            if point.close > peak {
                peak = point.close;
            }
            if peak > 0.0 {
                let dd = (point.close - peak) / peak * 100.0;
                if dd < max_dd {
                    max_dd = dd;
                }
            }
        }

        let last = points[points.len() - 1].close;
        let current_dd = if peak > 0.0 {
            ((last - peak) / peak * 100.0).min(0.0)
        } else {
            0.0
        };

        (max_dd, current_dd)
    }

    /// Count the trading days (price points) on which the market value of
    /// the open position sat below its invested cost basis.
    ///
    /// Walks the series from the first open lot's date, maintaining a
    /// running share count and invested amount. Lot openings on the same
    /// calendar day are accumulated, so several same-day buys all count.
    fn days_underwater(&self, lots: &[OpenLot], prices: &PriceSeries) -> u32 {
        let Some(first_lot) = lots.first() else {
            return 0;
        };

        // Per-date deltas of (shares, invested amount) from lot openings
        let mut deltas: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
        for lot in lots {
            let entry = deltas.entry(lot.opened_on()).or_insert((0.0, 0.0));
            entry.0 += lot.remaining_shares;
            entry.1 += lot.remaining_amount;
        }

        let mut pending = deltas.into_iter().peekable();
        let mut shares = 0.0_f64;
        let mut invested = 0.0_f64;
        let mut underwater = 0_u32;

        for point in prices.points() {
            if point.date < first_lot.opened_on() {
                continue;
            }
            while let Some(&(date, (d_shares, d_amount))) = pending.peek() {
                if date > point.date {
                    break;
                }
                shares += d_shares;
                invested += d_amount;
                pending.next();
            }
            if shares > 0.0 && point.close * shares < invested {
                underwater += 1;
            }
        }

        underwater
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}
