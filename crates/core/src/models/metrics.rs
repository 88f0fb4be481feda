use serde::{Deserialize, Serialize};

/// Classification of a holding's dividend trajectory.
///
/// `None` (the holding has never paid a dividend) is deliberately distinct
/// from `Suspended` and `Flat`: a non-payer gets its dividend weight
/// redistributed across the other scoring categories, while a suspension
/// scores zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DividendTrend {
    /// Dividend CAGR at or above +3%
    Growing,
    /// CAGR between -3% and +3%
    Flat,
    /// CAGR at or below -3%
    Declining,
    /// Paid historically, nothing in the trailing 12 months
    Suspended,
    /// No dividend transactions at all
    None,
}

impl std::fmt::Display for DividendTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DividendTrend::Growing => write!(f, "growing"),
            DividendTrend::Flat => write!(f, "flat"),
            DividendTrend::Declining => write!(f, "declining"),
            DividendTrend::Suspended => write!(f, "suspended"),
            DividendTrend::None => write!(f, "none"),
        }
    }
}

/// Flat numeric record of everything the scoring and flag engines consume.
///
/// Pure value object — recomputed on every analysis call, never mutated in
/// place. Every field has a documented zero/neutral default so missing data
/// degrades gracefully instead of erroring (returns and alphas default to
/// 0, counts to 0, the trend to `None`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    // ── Returns ─────────────────────────────────────────────────────
    /// Total return over the trailing year, % (price return + TTM yield)
    pub return_1y_pct: f64,
    /// Total return over the trailing 3 years, %
    pub return_3y_pct: f64,
    /// Total return over the trailing 5 years, %
    pub return_5y_pct: f64,
    /// Total return since the first open lot, %
    pub return_inception_pct: f64,
    /// Annualized money-weighted return (XIRR), %
    pub xirr_pct: f64,

    // ── Benchmark comparison ────────────────────────────────────────
    pub benchmark_return_1y_pct: f64,
    pub benchmark_return_3y_pct: f64,
    pub benchmark_return_5y_pct: f64,
    pub benchmark_return_inception_pct: f64,
    /// Holding price return minus benchmark price return, per horizon, %
    pub alpha_1y_pct: f64,
    pub alpha_3y_pct: f64,
    pub alpha_5y_pct: f64,
    pub alpha_inception_pct: f64,
    /// Dollar shortfall vs. investing the same lots in the benchmark (≥ 0)
    pub opportunity_cost: f64,

    // ── Risk ────────────────────────────────────────────────────────
    /// Most negative decline from a running price peak, % (≤ 0)
    pub max_drawdown_pct: f64,
    /// Latest close vs. the all-time peak, % (≤ 0)
    pub current_drawdown_pct: f64,
    /// Trading days where market value sat below invested cost basis
    pub days_underwater: u32,
    /// Calendar days since the first open lot
    pub holding_period_days: i64,
    /// Annualized standard deviation of daily returns, %
    pub volatility_pct: f64,
    /// (1y price return − risk-free) / volatility; 0 when volatility is 0
    pub sharpe_ratio: f64,

    // ── Dividends ───────────────────────────────────────────────────
    /// Trailing-12-month dividends / current price, %
    pub dividend_yield_pct: f64,
    /// CAGR between first and last dividend-paying calendar years, %
    pub dividend_growth_pct: f64,
    pub dividend_trend: DividendTrend,

    // ── Position ────────────────────────────────────────────────────
    /// This holding's share of total portfolio value, %
    pub portfolio_weight_pct: f64,
    /// Current market value in the base currency
    pub market_value: f64,
    /// Open-lot cost basis in the base currency
    pub cost_basis: f64,
}

impl Default for HealthMetrics {
    fn default() -> Self {
        Self {
            return_1y_pct: 0.0,
            return_3y_pct: 0.0,
            return_5y_pct: 0.0,
            return_inception_pct: 0.0,
            xirr_pct: 0.0,
            benchmark_return_1y_pct: 0.0,
            benchmark_return_3y_pct: 0.0,
            benchmark_return_5y_pct: 0.0,
            benchmark_return_inception_pct: 0.0,
            alpha_1y_pct: 0.0,
            alpha_3y_pct: 0.0,
            alpha_5y_pct: 0.0,
            alpha_inception_pct: 0.0,
            opportunity_cost: 0.0,
            max_drawdown_pct: 0.0,
            current_drawdown_pct: 0.0,
            days_underwater: 0,
            holding_period_days: 0,
            volatility_pct: 0.0,
            sharpe_ratio: 0.0,
            dividend_yield_pct: 0.0,
            dividend_growth_pct: 0.0,
            dividend_trend: DividendTrend::None,
            portfolio_weight_pct: 0.0,
            market_value: 0.0,
            cost_basis: 0.0,
        }
    }
}
