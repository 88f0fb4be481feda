use serde::{Deserialize, Serialize};

/// Scoring category weights. Nominally sum to 100 but this is NOT
/// validated: the combination math is relative, so a lopsided split
/// degrades gracefully instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub absolute_return: f64,
    pub relative_return: f64,
    pub underwater: f64,
    pub volatility: f64,
    pub dividends: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            absolute_return: 25.0,
            relative_return: 25.0,
            underwater: 20.0,
            volatility: 15.0,
            dividends: 15.0,
        }
    }
}

impl CategoryWeights {
    /// Sum of the four non-dividend weights, used when the dividend weight
    /// is redistributed for non-payers.
    pub fn non_dividend_sum(&self) -> f64 {
        self.absolute_return + self.relative_return + self.underwater + self.volatility
    }
}

/// Thresholds driving flags, strengths and penalties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    /// Alpha below this margin (in %) flags benchmark underperformance
    pub benchmark_underperformance_pct: f64,
    /// Opportunity cost above this dollar floor is flagged
    pub opportunity_cost_min: f64,
    /// Portfolio weight below this (%) is a small position
    pub small_position_pct: f64,
    /// Portfolio weight above this (%) is a large position
    pub large_position_pct: f64,
    /// Annualized volatility above this (%) is considered high
    pub volatility_max_pct: f64,
    /// Sharpe at or above this is considered good
    pub sharpe_good: f64,
    /// Days underwater beyond this flags extended underwater
    pub extended_underwater_days: u32,
    /// Holdings below this portfolio weight (%) are skipped entirely
    pub min_portfolio_weight_pct: f64,
    /// Symbols excluded from portfolio analysis
    pub excluded_symbols: Vec<String>,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            benchmark_underperformance_pct: -15.0,
            opportunity_cost_min: 500.0,
            small_position_pct: 1.0,
            large_position_pct: 15.0,
            volatility_max_pct: 40.0,
            sharpe_good: 1.0,
            extended_underwater_days: 365,
            min_portfolio_weight_pct: 0.0,
            excluded_symbols: Vec::new(),
        }
    }
}

/// Configuration for one analysis pass. Supplied once, read-only for the
/// duration of the analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckConfig {
    /// Ticker of the benchmark index the holdings are compared against
    pub benchmark_symbol: String,

    /// Length of the analysis window in years
    pub analysis_period_years: u32,

    pub weights: CategoryWeights,
    pub thresholds: HealthThresholds,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            benchmark_symbol: "SPY".to_string(),
            analysis_period_years: 5,
            weights: CategoryWeights::default(),
            thresholds: HealthThresholds::default(),
        }
    }
}
