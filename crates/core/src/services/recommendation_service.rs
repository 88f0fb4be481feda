use crate::models::config::HealthCheckConfig;
use crate::models::metrics::{DividendTrend, HealthMetrics};
use crate::models::report::{HealthFlag, HealthStrength, Recommendation};

/// A Sharpe below this counts as "poor" when paired with high volatility.
const POOR_SHARPE: f64 = 0.5;

/// XIRR at or above this earns the strong-returns strength.
const STRONG_XIRR_PCT: f64 = 10.0;

/// 3-year alpha above this earns the beating-benchmark strength and is
/// required for an Accumulate recommendation.
const STRONG_ALPHA_PCT: f64 = 5.0;

/// Derives human-auditable flags/strengths from metric thresholds and turns
/// (score, flags) into a recommendation.
pub struct RecommendationService;

impl RecommendationService {
    pub fn new() -> Self {
        Self
    }

    /// Threshold-driven problem indicators. Order is stable so reports
    /// serialize deterministically.
    pub fn flags(&self, metrics: &HealthMetrics, config: &HealthCheckConfig) -> Vec<HealthFlag> {
        let t = &config.thresholds;
        let mut flags = Vec::new();

        if metrics.return_1y_pct < 0.0 {
            flags.push(HealthFlag::NegativeReturn1Y);
        }
        if metrics.return_3y_pct < 0.0 {
            flags.push(HealthFlag::NegativeReturn3Y);
        }
        if metrics.return_5y_pct < 0.0 {
            flags.push(HealthFlag::NegativeReturn5Y);
        }
        if metrics.alpha_1y_pct < t.benchmark_underperformance_pct {
            flags.push(HealthFlag::LaggingBenchmark1Y);
        }
        if metrics.alpha_3y_pct < t.benchmark_underperformance_pct {
            flags.push(HealthFlag::LaggingBenchmark3Y);
        }
        if metrics.alpha_5y_pct < t.benchmark_underperformance_pct {
            flags.push(HealthFlag::LaggingBenchmark5Y);
        }
        if metrics.opportunity_cost > t.opportunity_cost_min {
            flags.push(HealthFlag::HighOpportunityCost);
        }
        if metrics.days_underwater > t.extended_underwater_days {
            flags.push(HealthFlag::ExtendedUnderwater);
        }
        if metrics.dividend_trend == DividendTrend::Declining {
            flags.push(HealthFlag::DecliningDividends);
        }
        if metrics.dividend_trend == DividendTrend::Suspended {
            flags.push(HealthFlag::SuspendedDividends);
        }
        if metrics.volatility_pct > t.volatility_max_pct && metrics.sharpe_ratio < POOR_SHARPE {
            flags.push(HealthFlag::HighVolatility);
        }
        if metrics.portfolio_weight_pct < t.small_position_pct {
            flags.push(HealthFlag::SmallPosition);
        }
        if metrics.portfolio_weight_pct > t.large_position_pct {
            flags.push(HealthFlag::LargePosition);
        }

        flags
    }

    /// The mirror-image positive set.
    pub fn strengths(
        &self,
        metrics: &HealthMetrics,
        config: &HealthCheckConfig,
    ) -> Vec<HealthStrength> {
        let mut strengths = Vec::new();

        if metrics.xirr_pct >= STRONG_XIRR_PCT {
            strengths.push(HealthStrength::StrongReturns);
        }
        if metrics.alpha_3y_pct > STRONG_ALPHA_PCT {
            strengths.push(HealthStrength::BeatingBenchmark);
        }
        if metrics.days_underwater == 0 && metrics.holding_period_days > 0 {
            strengths.push(HealthStrength::NeverUnderwater);
        }
        if metrics.sharpe_ratio >= config.thresholds.sharpe_good {
            strengths.push(HealthStrength::StrongRiskAdjusted);
        }
        if metrics.dividend_trend == DividendTrend::Growing {
            strengths.push(HealthStrength::GrowingDividends);
        }

        strengths
    }

    /// The deterministic recommendation state machine — evaluation order
    /// matters:
    /// 1. score ≤ 25 → Sell
    /// 2. ≥3 of the sell-signal flags → Sell
    /// 3. score ≤ 50 or ≥2 sell-signal flags → Review
    /// 4. score ≥ 85 and 3-year alpha > 5% → Accumulate
    /// 5. otherwise → Hold
    pub fn recommend(
        &self,
        score: u8,
        flags: &[HealthFlag],
        metrics: &HealthMetrics,
    ) -> Recommendation {
        let sell_signals = flags
            .iter()
            .filter(|f| {
                matches!(
                    f,
                    HealthFlag::NegativeReturn3Y
                        | HealthFlag::ExtendedUnderwater
                        | HealthFlag::DecliningDividends
                        | HealthFlag::HighOpportunityCost
                )
            })
            .count();

        if score <= 25 || sell_signals >= 3 {
            Recommendation::Sell
        } else if score <= 50 || sell_signals >= 2 {
            Recommendation::Review
        } else if score >= 85 && metrics.alpha_3y_pct > STRONG_ALPHA_PCT {
            Recommendation::Accumulate
        } else {
            Recommendation::Hold
        }
    }

    /// Template strings for the report — one line per flag and strength.
    pub fn narrative(
        &self,
        flags: &[HealthFlag],
        strengths: &[HealthStrength],
        metrics: &HealthMetrics,
    ) -> Vec<String> {
        let mut lines = Vec::new();

        for flag in flags {
            lines.push(match flag {
                HealthFlag::NegativeReturn1Y => {
                    format!("1-year return is negative ({:.1}%)", metrics.return_1y_pct)
                }
                HealthFlag::NegativeReturn3Y => {
                    format!("3-year return is negative ({:.1}%)", metrics.return_3y_pct)
                }
                HealthFlag::NegativeReturn5Y => {
                    format!("5-year return is negative ({:.1}%)", metrics.return_5y_pct)
                }
                HealthFlag::LaggingBenchmark1Y => format!(
                    "trailing the benchmark by {:.1}% over 1 year",
                    -metrics.alpha_1y_pct
                ),
                HealthFlag::LaggingBenchmark3Y => format!(
                    "trailing the benchmark by {:.1}% over 3 years",
                    -metrics.alpha_3y_pct
                ),
                HealthFlag::LaggingBenchmark5Y => format!(
                    "trailing the benchmark by {:.1}% over 5 years",
                    -metrics.alpha_5y_pct
                ),
                HealthFlag::HighOpportunityCost => format!(
                    "the benchmark would be worth ${:.0} more",
                    metrics.opportunity_cost
                ),
                HealthFlag::ExtendedUnderwater => format!(
                    "below cost basis for {} trading days",
                    metrics.days_underwater
                ),
                HealthFlag::DecliningDividends => format!(
                    "dividends shrinking {:.1}% per year",
                    -metrics.dividend_growth_pct
                ),
                HealthFlag::SuspendedDividends => {
                    "no dividend paid in the last 12 months".to_string()
                }
                HealthFlag::HighVolatility => format!(
                    "volatility of {:.0}% with a Sharpe of {:.2}",
                    metrics.volatility_pct, metrics.sharpe_ratio
                ),
                HealthFlag::SmallPosition => format!(
                    "position is only {:.1}% of the portfolio",
                    metrics.portfolio_weight_pct
                ),
                HealthFlag::LargePosition => format!(
                    "position is {:.1}% of the portfolio",
                    metrics.portfolio_weight_pct
                ),
            });
        }

        for strength in strengths {
            lines.push(match strength {
                HealthStrength::StrongReturns => {
                    format!("annualized return of {:.1}%", metrics.xirr_pct)
                }
                HealthStrength::BeatingBenchmark => format!(
                    "beating the benchmark by {:.1}% over 3 years",
                    metrics.alpha_3y_pct
                ),
                HealthStrength::NeverUnderwater => "never closed below cost basis".to_string(),
                HealthStrength::StrongRiskAdjusted => {
                    format!("Sharpe ratio of {:.2}", metrics.sharpe_ratio)
                }
                HealthStrength::GrowingDividends => format!(
                    "dividends growing {:.1}% per year",
                    metrics.dividend_growth_pct
                ),
            });
        }

        lines
    }
}

impl Default for RecommendationService {
    fn default() -> Self {
        Self::new()
    }
}
