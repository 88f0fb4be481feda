use crate::models::config::HealthCheckConfig;
use crate::models::metrics::{DividendTrend, HealthMetrics};

// Maximum raw points per category step function
const ABSOLUTE_RETURN_MAX: f64 = 25.0;
const RELATIVE_RETURN_MAX: f64 = 25.0;
const UNDERWATER_MAX: f64 = 20.0;
const RISK_MAX: f64 = 15.0;
const DIVIDEND_MAX: f64 = 15.0;

const SIZE_PENALTY: f64 = 10.0;
const SIZE_PENALTY_FLOOR: f64 = 15.0;

/// Maps metrics into a single 0–100 health score: five bounded category
/// sub-scores, configurable weights (with the dividend weight redistributed
/// for non-payers), then position-sizing penalties.
pub struct ScoringService;

impl ScoringService {
    pub fn new() -> Self {
        Self
    }

    /// Compute the composite score. Always within 0..=100.
    pub fn health_score(&self, metrics: &HealthMetrics, config: &HealthCheckConfig) -> u8 {
        let absolute = Self::absolute_return_score(metrics.xirr_pct);
        let relative = Self::relative_return_score(metrics.alpha_3y_pct);
        let underwater = Self::underwater_score(metrics.days_underwater);
        let risk = Self::risk_score(metrics.sharpe_ratio);
        let dividend = Self::dividend_score(metrics.dividend_trend, metrics.dividend_growth_pct);

        let weights = &config.weights;
        let mut score = match dividend {
            // Non-dividend holding: spread the dividend weight across the
            // other four so their maxima still sum to 100
            None => {
                let basis = weights.non_dividend_sum();
                if basis <= 0.0 {
                    0.0
                } else {
                    let multiplier = 100.0 / basis;
                    (absolute * weights.absolute_return / ABSOLUTE_RETURN_MAX
                        + relative * weights.relative_return / RELATIVE_RETURN_MAX
                        + underwater * weights.underwater / UNDERWATER_MAX
                        + risk * weights.volatility / RISK_MAX)
                        * multiplier
                }
            }
            Some(dividend) => {
                absolute * weights.absolute_return / ABSOLUTE_RETURN_MAX
                    + relative * weights.relative_return / RELATIVE_RETURN_MAX
                    + underwater * weights.underwater / UNDERWATER_MAX
                    + risk * weights.volatility / RISK_MAX
                    + dividend * weights.dividends / DIVIDEND_MAX
            }
        };
        score = score.round();

        // Size penalties apply after the weighted sum, each with the same
        // floor
        let weight_pct = metrics.portfolio_weight_pct;
        if weight_pct < config.thresholds.small_position_pct {
            score = (score - SIZE_PENALTY).max(SIZE_PENALTY_FLOOR);
        }
        if weight_pct > config.thresholds.large_position_pct {
            score = (score - SIZE_PENALTY).max(SIZE_PENALTY_FLOOR);
        }

        score.clamp(0.0, 100.0) as u8
    }

    /// Absolute return (0–25) from XIRR.
    pub fn absolute_return_score(xirr_pct: f64) -> f64 {
        if xirr_pct >= 10.0 {
            25.0
        } else if xirr_pct >= 7.0 {
            20.0
        } else if xirr_pct >= 4.0 {
            15.0
        } else if xirr_pct >= 0.0 {
            10.0
        } else if xirr_pct >= -5.0 {
            5.0
        } else {
            0.0
        }
    }

    /// Relative return (0–25) from 3-year alpha.
    pub fn relative_return_score(alpha_3y_pct: f64) -> f64 {
        if alpha_3y_pct >= 5.0 {
            25.0
        } else if alpha_3y_pct >= 0.0 {
            20.0
        } else if alpha_3y_pct >= -5.0 {
            15.0
        } else if alpha_3y_pct >= -10.0 {
            10.0
        } else if alpha_3y_pct >= -20.0 {
            5.0
        } else {
            0.0
        }
    }

    /// Underwater (0–20) from days spent below cost basis.
    pub fn underwater_score(days_underwater: u32) -> f64 {
        if days_underwater < 30 {
            20.0
        } else if days_underwater < 180 {
            15.0
        } else if days_underwater < 365 {
            10.0
        } else if days_underwater < 730 {
            5.0
        } else {
            0.0
        }
    }

    /// Risk (0–15) from the Sharpe ratio.
    pub fn risk_score(sharpe: f64) -> f64 {
        if sharpe >= 1.0 {
            15.0
        } else if sharpe >= 0.5 {
            12.0
        } else if sharpe >= 0.0 {
            8.0
        } else if sharpe >= -0.5 {
            4.0
        } else {
            0.0
        }
    }

    /// Dividends (0–15), or `None` for a holding that has never paid —
    /// which routes its weight to the other categories instead of scoring
    /// zero.
    pub fn dividend_score(trend: DividendTrend, growth_pct: f64) -> Option<f64> {
        match trend {
            DividendTrend::None => None,
            DividendTrend::Suspended => Some(0.0),
            DividendTrend::Growing if growth_pct >= 3.0 => Some(15.0),
            DividendTrend::Flat | DividendTrend::Growing
                if (-3.0..3.0).contains(&growth_pct) =>
            {
                Some(12.0)
            }
            DividendTrend::Declining => Some(6.0),
            _ => Some(0.0),
        }
    }
}

impl Default for ScoringService {
    fn default() -> Self {
        Self::new()
    }
}
