use serde::{Deserialize, Serialize};

use super::metrics::HealthMetrics;

/// Action suggested for a holding, derived from (score, flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    Sell,
    Review,
    Hold,
    Accumulate,
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recommendation::Sell => write!(f, "Sell"),
            Recommendation::Review => write!(f, "Review"),
            Recommendation::Hold => write!(f, "Hold"),
            Recommendation::Accumulate => write!(f, "Accumulate"),
        }
    }
}

/// Coarse severity bucket derived purely from the numeric score:
/// ≤30 critical, ≤50 warning, ≤70 info, else healthy. Independent of the
/// recommendation state machine — a Hold can still be `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Warning,
    Info,
    Healthy,
}

impl Severity {
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=30 => Severity::Critical,
            31..=50 => Severity::Warning,
            51..=70 => Severity::Info,
            _ => Severity::Healthy,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Healthy => write!(f, "healthy"),
        }
    }
}

/// Human-auditable problem indicators, each driven by one metric threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthFlag {
    /// Negative total return over the trailing year
    NegativeReturn1Y,
    /// Negative total return over the trailing 3 years
    NegativeReturn3Y,
    /// Negative total return over the trailing 5 years
    NegativeReturn5Y,
    /// 1-year alpha below the configured underperformance margin
    LaggingBenchmark1Y,
    /// 3-year alpha below the configured underperformance margin
    LaggingBenchmark3Y,
    /// 5-year alpha below the configured underperformance margin
    LaggingBenchmark5Y,
    /// Opportunity cost above the configured dollar floor
    HighOpportunityCost,
    /// Days underwater beyond the configured day floor
    ExtendedUnderwater,
    /// Dividend trend is declining
    DecliningDividends,
    /// Dividends paid historically but none in the trailing 12 months
    SuspendedDividends,
    /// Volatility above the configured cap combined with a poor Sharpe
    HighVolatility,
    /// Portfolio weight below the small-position threshold
    SmallPosition,
    /// Portfolio weight above the large-position threshold
    LargePosition,
}

/// Mirror-image positive indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStrength {
    /// XIRR at or above 10%
    StrongReturns,
    /// 3-year alpha above +5%
    BeatingBenchmark,
    /// Never underwater over the analysis window
    NeverUnderwater,
    /// Sharpe ratio at or above the configured "good" level
    StrongRiskAdjusted,
    /// Growing dividend trend
    GrowingDividends,
}

/// Full health report for one holding. Plain structured data with no
/// behavior — suitable for direct serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingHealthReport {
    /// Ticker symbol of the holding
    pub symbol: String,

    /// Human-readable name
    pub name: String,

    /// Composite health score, 0..=100
    pub score: u8,

    pub recommendation: Recommendation,
    pub severity: Severity,

    pub flags: Vec<HealthFlag>,
    pub strengths: Vec<HealthStrength>,

    pub metrics: HealthMetrics,

    /// Templated human-readable summary lines derived from flags/strengths
    pub narrative: Vec<String>,
}

/// Aggregate over per-holding reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioHealthSummary {
    /// Value-weighted overall score: Σ(score×weight) / Σ(weight)
    pub overall_score: u8,

    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub healthy_count: usize,

    /// Up to five lowest-scoring symbols, worst first
    pub worst_performers: Vec<String>,

    /// Up to five symbols with the largest opportunity cost, largest first
    pub biggest_opportunity_costs: Vec<String>,

    /// Sum of opportunity cost across all analyzed holdings
    pub total_opportunity_cost: f64,

    /// Portfolio-level narrative recommendations
    pub recommendations: Vec<String>,

    /// One report per analyzed holding, sorted ascending by score
    pub holdings: Vec<HoldingHealthReport>,
}
